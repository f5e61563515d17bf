//! Project: the declaration collection of one documentation run.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::declaration::{Declaration, TypeReference};

/// Opaque identifier of a declaration within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclarationId(pub u32);

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error loading or saving a project dump.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate declaration id {0}")]
    DuplicateId(DeclarationId),
}

/// All declarations of one documentation run.
///
/// Declarations keep their insertion order; lookups by id go through an
/// index rebuilt whenever the collection is constructed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name as reported by the host.
    #[serde(default)]
    pub name: String,
    declarations: Vec<Declaration>,
    #[serde(skip)]
    index: HashMap<DeclarationId, usize>,
}

impl Project {
    /// Build a project from a list of declarations.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateId`] if two declarations share an id.
    pub fn new(
        name: impl Into<String>,
        declarations: Vec<Declaration>,
    ) -> Result<Self, ModelError> {
        let mut project = Self {
            name: name.into(),
            declarations,
            index: HashMap::new(),
        };
        project.reindex()?;
        Ok(project)
    }

    /// Parse a project from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let mut project: Self = serde_json::from_str(json)?;
        project.reindex()?;
        Ok(project)
    }

    /// Serialize the project back to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a project dump from disk.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Write the project dump to disk.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn reindex(&mut self) -> Result<(), ModelError> {
        self.index.clear();
        for (position, declaration) in self.declarations.iter().enumerate() {
            if self.index.insert(declaration.id, position).is_some() {
                return Err(ModelError::DuplicateId(declaration.id));
            }
        }
        Ok(())
    }

    /// Declarations in insertion order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Ids of all declarations in insertion order.
    pub fn ids(&self) -> Vec<DeclarationId> {
        self.declarations.iter().map(|d| d.id).collect()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, id: DeclarationId) -> Option<&Declaration> {
        self.index.get(&id).map(|&i| &self.declarations[i])
    }

    pub fn get_mut(&mut self, id: DeclarationId) -> Option<&mut Declaration> {
        self.index.get(&id).map(|&i| &mut self.declarations[i])
    }

    /// Resolve an edge to the declaration it points at.
    ///
    /// Returns `None` for external references and for targets missing from
    /// the project.
    pub fn resolve(&self, reference: &TypeReference) -> Option<&Declaration> {
        reference.target.and_then(|id| self.get(id))
    }

    /// Resolve every edge of a list, skipping the ones that do not resolve.
    pub fn resolve_all<'a>(
        &'a self,
        references: &'a [TypeReference],
    ) -> impl Iterator<Item = &'a Declaration> + 'a {
        references.iter().filter_map(|r| self.resolve(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Comment, DeclarationKind};
    use pretty_assertions::assert_eq;

    const DUMP: &str = r#"{
        "name": "zoo",
        "declarations": [
            {"id": 1, "name": "Animal", "kind": "class",
             "extendedBy": [{"name": "Dog", "target": 2}]},
            {"id": 2, "name": "Dog", "kind": "class",
             "comment": {"shortText": "A dog."},
             "extends": [{"name": "Animal", "target": 1}],
             "implements": [{"name": "Iterable"}]}
        ]
    }"#;

    #[test]
    fn test_from_json_indexes_declarations() {
        let project = Project::from_json(DUMP).unwrap();
        assert_eq!(project.name, "zoo");
        assert_eq!(project.len(), 2);
        assert_eq!(project.get(DeclarationId(2)).unwrap().name, "Dog");
        assert!(project.get(DeclarationId(3)).is_none());
    }

    #[test]
    fn test_resolve_skips_external_references() {
        let project = Project::from_json(DUMP).unwrap();
        let dog = project.get(DeclarationId(2)).unwrap();

        let parents: Vec<_> = project.resolve_all(&dog.extends).map(|d| &d.name).collect();
        assert_eq!(parents, ["Animal"]);
        assert_eq!(project.resolve_all(&dog.implements).count(), 0);
    }

    #[test]
    fn test_resolve_dangling_target() {
        let project = Project::from_json(DUMP).unwrap();
        let dangling = TypeReference::to("Ghost", DeclarationId(99));
        assert!(project.resolve(&dangling).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = Project::new(
            "dup",
            vec![
                Declaration::new(DeclarationId(1), "A", DeclarationKind::Class),
                Declaration::new(DeclarationId(1), "B", DeclarationKind::Class),
            ],
        );
        assert!(matches!(result, Err(ModelError::DuplicateId(DeclarationId(1)))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");

        let mut project = Project::from_json(DUMP).unwrap();
        project.get_mut(DeclarationId(1)).unwrap().comment =
            Some(Comment::new("Base.", "Long text."));
        project.save(&path).unwrap();

        let loaded = Project::load(&path).unwrap();
        assert_eq!(loaded.name, "zoo");
        assert_eq!(
            loaded.get(DeclarationId(1)),
            project.get(DeclarationId(1))
        );
        assert_eq!(loaded.get(DeclarationId(2)), project.get(DeclarationId(2)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Project::load(Path::new("/nonexistent/project.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/project.json"));
    }
}
