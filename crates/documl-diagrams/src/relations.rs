//! Inheritance and implementation queries over a [`Project`].
//!
//! All queries are read-only and treat missing edge lists and unresolved
//! targets as empty. Related declarations are identified by name when
//! deduplicating, so two distinct declarations sharing a name collapse into
//! the first one seen.

use std::collections::HashSet;

use documl_model::{Declaration, Project};

/// The four relationship sets drawn around a declaration.
#[derive(Debug, Default)]
pub struct Relations<'a> {
    pub supertypes: Vec<&'a Declaration>,
    pub interfaces: Vec<&'a Declaration>,
    pub subtypes: Vec<&'a Declaration>,
    pub implementors: Vec<&'a Declaration>,
}

impl<'a> Relations<'a> {
    /// Resolve all four relationship sets of `declaration`.
    pub fn of(project: &'a Project, declaration: &'a Declaration) -> Self {
        Self {
            supertypes: direct_supertypes(project, declaration),
            interfaces: direct_interfaces(project, declaration),
            subtypes: direct_subtypes(project, declaration),
            implementors: direct_implementors(project, declaration),
        }
    }

    /// Number of edges drawn above the declaration.
    pub fn siblings_above(&self) -> usize {
        self.supertypes.len() + self.interfaces.len()
    }

    /// Number of edges drawn below the declaration.
    pub fn siblings_below(&self) -> usize {
        self.subtypes.len() + self.implementors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings_above() == 0 && self.siblings_below() == 0
    }
}

/// Declarations `declaration` extends.
pub fn direct_supertypes<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    project.resolve_all(&declaration.extends).collect()
}

/// Declarations extending `declaration`.
pub fn direct_subtypes<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    project.resolve_all(&declaration.extended_by).collect()
}

/// Interfaces `declaration` implements that are not already inherited through
/// one of its supertypes.
pub fn direct_interfaces<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    let mut interfaces: Vec<_> = project.resolve_all(&declaration.implements).collect();
    if interfaces.is_empty() {
        return interfaces;
    }

    let inherited: HashSet<&str> = direct_supertypes(project, declaration)
        .into_iter()
        .flat_map(|supertype| ancestors(project, supertype))
        .map(|ancestor| ancestor.name.as_str())
        .collect();

    interfaces.retain(|interface| !inherited.contains(interface.name.as_str()));
    interfaces
}

/// Declarations implementing `declaration`, minus those that are subtypes of
/// another listed implementor.
pub fn direct_implementors<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    let mut implementors: Vec<_> = project.resolve_all(&declaration.implemented_by).collect();

    let covered: HashSet<&str> = implementors
        .iter()
        .flat_map(|&implementor| descendants(project, implementor))
        .map(|descendant| descendant.name.as_str())
        .collect();

    implementors.retain(|implementor| !covered.contains(implementor.name.as_str()));
    implementors
}

/// Everything `declaration` extends or implements, transitively.
///
/// The declaration itself is only part of the result when the graph loops
/// back to it.
pub fn ancestors<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    let mut visited = HashSet::from([declaration.name.as_str()]);
    let mut found = Vec::new();
    collect_ancestors(project, declaration, &mut visited, &mut found);
    dedup_by_name(found)
}

fn collect_ancestors<'a>(
    project: &'a Project,
    declaration: &'a Declaration,
    visited: &mut HashSet<&'a str>,
    found: &mut Vec<&'a Declaration>,
) {
    let parents = project
        .resolve_all(&declaration.extends)
        .chain(project.resolve_all(&declaration.implements));
    for parent in parents {
        found.push(parent);
        if visited.insert(parent.name.as_str()) {
            collect_ancestors(project, parent, visited, found);
        }
    }
}

/// Everything extending or implementing `declaration`, transitively.
pub fn descendants<'a>(project: &'a Project, declaration: &'a Declaration) -> Vec<&'a Declaration> {
    let mut visited = HashSet::from([declaration.name.as_str()]);
    let mut found = Vec::new();
    collect_descendants(project, declaration, &mut visited, &mut found);
    dedup_by_name(found)
}

fn collect_descendants<'a>(
    project: &'a Project,
    declaration: &'a Declaration,
    visited: &mut HashSet<&'a str>,
    found: &mut Vec<&'a Declaration>,
) {
    let children = project
        .resolve_all(&declaration.extended_by)
        .chain(project.resolve_all(&declaration.implemented_by));
    for child in children {
        found.push(child);
        if visited.insert(child.name.as_str()) {
            collect_descendants(project, child, visited, found);
        }
    }
}

/// Keep the first declaration seen for each name.
pub fn dedup_by_name(declarations: Vec<&Declaration>) -> Vec<&Declaration> {
    let mut seen = HashSet::new();
    declarations
        .into_iter()
        .filter(|declaration| seen.insert(declaration.name.as_str()))
        .collect()
}
