//! Declarations and their parts.

use serde::{Deserialize, Serialize};

use crate::project::DeclarationId;

/// Kind of a documented declaration.
///
/// Only classes and interfaces take part in class diagrams; every other
/// reflection kind the host knows about collapses into [`Other`](Self::Other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Class,
    Interface,
    #[serde(other)]
    Other,
}

/// Modifier flags shared by declarations and members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flags {
    pub is_static: bool,
    pub is_abstract: bool,
}

/// Member visibility. Members without an explicit visibility are public.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Kind of a declaration member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Property,
    Method,
    /// Constructors, accessors, index signatures and anything else.
    #[serde(other)]
    Other,
}

/// Type descriptor attached to a member.
///
/// Simple types carry a printable name. Structural types (unions, literals,
/// reflections, tuples, ...) are all [`Other`](Self::Other) and are never
/// printed in diagrams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeRef {
    /// Built-in type such as `string` or `number`.
    Named { name: String },
    /// Reference to another named type.
    Reference { name: String },
    /// Generic type parameter.
    TypeParameter { name: String },
    /// Type the host could not classify.
    Unknown { name: String },
    #[serde(other)]
    Other,
}

impl TypeRef {
    /// Name to print after a member, if this type is simple enough to print.
    pub fn printable_name(&self) -> Option<&str> {
        match self {
            Self::Named { name }
            | Self::Reference { name }
            | Self::TypeParameter { name }
            | Self::Unknown { name } => Some(name),
            Self::Other => None,
        }
    }
}

/// Property or method of a class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub flags: Flags,
    /// Property type or method return type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<TypeRef>,
}

impl Member {
    /// Create a public property.
    #[must_use]
    pub fn property(name: impl Into<String>, type_ref: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Property,
            visibility: Visibility::Public,
            flags: Flags::default(),
            type_ref,
        }
    }

    /// Create a public method.
    #[must_use]
    pub fn method(name: impl Into<String>, type_ref: Option<TypeRef>) -> Self {
        Self {
            kind: MemberKind::Method,
            ..Self::property(name, type_ref)
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }
}

/// Documentation comment of a declaration.
///
/// Both fields are optional; absent text is left untouched by every rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    /// Short summary shown above the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Comment {
    #[must_use]
    pub fn new(short_text: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            short_text: Some(short_text.into()),
            text: Some(text.into()),
        }
    }
}

/// Edge from a declaration to another type.
///
/// `target` is `None` for types outside the project (ambient or external
/// declarations); such edges are ignored by relationship queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<DeclarationId>,
}

impl TypeReference {
    #[must_use]
    pub fn to(name: impl Into<String>, target: DeclarationId) -> Self {
        Self {
            name: name.into(),
            target: Some(target),
        }
    }

    #[must_use]
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }
}

/// A documented declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub id: DeclarationId,
    pub name: String,
    pub kind: DeclarationKind,
    #[serde(default)]
    pub flags: Flags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Member>,
    /// Types this declaration extends.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extends: Vec<TypeReference>,
    /// Types extending this declaration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extended_by: Vec<TypeReference>,
    /// Interfaces this declaration implements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<TypeReference>,
    /// Types implementing this declaration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implemented_by: Vec<TypeReference>,
}

impl Declaration {
    /// Create a declaration without comment, members or edges.
    #[must_use]
    pub fn new(id: DeclarationId, name: impl Into<String>, kind: DeclarationKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            flags: Flags::default(),
            comment: None,
            children: Vec::new(),
            extends: Vec::new(),
            extended_by: Vec::new(),
            implements: Vec::new(),
            implemented_by: Vec::new(),
        }
    }

    /// Whether this declaration is a class or an interface.
    pub fn is_class_like(&self) -> bool {
        matches!(
            self.kind,
            DeclarationKind::Class | DeclarationKind::Interface
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_name_simple_types() {
        let named = TypeRef::Named {
            name: "string".to_owned(),
        };
        let param = TypeRef::TypeParameter {
            name: "T".to_owned(),
        };
        assert_eq!(named.printable_name(), Some("string"));
        assert_eq!(param.printable_name(), Some("T"));
        assert_eq!(TypeRef::Other.printable_name(), None);
    }

    #[test]
    fn test_unknown_kinds_deserialize_as_other() {
        let member: Member =
            serde_json::from_str(r#"{"name":"constructor","kind":"constructor"}"#).unwrap();
        assert_eq!(member.kind, MemberKind::Other);
        assert_eq!(member.visibility, Visibility::Public);
        assert!(member.type_ref.is_none());

        let type_ref: TypeRef = serde_json::from_str(r#"{"kind":"union"}"#).unwrap();
        assert_eq!(type_ref, TypeRef::Other);
    }

    #[test]
    fn test_member_type_field() {
        let member: Member = serde_json::from_str(
            r#"{"name":"size","kind":"property","visibility":"private",
                "flags":{"isStatic":true},"type":{"kind":"named","name":"number"}}"#,
        )
        .unwrap();
        assert_eq!(member.visibility, Visibility::Private);
        assert!(member.flags.is_static);
        assert!(!member.flags.is_abstract);
        assert_eq!(
            member.type_ref,
            Some(TypeRef::Named {
                name: "number".to_owned()
            })
        );
    }

    #[test]
    fn test_declaration_missing_lists_default_to_empty() {
        let declaration: Declaration =
            serde_json::from_str(r#"{"id":3,"name":"Thing","kind":"enum"}"#).unwrap();
        assert_eq!(declaration.kind, DeclarationKind::Other);
        assert!(declaration.extends.is_empty());
        assert!(declaration.implemented_by.is_empty());
        assert!(declaration.comment.is_none());
        assert!(!declaration.is_class_like());
    }
}
