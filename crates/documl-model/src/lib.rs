//! Declaration graph for documl.
//!
//! This crate models the part of a documentation tool's reflection tree that
//! documl reads and rewrites:
//!
//! - [`Project`]: the full collection of declarations for one run, keyed by
//!   [`DeclarationId`]
//! - [`Declaration`]: a class, interface or other documented symbol with its
//!   comment, members and the four relationship lists
//! - [`TypeReference`]: an edge to another declaration, possibly unresolved
//!
//! Projects are usually loaded from a JSON dump produced by the host tool:
//!
//! ```ignore
//! use documl_model::Project;
//!
//! let project = Project::load(Path::new("reflections.json"))?;
//! for declaration in project.declarations() {
//!     println!("{}", declaration.name);
//! }
//! ```

mod declaration;
mod project;

pub use declaration::{
    Comment, Declaration, DeclarationKind, Flags, Member, MemberKind, TypeRef, TypeReference,
    Visibility,
};
pub use project::{DeclarationId, ModelError, Project};
