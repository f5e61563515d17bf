//! Documentation lifecycle integration for documl.
//!
//! [`UmlPlugin`] hooks into the phases of a documentation run through an
//! ordered list of phase bindings (see [`lifecycle`]):
//!
//! - resolve-end: class diagrams are injected into comments and every
//!   `<uml>` tag becomes a PlantUML image link
//! - page-end: image links in rendered pages are rewritten to local files or
//!   back to the server
//! - render-end: the stylesheet gets the `.uml` rule
//!
//! # Example
//!
//! ```ignore
//! use documl_plugin::{Lifecycle, UmlPlugin, run_resolve};
//!
//! let mut lifecycle = Lifecycle::new(UmlPlugin::from_config(&config)?);
//! run_resolve(&mut lifecycle, &config.uml, &mut project)?;
//! ```

pub mod assets;
mod error;
pub mod lifecycle;
mod plugin;

pub use error::PluginError;
pub use lifecycle::{Binding, Event, Handler, Lifecycle, LifecyclePlugin, Page, Phase};
pub use plugin::{PageReport, RunStats, UmlPlugin, run_render, run_resolve};
