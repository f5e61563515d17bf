//! PlantUML diagrams for documl.
//!
//! This crate holds everything that turns declarations and comments into
//! PlantUML images:
//! - [`encode`](mod@encode): the compact transport encoding used in PlantUML URLs
//! - [`relations`]: inheritance and implementation queries with redundancy
//!   elimination
//! - [`class_diagram`]: class diagram synthesis with styling directives
//! - [`comment`]: `<uml>` tag injection and tag-to-link conversion
//! - [`page`]: final image markup in rendered pages
//! - [`renderer`]: server and command-line renderers producing image bytes
//!
//! # Example
//!
//! ```ignore
//! use documl_config::UmlOptions;
//! use documl_diagrams::UmlTagConverter;
//!
//! let converter = UmlTagConverter::new(&UmlOptions::default());
//! let text = converter.convert("See <uml>Alice -> Bob</uml>.");
//! assert!(text.starts_with("See ![](http://www.plantuml.com/plantuml/png/"));
//! ```

pub mod class_diagram;
pub mod comment;
mod consts;
pub mod encode;
#[cfg(feature = "mock")]
mod mock;
pub mod page;
pub mod relations;
pub mod renderer;

pub use class_diagram::synthesize;
pub use comment::{UmlTagConverter, inject_class_diagram};
pub use consts::{IMAGES_DIR, STYLESHEET_PATH, UML_STYLESHEET_RULE};
pub use encode::{DecodeError, decode, encode};
#[cfg(feature = "mock")]
pub use mock::MockRenderer;
pub use page::{ImageRef, PageRewriter};
pub use relations::Relations;
pub use renderer::{
    DiagramRenderer, ImageStream, PlantUmlCommand, PlantUmlServer, RenderError, RenderErrorKind,
    render_bytes,
};
