//! Internal constants for diagram rendering.

/// CSS rule appended to the generated stylesheet once per render run.
pub const UML_STYLESHEET_RULE: &str = "\n.uml { max-width: 100%; }\n";

/// Stylesheet patched with [`UML_STYLESHEET_RULE`], relative to the output root.
pub const STYLESHEET_PATH: &str = "assets/css/main.css";

/// Directory receiving local images, relative to the output root.
pub const IMAGES_DIR: &str = "assets/images";
