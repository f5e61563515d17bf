//! Files written into the documentation output.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use documl_config::ImageFormat;
use documl_diagrams::{IMAGES_DIR, STYLESHEET_PATH, UML_STYLESHEET_RULE};

use crate::error::PluginError;

/// Directory receiving local images for an output root.
pub fn images_dir(output_dir: &Path) -> PathBuf {
    output_dir.join(IMAGES_DIR)
}

/// File name of the `number`-th image of a run.
pub fn image_filename(number: usize, format: ImageFormat) -> String {
    format!("uml{number}.{format}")
}

/// Write image bytes to disk.
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<(), PluginError> {
    std::fs::write(path, bytes).map_err(|e| PluginError::io(path, e))
}

/// Append the `.uml` rule to the generated stylesheet.
///
/// The stylesheet must already exist.
pub fn patch_stylesheet(output_dir: &Path) -> Result<PathBuf, PluginError> {
    let path = output_dir.join(STYLESHEET_PATH);
    let mut file = OpenOptions::new()
        .append(true)
        .open(&path)
        .map_err(|e| PluginError::io(&path, e))?;
    file.write_all(UML_STYLESHEET_RULE.as_bytes())
        .map_err(|e| PluginError::io(&path, e))?;
    Ok(path)
}

/// Relative link from a page to a file, with `/` separators.
///
/// The last component of `page` is the document itself; the link is relative
/// to the directory containing it. Both paths must share the same base.
pub fn relative_link(page: &Path, target: &Path) -> String {
    let page_dir: Vec<Component<'_>> = page
        .parent()
        .map(|dir| dir.components().filter(|c| *c != Component::CurDir).collect())
        .unwrap_or_default();
    let target: Vec<Component<'_>> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = page_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = page_dir.len() - common;
    let down: Vec<_> = target[common..]
        .iter()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();

    format!("{}{}", "../".repeat(ups), down.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_filename() {
        assert_eq!(image_filename(1, ImageFormat::Png), "uml1.png");
        assert_eq!(image_filename(12, ImageFormat::Svg), "uml12.svg");
    }

    #[test]
    fn test_relative_link_from_root_page() {
        assert_eq!(
            relative_link(Path::new("out/index.html"), Path::new("out/assets/images/uml1.png")),
            "assets/images/uml1.png"
        );
    }

    #[test]
    fn test_relative_link_from_nested_page() {
        assert_eq!(
            relative_link(
                Path::new("/site/out/classes/dog.html"),
                Path::new("/site/out/assets/images/uml2.svg")
            ),
            "../assets/images/uml2.svg"
        );
    }

    #[test]
    fn test_relative_link_ignores_cur_dir() {
        assert_eq!(
            relative_link(
                Path::new("./out/modules/a/b.html"),
                Path::new("out/assets/images/uml3.png")
            ),
            "../../assets/images/uml3.png"
        );
    }

    #[test]
    fn test_relative_link_bare_page_name() {
        assert_eq!(
            relative_link(Path::new("index.html"), Path::new("assets/images/uml1.png")),
            "assets/images/uml1.png"
        );
    }

    #[test]
    fn test_patch_stylesheet_appends() {
        let dir = tempfile::tempdir().unwrap();
        let css_dir = dir.path().join("assets/css");
        std::fs::create_dir_all(&css_dir).unwrap();
        std::fs::write(css_dir.join("main.css"), "body { margin: 0; }").unwrap();

        let path = patch_stylesheet(dir.path()).unwrap();

        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "body { margin: 0; }\n.uml { max-width: 100%; }\n"
        );
    }

    #[test]
    fn test_patch_stylesheet_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = patch_stylesheet(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::Io { .. }));
        assert!(err.to_string().contains("main.css"));
    }
}
