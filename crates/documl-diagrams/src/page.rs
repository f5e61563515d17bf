//! Rewriting of PlantUML image links in rendered pages.
//!
//! Comment links end up in the rendered HTML as
//! `<img src="SERVER FORMAT/ENCODED" alt="ALT">`. This module finds them and
//! emits the final tag: `<img class="uml">` for raster formats or an
//! `<object type="image/svg+xml">` for SVG, pointing either at a local file or
//! back at the server.

use std::borrow::Cow;

use documl_config::{ImageFormat, UmlOptions};
use regex::{Captures, Regex};

/// One PlantUML image found in a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef<'h> {
    /// Zero-based position of the image within its page.
    pub index: usize,
    /// Transport-encoded diagram description.
    pub encoded: &'h str,
    /// Alternate text, if present and non-empty.
    pub alt: Option<&'h str>,
}

/// Rewrites PlantUML image tags in rendered pages.
#[derive(Debug, Clone)]
pub struct PageRewriter {
    pattern: Regex,
    format: ImageFormat,
    server_url: String,
}

impl PageRewriter {
    /// Build a rewriter matching images served from `options.server_url`.
    pub fn new(options: &UmlOptions) -> Self {
        let pattern = format!(
            r#"<img src="{}(?:img|png|svg)/([^"]*)"(?: alt="([^"]*)")?>"#,
            regex::escape(&options.server_url)
        );
        Self {
            // The server URL is escaped, so the pattern is always valid.
            pattern: Regex::new(&pattern).expect("escaped image pattern"),
            format: options.format,
            server_url: options.server_url.clone(),
        }
    }

    /// Find the PlantUML images of a page, in document order.
    pub fn images<'h>(&self, html: &'h str) -> Vec<ImageRef<'h>> {
        self.pattern
            .captures_iter(html)
            .enumerate()
            .map(|(index, caps)| image_ref(index, &caps))
            .collect()
    }

    /// Server URL of an encoded diagram in the configured format.
    pub fn remote_src(&self, encoded: &str) -> String {
        format!("{}{}/{encoded}", self.server_url, self.format)
    }

    /// Rewrite every image tag, asking `src_for` where each image lives.
    ///
    /// `src_for` is called once per image, in document order. Pages without
    /// PlantUML images are returned borrowed.
    pub fn rewrite<'h, F>(&self, html: &'h str, mut src_for: F) -> Cow<'h, str>
    where
        F: FnMut(&ImageRef<'_>) -> String,
    {
        let mut index = 0;
        self.pattern.replace_all(html, |caps: &Captures| {
            let image = image_ref(index, caps);
            index += 1;
            let src = src_for(&image);
            image_tag(self.format, &src, image.alt)
        })
    }

    /// Rewrite every image tag to point back at the server.
    pub fn rewrite_remote<'h>(&self, html: &'h str) -> Cow<'h, str> {
        self.rewrite(html, |image| self.remote_src(image.encoded))
    }
}

fn image_ref<'h>(index: usize, caps: &Captures<'h>) -> ImageRef<'h> {
    ImageRef {
        index,
        encoded: caps.get(1).map_or("", |m| m.as_str()),
        alt: caps.get(2).map(|m| m.as_str()).filter(|alt| !alt.is_empty()),
    }
}

/// Final markup for an image in the given format.
pub fn image_tag(format: ImageFormat, src: &str, alt: Option<&str>) -> String {
    if format.is_vector() {
        let alt = alt.unwrap_or_default();
        format!(r#"<object type="image/svg+xml" class="uml" data="{src}">{alt}</object>"#)
    } else {
        match alt {
            Some(alt) => format!(r#"<img class="uml" src="{src}" alt="{alt}">"#),
            None => format!(r#"<img class="uml" src="{src}">"#),
        }
    }
}
