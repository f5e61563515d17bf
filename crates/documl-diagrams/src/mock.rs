//! Mock renderer for testing.
//!
//! Provides [`MockRenderer`] for exercising image materialization without a
//! PlantUML server or installation.

use std::collections::HashSet;
use std::io::Cursor;
use std::sync::Mutex;

use documl_config::ImageFormat;

use crate::renderer::{DiagramRenderer, ImageStream, RenderErrorKind};

/// Mock renderer for testing.
///
/// Every image renders to `<format>:<encoded>` as bytes unless its encoded
/// source was registered with [`failing_on`](Self::failing_on).
///
/// # Example
///
/// ```ignore
/// use documl_diagrams::MockRenderer;
///
/// let renderer = MockRenderer::new().failing_on("BROKEN");
/// ```
#[derive(Debug, Default)]
pub struct MockRenderer {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl MockRenderer {
    /// Create a mock renderer that succeeds for every image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make rendering fail for the given encoded source.
    #[must_use]
    pub fn failing_on(mut self, encoded: impl Into<String>) -> Self {
        self.failing.insert(encoded.into());
        self
    }

    /// Encoded sources rendered so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Bytes this mock produces for an image.
    pub fn image_bytes(encoded: &str, format: ImageFormat) -> Vec<u8> {
        format!("{format}:{encoded}").into_bytes()
    }
}

impl DiagramRenderer for MockRenderer {
    fn render(&self, encoded: &str, format: ImageFormat) -> Result<ImageStream, RenderErrorKind> {
        self.calls.lock().unwrap().push(encoded.to_owned());
        if self.failing.contains(encoded) {
            return Err(RenderErrorKind::Process(format!("mock failure for {encoded}")));
        }
        Ok(Box::new(Cursor::new(Self::image_bytes(encoded, format))))
    }
}
