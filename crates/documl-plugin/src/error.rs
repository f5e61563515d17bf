//! Error types for the documentation lifecycle.

use std::path::PathBuf;

use crate::lifecycle::Phase;

/// Fatal error of a documentation run.
///
/// Failures rendering a single image are not fatal; they are collected in
/// the page report instead.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{phase} cannot follow {}", previous.map_or("the start of the run", Phase::as_str))]
    OutOfOrder {
        phase: Phase,
        previous: Option<Phase>,
    },
    #[error("render-begin has not been dispatched")]
    RenderNotStarted,
    #[error("renderer.command is empty")]
    EmptyCommand,
}

impl PluginError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
