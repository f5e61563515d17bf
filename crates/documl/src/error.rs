//! CLI error types.

use documl_config::ConfigError;
use documl_diagrams::DecodeError;
use documl_model::ModelError;
use documl_plugin::PluginError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Model(#[from] ModelError),

    #[error("{0}")]
    Plugin(#[from] PluginError),

    #[error("{0}")]
    Decode(#[from] DecodeError),

    #[error("invalid page pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Validation(String),
}
