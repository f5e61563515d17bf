//! CLI command implementations.

pub(crate) mod encode;
pub(crate) mod render;
pub(crate) mod resolve;

use std::path::PathBuf;

use clap::Args;
use documl_config::{
    ClassDiagramType, CliSettings, Config, ImageFormat, ImageLocation,
};

use crate::error::CliError;

pub(crate) use encode::{DecodeArgs, EncodeArgs};
pub(crate) use render::RenderArgs;
pub(crate) use resolve::ResolveArgs;

/// Configuration flags shared by `resolve` and `render`.
#[derive(Args)]
pub(crate) struct ConfigArgs {
    /// Path to configuration file (default: auto-discover documl.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image format: png or svg (overrides config).
    #[arg(long)]
    format: Option<ImageFormat>,

    /// Image location: local or remote (overrides config).
    #[arg(long)]
    location: Option<ImageLocation>,

    /// Automatic class diagrams: none, simple or detailed (overrides config).
    #[arg(long)]
    class_diagram: Option<ClassDiagramType>,

    /// PlantUML server URL (overrides config).
    #[arg(long, env = "DOCUML_SERVER_URL")]
    server_url: Option<String>,
}

impl ConfigArgs {
    /// Load the configuration with CLI overrides applied.
    pub(crate) fn load(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            format: self.format,
            location: self.location,
            class_diagram: self.class_diagram,
            server_url: self.server_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}
