//! Configuration management for documl.
//!
//! Parses `documl.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Option parsing
//!
//! The `[uml]` section is parsed leniently (see [`UmlOptions`]): an invalid
//! value never fails the load, the option silently keeps its default.
//! The `[renderer]` section is parsed strictly.
//!
//! ## Environment Variable Expansion
//!
//! `uml.server_url` supports:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod options;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use options::{
    ClassDiagramOptions, ClassDiagramPosition, ClassDiagramType, DEFAULT_SERVER_URL, FontStyle,
    ImageFormat, ImageLocation, MemberVisibilityStyle, ParseOptionError, UmlOptions,
};

use options::UmlOptionsRaw;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override image format.
    pub format: Option<ImageFormat>,
    /// Override image location.
    pub location: Option<ImageLocation>,
    /// Override automatic class diagram mode.
    pub class_diagram: Option<ClassDiagramType>,
    /// Override PlantUML server URL.
    pub server_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "documl.toml";

/// Raw configuration file as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigRaw {
    uml: UmlOptionsRaw,
    renderer: RendererConfig,
}

/// Application configuration.
#[derive(Debug, Default)]
pub struct Config {
    /// Resolved UML options.
    pub uml: UmlOptions,
    /// Diagram renderer used for local images.
    pub renderer: RendererConfig,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

/// Which renderer materializes local images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Fetch images from the PlantUML server over HTTP.
    #[default]
    Server,
    /// Pipe descriptions through a local PlantUML command.
    Command,
}

/// Renderer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub kind: RendererKind,
    /// HTTP timeout in seconds for the server renderer.
    pub timeout_secs: u64,
    /// Program and leading arguments for the command renderer.
    pub command: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Server,
            timeout_secs: 30,
            command: vec!["plantuml".to_owned()],
        }
    }
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`uml.server_url`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_URL`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `documl.toml` in current directory and parents,
    /// and falls back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        tracing::debug!(
            format = %config.uml.format,
            location = %config.uml.location,
            class_diagram = %config.uml.class_diagram.diagram_type,
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: ConfigRaw = toml::from_str(content)?;

        let config = Self {
            uml: UmlOptions::from_raw(&raw.uml)?,
            renderer: raw.renderer,
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(format) = settings.format {
            self.uml.format = format;
        }
        if let Some(location) = settings.location {
            self.uml.location = location;
        }
        if let Some(diagram_type) = settings.class_diagram {
            self.uml.class_diagram.diagram_type = diagram_type;
        }
        if let Some(url) = &settings.server_url {
            self.uml.server_url = options::normalize_server_url(url);
        }
    }

    /// Validate configuration values that have no safe fallback.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renderer.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "renderer.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        if self.renderer.kind == RendererKind::Command && self.renderer.command.is_empty() {
            return Err(ConfigError::Validation(
                "renderer.command cannot be empty when renderer.kind = \"command\"".to_owned(),
            ));
        }
        Ok(())
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}
