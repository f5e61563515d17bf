//! Typed UML options.
//!
//! Options are parsed leniently: the `[uml]` table is first read into raw
//! TOML values, then every option is converted on its own. A value of the
//! wrong type, an unknown enum variant or an out-of-range number falls back to
//! the option's default and is only reported at debug level.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::ConfigError;

/// Default PlantUML server used for image links.
pub const DEFAULT_SERVER_URL: &str = "http://www.plantuml.com/plantuml/";

/// Error parsing an enum option from a CLI flag or a config value.
#[derive(Debug, thiserror::Error)]
#[error("invalid value '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    value: String,
    expected: &'static str,
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $default:ident, { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $name {
            /// Option value as written in configuration files.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseOptionError {
                        value: s.to_owned(),
                        expected: concat!($($text, " "),+),
                    }),
                }
            }
        }
    };
}

option_enum!(
    /// Image format requested from the diagram server.
    ImageFormat, Png, { Png => "png", Svg => "svg" }
);

option_enum!(
    /// Where diagram images end up.
    ImageLocation, Local, { Local => "local", Remote => "remote" }
);

option_enum!(
    /// Automatic class diagram generation mode.
    ClassDiagramType, None, { None => "none", Simple => "simple", Detailed => "detailed" }
);

option_enum!(
    /// Where an injected class diagram goes in the comment.
    ClassDiagramPosition, Below, { Above => "above", Below => "below" }
);

option_enum!(
    /// How member visibility is drawn.
    MemberVisibilityStyle, Icon, { Text => "text", Icon => "icon" }
);

option_enum!(
    /// Font style understood by PlantUML.
    FontStyle, Normal, { Normal => "normal", Plain => "plain", Italic => "italic", Bold => "bold" }
);

impl ImageFormat {
    /// Whether the format is a vector format embedded with `<object>`.
    pub fn is_vector(self) -> bool {
        matches!(self, Self::Svg)
    }
}

impl ClassDiagramType {
    /// Whether class diagrams are generated at all.
    pub fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether boxes list properties and methods.
    pub fn includes_members(self) -> bool {
        matches!(self, Self::Detailed)
    }
}

/// Options of the UML post-processor, resolved once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UmlOptions {
    /// Image format for every diagram.
    pub format: ImageFormat,
    /// Whether images are written locally or linked from the server.
    pub location: ImageLocation,
    /// PlantUML server base URL, always ending with `/`.
    pub server_url: String,
    /// Automatic class diagram options.
    pub class_diagram: ClassDiagramOptions,
}

impl Default for UmlOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::default(),
            location: ImageLocation::default(),
            server_url: DEFAULT_SERVER_URL.to_owned(),
            class_diagram: ClassDiagramOptions::default(),
        }
    }
}

impl UmlOptions {
    /// Server URL followed by the format segment, e.g. `http://host/plantuml/png/`.
    pub fn image_base_url(&self) -> String {
        format!("{}{}/", self.server_url, self.format)
    }
}

/// Presentation options for automatically generated class diagrams.
///
/// Unset colors, fonts and sizes are `None` and produce no directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDiagramOptions {
    pub diagram_type: ClassDiagramType,
    pub position: ClassDiagramPosition,
    pub hide_empty_members: bool,
    /// Sibling count above which the layout switches to left-to-right.
    pub top_down_layout_max_siblings: u32,
    pub member_visibility_style: MemberVisibilityStyle,
    pub hide_circled_char: bool,
    pub hide_shadow: bool,
    pub box_background_color: Option<String>,
    pub box_border_color: Option<String>,
    pub box_border_radius: Option<u32>,
    pub box_border_width: Option<u32>,
    pub arrow_color: Option<String>,
    pub class_font_name: Option<String>,
    pub class_font_size: Option<u32>,
    pub class_font_style: Option<FontStyle>,
    pub class_font_color: Option<String>,
    pub class_attribute_font_name: Option<String>,
    pub class_attribute_font_size: Option<u32>,
    pub class_attribute_font_style: Option<FontStyle>,
    pub class_attribute_font_color: Option<String>,
}

impl Default for ClassDiagramOptions {
    fn default() -> Self {
        Self {
            diagram_type: ClassDiagramType::None,
            position: ClassDiagramPosition::Below,
            hide_empty_members: true,
            top_down_layout_max_siblings: 6,
            member_visibility_style: MemberVisibilityStyle::Icon,
            hide_circled_char: false,
            hide_shadow: false,
            box_background_color: None,
            box_border_color: None,
            box_border_radius: None,
            box_border_width: None,
            arrow_color: None,
            class_font_name: None,
            class_font_size: None,
            class_font_style: None,
            class_font_color: None,
            class_attribute_font_name: None,
            class_attribute_font_size: None,
            class_attribute_font_style: None,
            class_attribute_font_color: None,
        }
    }
}

/// Raw `[uml]` table as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UmlOptionsRaw {
    format: Option<toml::Value>,
    location: Option<toml::Value>,
    server_url: Option<String>,
    class_diagram: ClassDiagramOptionsRaw,
}

/// Raw `[uml.class_diagram]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ClassDiagramOptionsRaw {
    #[serde(rename = "type")]
    diagram_type: Option<toml::Value>,
    position: Option<toml::Value>,
    hide_empty_members: Option<toml::Value>,
    top_down_layout_max_siblings: Option<toml::Value>,
    member_visibility_style: Option<toml::Value>,
    hide_circled_char: Option<toml::Value>,
    hide_shadow: Option<toml::Value>,
    box_background_color: Option<toml::Value>,
    box_border_color: Option<toml::Value>,
    box_border_radius: Option<toml::Value>,
    box_border_width: Option<toml::Value>,
    arrow_color: Option<toml::Value>,
    class_font_name: Option<toml::Value>,
    class_font_size: Option<toml::Value>,
    class_font_style: Option<toml::Value>,
    class_font_color: Option<toml::Value>,
    class_attribute_font_name: Option<toml::Value>,
    class_attribute_font_size: Option<toml::Value>,
    class_attribute_font_style: Option<toml::Value>,
    class_attribute_font_color: Option<toml::Value>,
}

/// Convert one raw option, falling back to `None` on a bad value.
fn lenient<T: DeserializeOwned>(value: Option<&toml::Value>, field: &str) -> Option<T> {
    let value = value?;
    match value.clone().try_into::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::debug!(field, value = %value, error = %e, "Invalid option value, using default");
            None
        }
    }
}

/// String option where the empty string means "unset".
fn lenient_text(value: Option<&toml::Value>, field: &str) -> Option<String> {
    lenient::<String>(value, field).filter(|s| !s.is_empty())
}

/// Size option where zero means "unset".
fn lenient_size(value: Option<&toml::Value>, field: &str) -> Option<u32> {
    lenient::<u32>(value, field).filter(|&n| n > 0)
}

/// Enum option, matched case-insensitively like the CLI flags.
fn lenient_enum<T>(value: Option<&toml::Value>, field: &str) -> Option<T>
where
    T: FromStr<Err = ParseOptionError>,
{
    let value = value?;
    let parsed = match value {
        toml::Value::String(s) => s.parse::<T>().map_err(|e| e.to_string()),
        other => Err(format!("expected a string, found {}", other.type_str())),
    };
    match parsed {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            tracing::debug!(field, value = %value, error = %error, "Invalid option value, using default");
            None
        }
    }
}

/// Font style option where the empty string means "unset".
fn lenient_font_style(value: Option<&toml::Value>, field: &str) -> Option<FontStyle> {
    if matches!(value, Some(toml::Value::String(s)) if s.is_empty()) {
        return None;
    }
    lenient_enum(value, field)
}

/// Resolve `uml.server_url`: expand `${VAR}` and `${VAR:-default}`, then
/// keep the URL only if it is HTTP(S).
///
/// An unset variable without a default is an error; a URL that expands to
/// something other than HTTP(S) falls back to the default server.
fn resolve_server_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SERVER_URL.to_owned());
    };

    let url = if raw.contains("${") {
        shellexpand::env_with_context(raw, |var| std::env::var(var).map(Some))
            .map_err(|e| ConfigError::EnvVar {
                field: "uml.server_url".to_owned(),
                message: format!("${{{}}}: {}", e.var_name, e.cause),
            })?
            .into_owned()
    } else {
        raw.to_owned()
    };

    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(normalize_server_url(&url))
    } else {
        tracing::debug!(field = "uml.server_url", value = %url, "Invalid option value, using default");
        Ok(DEFAULT_SERVER_URL.to_owned())
    }
}

impl UmlOptions {
    /// Resolve raw TOML values, using defaults for anything missing or invalid.
    ///
    /// Only an unresolvable environment variable in `server_url` is an error.
    pub(crate) fn from_raw(raw: &UmlOptionsRaw) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            format: lenient_enum(raw.format.as_ref(), "uml.format").unwrap_or(defaults.format),
            location: lenient_enum(raw.location.as_ref(), "uml.location")
                .unwrap_or(defaults.location),
            server_url: resolve_server_url(raw.server_url.as_deref())?,
            class_diagram: ClassDiagramOptions::from_raw(&raw.class_diagram),
        })
    }
}

impl ClassDiagramOptions {
    fn from_raw(raw: &ClassDiagramOptionsRaw) -> Self {
        let d = Self::default();
        Self {
            diagram_type: lenient_enum(raw.diagram_type.as_ref(), "class_diagram.type")
                .unwrap_or(d.diagram_type),
            position: lenient_enum(raw.position.as_ref(), "class_diagram.position")
                .unwrap_or(d.position),
            hide_empty_members: lenient(
                raw.hide_empty_members.as_ref(),
                "class_diagram.hide_empty_members",
            )
            .unwrap_or(d.hide_empty_members),
            top_down_layout_max_siblings: lenient(
                raw.top_down_layout_max_siblings.as_ref(),
                "class_diagram.top_down_layout_max_siblings",
            )
            .unwrap_or(d.top_down_layout_max_siblings),
            member_visibility_style: lenient_enum(
                raw.member_visibility_style.as_ref(),
                "class_diagram.member_visibility_style",
            )
            .unwrap_or(d.member_visibility_style),
            hide_circled_char: lenient(
                raw.hide_circled_char.as_ref(),
                "class_diagram.hide_circled_char",
            )
            .unwrap_or(d.hide_circled_char),
            hide_shadow: lenient(raw.hide_shadow.as_ref(), "class_diagram.hide_shadow")
                .unwrap_or(d.hide_shadow),
            box_background_color: lenient_text(
                raw.box_background_color.as_ref(),
                "class_diagram.box_background_color",
            ),
            box_border_color: lenient_text(
                raw.box_border_color.as_ref(),
                "class_diagram.box_border_color",
            ),
            box_border_radius: lenient_size(
                raw.box_border_radius.as_ref(),
                "class_diagram.box_border_radius",
            ),
            // Zero is a meaningful width, only negative values mean "unset".
            box_border_width: lenient::<i64>(
                raw.box_border_width.as_ref(),
                "class_diagram.box_border_width",
            )
            .and_then(|n| u32::try_from(n).ok()),
            arrow_color: lenient_text(raw.arrow_color.as_ref(), "class_diagram.arrow_color"),
            class_font_name: lenient_text(
                raw.class_font_name.as_ref(),
                "class_diagram.class_font_name",
            ),
            class_font_size: lenient_size(
                raw.class_font_size.as_ref(),
                "class_diagram.class_font_size",
            ),
            class_font_style: lenient_font_style(
                raw.class_font_style.as_ref(),
                "class_diagram.class_font_style",
            ),
            class_font_color: lenient_text(
                raw.class_font_color.as_ref(),
                "class_diagram.class_font_color",
            ),
            class_attribute_font_name: lenient_text(
                raw.class_attribute_font_name.as_ref(),
                "class_diagram.class_attribute_font_name",
            ),
            class_attribute_font_size: lenient_size(
                raw.class_attribute_font_size.as_ref(),
                "class_diagram.class_attribute_font_size",
            ),
            class_attribute_font_style: lenient_font_style(
                raw.class_attribute_font_style.as_ref(),
                "class_diagram.class_attribute_font_style",
            ),
            class_attribute_font_color: lenient_text(
                raw.class_attribute_font_color.as_ref(),
                "class_diagram.class_attribute_font_color",
            ),
        }
    }
}

/// Ensure the server URL ends with exactly one `/`.
pub(crate) fn normalize_server_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}
