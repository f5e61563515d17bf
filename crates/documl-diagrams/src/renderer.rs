//! Diagram renderers turning transport-encoded descriptions into image bytes.
//!
//! - [`PlantUmlServer`]: HTTP GET against a PlantUML server
//! - [`PlantUmlCommand`]: decodes the description and pipes it through a
//!   local `plantuml` process

use std::io::{Cursor, Read, Write};
use std::process::{Command, Stdio};
use std::time::Duration;

use documl_config::ImageFormat;
use ureq::Agent;

use crate::encode::{DecodeError, decode};

/// Byte stream of a rendered image.
pub type ImageStream = Box<dyn Read + Send>;

/// Renders one transport-encoded diagram.
pub trait DiagramRenderer: Send + Sync {
    /// Render `encoded` into an image of the given format.
    fn render(&self, encoded: &str, format: ImageFormat) -> Result<ImageStream, RenderErrorKind>;
}

/// Single image rendering error.
#[derive(Debug, thiserror::Error)]
#[error("image {index}: {kind}")]
pub struct RenderError {
    /// Zero-based position of the image within its page.
    pub index: usize,
    pub kind: RenderErrorKind,
}

/// Kind of image rendering error.
#[derive(Debug, thiserror::Error)]
pub enum RenderErrorKind {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("process error: {0}")]
    Process(String),
}

/// Render a diagram and read the whole image.
///
/// Reading failures belong to the renderer and are reported like any other
/// rendering failure of that image.
pub fn render_bytes(
    renderer: &dyn DiagramRenderer,
    index: usize,
    encoded: &str,
    format: ImageFormat,
) -> Result<Vec<u8>, RenderError> {
    let mut stream = renderer
        .render(encoded, format)
        .map_err(|kind| RenderError { index, kind })?;
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).map_err(|e| RenderError {
        index,
        kind: RenderErrorKind::Io(e.to_string()),
    })?;
    Ok(bytes)
}

/// Create HTTP agent with the specified timeout.
pub fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

/// Renders diagrams by fetching them from a PlantUML server.
#[derive(Clone)]
pub struct PlantUmlServer {
    agent: Agent,
    server_url: String,
}

impl std::fmt::Debug for PlantUmlServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantUmlServer")
            .field("server_url", &self.server_url)
            .finish_non_exhaustive()
    }
}

impl PlantUmlServer {
    /// `server_url` must end with `/`, as resolved options do.
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
            server_url: server_url.into(),
        }
    }
}

impl DiagramRenderer for PlantUmlServer {
    fn render(&self, encoded: &str, format: ImageFormat) -> Result<ImageStream, RenderErrorKind> {
        let url = format!("{}{format}/{encoded}", self.server_url);
        tracing::debug!(url = %url, "Fetching diagram");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| RenderErrorKind::Http(e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| String::from("(unable to read error body)"));
            return Err(RenderErrorKind::Http(format!("HTTP {status}: {error_body}")));
        }

        let bytes = body
            .read_to_vec()
            .map_err(|e| RenderErrorKind::Io(e.to_string()))?;
        Ok(Box::new(Cursor::new(bytes)))
    }
}

/// Renders diagrams with a local PlantUML installation.
///
/// Runs `<command> -pipe -t<format>`, writes the decoded description to its
/// stdin and streams back its stdout.
#[derive(Debug, Clone)]
pub struct PlantUmlCommand {
    program: String,
    args: Vec<String>,
}

impl PlantUmlCommand {
    /// Build from a program and its leading arguments, e.g.
    /// `["java", "-jar", "plantuml.jar"]`.
    ///
    /// Returns `None` for an empty command line.
    pub fn new(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

/// PlantUML only reads descriptions wrapped in `@start`/`@end` markers.
fn with_markers(source: &str) -> String {
    if source.trim_start().starts_with("@start") {
        source.to_owned()
    } else {
        format!("@startuml\n{source}\n@enduml\n")
    }
}

impl DiagramRenderer for PlantUmlCommand {
    fn render(&self, encoded: &str, format: ImageFormat) -> Result<ImageStream, RenderErrorKind> {
        let source = with_markers(&decode(encoded)?);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg("-pipe")
            .arg(format!("-t{format}"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderErrorKind::Process(format!("{}: {e}", self.program)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| RenderErrorKind::Io(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| RenderErrorKind::Io(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderErrorKind::Process(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(Box::new(Cursor::new(output.stdout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    #[test]
    fn test_with_markers() {
        assert_eq!(with_markers("A -> B"), "@startuml\nA -> B\n@enduml\n");
        assert_eq!(
            with_markers("\n@startuml\nA -> B\n@enduml"),
            "\n@startuml\nA -> B\n@enduml"
        );
    }

    #[test]
    fn test_command_requires_program() {
        assert!(PlantUmlCommand::new(&[]).is_none());
        let command =
            PlantUmlCommand::new(&["java".to_owned(), "-jar".to_owned(), "p.jar".to_owned()])
                .unwrap();
        assert_eq!(command.program, "java");
        assert_eq!(command.args, ["-jar", "p.jar"]);
    }

    #[test]
    fn test_command_missing_program() {
        let command = PlantUmlCommand::new(&["documl-no-such-plantuml".to_owned()]).unwrap();
        let result = command.render(&encode("A -> B"), ImageFormat::Png);
        assert!(matches!(result, Err(RenderErrorKind::Process(_))));
    }

    #[test]
    fn test_command_rejects_invalid_encoding() {
        let command = PlantUmlCommand::new(&["plantuml".to_owned()]).unwrap();
        let result = command.render("not+valid", ImageFormat::Png);
        assert!(matches!(result, Err(RenderErrorKind::Decode(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_streams_stdout() {
        // `sh -c 'cat' -pipe -tsvg` echoes the wrapped description back.
        let command = PlantUmlCommand::new(&[
            "sh".to_owned(),
            "-c".to_owned(),
            "cat".to_owned(),
        ])
        .unwrap();
        let bytes = render_bytes(&command, 0, &encode("A -> B"), ImageFormat::Svg).unwrap();
        assert_eq!(bytes, b"@startuml\nA -> B\n@enduml\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_failure_reports_status() {
        let command =
            PlantUmlCommand::new(&["sh".to_owned(), "-c".to_owned(), "cat >/dev/null; exit 3".to_owned()])
                .unwrap();
        let err = render_bytes(&command, 2, &encode("A -> B"), ImageFormat::Png).unwrap_err();
        assert_eq!(err.index, 2);
        assert!(matches!(err.kind, RenderErrorKind::Process(_)));
        assert!(err.to_string().starts_with("image 2: process error"));
    }

    #[test]
    fn test_server_unreachable_is_http_error() {
        let server = PlantUmlServer::new("http://127.0.0.1:9/", Duration::from_millis(500));
        let err = render_bytes(&server, 0, "SrJGjLDmibBmICt9oGS0", ImageFormat::Png).unwrap_err();
        assert!(matches!(err.kind, RenderErrorKind::Http(_)));
    }
}
