//! `documl encode` and `documl decode` command implementations.

use std::io::{Read, Write};

use clap::Args;
use documl_diagrams::{decode, encode};

use crate::error::CliError;

/// Arguments for the encode command.
#[derive(Args)]
pub(crate) struct EncodeArgs {
    /// Diagram description (default: read from stdin).
    text: Option<String>,
}

impl EncodeArgs {
    /// Execute the encode command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = input_or_stdin(self.text)?;
        write_line(&encode(&text))
    }
}

/// Arguments for the decode command.
#[derive(Args)]
pub(crate) struct DecodeArgs {
    /// Transport-encoded description (default: read from stdin).
    encoded: Option<String>,
}

impl DecodeArgs {
    /// Execute the decode command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let encoded = input_or_stdin(self.encoded)?;
        write_line(&decode(encoded.trim())?)
    }
}

fn input_or_stdin(value: Option<String>) -> Result<String, CliError> {
    if let Some(value) = value {
        return Ok(value);
    }
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn write_line(text: &str) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    Ok(())
}
