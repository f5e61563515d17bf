//! documl CLI - PlantUML post-processor for generated documentation.
//!
//! Provides commands for:
//! - `resolve`: Inject class diagrams and convert `<uml>` tags in a project dump
//! - `render`: Rewrite PlantUML images in rendered HTML pages
//! - `encode`: Print the PlantUML transport encoding of a description
//! - `decode`: Print the description behind a transport encoding

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DecodeArgs, EncodeArgs, RenderArgs, ResolveArgs};
use output::Output;

/// documl - PlantUML diagrams for generated documentation.
#[derive(Parser)]
#[command(name = "documl", version, about)]
struct Cli {
    /// Enable verbose output (per-run summaries and image failures).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject class diagrams and convert `<uml>` tags in a project dump.
    Resolve(ResolveArgs),
    /// Rewrite PlantUML images in a rendered output directory.
    Render(RenderArgs),
    /// Print the transport encoding of a diagram description.
    Encode(EncodeArgs),
    /// Print the diagram description behind a transport encoding.
    Decode(DecodeArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Resolve(args) => args.execute(),
        Commands::Render(args) => args.execute(),
        Commands::Encode(args) => args.execute(),
        Commands::Decode(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&err.to_string());
        std::process::exit(1);
    }
}
