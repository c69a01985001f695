//! wepaste CLI - Markdown to paste-ready WeChat HTML.
//!
//! Provides commands for:
//! - `render`: Render markdown to the styled preview fragment
//! - `copy`: Produce paste-ready HTML through the clipboard pipeline
//! - `export`: Produce a standalone HTML document with embedded styles
//! - `themes`: List available theme identifiers

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CopyArgs, ExportArgs, RenderArgs};
use output::Output;

/// wepaste - Markdown for the WeChat editor.
#[derive(Parser)]
#[command(name = "wepaste", version, about)]
struct Cli {
    /// Enable verbose logging.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to the styled preview fragment.
    Render(RenderArgs),
    /// Produce paste-ready HTML through the clipboard pipeline.
    Copy(CopyArgs),
    /// Produce a standalone HTML document with embedded styles.
    Export(ExportArgs),
    /// List available theme identifiers.
    Themes,
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
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Copy(args) => args.execute(),
        Commands::Export(args) => args.execute(),
        Commands::Themes => commands::list_themes(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
