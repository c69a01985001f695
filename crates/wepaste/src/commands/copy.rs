//! `copy` command: paste-ready HTML through the clipboard pipeline.

use std::path::PathBuf;

use clap::Args;

use super::{DocArgs, write_output};
use crate::error::CliError;
use wepaste_clipboard::{PipelineOptions, fetch_highlight_css, process_clipboard};
use wepaste_theme::{ThemeRegistry, VariableConfig};

/// Arguments for the copy command.
#[derive(Args)]
pub(crate) struct CopyArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Theme identifier.
    #[arg(long, default_value = "default")]
    theme: String,

    /// Primary accent color substituted for the theme's color variable.
    #[arg(long, default_value = "#0F4C81")]
    primary_color: String,

    /// File with user CSS appended after the theme.
    #[arg(long)]
    custom_css: Option<PathBuf>,

    /// URL of the highlighter stylesheet to embed (best-effort).
    #[arg(long)]
    highlight_css_url: Option<String>,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl CopyArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let registry = ThemeRegistry::new();
        if registry.resolve(&self.theme).is_none() {
            return Err(CliError::Validation(format!(
                "unknown theme '{}' (see `wepaste themes`)",
                self.theme
            )));
        }

        let custom_css = self
            .custom_css
            .as_deref()
            .map(std::fs::read_to_string)
            .transpose()?;

        let variables = VariableConfig {
            primary_color: self.primary_color.clone(),
            ..VariableConfig::default()
        };
        let theme_css = registry.compose(&self.theme, custom_css.as_deref(), &variables);

        let highlight_css = self
            .highlight_css_url
            .as_deref()
            .map(fetch_highlight_css)
            .unwrap_or_default();

        let (_, fragment) = self.doc.render_fragment()?;
        let options = PipelineOptions {
            primary_color: self.primary_color,
            highlight_css,
        };
        let pasteable = process_clipboard(&fragment, &theme_css, &options)?;
        write_output(self.output.as_deref(), &pasteable)
    }
}
