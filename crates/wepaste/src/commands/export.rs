//! `export` command: standalone HTML document with embedded styles.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;

use super::{DocArgs, write_output};
use crate::error::CliError;
use wepaste_clipboard::{compat_styles, fetch_highlight_css};
use wepaste_renderer::build_addition;
use wepaste_theme::{ThemeRegistry, VariableConfig};

/// Arguments for the export command.
#[derive(Args)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Theme identifier.
    #[arg(long, default_value = "default")]
    theme: String,

    /// Primary accent color.
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

impl ExportArgs {
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
            primary_color: self.primary_color,
            ..VariableConfig::default()
        };
        let theme_css = registry.compose(&self.theme, custom_css.as_deref(), &variables);

        let highlight_css = self
            .highlight_css_url
            .as_deref()
            .map(fetch_highlight_css)
            .unwrap_or_default();

        let (rendered, fragment) = self.doc.render_fragment()?;
        let title = self.doc.title(&rendered);

        let mut styles = format!("<style>{theme_css}</style>");
        if !highlight_css.is_empty() {
            write!(styles, "\n  <style>{highlight_css}</style>").unwrap();
        }
        write!(
            styles,
            "\n  <style>{}</style>\n  {}",
            compat_styles(),
            build_addition()
        )
        .unwrap();

        let document = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  <title>{title}</title>\n  {styles}\n</head>\n<body>\n  <div id=\"output\" style=\"width: 750px; margin: auto; padding: 20px;\">\n    {fragment}\n  </div>\n</body>\n</html>"
        );

        write_output(self.output.as_deref(), &document)
    }
}
