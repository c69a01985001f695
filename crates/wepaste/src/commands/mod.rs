//! CLI command implementations.

pub(crate) mod copy;
pub(crate) mod export;
pub(crate) mod render;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::Args;

pub(crate) use copy::CopyArgs;
pub(crate) use export::ExportArgs;
pub(crate) use render::RenderArgs;
use wepaste_renderer::{RenderOptions, Rendered, Renderer, wrap_container};
use wepaste_theme::ThemeRegistry;

use crate::error::CliError;
use crate::output::Output;

/// Input document and rendering flags shared by all commands.
#[derive(Args)]
pub(crate) struct DocArgs {
    /// Markdown input file ("-" reads stdin).
    pub input: PathBuf,

    /// Append numbered footnotes for external links.
    #[arg(long)]
    pub citations: bool,

    /// Prepend the word-count / reading-time block.
    #[arg(long)]
    pub word_count: bool,

    /// Number code block lines.
    #[arg(long)]
    pub line_numbers: bool,

    /// Image caption preference: dash-joined subset of "alt", "title".
    #[arg(long)]
    pub legend: Option<String>,
}

impl DocArgs {
    pub(crate) fn read_input(&self) -> Result<String, CliError> {
        if self.input.as_os_str() == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        } else {
            Ok(std::fs::read_to_string(&self.input)?)
        }
    }

    pub(crate) fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_word_count: self.word_count,
            cite_links: self.citations,
            legend: self.legend.clone(),
            line_numbers: self.line_numbers,
        }
    }

    /// Render the document and assemble the full preview fragment:
    /// reading time first, body, footnotes last, all inside the container.
    pub(crate) fn render_fragment(&self) -> Result<(Rendered, String), CliError> {
        let markdown = self.read_input()?;
        let renderer = Renderer::new(self.render_options());
        let rendered = renderer.render(&markdown);

        let mut body = rendered.reading_time_block();
        body.push_str(&rendered.html);
        body.push_str(&rendered.footnotes_block());
        let fragment = wrap_container(&body);
        Ok((rendered, fragment))
    }

    /// Document title: front-matter `title`, else the input file stem.
    pub(crate) fn title(&self, rendered: &Rendered) -> String {
        rendered
            .metadata
            .get("title")
            .and_then(|value| value.as_str())
            .map(str::to_owned)
            .or_else(|| {
                self.input
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "untitled".to_owned())
    }
}

/// Write `content` to `path`, or to stdout when no path is given.
pub(crate) fn write_output(path: Option<&Path>, content: &str) -> Result<(), CliError> {
    match path {
        Some(path) => std::fs::write(path, content)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Print the registered theme identifiers.
pub(crate) fn list_themes(output: &Output) -> Result<(), CliError> {
    let registry = ThemeRegistry::new();
    output.highlight("Available themes:");
    for id in registry.ids() {
        output.info(&format!("  {id}"));
    }
    Ok(())
}
