//! `render` command: markdown to the styled preview fragment.

use std::path::PathBuf;

use clap::Args;

use super::{DocArgs, write_output};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let (_, fragment) = self.doc.render_fragment()?;
        write_output(self.output.as_deref(), &fragment)
    }
}
