//! CLI error types.

use wepaste_clipboard::ClipboardError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Clipboard(#[from] ClipboardError),

    #[error("{0}")]
    Validation(String),
}
