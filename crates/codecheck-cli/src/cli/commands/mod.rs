use std::path::Path;

use codecheck_core::{Document, DocumentError};

use super::args::{Cli, Command};

pub use crate::exit_codes;

pub mod manifest;
pub mod render;
pub mod validate;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Validate(args) => validate::run(args),
        Command::Manifest(args) => manifest::run(args),
        Command::Render(args) => render::run(args),
    }
}

/// Load the configuration, or report why not. Callers exit with CONFIG_ERROR on `Err`.
pub(crate) fn load_document(path: &Path) -> Result<Document, DocumentError> {
    Document::load(path).inspect_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "configuration not loaded");
    })
}

pub(crate) fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
