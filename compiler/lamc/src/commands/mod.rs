//! Command handlers for the `lam` CLI.
//!
//! Handlers work on source text and return what the binary prints, so the
//! binary only reads files, prints and picks an exit status.

mod debug;
mod run;

pub use debug::{lex_source, parse_source};
pub use run::{cps_source, parse_run_options, run_source, RunOptions};

use std::path::Path;

use lam_cps::TransformError;
use lam_eval::EvalError;
use lam_parse::ParseError;
use thiserror::Error;

/// Anything a command can fail with.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    Usage(String),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("runtime error: {0}")]
    Eval(#[from] EvalError),
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

/// Read a source file.
pub fn read_file(path: &str) -> Result<String, CommandError> {
    std::fs::read_to_string(Path::new(path)).map_err(|source| CommandError::Io {
        path: path.to_string(),
        source,
    })
}
