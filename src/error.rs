use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures outside the language itself. Problems in the compiled program are
/// diagnostics, never errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot read input: {0}")]
    Read(String),
}

pub type Result<T> = std::result::Result<T, Error>;
