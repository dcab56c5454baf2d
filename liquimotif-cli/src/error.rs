//! Runtime errors surfaced by the drivers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{0}")]
    Usage(String),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Motif(#[from] liquimotif_io::Error),

    #[error(transparent)]
    Bam(#[from] rust_htslib::errors::Error),

    #[error("invalid region file {path}: {reason}")]
    Region { path: PathBuf, reason: String },
}

impl RunError {
    pub fn usage<S: Into<String>>(message: S) -> Self {
        RunError::Usage(message.into())
    }
}
