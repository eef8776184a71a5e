//! Error types for classpath resolution and binding.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading libraries or binding a classpath.
#[derive(Debug, Error)]
pub enum ClasspathError {
    /// IO error while opening a jar.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The jar is not a readable archive.
    #[error("Archive error in {}: {message}", path.display())]
    Archive { path: PathBuf, message: String },

    /// The class loader could not bind the entries.
    #[error("Bind error: {0}")]
    Bind(String),
}

impl ClasspathError {
    pub fn archive(path: &Path, message: impl Into<String>) -> Self {
        Self::Archive {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn bind(message: impl Into<String>) -> Self {
        Self::Bind(message.into())
    }
}
