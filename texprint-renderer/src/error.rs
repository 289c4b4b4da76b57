//! Error types for texprint-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template rendering operations.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parse error while loading a context file.
    #[error("failed to parse context at {path}: {source}")]
    ContextParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The context value was not a key/value mapping.
    #[error("template context must be a mapping, got {0}")]
    ContextShape(&'static str),

    /// Filesystem error while loading templates or context files.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}
