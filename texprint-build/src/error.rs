//! Error types for texprint-build.

use std::path::PathBuf;

use thiserror::Error;

use texprint_core::ConfigError;
use texprint_renderer::RenderError;

use crate::diagnostics::{self, CompileDiagnostic};

/// All errors that can arise from compiling or printing.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The engine exited with status 1. Carries the full log and the source
    /// that was compiled.
    #[error("LaTeX compilation failed: {}", diagnostics::headline(.log))]
    Compile { log: String, tex_source: String },

    /// The engine did not report failure but left no PDF behind.
    #[error("no PDF produced: {message}")]
    ArtifactMissing { message: String },

    /// The print command exited nonzero.
    #[error("printing with '{command}' resulted in an error: {stderr}")]
    Print { command: String, stderr: String },

    /// The base file name cannot be used inside the workspace.
    #[error("invalid base filename '{name}': {reason}")]
    InvalidBaseName { name: String, reason: &'static str },

    /// A configured command or option string could not be split into words.
    #[error("cannot parse {key} '{value}': unbalanced quotes or empty command")]
    InvalidOptions { key: &'static str, value: String },

    /// A child process could not be started.
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl BuildError {
    /// First LaTeX error in the log of a [`BuildError::Compile`].
    pub fn diagnostic(&self) -> Option<CompileDiagnostic> {
        match self {
            BuildError::Compile { log, tex_source } => diagnostics::first_error(log, tex_source),
            _ => None,
        }
    }
}

/// Errors from the render → compile → finish pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An error from the template engine, passed through unchanged.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// An error from compiling or printing.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
