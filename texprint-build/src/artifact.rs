//! Finishing step: read the PDF into memory.

use crate::compile::Artifact;
use crate::error::{io_err, BuildError};

/// Read the whole artifact while its workspace is still alive.
pub fn read_artifact(artifact: &Artifact<'_>) -> Result<Vec<u8>, BuildError> {
    let path = artifact.path();
    std::fs::read(&path).map_err(|e| io_err(path, e))
}
