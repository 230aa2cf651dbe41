//! JSON artifact writing for pipeline consumers.

use miette::Diagnostic;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ArtifactError {
    #[error("failed to write artifact {path}: {source}")]
    #[diagnostic(code(plait::artifacts::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(plait::artifacts::serialize))]
    Serialize(#[from] serde_json::Error),
}

/// Pretty-prints `value` as JSON to `path`, creating parent directories.
pub fn save_json(value: &impl Serialize, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
    let path = path.as_ref();
    let io_err = |source: std::io::Error| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    let rendered = serde_json::to_string_pretty(value)?;
    fs::write(path, rendered).map_err(io_err)?;
    tracing::info!(path = %path.display(), "artifact saved");
    Ok(())
}
