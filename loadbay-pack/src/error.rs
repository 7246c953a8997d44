//! Error types for the pack crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("module artifact has no manifest")]
    MissingManifest,

    #[error("manifest does not supply {}", crate::manifest::SYMBOLIC_NAME_HEADER)]
    MissingSymbolicName,

    #[error("manifest does not supply {}", crate::manifest::VERSION_HEADER)]
    MissingVersion,

    #[error("invalid module version {version:?}: {reason}")]
    InvalidVersion { version: String, reason: String },
}
