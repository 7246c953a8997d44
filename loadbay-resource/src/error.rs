//! Error types for the resource crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("unknown resource kind for resource {0}")]
    UnknownKind(String),

    #[error("unsupported resource kind {kind:?} for resource {id}")]
    UnsupportedKind { kind: String, id: String },

    #[error("unable to read dictionary from input stream: {0}")]
    UnreadableDictionary(String),

    #[error("module resource does not contain a module: {0}")]
    NotAModule(String),

    #[error("manifest error: {0}")]
    Pack(#[from] loadbay_pack::PackError),

    #[error("staging storage error: {0}")]
    Storage(#[from] std::io::Error),
}
