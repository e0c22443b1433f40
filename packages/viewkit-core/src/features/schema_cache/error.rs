//! Error types for schema retrieval

use thiserror::Error;

/// Recoverable schema retrieval failure
///
/// Cloneable: the cache hands one shared failure to every caller waiting on
/// the same key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaFetchError {
    #[error("Unknown schema category '{0}'")]
    UnknownCategory(String),

    #[error("Failed to download {category} schema from {url}: {cause}")]
    Transport {
        category: String,
        url: String,
        cause: String,
    },

    #[error("Failed to download {category} schema from {url}: HTTP status {status}")]
    Status {
        category: String,
        url: String,
        status: u16,
    },

    #[error("Failed to read {category} schema from {path}: {cause}")]
    Local {
        category: String,
        path: String,
        cause: String,
    },

    #[error("Schema source unavailable: {0}")]
    Unavailable(String),
}

pub type SchemaFetchResult<T> = Result<T, SchemaFetchError>;
