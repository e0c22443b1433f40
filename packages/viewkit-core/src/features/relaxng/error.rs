//! Schema compilation errors

use crate::features::parsing::XmlError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum RngError {
    #[error("Failed to read schema {path}: {cause}")]
    Io { path: String, cause: String },

    #[error("Schema is not well-formed: {0}")]
    Xml(#[from] XmlError),

    #[error("Invalid schema: {0}")]
    Syntax(String),

    #[error("Reference to undefined pattern '{0}'")]
    UndefinedRef(String),

    #[error("Schema has no start pattern")]
    MissingStart,

    #[error("Unsupported schema construct: {0}")]
    Unsupported(String),
}

pub type RngResult<T> = Result<T, RngError>;
