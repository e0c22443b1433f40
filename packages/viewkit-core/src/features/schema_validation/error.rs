//! Validator preparation errors

use crate::features::relaxng::RngError;
use crate::features::schema_cache::SchemaFetchError;
use thiserror::Error;

/// Why a validator for a view type could not be prepared. Every variant is
/// reported as a skip finding, never propagated as a run failure.
#[derive(Debug, Clone, Error)]
pub enum SchemaValidationError {
    #[error(transparent)]
    Fetch(#[from] SchemaFetchError),

    #[error("failed to materialize schemas: {0}")]
    Materialize(String),

    #[error("schema failed to compile: {0}")]
    Compile(#[from] RngError),
}

impl From<std::io::Error> for SchemaValidationError {
    fn from(e: std::io::Error) -> Self {
        SchemaValidationError::Materialize(e.to_string())
    }
}

pub type SchemaValidationResult<T> = Result<T, SchemaValidationError>;
