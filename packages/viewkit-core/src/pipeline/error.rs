//! Pipeline error types

use crate::features::schema_cache::SchemaFetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to build lint worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Schema source unavailable: {0}")]
    SchemaSource(#[from] SchemaFetchError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
