//! Error types for viewkit-core
//!
//! Each feature owns its error enum; this type unifies them for callers
//! that drive several features at once.

use crate::config::ConfigError;
use crate::features::discovery::DiscoveryError;
use crate::features::parsing::XmlError;
use crate::features::relaxng::RngError;
use crate::features::schema_cache::SchemaFetchError;
use crate::features::schema_validation::SchemaValidationError;
use crate::features::view_extension::MergeError;
use crate::pipeline::PipelineError;
use thiserror::Error;

/// Main error type for viewkit operations
#[derive(Debug, Error)]
pub enum ViewkitError {
    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    SchemaFetch(#[from] SchemaFetchError),

    #[error(transparent)]
    Rng(#[from] RngError),

    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for viewkit operations
pub type Result<T> = std::result::Result<T, ViewkitError>;
