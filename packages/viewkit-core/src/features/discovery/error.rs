//! Discovery errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Could not find project root above {} (no .git directory or odoo.conf)", .0.display())]
    NoProjectRoot(PathBuf),

    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to walk {}: {cause}", path.display())]
    Walk { path: PathBuf, cause: String },
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
