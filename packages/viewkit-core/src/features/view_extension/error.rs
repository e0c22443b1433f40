//! Merge engine errors

use crate::features::parsing::XmlError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Invalid extension request: {0}")]
    InvalidRequest(String),

    #[error("Invalid XPath '{expr}': {reason}")]
    InvalidXPath { expr: String, reason: String },

    #[error("Could not find module '{0}' in any addons path")]
    ModuleNotFound(String),

    #[error("None of the {count} candidate view files could be read")]
    CandidatesUnreadable { count: usize },

    #[error("Failed to write {}: {cause}", path.display())]
    Write { path: PathBuf, cause: String },

    #[error(transparent)]
    Xml(#[from] XmlError),
}

impl MergeError {
    pub fn write(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        MergeError::Write {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

pub type MergeResult<T> = Result<T, MergeError>;
