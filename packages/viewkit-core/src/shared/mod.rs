//! Shared module - Common types and constants
//!
//! Types used across all features: the XML document tree, findings and view
//! types.

pub mod constants;
pub mod models;

pub use models::*;
