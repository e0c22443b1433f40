//! Feature modules - each feature is a vertical slice
//!
//! Larger features follow the hexagonal layout:
//! - domain/         - Pure logic over the document tree
//! - ports/          - Interface definitions (traits)
//! - application/    - Use cases
//! - infrastructure/ - File system and network implementations

pub mod classification;
pub mod conventions;
pub mod discovery;
pub mod parsing;

// RELAX NG grammar compiler and derivative-based validator
pub mod relaxng;

pub mod schema_cache;
pub mod schema_validation;
pub mod view_extension;
