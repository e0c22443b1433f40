//! Schema validation of view subtrees against the upstream RELAX NG schemas

mod adapter;
pub mod error;
mod extract;

pub use adapter::SchemaValidatorAdapter;
pub use error::{SchemaValidationError, SchemaValidationResult};
pub use extract::view_subtrees;
