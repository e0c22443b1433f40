//! View Extension Feature
//!
//! Adds a field to an existing view through an inherited view record,
//! reusing the module's current inherited view when there is one.
//!
//! ## Structure
//! - `domain/` - ExtensionRequest, Position, XPath check, fragment rendering
//! - `application/` - ViewExtensionUseCase and the search-or-create engine
//! - `infrastructure/` - wrapper-preserving data file writes
//! - `error` - MergeError

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::{extend_candidates, ExtensionOutcome, ViewExtender, ViewExtensionUseCase};
pub use domain::{render_fragment, ExtensionRequest, Position};
pub use error::{MergeError, MergeResult};
pub use infrastructure::{append_to_data_file, write_data_file};
