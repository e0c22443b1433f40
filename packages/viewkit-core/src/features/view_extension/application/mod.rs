//! Application layer

mod extend_view;

pub use extend_view::{extend_candidates, ExtensionOutcome, ViewExtender, ViewExtensionUseCase};
