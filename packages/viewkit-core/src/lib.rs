/*
 * viewkit - view linter and inheritance-aware merge engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/    : Document tree, findings, view types, constants
 * - features/  : Vertical slices (parsing → classification → conventions → schema validation, view extension)
 * - pipeline/  : Lint orchestration over files
 * - config/    : Versioned YAML configuration
 */

#![allow(clippy::module_inception)]
#![allow(clippy::new_without_default)]

/// Shared models and constants
pub mod shared;

/// Feature modules
pub mod features;

/// Lint orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// Re-exports for the public API
pub use config::{ConfigError, ToolkitConfig};
pub use errors::{Result, ViewkitError};
pub use features::view_extension::{ExtensionOutcome, ExtensionRequest, Position, ViewExtender};
pub use pipeline::{LintMode, LintOrchestrator, LintReport};
pub use shared::models::{Document, Element, FindingKind, LintFinding, SourceLine, ViewType};
