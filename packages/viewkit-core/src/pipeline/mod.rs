//! Lint pipeline
//!
//! - `orchestrator` - LintOrchestrator (bounded rayon pool, per-file stages)
//! - `result` - FileReport / LintReport
//! - `render` - text and JSON output

pub mod error;
pub mod orchestrator;
pub mod render;
pub mod result;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{LintMode, LintOrchestrator};
pub use render::{render_json, render_text, OutputFormat};
pub use result::{FileReport, LintReport};
