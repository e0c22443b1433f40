//! Common test utilities for viewkit-core
//!
//! Fixture documents, a small RELAX NG grammar pair shaped like the
//! upstream view schemas, an in-memory schema source and an on-disk
//! project builder.

#![allow(dead_code)]

mod fixtures;
mod project;
mod sources;

pub use fixtures::*;
pub use project::*;
pub use sources::*;
