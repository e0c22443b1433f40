//! RELAX NG validation engine
//!
//! Compiles XML-syntax RELAX NG grammars and validates element trees with
//! pattern derivatives. Name matching uses local names only.

mod compile;
mod derivative;
pub mod error;
mod pattern;
mod validator;

pub use compile::{Grammar, RNG_NAMESPACE};
pub use error::{RngError, RngResult};
pub use validator::{RngDiagnostic, RngValidator};
