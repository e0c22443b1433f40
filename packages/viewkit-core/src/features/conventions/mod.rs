//! Convention rule engine
//!
//! Schema-independent lint rules: deprecations, record completeness and
//! unescaped ampersands.

mod ampersand;
pub mod attrs;
mod rules;

pub use ampersand::{check_ampersands, has_unescaped_ampersand};
pub use attrs::{suggest as suggest_attrs_replacement, AttrsSuggestion};
pub use rules::lint;
