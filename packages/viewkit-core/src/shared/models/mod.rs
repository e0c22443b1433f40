//! Shared models

pub mod document;
pub mod finding;
pub mod view_type;

pub use document::{decode_lenient, local_name, Descendants, Document, Element, XmlNode};
pub use finding::{FindingKind, LintFinding, Severity, SourceLine};
pub use view_type::{ViewType, VIEW_TAG_PRIORITY};
