//! Domain layer: requests, XPath checks and fragment construction

pub mod fragment;
pub mod request;
pub mod xpath;

pub use fragment::{append_to_arch, inherited_record, inherited_record_id, render_fragment};
pub use request::{ExtensionRequest, Position};
pub use xpath::check_syntax as check_xpath_syntax;
