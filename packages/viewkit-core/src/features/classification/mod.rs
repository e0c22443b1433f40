//! View classification and view-record access

mod classifier;
pub mod view_record;

pub use classifier::classify;
pub use view_record::{view_record_mut, view_records, ExternalId, ViewIndex, ViewRecord};
