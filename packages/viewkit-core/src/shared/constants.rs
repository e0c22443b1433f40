//! Centralized constants
//!
//! Wire-contract names of the view data format and tunable defaults.

/// Names fixed by the host application's data file format
pub mod data_format {
    /// Single top-level wrapper element of a data file
    pub const WRAPPER_TAG: &str = "odoo";

    pub const RECORD_TAG: &str = "record";

    pub const FIELD_TAG: &str = "field";

    /// Model of view-definition records
    pub const VIEW_MODEL: &str = "ir.ui.view";

    pub const ARCH_FIELD: &str = "arch";

    pub const INHERIT_FIELD: &str = "inherit_id";

    /// Fields every view-definition record must declare
    pub const REQUIRED_RECORD_FIELDS: [&str; 3] = ["name", "model", "arch"];

    /// Wrapper of data files written for older server versions; still
    /// loaded, so it is kept rather than nested inside a new `odoo`
    pub const LEGACY_WRAPPER_TAG: &str = "openerp";

    /// Empty wrapper written into new or empty data files
    pub const EMPTY_WRAPPER: &str = "<odoo>\n\n</odoo>\n";
}

/// Schema retrieval defaults
pub mod schema {
    /// Upstream directory holding the view RELAX NG schemas, pinned to a
    /// fixed revision so lint results do not drift
    pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/odoo/odoo/ba15d2f79b5762b280a7a74d7e4cb202543e2898/odoo/addons/base/rng";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Cross-reference the type schemas use to pull in the common grammar
    pub const COMMON_INCLUDE: &str = "include href=\"common.rng\"";
}

/// Worker pool sizing
pub mod parallelism {
    /// Upper bound for the default pool size; keeps schema fetch bursts small
    pub const DEFAULT_MAX_WORKERS: usize = 8;

    pub const MAX_WORKERS: usize = 64;
}
