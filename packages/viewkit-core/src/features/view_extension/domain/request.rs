//! Extension requests

use super::xpath;
use crate::features::classification::ExternalId;
use crate::features::view_extension::error::{MergeError, MergeResult};
use std::fmt;
use std::str::FromStr;

/// Where the new markup goes relative to the XPath match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    After,
    Before,
    Inside,
    Replace,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::After,
        Position::Before,
        Position::Inside,
        Position::Replace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::After => "after",
            Position::Before => "before",
            Position::Inside => "inside",
            Position::Replace => "replace",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| {
                MergeError::InvalidRequest(format!(
                    "unknown position '{}' (expected after, before, inside or replace)",
                    s
                ))
            })
    }
}

/// Request to add one field to an inherited view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRequest {
    /// Technical name of the module that hosts the extension
    pub module: String,
    /// External id of the view to inherit from
    pub view_id: String,
    pub model: String,
    pub field: String,
    pub xpath: String,
    pub position: Position,
}

impl ExtensionRequest {
    /// Reject the request before any file is touched
    pub fn validate(&self) -> MergeResult<()> {
        let required = [
            ("module", &self.module),
            ("view id", &self.view_id),
            ("model", &self.model),
            ("field name", &self.field),
            ("xpath", &self.xpath),
        ];
        if let Some((what, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(MergeError::InvalidRequest(format!("{} must not be empty", what)));
        }
        // The local part names the derived record and file
        if self.target().local().contains('.') {
            return Err(MergeError::InvalidRequest(format!(
                "view id '{}' must have the form module.identifier",
                self.view_id.trim()
            )));
        }
        xpath::check_syntax(&self.xpath).map_err(|reason| MergeError::InvalidXPath {
            expr: self.xpath.clone(),
            reason,
        })
    }

    pub fn target(&self) -> ExternalId {
        ExternalId::parse(&self.view_id)
    }
}
