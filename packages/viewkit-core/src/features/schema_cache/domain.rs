//! Schema categories
//!
//! Fixed key set of externally hosted RELAX NG schemas. `form` and `kanban`
//! views have no entry and are checked by convention rules only.

use crate::shared::models::ViewType;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaCategory {
    Common,
    List,
    Search,
    Graph,
    Pivot,
    Calendar,
    Activity,
}

impl SchemaCategory {
    pub const ALL: [SchemaCategory; 7] = [
        SchemaCategory::Common,
        SchemaCategory::List,
        SchemaCategory::Search,
        SchemaCategory::Graph,
        SchemaCategory::Pivot,
        SchemaCategory::Calendar,
        SchemaCategory::Activity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SchemaCategory::Common => "common",
            SchemaCategory::List => "list",
            SchemaCategory::Search => "search",
            SchemaCategory::Graph => "graph",
            SchemaCategory::Pivot => "pivot",
            SchemaCategory::Calendar => "calendar",
            SchemaCategory::Activity => "activity",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.key() == key)
    }

    /// Schema file name under the upstream rng directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaCategory::Common => "common.rng",
            SchemaCategory::List => "list_view.rng",
            SchemaCategory::Search => "search_view.rng",
            SchemaCategory::Graph => "graph_view.rng",
            SchemaCategory::Pivot => "pivot_view.rng",
            SchemaCategory::Calendar => "calendar_view.rng",
            SchemaCategory::Activity => "activity_view.rng",
        }
    }

    /// Type-specific schema for a view type, if one exists
    pub fn for_view_type(view_type: ViewType) -> Option<Self> {
        match view_type {
            ViewType::List => Some(SchemaCategory::List),
            ViewType::Search => Some(SchemaCategory::Search),
            ViewType::Graph => Some(SchemaCategory::Graph),
            ViewType::Pivot => Some(SchemaCategory::Pivot),
            ViewType::Calendar => Some(SchemaCategory::Calendar),
            ViewType::Activity => Some(SchemaCategory::Activity),
            ViewType::Form | ViewType::Kanban => None,
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.file_name())
    }
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
