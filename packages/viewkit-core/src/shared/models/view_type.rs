//! View type tags

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Kind of UI view a document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    List,
    Form,
    Search,
    Kanban,
    Graph,
    Pivot,
    Calendar,
    Activity,
}

/// View root tags in classification priority order. `tree` is the legacy
/// spelling of `list`.
pub const VIEW_TAG_PRIORITY: [&str; 9] = [
    "list", "tree", "form", "search", "kanban", "graph", "pivot", "calendar", "activity",
];

impl ViewType {
    pub const ALL: [ViewType; 8] = [
        ViewType::List,
        ViewType::Form,
        ViewType::Search,
        ViewType::Kanban,
        ViewType::Graph,
        ViewType::Pivot,
        ViewType::Calendar,
        ViewType::Activity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::List => "list",
            ViewType::Form => "form",
            ViewType::Search => "search",
            ViewType::Kanban => "kanban",
            ViewType::Graph => "graph",
            ViewType::Pivot => "pivot",
            ViewType::Calendar => "calendar",
            ViewType::Activity => "activity",
        }
    }

    /// Map a view root tag to its type, normalizing `tree` to `list`
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "list" | "tree" => Some(ViewType::List),
            "form" => Some(ViewType::Form),
            "search" => Some(ViewType::Search),
            "kanban" => Some(ViewType::Kanban),
            "graph" => Some(ViewType::Graph),
            "pivot" => Some(ViewType::Pivot),
            "calendar" => Some(ViewType::Calendar),
            "activity" => Some(ViewType::Activity),
            _ => None,
        }
    }

    pub fn is_view_tag(tag: &str) -> bool {
        Self::from_tag(tag).is_some()
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(&s.to_lowercase()).ok_or_else(|| format!("unknown view type '{}'", s))
    }
}
