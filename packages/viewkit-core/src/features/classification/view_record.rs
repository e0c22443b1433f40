//! View-definition records
//!
//! [`ViewRecord`] is a borrowed, structural view over a `record` element
//! whose model is `ir.ui.view`. Inheritance is resolved on demand through
//! [`ViewIndex`]; records never hold parent pointers.

use crate::shared::constants::data_format::{
    ARCH_FIELD, INHERIT_FIELD, RECORD_TAG, VIEW_MODEL,
};
use crate::shared::models::Element;
use std::collections::HashMap;
use std::fmt;

/// Dotted, module-qualified record reference (`module.identifier`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalId {
    module: Option<String>,
    name: String,
}

impl ExternalId {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.split_once('.') {
            Some((module, name)) if !module.is_empty() && !name.is_empty() => Self {
                module: Some(module.to_string()),
                name: name.to_string(),
            },
            _ => Self {
                module: None,
                name: raw.to_string(),
            },
        }
    }

    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// Identifier without the module prefix
    pub fn local(&self) -> &str {
        &self.name
    }

    pub fn is_qualified(&self) -> bool {
        self.module.is_some()
    }

    /// Qualify a bare reference with the hosting module
    pub fn qualified(&self, hosting_module: &str) -> Self {
        Self {
            module: Some(
                self.module
                    .clone()
                    .unwrap_or_else(|| hosting_module.to_string()),
            ),
            name: self.name.clone(),
        }
    }

    /// Equality after qualifying both sides with `hosting_module`
    pub fn matches(&self, other: &ExternalId, hosting_module: &str) -> bool {
        self.qualified(hosting_module) == other.qualified(hosting_module)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}.{}", module, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Borrowed view over a view-definition record
#[derive(Debug, Clone, Copy)]
pub struct ViewRecord<'a> {
    element: &'a Element,
    /// Position among the document's view records, in document order
    ordinal: usize,
}

impl<'a> ViewRecord<'a> {
    pub fn is_view_record(el: &Element) -> bool {
        el.tag == RECORD_TAG && el.attr("model") == Some(VIEW_MODEL)
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.attr("id").filter(|id| !id.is_empty())
    }

    pub fn line(&self) -> Option<u32> {
        self.element.line
    }

    /// `ref` of the direct `<field name="inherit_id">` child
    pub fn inherit_id(&self) -> Option<ExternalId> {
        self.element
            .field(INHERIT_FIELD)
            .and_then(|f| f.attr("ref"))
            .filter(|r| !r.trim().is_empty())
            .map(ExternalId::parse)
    }

    /// The `arch` field holding the view markup
    pub fn arch(&self) -> Option<&'a Element> {
        self.element.descendant_field(ARCH_FIELD)
    }

    /// Whether this record inherits from `target`, bare refs qualified with
    /// `hosting_module`
    pub fn inherits_from(&self, target: &ExternalId, hosting_module: &str) -> bool {
        self.inherit_id()
            .map(|parent| parent.matches(target, hosting_module))
            .unwrap_or(false)
    }
}

/// All view-definition records under `root`, in document order
pub fn view_records(root: &Element) -> impl Iterator<Item = ViewRecord<'_>> {
    root.walk()
        .filter(|el| ViewRecord::is_view_record(el))
        .enumerate()
        .map(|(ordinal, element)| ViewRecord { element, ordinal })
}

/// Mutable access to the view record at `ordinal` (as reported by
/// [`ViewRecord::ordinal`])
pub fn view_record_mut(root: &mut Element, ordinal: usize) -> Option<&mut Element> {
    let mut seen = 0usize;
    root.find_mut(&mut |el: &Element| {
        if !ViewRecord::is_view_record(el) {
            return false;
        }
        let hit = seen == ordinal;
        seen += 1;
        hit
    })
}

/// Non-owning id → record lookup over one document
#[derive(Debug, Default)]
pub struct ViewIndex<'a> {
    records: Vec<ViewRecord<'a>>,
    by_id: HashMap<ExternalId, usize>,
    hosting_module: String,
}

impl<'a> ViewIndex<'a> {
    /// Index every view record under `root`; ids are qualified with
    /// `hosting_module`. On duplicate ids the first record wins.
    pub fn build(root: &'a Element, hosting_module: &str) -> Self {
        let records: Vec<ViewRecord<'a>> = view_records(root).collect();
        let mut by_id = HashMap::new();
        for (pos, record) in records.iter().enumerate() {
            if let Some(id) = record.id() {
                by_id
                    .entry(ExternalId::parse(id).qualified(hosting_module))
                    .or_insert(pos);
            }
        }
        Self {
            records,
            by_id,
            hosting_module: hosting_module.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &ExternalId) -> Option<ViewRecord<'a>> {
        self.by_id
            .get(&id.qualified(&self.hosting_module))
            .map(|pos| self.records[*pos])
    }

    /// Parent view of `record`, when it is defined in the same document
    pub fn parent_of(&self, record: &ViewRecord<'a>) -> Option<ViewRecord<'a>> {
        record.inherit_id().and_then(|parent| self.get(&parent))
    }

    /// First record (document order) inheriting from `target`
    pub fn first_inheriting(&self, target: &ExternalId) -> Option<ViewRecord<'a>> {
        self.records
            .iter()
            .find(|r| r.inherits_from(target, &self.hosting_module))
            .copied()
    }
}
