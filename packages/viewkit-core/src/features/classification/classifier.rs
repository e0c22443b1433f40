//! View type classification

use super::view_record::view_records;
use crate::shared::models::{Document, Element, ViewType, VIEW_TAG_PRIORITY};
use std::collections::HashSet;

/// Determine which kind of view a document describes.
///
/// View records are searched first (document order, first arch with any
/// view tag decides), then the whole document including the root. Within
/// one search the tag priority order decides, not document position.
pub fn classify(document: &Document) -> Option<ViewType> {
    for record in view_records(&document.root) {
        if let Some(arch) = record.arch() {
            if let Some(view_type) = first_by_priority(arch.descendants()) {
                return Some(view_type);
            }
        }
    }
    first_by_priority(document.root.walk())
}

fn first_by_priority<'a>(elements: impl Iterator<Item = &'a Element>) -> Option<ViewType> {
    let tags: HashSet<&str> = elements.map(|e| e.tag.as_str()).collect();
    VIEW_TAG_PRIORITY
        .iter()
        .find(|tag| tags.contains(*tag))
        .and_then(|tag| ViewType::from_tag(tag))
}
