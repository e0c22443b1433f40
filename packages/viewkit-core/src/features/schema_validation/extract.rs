//! Subtree extraction for schema validation

use crate::features::classification::view_records;
use crate::shared::models::{Document, Element, ViewType};

/// Every element of `view_type` in the document: those inside view records'
/// `arch` fields first, then any others anywhere. Each element appears once.
pub fn view_subtrees(document: &Document, view_type: ViewType) -> Vec<&Element> {
    let tag = view_type.as_str();
    let mut found: Vec<&Element> = Vec::new();
    for record in view_records(&document.root) {
        if let Some(arch) = record.arch() {
            for el in arch.descendants().filter(|e| e.tag == tag) {
                push_unique(&mut found, el);
            }
        }
    }
    for el in document.elements().filter(|e| e.tag == tag) {
        push_unique(&mut found, el);
    }
    found
}

fn push_unique<'a>(found: &mut Vec<&'a Element>, el: &'a Element) {
    if !found.iter().any(|seen| std::ptr::eq(*seen, el)) {
        found.push(el);
    }
}
