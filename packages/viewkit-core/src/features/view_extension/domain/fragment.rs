//! Markup built from an extension request

use super::request::ExtensionRequest;
use crate::shared::constants::data_format::{
    ARCH_FIELD, FIELD_TAG, INHERIT_FIELD, RECORD_TAG, VIEW_MODEL,
};
use crate::shared::models::Element;

/// `<xpath expr=".." position=".."><field name=".."/></xpath>`
pub fn render_fragment(request: &ExtensionRequest) -> Element {
    Element::new("xpath")
        .with_attr("expr", request.xpath.trim())
        .with_attr("position", request.position.as_str())
        .with_child(Element::new(FIELD_TAG).with_attr("name", request.field.trim()))
}

/// Id of the record synthesized when no inheriting view exists yet
pub fn inherited_record_id(request: &ExtensionRequest) -> String {
    format!("{}_inherit_{}", request.target().local(), request.module)
}

/// New view record inheriting from the request's target, carrying `fragment`
pub fn inherited_record(request: &ExtensionRequest, fragment: Element) -> Element {
    let target = request.target();
    let name = format!(
        "{}.{}.inherit.{}",
        request.model,
        target.local(),
        request.module
    );

    Element::new(RECORD_TAG)
        .with_attr("id", inherited_record_id(request))
        .with_attr("model", VIEW_MODEL)
        .with_child(Element::new(FIELD_TAG).with_attr("name", "name").with_text(&name))
        .with_child(
            Element::new(FIELD_TAG)
                .with_attr("name", "model")
                .with_text(&request.model),
        )
        .with_child(
            Element::new(FIELD_TAG)
                .with_attr("name", INHERIT_FIELD)
                .with_attr("ref", &request.view_id),
        )
        .with_child(
            Element::new(FIELD_TAG)
                .with_attr("name", ARCH_FIELD)
                .with_attr("type", "xml")
                .with_child(fragment),
        )
}

/// Append `fragment` as the last child of the record's `arch` field,
/// creating the field when the record has none
pub fn append_to_arch(record: &mut Element, fragment: Element) {
    match record.descendant_field_mut(ARCH_FIELD) {
        Some(arch) => arch.append_child(fragment),
        None => record.append_child(
            Element::new(FIELD_TAG)
                .with_attr("name", ARCH_FIELD)
                .with_attr("type", "xml")
                .with_child(fragment),
        ),
    }
}
