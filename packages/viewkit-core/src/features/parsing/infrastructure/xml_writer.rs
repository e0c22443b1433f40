//! Stable pretty writer
//!
//! Output is a pure function of the tree: declaration (when the document
//! carries one), 4-space indentation, text kept inline with its element,
//! childless elements self-closed.

use crate::features::parsing::error::{XmlError, XmlResult};
use crate::shared::models::{Document, Element, XmlNode};
use quick_xml::escape::partial_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;

const INDENT: usize = 4;

/// Serialize a full document. The declaration is written only when
/// `doc.has_declaration` is set, so a rewritten file keeps its header choice.
pub fn write_document(doc: &Document) -> XmlResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    if doc.has_declaration {
        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
    }
    for comment in &doc.prolog {
        emit(&mut writer, Event::Comment(BytesText::from_escaped(comment.as_str())))?;
    }
    write_element(&mut writer, &doc.root)?;
    finish(writer)
}

/// Serialize a single element without declaration
pub fn write_fragment(element: &Element) -> XmlResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    write_element(&mut writer, element)?;
    finish(writer)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> XmlResult<()> {
    let mut start = BytesStart::new(element.tag.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(text) => {
                emit(writer, Event::Text(BytesText::from_escaped(text.as_str())))?
            }
            XmlNode::CData(data) => emit(writer, Event::CData(BytesCData::new(data.as_str())))?,
            XmlNode::Comment(comment) => emit(
                writer,
                Event::Comment(BytesText::from_escaped(comment.as_str())),
            )?,
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.tag.as_str())))
}

/// Values are always written double-quoted, so single quotes stay literal
/// (`expr="//field[@name='vat']"`)
fn escape_attribute(value: &str) -> String {
    partial_escape(value).replace('"', "&quot;")
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> XmlResult<()> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

fn finish(writer: Writer<Vec<u8>>) -> XmlResult<String> {
    let mut out =
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))?;
    out.push('\n');
    Ok(out)
}
