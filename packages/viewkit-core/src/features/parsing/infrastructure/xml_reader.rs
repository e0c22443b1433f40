//! Event-based XML reader
//!
//! Builds a [`Document`] from quick-xml events, attributing each element to the
//! line of its start tag.

use crate::features::parsing::error::{XmlError, XmlResult};
use crate::shared::models::{Document, Element, XmlNode};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Byte offset → 1-based line lookup
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    fn line_of(&self, offset: usize) -> u32 {
        self.starts.partition_point(|&start| start <= offset) as u32
    }
}

/// Parse a complete document with a single root element
pub fn parse_document(source: &str) -> XmlResult<Document> {
    let lines = LineIndex::new(source);
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut has_declaration = false;
    let mut prolog = Vec::new();

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| XmlError::syntax(e.to_string(), lines.line_of(reader.buffer_position() as usize)))?;
        let line = lines.line_of(offset);

        match event {
            Event::Decl(_) => has_declaration = true,
            Event::Start(start) => stack.push(open_element(&start, line)?),
            Event::Empty(start) => {
                let element = open_element(&start, line)?;
                attach(&mut stack, &mut root, element, line)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::syntax("unexpected closing tag", line))?;
                attach(&mut stack, &mut root, element, line)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text, line)?;
                if raw.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Text(raw.to_string())),
                    None => {
                        return Err(XmlError::syntax(
                            "text content outside the root element",
                            line,
                        ))
                    }
                }
            }
            Event::CData(data) => {
                let raw = utf8(&data, line)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::CData(raw.to_string())),
                    None => return Err(XmlError::syntax("CDATA outside the root element", line)),
                }
            }
            Event::Comment(comment) => {
                let raw = utf8(&comment, line)?.to_string();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Comment(raw)),
                    None if root.is_none() => prolog.push(raw),
                    // trailing comments after the root are dropped
                    None => {}
                }
            }
            Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::syntax(
            format!("Premature end of data, tag <{}> is not closed", open.tag),
            open.line.unwrap_or(1),
        ));
    }

    let root = root.ok_or_else(|| XmlError::Malformed("Document is empty".to_string()))?;
    Ok(Document {
        has_declaration,
        prolog,
        root,
    })
}

/// Parse a standalone element fragment such as an `<xpath>` snippet
pub fn parse_fragment(source: &str) -> XmlResult<Element> {
    parse_document(source).map(|doc| doc.root)
}

fn open_element(start: &BytesStart<'_>, line: u32) -> XmlResult<Element> {
    let tag = utf8(start.name().as_ref(), line)?.to_string();
    let mut element = Element::new(tag).with_line(line);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::syntax(e.to_string(), line))?;
        let key = utf8(attr.key.as_ref(), line)?.to_string();
        let value = match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        };
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    line: u32,
) -> XmlResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::syntax(
            "Extra content at the end of the document",
            line,
        ));
    }
    *root = Some(element);
    Ok(())
}

fn utf8(bytes: &[u8], line: u32) -> XmlResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::syntax(e.to_string(), line))
}
