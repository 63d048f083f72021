//! XML reader for phone-exported SMS dumps.
//!
//! The export format is a root element whose direct children are `sms`
//! elements carrying every field as an attribute, usually self-closing.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Collect the attribute map of every `sms` element that is a direct
/// child of the document root, in document order.
///
/// Malformed XML is fatal; the error names the byte position reported
/// by the reader.
pub fn read_sms_attributes(xml: &str) -> Result<Vec<BTreeMap<String, String>>> {
    let mut reader = Reader::from_str(xml);
    let mut nodes = Vec::new();
    let mut depth = 0usize;

    loop {
        let event = reader
            .read_event()
            .with_context(|| format!("malformed XML near byte {}", reader.buffer_position()))?;
        match event {
            Event::Start(e) => {
                if depth == 1 && e.name().as_ref() == b"sms" {
                    nodes.push(attributes_of(&e)?);
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 1 && e.name().as_ref() == b"sms" {
                    nodes.push(attributes_of(&e)?);
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(nodes)
}

fn attributes_of(e: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.context("malformed attribute in sms element")?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .context("malformed attribute value in sms element")?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}
