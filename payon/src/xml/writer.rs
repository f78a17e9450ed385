//! Canonical XML serialization of [`Element`] trees.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::Element;

/// Serializes an element tree into an indented XML document with a
/// `<?xml version="1.0" encoding="UTF-8"?>` declaration.
///
/// Attribute order equals insertion order. Special characters (`&`, `<`,
/// `>`, quotes) are escaped in both text and attribute values, so the output
/// always re-parses into the same tree via [`super::parse`]. Elements with
/// neither text nor children are written self-closing.
#[must_use]
pub fn to_xml(root: &Element) -> String {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .expect("writing to Vec<u8> cannot fail");
    write_element(&mut writer, root).expect("writing to Vec<u8> cannot fail");
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).expect("writer emits UTF-8")
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> quick_xml::Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    let text = element.text_content();
    if text.is_empty() && element.children.is_empty() {
        return writer.write_event(Event::Empty(start));
    }

    writer.write_event(Event::Start(start))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))
}
