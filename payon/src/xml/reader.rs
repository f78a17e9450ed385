//! Parsing of gateway response documents into [`Element`] trees.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::Element;
use crate::error::DecodeError;

/// Parses an XML document into an element tree.
///
/// Namespace prefixes stay part of element and attribute names, so content
/// in a prefixed or default namespace is never dropped. `xmlns` declarations
/// are not treated as attributes. Repeated sibling elements are kept in
/// document order; CDATA sections become text.
///
/// # Errors
///
/// Returns [`DecodeError::Malformed`] when the input is not well-formed XML
/// or contains no root element.
pub fn parse(xml: &str) -> Result<Element, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(DecodeError::Malformed(
                        "trailing content after root element".into(),
                    ));
                }
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                place(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DecodeError::Malformed("unexpected closing tag".into()))?;
                place(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(text)) => {
                let value = text.unescape()?;
                append_text(&mut stack, &value);
            }
            Ok(Event::CData(data)) => {
                let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append_text(&mut stack, &value);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {} // declaration, comments, processing instructions
            Err(err) => return Err(err.into()),
        }
    }

    if !stack.is_empty() {
        return Err(DecodeError::Malformed("unexpected end of document".into()));
    }
    root.ok_or_else(|| DecodeError::Malformed("document has no root element".into()))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, DecodeError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attribute.unescape_value()?;
        element.set_attr(key, value.trim().to_owned());
    }
    Ok(element)
}

fn place(
    element: Element,
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
) -> Result<(), DecodeError> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
        Ok(())
    } else if root.is_some() {
        Err(DecodeError::Malformed(
            "trailing content after root element".into(),
        ))
    } else {
        *root = Some(element);
        Ok(())
    }
}

fn append_text(stack: &mut [Element], value: &str) {
    if let Some(top) = stack.last_mut() {
        match &mut top.text {
            Some(existing) => existing.push_str(value),
            None => top.text = Some(value.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;

    #[test]
    fn test_parses_nested_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Response version="1.0">
  <Transaction mode="LIVE" channel="ch-1">
    <Processing code="CC.DB.90.00">
      <Result>ACK</Result>
    </Processing>
  </Transaction>
</Response>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.name, "Response");
        assert_eq!(root.attr_value("version"), Some("1.0"));
        let result = root.descendant(&["Transaction", "Processing", "Result"]);
        assert_eq!(result.map(Element::text_content), Some("ACK"));
    }

    #[test]
    fn test_repeated_siblings_kept_in_order() {
        let root = parse("<IDs><ID>1</ID><ID>2</ID><ID>3</ID></IDs>").unwrap();
        let values: Vec<&str> = root.children.iter().map(Element::text_content).collect();
        assert_eq!(values, ["1", "2", "3"]);
    }

    #[test]
    fn test_namespace_prefixes_preserved() {
        let xml = r#"<soap:Envelope xmlns:soap="http://example.com/soap">
  <soap:Body xsi:type="t" xmlns:xsi="http://example.com/xsi">ok</soap:Body>
</soap:Envelope>"#;
        let root = parse(xml).unwrap();
        assert_eq!(root.name, "soap:Envelope");
        // xmlns declarations are dropped, real attributes keep their prefix
        assert!(root.attributes.is_empty());
        let body = root.child("soap:Body").unwrap();
        assert_eq!(body.attr_value("xsi:type"), Some("t"));
        assert_eq!(body.text_content(), "ok");
    }

    #[test]
    fn test_cdata_becomes_text() {
        let root = parse("<Memo><![CDATA[a & b]]></Memo>").unwrap();
        assert_eq!(root.text_content(), "a & b");
    }

    #[test]
    fn test_entities_unescaped() {
        let root = parse(r#"<Usage note="&quot;q&quot;">a &amp; b</Usage>"#).unwrap();
        assert_eq!(root.text_content(), "a & b");
        assert_eq!(root.attr_value("note"), Some("\"q\""));
    }

    #[test]
    fn test_malformed_input_is_a_typed_error() {
        for input in ["<a><b></a>", "not xml at all <", "", "<a>"] {
            let err = parse(input).unwrap_err();
            assert!(matches!(err, DecodeError::Malformed(_)), "input: {input}");
        }
    }
}
