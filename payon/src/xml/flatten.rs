//! Flattening of parsed element trees into path-keyed mappings.

use std::collections::BTreeMap;

use super::Element;

/// Flattened view of a parsed document: unique path keys to string values.
pub type DecodedMapping = BTreeMap<String, String>;

/// Flattens an element tree into a deterministic path-keyed mapping.
///
/// Keys are element-name segments joined by `/`, starting with the root
/// name. An element's trimmed text lands under its own path; each attribute
/// lands under `path/@name` (namespaced attributes keep their prefix,
/// `path/@ns:name`). Whitespace-only text emits no key.
///
/// When a candidate key already exists, a counter is appended: plain element
/// keys become `path_1`, `path_2`, …; attribute keys get the counter
/// inserted before the final `/@` segment (`a/b/@x` collides into
/// `a/b_1/@x`). Counters are assigned in document order — per node the text
/// value first, then attributes in insertion order, then children — so
/// re-flattening identical input always yields an identical mapping.
#[must_use]
pub fn flatten(root: &Element) -> DecodedMapping {
    let mut mapping = DecodedMapping::new();
    flatten_into(root, "", &mut mapping);
    mapping
}

/// Renders a decoded mapping as a JSON object of string values.
#[must_use]
pub fn mapping_to_json(mapping: &DecodedMapping) -> String {
    serde_json::to_string(mapping).expect("a map of strings always serializes")
}

fn flatten_into(node: &Element, prefix: &str, mapping: &mut DecodedMapping) {
    let path = if prefix.is_empty() {
        node.name.clone()
    } else {
        format!("{prefix}/{}", node.name)
    };

    let text = node.text_content().trim();
    if !text.is_empty() {
        insert_disambiguated(mapping, path.clone(), text.to_owned());
    }
    for (name, value) in &node.attributes {
        insert_disambiguated(mapping, format!("{path}/@{name}"), value.clone());
    }
    for child in &node.children {
        flatten_into(child, &path, mapping);
    }
}

fn insert_disambiguated(mapping: &mut DecodedMapping, key: String, value: String) {
    if !mapping.contains_key(&key) {
        mapping.insert(key, value);
        return;
    }
    let attribute_split = key.rfind("/@");
    let mut counter = 1usize;
    loop {
        let candidate = match attribute_split {
            Some(at) => format!("{}_{counter}{}", &key[..at], &key[at..]),
            None => format!("{key}_{counter}"),
        };
        if !mapping.contains_key(&candidate) {
            mapping.insert(candidate, value);
            return;
        }
        counter += 1;
    }
}
