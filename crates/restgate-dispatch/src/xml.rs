//! Minimal XML encoding of JSON payloads.
//!
//! Objects become nested elements, array items repeat their field's element
//! name, and `null` becomes an empty element. Keys that are not valid XML
//! names are rewritten with `_`.

use serde_json::Value;

/// Element name for array items with no field name of their own.
const ITEM_ELEMENT: &str = "item";

/// Encodes `value` under a root element.
///
/// ```
/// use restgate_dispatch::xml::to_xml;
/// use serde_json::json;
///
/// let xml = to_xml("dfapi", &json!({ "service": [{ "api_name": "db" }] }));
/// assert!(xml.ends_with("<dfapi><service><api_name>db</api_name></service></dfapi>"));
/// ```
#[must_use]
pub fn to_xml(root: &str, value: &Value) -> String {
    let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    write_element(&mut out, &element_name(root), value);
    out
}

fn write_field(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item);
            }
        }
        _ => write_element(out, name, value),
    }
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    match value {
        Value::Null => {
            out.push('<');
            out.push_str(name);
            out.push_str("/>");
        }
        Value::Object(map) => {
            open(out, name);
            for (key, child) in map {
                write_field(out, &element_name(key), child);
            }
            close(out, name);
        }
        Value::Array(items) => {
            open(out, name);
            for item in items {
                write_field(out, ITEM_ELEMENT, item);
            }
            close(out, name);
        }
        Value::String(text) => {
            open(out, name);
            escape_into(out, text);
            close(out, name);
        }
        Value::Bool(_) | Value::Number(_) => {
            open(out, name);
            out.push_str(&value.to_string());
            close(out, name);
        }
    }
}

fn open(out: &mut String, name: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
}

fn close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// Turns an arbitrary key into a valid XML element name.
#[must_use]
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match name.chars().next() {
        None => name.push('_'),
        Some(first) if !(first.is_alphabetic() || first == '_') => name.insert(0, '_'),
        Some(_) => {}
    }
    name
}
