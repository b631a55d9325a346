//! Nested data to markup

use serde_json::Value;
use std::fmt::Write;

const FALLBACK_NAME: &str = "item";

/// Render `value` as an XML document whose root element is `root`.
///
/// Objects become one child element per key, arrays carry a `total`
/// attribute and one `<item index="n">` child per entry, scalars become
/// text and `null` an empty element. Text with markup characters is
/// wrapped in CDATA rather than escaped. Keys that are not usable as
/// element names are written as `item`.
pub fn to_markup(root: &str, value: &Value) -> String {
    let mut out = String::new();
    write_element(&mut out, element_name(root), None, value);
    out
}

fn write_element(out: &mut String, name: &str, index: Option<usize>, value: &Value) {
    out.push('<');
    out.push_str(name);
    if let Some(index) = index {
        let _ = write!(out, " index=\"{index}\"");
    }
    if let Value::Array(items) = value {
        let _ = write!(out, " total=\"{}\"", items.len());
    }

    match value {
        Value::Null => {
            out.push_str("/>");
            return;
        }
        Value::Array(items) if items.is_empty() => {
            out.push_str("/>");
            return;
        }
        Value::Object(map) if map.is_empty() => {
            out.push_str("/>");
            return;
        }
        _ => out.push('>'),
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                write_element(out, element_name(key), None, child);
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                write_element(out, FALLBACK_NAME, Some(i), item);
            }
        }
        Value::String(text) => write_text(out, text),
        Value::Bool(flag) => {
            let _ = write!(out, "{flag}");
        }
        Value::Number(number) => {
            let _ = write!(out, "{number}");
        }
        Value::Null => {}
    }

    let _ = write!(out, "</{name}>");
}

fn write_text(out: &mut String, text: &str) {
    if !text.contains(['<', '>', '&']) {
        out.push_str(text);
        return;
    }
    // a literal "]]>" would end the section early, so split across two
    out.push_str("<![CDATA[");
    out.push_str(&text.replace("]]>", "]]]]><![CDATA[>"));
    out.push_str("]]>");
}

fn element_name(key: &str) -> &str {
    let mut chars = key.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if starts_ok && rest_ok && !key.to_ascii_lowercase().starts_with("xml") {
        key
    } else {
        FALLBACK_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn objects_become_elements() {
        let markup = to_markup("config", &json!({"name": "demo", "port": 8080, "debug": false}));
        assert_eq!(
            markup,
            "<config><debug>false</debug><name>demo</name><port>8080</port></config>"
        );
    }

    #[test]
    fn arrays_are_counted_and_indexed() {
        let markup = to_markup("root", &json!({"tags": ["a", "b"]}));
        assert_eq!(
            markup,
            r#"<root><tags total="2"><item index="0">a</item><item index="1">b</item></tags></root>"#
        );
    }

    #[test]
    fn reserved_characters_use_cdata() {
        let markup = to_markup("root", &json!({"html": "<b>x</b> & ]]> y"}));
        assert_eq!(
            markup,
            "<root><html><![CDATA[<b>x</b> & ]]]]><![CDATA[> y]]></html></root>"
        );
    }

    #[test]
    fn empty_values_are_empty_elements() {
        let markup = to_markup("root", &json!({"none": null, "list": [], "map": {}}));
        assert_eq!(
            markup,
            r#"<root><list total="0"/><map/><none/></root>"#
        );
    }

    #[test]
    fn bad_keys_fall_back_to_item() {
        let markup = to_markup("root", &json!({"1st": 1, "a b": 2}));
        assert_eq!(markup, "<root><item>1</item><item>2</item></root>");
    }
}
