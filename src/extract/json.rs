//! Lenient JSON access and JSON-in-script extraction.

use serde_json::{Map, Value};

/// String form of `data[key]`: strings as-is, numbers and booleans printed.
/// Missing keys, nulls and nested values give `None`.
pub fn string_field(data: &Value, key: &str) -> Option<String> {
    match data.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Unsigned integer from a number or a numeric string.
pub fn u64_field(data: &Value, key: &str) -> Option<u64> {
    match data.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn f64_field(data: &Value, key: &str) -> Option<f64> {
    match data.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean from `true`/`false` or `1`/`0`.
pub fn bool_field(data: &Value, key: &str) -> Option<bool> {
    match data.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v == 1),
        _ => None,
    }
}

pub fn array_field<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Locate `var <variable>` in a page and return the JSON literal assigned on that line.
///
/// This is a textual scan: the line is cut at the first `{`/`[` and the last
/// `}`/`]`, which drops the `var x =` prefix and any trailing `;`.
pub fn embedded_json<'a>(text: &'a str, variable: &str) -> Option<&'a str> {
    let start = text.find(&format!("var {variable}"))?;
    let line_end = text[start..].find('\n').map_or(text.len(), |i| start + i);
    let line = &text[start..line_end];

    let open = line.find(['{', '['])?;
    let close = line.rfind(['}', ']'])?;
    (close > open).then(|| &line[open..=close])
}

fn children(value: &Value) -> Vec<&Value> {
    match value {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    }
}

/// Walk a context → app → item-id nesting and return the first item with `tradable == 1`.
pub fn first_tradable(data: &Value) -> Option<&Map<String, Value>> {
    for context in children(data) {
        for app in children(context) {
            for item in children(app) {
                let Some(fields) = item.as_object() else {
                    continue;
                };
                let tradable = fields.get("tradable").is_some_and(|flag| {
                    flag.as_i64() == Some(1) || flag.as_bool() == Some(true)
                });
                if tradable {
                    return Some(fields);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fields_are_read_leniently() {
        let data = json!({"id": 76561197960287930u64, "name": "gabe", "state": "3", "flag": 1, "null": null});
        assert_eq!(string_field(&data, "id").as_deref(), Some("76561197960287930"));
        assert_eq!(string_field(&data, "name").as_deref(), Some("gabe"));
        assert_eq!(string_field(&data, "null"), None);
        assert_eq!(string_field(&data, "missing"), None);
        assert_eq!(u64_field(&data, "state"), Some(3));
        assert_eq!(u64_field(&data, "name"), None);
        assert_eq!(bool_field(&data, "flag"), Some(true));
        assert!(array_field(&data, "missing").is_empty());
    }

    #[test]
    fn embedded_json_trims_assignment_and_semicolon() {
        let page = "<script>\n\tvar g_rgAssets = {\"730\":{\"2\":{}}};\n\tvar other = 1;\n</script>";
        assert_eq!(embedded_json(page, "g_rgAssets"), Some("{\"730\":{\"2\":{}}}"));
    }

    #[test]
    fn embedded_json_absent_assignment() {
        assert_eq!(embedded_json("<html>nothing here</html>", "g_rgAssets"), None);
        assert_eq!(embedded_json("var g_rgAssets = ;\n", "g_rgAssets"), None);
    }

    #[test]
    fn first_tradable_skips_untradable_siblings() {
        let data = json!({
            "730": {"2": {
                "111": {"tradable": 0, "name": "Locked"},
                "222": {"tradable": 1, "name": "Open"}
            }}
        });
        let item = first_tradable(&data).unwrap();
        assert_eq!(item.get("name").and_then(Value::as_str), Some("Open"));
    }

    #[test]
    fn first_tradable_tolerates_array_contexts() {
        let data = json!({"730": [], "440": {"2": {"9": {"tradable": 1}}}});
        assert!(first_tradable(&data).is_some());
        assert!(first_tradable(&json!({"730": {"2": {"1": {"tradable": 0}}}})).is_none());
    }
}
