// Plain-text rendering of JSON values
//
// Scalars print bare, objects as `key: value` lines and arrays as `- item`
// lines, keys sorted. Nested containers go on the following lines, indented
// two spaces.

use serde_json::Value;

const INDENT: &str = "  ";

pub fn render(value: &Value) -> String {
    let mut lines = Vec::new();
    render_into(value, 0, &mut lines);
    lines.join("\n")
}

fn render_into(value: &Value, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    match value {
        Value::Object(map) if !map.is_empty() => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, child) in entries {
                if is_nested(child) {
                    lines.push(format!("{pad}{key}:"));
                    render_into(child, depth + 1, lines);
                } else {
                    lines.push(format!("{pad}{key}: {}", scalar(child)));
                }
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for item in items {
                if is_nested(item) {
                    lines.push(format!("{pad}-"));
                    render_into(item, depth + 1, lines);
                } else {
                    lines.push(format!("{pad}- {}", scalar(item)));
                }
            }
        }
        other => lines.push(format!("{pad}{}", scalar(other))),
    }
}

fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}
