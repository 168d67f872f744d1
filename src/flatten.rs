//! Flattening of JSON log records into `key=value` text.
//!
//! Nested objects become dotted keys (`http.status=200`). Keys come out in
//! sorted order. Values whose text spans several lines get a block of
//! their own; everything else shares one space-separated line.

use serde_json::{Map, Value};

enum Pair {
    Inline(String),
    Block(String),
}

/// Flatten `line` if it holds a JSON object, otherwise return it unchanged.
pub fn flatten(line: &str) -> String {
    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        _ => return line.to_string(),
    };

    let mut pairs = Vec::new();
    collect_pairs("", &object, &mut pairs);
    render(&pairs)
}

fn collect_pairs(prefix: &str, object: &Map<String, Value>, pairs: &mut Vec<Pair>) {
    let mut entries: Vec<_> = object.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (key, value) in entries {
        let key = format!("{}{}", prefix, key);
        let text = match value {
            Value::Object(nested) => {
                collect_pairs(&format!("{}.", key), nested, pairs);
                continue;
            }
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            // Numbers, booleans and arrays keep their compact JSON text.
            other => other.to_string(),
        };

        let pair = format!("{}={}", key, text);
        if pair.contains('\n') {
            pairs.push(Pair::Block(pair));
        } else {
            pairs.push(Pair::Inline(pair));
        }
    }
}

fn render(pairs: &[Pair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        match pair {
            Pair::Inline(text) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push(' ');
                }
                out.push_str(text);
            }
            Pair::Block(text) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(text);
                out.push('\n');
            }
        }
    }

    let trimmed = out.trim_end_matches('\n').len();
    out.truncate(trimmed);
    out.push('\n');
    out
}
