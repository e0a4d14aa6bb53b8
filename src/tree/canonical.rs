//! Canonical byte encoding of documents for hashing
//!
//! Compact JSON with recursively sorted keys, ASCII-only strings and a fixed
//! float format. The encoding is byte-compatible with `json.dumps(obj,
//! sort_keys=True, separators=(',', ':'))` over the same parsed document.
//!
//! Numbers keep their source text (`arbitrary_precision`). Integer literals
//! are written digit for digit at any size; anything with a fraction or
//! exponent is read as an f64 and written through [`format_float`].

use crate::document::Document;
use crate::types::{FieldSelector, INTEGRITY_KEYS};
use serde_json::{Map, Number, Value};
use std::fmt::Write;

/// Canonical bytes of a document under a field selection.
///
/// Integrity keys are dropped at every depth regardless of the selector.
pub fn canonicalize(document: &Document, selector: &FieldSelector) -> Vec<u8> {
    let mut selected = Map::new();
    for (key, value) in document.fields() {
        if selector.includes(key) {
            selected.insert(key.clone(), value.clone());
        }
    }
    canonical_json(&strip_integrity_fields(Value::Object(selected))).into_bytes()
}

/// Remove `merkle:object_hash`, `merkle:root` and `merkle:hash_method` at any depth.
pub fn strip_integrity_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| !INTEGRITY_KEYS.contains(&k.as_str()))
                .map(|(k, v)| (k, strip_integrity_fields(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_integrity_fields).collect()),
        other => other,
    }
}

/// Serialize a JSON value in canonical form.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // Byte order of UTF-8 keys equals code point order.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, &map[key]);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    let text = n.to_string();
    if !text.contains(&['.', 'e', 'E'][..]) {
        // `-0` is the integer zero.
        if text == "-0" {
            out.push_str("0");
        } else {
            out.push_str(&text);
        }
        return;
    }
    match text.parse::<f64>() {
        Ok(f) if f.is_infinite() => out.push_str(if f < 0.0 { "-Infinity" } else { "Infinity" }),
        Ok(f) => out.push_str(&format_float(f)),
        // serde_json only produces valid number text
        Err(_) => out.push_str(&text),
    }
}

/// Shortest round-trip float text, fixed notation for decimal exponents in
/// `[-4, 16)` and `d.ddde±XX` otherwise.
pub fn format_float(value: f64) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e-5".
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::new();
    if value.is_sign_negative() {
        out.push('-');
    }

    if (-4..16).contains(&exponent) {
        let point = exponent + 1;
        if point <= 0 {
            out.push_str("0.");
            out.push_str(&"0".repeat((-point) as usize));
            out.push_str(&digits);
        } else if point as usize >= digits.len() {
            out.push_str(&digits);
            out.push_str(&"0".repeat(point as usize - digits.len()));
            out.push_str(".0");
        } else {
            let (int_part, frac_part) = digits.split_at(point as usize);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac_part);
        }
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{}{:02}", sign, exponent.abs());
    }
    out
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04x}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
