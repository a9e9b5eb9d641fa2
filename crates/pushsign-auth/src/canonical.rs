//! Canonical request parameters.
//!
//! The JSON body of a request enters the signature in canonical form: object
//! keys sorted at every depth, arrays left in order, no insignificant
//! whitespace.
//!
//! ```text
//! {"b":2,"a":{"d":[{"f":1,"e":2}],"c":null}}
//!   => {"a":{"c":null,"d":[{"e":2,"f":1}]},"b":2}
//! ```
//!
//! Floating-point numbers are written the way JavaScript's `JSON.stringify`
//! writes them: `10.0` becomes `10`, `1e20` becomes `100000000000000000000`
//! and `1.5e300` becomes `1.5e+300`.
//!
//! Bodies that are absent, blank or not JSON contribute nothing to the
//! signature.

use serde_json::{Map, Number, Value};
use tracing::warn;

/// Return the canonical form of a JSON value.
///
/// Object keys are sorted in byte order at every nesting depth. Array
/// elements keep their order and are canonicalized individually. Scalars are
/// returned unchanged; number formatting happens in [`canonical_json`].
///
/// # Examples
///
/// ```
/// use pushsign_auth::canonical::canonicalize;
/// use serde_json::json;
///
/// let canonical = canonicalize(&json!({"b": 2, "a": [{"d": 1, "c": 2}]}));
/// assert_eq!(canonical.to_string(), r#"{"a":[{"c":2,"d":1}],"b":2}"#);
/// ```
#[must_use]
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Serialize the canonical form of a JSON value as compact JSON.
///
/// # Examples
///
/// ```
/// use pushsign_auth::canonical::canonical_json;
/// use serde_json::json;
///
/// assert_eq!(canonical_json(&json!({"n": 2.0, "m": 1e-7})), r#"{"m":1e-7,"n":2}"#);
/// ```
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_json(&canonicalize(value), &mut out);
    out
}

/// Compute the canonical parameter string for a raw request body.
///
/// Returns an empty string when the body is absent, blank or not valid JSON.
/// The invalid case is logged at `warn` and signing carries on without a body
/// contribution.
///
/// # Examples
///
/// ```
/// use pushsign_auth::canonical::canonical_params;
///
/// assert_eq!(canonical_params(Some(r#"{"b":2,"a":1}"#)), r#"{"a":1,"b":2}"#);
/// assert_eq!(canonical_params(Some("   ")), "");
/// assert_eq!(canonical_params(None), "");
/// ```
#[must_use]
pub fn canonical_params(body: Option<&str>) -> String {
    let Some(raw) = body.filter(|raw| !raw.trim().is_empty()) else {
        return String::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => canonical_json(&value),
        Err(e) => {
            warn!(error = %e, "request body is not valid JSON, skipping parameter sorting");
            String::new()
        }
    }
}

fn write_json(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (i, (key, value)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_json(value, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_json(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        Value::Number(n) => out.push_str(&format_number(n)),
        other => out.push_str(&other.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push_str(&Value::from(s).to_string());
}

/// Integers keep their exact digits. Floats use the JavaScript
/// Number-to-String rules.
fn format_number(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => format_f64(f),
        _ => n.to_string(),
    }
}

/// Format a finite float the way JavaScript's `Number.prototype.toString`
/// does.
///
/// `{:e}` yields the shortest round-trip digits `d.ddd` and exponent `e`.
/// With `k` significant digits and decimal point position `n = e + 1`:
///
/// | Range | Output |
/// |---|---|
/// | `k <= n <= 21` | digits, then `n - k` zeros |
/// | `0 < n <= 21` | digits with a point after the `n`th |
/// | `-6 < n <= 0` | `0.`, then `-n` zeros, then digits |
/// | otherwise | `d.ddde+X` / `d.ddde-X` |
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]
fn format_f64(f: f64) -> String {
    if f == 0.0 {
        return "0".to_owned();
    }

    let scientific = format!("{:e}", f.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let magnitude = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    };

    if f.is_sign_negative() {
        format!("-{magnitude}")
    } else {
        magnitude
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_should_sort_top_level_keys() {
        assert_eq!(
            canonical_json(&json!({"b": 2, "a": 1, "c": 3})),
            r#"{"a":1,"b":2,"c":3}"#
        );
    }

    #[test]
    fn test_should_sort_nested_keys_and_keep_array_order() {
        let body = r#"{"z":{"y":[{"b":1,"a":2},3,"x"],"x":null},"a":"hi"}"#;
        assert_eq!(
            canonical_params(Some(body)),
            r#"{"a":"hi","z":{"x":null,"y":[{"a":2,"b":1},3,"x"]}}"#
        );
    }

    #[test]
    fn test_should_sort_keys_in_byte_order() {
        assert_eq!(
            canonical_json(&json!({"a": 1, "\u{e9}": 2, "B": 3, "_": 4})),
            "{\"B\":3,\"_\":4,\"a\":1,\"\u{e9}\":2}"
        );
    }

    #[test]
    fn test_should_pass_scalars_through() {
        assert_eq!(canonical_json(&json!("text")), r#""text""#);
        assert_eq!(canonical_json(&json!(true)), "true");
        assert_eq!(canonical_json(&json!(null)), "null");
        assert_eq!(canonical_json(&json!(1.5)), "1.5");
        assert_eq!(canonical_json(&json!(-7)), "-7");
    }

    #[test]
    fn test_should_write_integral_floats_as_integers() {
        assert_eq!(canonical_params(Some(r#"{"n":10.0}"#)), r#"{"n":10}"#);
        assert_eq!(canonical_params(Some(r#"{"n":-0.0}"#)), r#"{"n":0}"#);
        assert_eq!(canonical_params(Some(r#"{"n":1e2}"#)), r#"{"n":100}"#);
    }

    #[test]
    fn test_should_write_floats_like_javascript() {
        assert_eq!(canonical_params(Some(r#"{"n":0.000001}"#)), r#"{"n":0.000001}"#);
        assert_eq!(
            canonical_params(Some(r#"{"n":1e20}"#)),
            r#"{"n":100000000000000000000}"#
        );
        assert_eq!(canonical_params(Some(r#"{"n":1.5e300}"#)), r#"{"n":1.5e+300}"#);
        assert_eq!(canonical_params(Some(r#"{"n":1e21}"#)), r#"{"n":1e+21}"#);
        assert_eq!(canonical_params(Some(r#"{"n":1e-7}"#)), r#"{"n":1e-7}"#);
        assert_eq!(canonical_params(Some(r#"{"n":-123.456}"#)), r#"{"n":-123.456}"#);
        assert_eq!(canonical_params(Some(r#"{"n":2.5e-8}"#)), r#"{"n":2.5e-8}"#);
    }

    #[test]
    fn test_should_keep_large_integers_exact() {
        assert_eq!(
            canonical_params(Some(r#"{"id":12345678901234567890}"#)),
            r#"{"id":12345678901234567890}"#
        );
    }

    #[test]
    fn test_should_reparse_javascript_number_forms() {
        let canonical = canonical_params(Some(r#"{"a":1.5e300,"b":0.000001,"c":1e20}"#));
        assert_eq!(canonical_params(Some(canonical.as_str())), canonical);
    }

    #[test]
    fn test_should_sort_integer_like_keys_as_strings() {
        assert_eq!(canonical_params(Some(r#"{"9":2,"10":1}"#)), r#"{"10":1,"9":2}"#);
    }

    #[test]
    fn test_should_skip_body_with_lone_surrogate() {
        assert_eq!(canonical_params(Some(r#"{"s":"\ud800"}"#)), "");
    }

    #[test]
    fn test_should_be_idempotent() {
        let value = json!({"b": {"d": [1, {"f": 0, "e": 1}], "c": "x"}, "a": []});
        let once = canonicalize(&value);
        let twice = canonicalize(&once);
        assert_eq!(once, twice);
        assert_eq!(once.to_string(), twice.to_string());

        let canonical_text = canonical_json(&value);
        assert_eq!(canonical_params(Some(canonical_text.as_str())), canonical_text);
    }

    #[test]
    fn test_should_ignore_key_order_at_any_depth() {
        let left = r#"{"a":1,"b":{"x":[{"p":1,"q":2}],"y":true}}"#;
        let right = r#"{ "b": { "y": true, "x": [ { "q": 2, "p": 1 } ] }, "a": 1 }"#;
        assert_eq!(canonical_params(Some(left)), canonical_params(Some(right)));
    }

    #[test]
    fn test_should_return_empty_for_absent_blank_or_invalid_body() {
        assert_eq!(canonical_params(None), "");
        assert_eq!(canonical_params(Some("")), "");
        assert_eq!(canonical_params(Some(" \n\t")), "");
        assert_eq!(canonical_params(Some("{not json")), "");
        assert_eq!(canonical_params(Some("a=1&b=2")), "");
    }

    #[test]
    fn test_should_keep_non_ascii_text_unescaped() {
        assert_eq!(
            canonical_params(Some(r#"{"content":"你好/world"}"#)),
            r#"{"content":"你好/world"}"#
        );
    }
}
