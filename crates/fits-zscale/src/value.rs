//! Typed header values and value-field parsing.

use alloc::string::{String, ToString};

/// A parsed FITS header value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// FITS logical value (`T` or `F`).
    Logical(bool),
    /// Any numeric value; FITS integers and reals share this variant.
    Number(f64),
    /// Quoted string content, or free text that is neither numeric nor logical.
    Text(String),
}

impl Value {
    /// Returns the logical value, if this is `Logical`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Logical(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric value. Text that parses as a number is coerced,
    /// since some producers quote numeric keywords.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s.trim()),
            Value::Logical(_) => None,
        }
    }

    /// Returns the value as an integer when it is numeric with no fractional part.
    pub fn as_i64(&self) -> Option<i64> {
        let n = self.as_f64()?;
        if !n.is_finite() || libm::trunc(n) != n {
            return None;
        }
        if n < i64::MIN as f64 || n > i64::MAX as f64 {
            return None;
        }
        Some(n as i64)
    }

    /// Returns the text content, if this is `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce the value to text, as used when appending continuation records.
    pub fn to_text(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Value::Logical(true) => f.write_str("T"),
            Value::Logical(false) => f.write_str("F"),
            Value::Number(n) => {
                if n.is_finite() && libm::trunc(*n) == *n && libm::fabs(*n) < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

/// Split a value field at the first `/` that is not inside a quoted string.
///
/// Quotes are only significant when the value itself is a quoted string; an
/// apostrophe inside an unquoted value does not hide the separator.
/// Returns `(value_part, optional_comment)`; the comment excludes the slash
/// and is not trimmed.
pub fn split_value_comment(field: &str) -> (&str, Option<&str>) {
    if !field.trim_start().starts_with('\'') {
        return match field.find('/') {
            Some(i) => (&field[..i], Some(&field[i + 1..])),
            None => (field, None),
        };
    }
    let mut in_quotes = false;
    for (i, b) in field.bytes().enumerate() {
        match b {
            b'\'' => in_quotes = !in_quotes,
            b'/' if !in_quotes => return (&field[..i], Some(&field[i + 1..])),
            _ => {}
        }
    }
    (field, None)
}

/// Parse the value part of a `KEY = value` field.
///
/// Precedence: quoted string, number, logical `T`/`F`, then plain text.
pub fn parse_value(segment: &str) -> Value {
    let text = segment.trim();
    if text.starts_with('\'') {
        return Value::Text(unquote(text));
    }
    if let Some(n) = parse_number(text) {
        return Value::Number(n);
    }
    match text {
        "T" => Value::Logical(true),
        "F" => Value::Logical(false),
        _ => Value::Text(String::from(text)),
    }
}

/// Extract the content of a quoted FITS string starting at `text[0] == '\''`.
///
/// Doubled quotes inside the string stand for a literal quote. An
/// unterminated string keeps everything after the opening quote.
pub fn unquote(text: &str) -> String {
    let mut out = String::new();
    let mut chars = text.chars().skip(1).peekable();
    while let Some(c) = chars.next() {
        if c == '\'' {
            if chars.peek() == Some(&'\'') {
                out.push('\'');
                chars.next();
            } else {
                break;
            }
        } else {
            out.push(c);
        }
    }
    String::from(out.trim())
}

/// Parse a FITS numeric literal, accepting `D` exponents.
///
/// Words such as `inf` or `NaN` are not numbers in a FITS header, so at least
/// one digit is required.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'E' | b'e' | b'D' | b'd'))
    {
        return None;
    }
    let normalized = text.replace('D', "E").replace('d', "e");
    normalized.parse::<f64>().ok()
}
