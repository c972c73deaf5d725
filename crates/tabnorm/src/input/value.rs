//! Scalar cell values.

use std::borrow::Cow;
use std::fmt;

/// A single cell of a row set.
///
/// Spreadsheet and JSON sources keep numbers as numbers so that date
/// serials survive until SQL generation; delimited text files only ever
/// produce [`Value::Text`] and [`Value::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Build a value from a raw text cell; blank cells become null.
    pub fn from_cell(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(raw.to_string())
        }
    }

    /// True for nulls and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => s.trim().is_empty(),
        }
    }

    /// String-coerced, trimmed view of the value, or `None` when empty.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Null => None,
            Value::Number(n) if n.is_nan() => None,
            Value::Number(n) => Some(Cow::Owned(format_number(*n))),
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Cow::Borrowed(trimmed))
                }
            }
        }
    }

    /// Numeric view of the value, parsing text when it holds a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            Value::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Convert into a JSON value for upload payloads and reports.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serde_json::Value::from(*n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
            serde_json::Value::String(s) => Value::from_cell(s),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::from_cell(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        if value.trim().is_empty() {
            Value::Null
        } else {
            Value::Text(value)
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Render a number the way a spreadsheet shows it: integral values without a fraction.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells_are_null() {
        assert_eq!(Value::from_cell(""), Value::Null);
        assert_eq!(Value::from_cell("   "), Value::Null);
        assert_eq!(Value::from_cell("x"), Value::Text("x".to_string()));
    }

    #[test]
    fn test_as_text_trims_and_formats_numbers() {
        assert_eq!(Value::Text("  US ".into()).as_text().as_deref(), Some("US"));
        assert_eq!(Value::Number(44197.0).as_text().as_deref(), Some("44197"));
        assert_eq!(Value::Number(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Value::Null.as_text(), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Text("44197".into()).as_number(), Some(44197.0));
        assert_eq!(Value::Text("abc".into()).as_number(), None);
        assert_eq!(Value::Number(2.5).as_number(), Some(2.5));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from(&serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from(&serde_json::json!(3)), Value::Number(3.0));
        assert_eq!(Value::from(&serde_json::json!(true)), Value::Text("true".into()));
        assert_eq!(Value::from(&serde_json::json!("")), Value::Null);
    }

    #[test]
    fn test_to_json_keeps_integers_integral() {
        assert_eq!(Value::Number(1.0).to_json(), serde_json::json!(1));
        assert!(Value::Number(1.0).to_json().is_i64());
        assert_eq!(Value::Number(2.5).to_json(), serde_json::json!(2.5));
        assert_eq!(Value::Null.to_json(), serde_json::Value::Null);
    }
}
