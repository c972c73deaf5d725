//! Storage types for inferred columns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inferred storage type for a column, rendered as SQL Server DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SqlType {
    /// true/false vocabulary, stored as `BIT`.
    Boolean,
    /// Whole numbers, stored as `BIGINT`.
    Integer,
    /// Fixed-point numbers.
    Decimal { precision: u8, scale: u8 },
    /// Calendar date without time.
    Date,
    /// Date with a time-of-day component.
    DateTime,
    /// Unicode text with a maximum length.
    Text { length: usize },
}

impl SqlType {
    /// Returns true if this type is numeric (including booleans stored as bits).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SqlType::Boolean | SqlType::Integer | SqlType::Decimal { .. }
        )
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, SqlType::Date | SqlType::DateTime)
    }

    /// Returns true if this type is text.
    pub fn is_text(&self) -> bool {
        matches!(self, SqlType::Text { .. })
    }

    /// Whether every value admitted by `self` is also admitted by `wider`.
    ///
    /// Numeric chain: BOOLEAN ⊂ INTEGER ⊂ DECIMAL ⊂ TEXT. Temporal chain:
    /// DATE ⊂ DATETIME ⊂ TEXT. Text widths compare by length.
    pub fn is_within(&self, wider: &SqlType) -> bool {
        use SqlType::*;
        match (self, wider) {
            (a, b) if a == b => true,
            (Text { length: a }, Text { length: b }) => a <= b,
            (_, Text { .. }) => true,
            (Boolean, Integer | Decimal { .. }) => true,
            (Integer, Decimal { .. }) => true,
            (Date, DateTime) => true,
            _ => false,
        }
    }

    /// The SQL Server column type.
    pub fn to_sql(&self) -> String {
        match self {
            SqlType::Boolean => "BIT".to_string(),
            SqlType::Integer => "BIGINT".to_string(),
            SqlType::Decimal { precision, scale } => format!("DECIMAL({},{})", precision, scale),
            SqlType::Date => "DATE".to_string(),
            SqlType::DateTime => "DATETIME2".to_string(),
            SqlType::Text { length } => format!("NVARCHAR({})", length),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

impl FromStr for SqlType {
    type Err = String;

    /// Accepts the rendered SQL names plus a few generic aliases
    /// (`BOOLEAN`, `INTEGER`, `TEXT(n)`, `DATETIME`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        let (name, args) = match upper.find('(') {
            Some(open) => {
                let close = upper
                    .rfind(')')
                    .filter(|&c| c > open)
                    .ok_or_else(|| format!("Unbalanced parentheses in type: {}", s))?;
                (upper[..open].trim(), Some(&upper[open + 1..close]))
            }
            None => (upper.as_str(), None),
        };

        let parse_num = |v: &str| -> Result<usize, String> {
            v.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid type argument '{}' in {}", v.trim(), s))
        };

        match (name, args) {
            ("BIT" | "BOOLEAN" | "BOOL", None) => Ok(SqlType::Boolean),
            ("BIGINT" | "INT" | "INTEGER", None) => Ok(SqlType::Integer),
            ("DECIMAL" | "NUMERIC", None) => Ok(SqlType::Decimal {
                precision: 18,
                scale: 6,
            }),
            ("DECIMAL" | "NUMERIC", Some(args)) => {
                let mut parts = args.split(',');
                let precision = parse_num(parts.next().unwrap_or(""))?;
                let scale = match parts.next() {
                    Some(p) => parse_num(p)?,
                    None => 0,
                };
                if precision == 0 || precision > 38 || scale > precision {
                    return Err(format!("Invalid decimal precision/scale in {}", s));
                }
                Ok(SqlType::Decimal {
                    precision: precision as u8,
                    scale: scale as u8,
                })
            }
            ("DATE", None) => Ok(SqlType::Date),
            ("DATETIME" | "DATETIME2" | "TIMESTAMP", None) => Ok(SqlType::DateTime),
            ("NVARCHAR" | "VARCHAR" | "TEXT", Some(args)) => {
                let length = parse_num(args)?;
                if length == 0 {
                    return Err(format!("Text length must be positive in {}", s));
                }
                Ok(SqlType::Text { length })
            }
            _ => Err(format!("Unknown SQL type: {}", s)),
        }
    }
}

impl TryFrom<String> for SqlType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SqlType> for String {
    fn from(value: SqlType) -> Self {
        value.to_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        assert_eq!(SqlType::Boolean.to_sql(), "BIT");
        assert_eq!(SqlType::Integer.to_sql(), "BIGINT");
        assert_eq!(
            SqlType::Decimal { precision: 18, scale: 6 }.to_sql(),
            "DECIMAL(18,6)"
        );
        assert_eq!(SqlType::DateTime.to_sql(), "DATETIME2");
        assert_eq!(SqlType::Text { length: 100 }.to_sql(), "NVARCHAR(100)");
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("date".parse::<SqlType>(), Ok(SqlType::Date));
        assert_eq!("int".parse::<SqlType>(), Ok(SqlType::Integer));
        assert_eq!(
            "text(200)".parse::<SqlType>(),
            Ok(SqlType::Text { length: 200 })
        );
        assert_eq!(
            "DECIMAL(10, 2)".parse::<SqlType>(),
            Ok(SqlType::Decimal { precision: 10, scale: 2 })
        );
        assert!("NVARCHAR".parse::<SqlType>().is_err());
        assert!("BLOB".parse::<SqlType>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&SqlType::Text { length: 50 }).unwrap();
        assert_eq!(json, "\"NVARCHAR(50)\"");
        let back: SqlType = serde_json::from_str("\"DATE\"").unwrap();
        assert_eq!(back, SqlType::Date);
    }

    #[test]
    fn test_widening_lattice() {
        let decimal = SqlType::Decimal { precision: 18, scale: 6 };
        assert!(SqlType::Boolean.is_within(&SqlType::Integer));
        assert!(SqlType::Integer.is_within(&decimal));
        assert!(decimal.is_within(&SqlType::Text { length: 50 }));
        assert!(SqlType::Date.is_within(&SqlType::DateTime));
        assert!(!SqlType::Date.is_within(&SqlType::Integer));
        assert!(!SqlType::Text { length: 100 }.is_within(&SqlType::Text { length: 50 }));
    }
}
