//! Storage type inference from raw column values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::schema::SqlType;

use super::overrides::TypeOverrides;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static INTEGER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());

static NUMERIC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").unwrap());

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    const TIME: &str = r"(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?";
    vec![
        Regex::new(&format!(r"^\d{{4}}-\d{{2}}-\d{{2}}{}$", TIME)).unwrap(), // ISO date
        Regex::new(&format!(r"^\d{{2}}/\d{{2}}/\d{{4}}{}$", TIME)).unwrap(), // DD/MM/YYYY
        Regex::new(&format!(r"^\d{{1,2}}[/-]\d{{1,2}}[/-](?:\d{{2}}|\d{{4}}){}$", TIME)).unwrap(), // locale
    ]
});

/// Closed boolean vocabulary, compared case-insensitively.
const BOOLEAN_WORDS: &[&str] = &["true", "false", "0", "1", "si", "sí", "no", "yes", "y", "n"];

/// Whether a value belongs to the boolean vocabulary.
pub fn is_boolean_word(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    BOOLEAN_WORDS.contains(&lower.as_str())
}

/// Whether a boolean-vocabulary value means "true".
pub fn boolean_truth(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "si" | "sí" | "yes" | "y"
    )
}

/// Tuning knobs for type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Text lengths are rounded up to a multiple of this.
    pub text_bucket: usize,
    /// Smallest text length emitted.
    pub min_text_length: usize,
    /// Largest text length emitted.
    pub max_text_length: usize,
    /// Precision of inferred decimals.
    pub decimal_precision: u8,
    /// Scale of inferred decimals.
    pub decimal_scale: u8,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            text_bucket: 50,
            min_text_length: 50,
            max_text_length: 4000,
            decimal_precision: 18,
            decimal_scale: 6,
        }
    }
}

/// Eligibility flags accumulated over a column. Flags only ever turn off.
#[derive(Debug, Clone)]
struct TypeFlags {
    integer: bool,
    numeric: bool,
    date: bool,
    has_time: bool,
    boolean: bool,
    max_length: usize,
    seen: usize,
}

impl TypeFlags {
    fn new() -> Self {
        Self {
            integer: true,
            numeric: true,
            date: true,
            has_time: false,
            boolean: true,
            max_length: 0,
            seen: 0,
        }
    }

    fn observe(&mut self, raw: &str) {
        let value = raw.trim();
        if value.is_empty() {
            return;
        }
        self.seen += 1;
        self.max_length = self.max_length.max(value.chars().count());

        if self.integer && !INTEGER_PATTERN.is_match(value) {
            self.integer = false;
        }
        if self.numeric && !NUMERIC_PATTERN.is_match(value) {
            self.numeric = false;
        }
        if self.date {
            if DATE_PATTERNS.iter().any(|p| p.is_match(value)) {
                if value.contains(':') {
                    self.has_time = true;
                }
            } else {
                self.date = false;
            }
        }
        if self.boolean && !is_boolean_word(value) {
            self.boolean = false;
        }
    }
}

/// Classifies column values into a [`SqlType`].
#[derive(Debug, Clone, Default)]
pub struct TypeInferencer {
    config: InferenceConfig,
}

impl TypeInferencer {
    /// Create an inferencer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an inferencer with custom settings.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the storage type of a set of values, ignoring overrides.
    ///
    /// Resolution order is BOOLEAN, INTEGER, DECIMAL, DATE/DATETIME, then
    /// TEXT sized to the longest value. A column without values is TEXT
    /// of the minimum length.
    pub fn infer<S: AsRef<str>>(&self, values: &[S]) -> SqlType {
        let mut flags = TypeFlags::new();
        for value in values {
            flags.observe(value.as_ref());
        }

        if flags.seen == 0 {
            return self.text_type(0);
        }
        if flags.boolean {
            SqlType::Boolean
        } else if flags.integer {
            SqlType::Integer
        } else if flags.numeric {
            SqlType::Decimal {
                precision: self.config.decimal_precision,
                scale: self.config.decimal_scale,
            }
        } else if flags.date {
            if flags.has_time {
                SqlType::DateTime
            } else {
                SqlType::Date
            }
        } else {
            self.text_type(flags.max_length)
        }
    }

    /// Type for a column, honouring overrides before inference.
    pub fn resolve<S: AsRef<str>>(
        &self,
        column: &str,
        values: &[S],
        overrides: &TypeOverrides,
    ) -> SqlType {
        if let Some(pinned) = overrides.get(column) {
            trace!(column, sql_type = %pinned, "Using type override");
            return pinned;
        }
        self.infer(values)
    }

    /// Text type sized to `max_length`, rounded up to the bucket and clamped.
    pub fn text_type(&self, max_length: usize) -> SqlType {
        let bucket = self.config.text_bucket.max(1);
        let rounded = max_length.max(1).div_ceil(bucket) * bucket;
        let length = rounded.clamp(
            self.config.min_text_length,
            self.config.max_text_length.max(self.config.min_text_length),
        );
        SqlType::Text { length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> SqlType {
        TypeInferencer::new().infer(values)
    }

    #[test]
    fn test_infer_boolean() {
        assert_eq!(infer(&["true", "FALSE", "yes"]), SqlType::Boolean);
        assert_eq!(infer(&["si", "no", "Sí"]), SqlType::Boolean);
        assert_eq!(infer(&["0", "1", "1"]), SqlType::Boolean);
    }

    #[test]
    fn test_infer_integer() {
        assert_eq!(infer(&["1", "2", "300", "-4", "+5"]), SqlType::Integer);
    }

    #[test]
    fn test_infer_decimal() {
        assert_eq!(
            infer(&["1.5", "2", "-3.25"]),
            SqlType::Decimal { precision: 18, scale: 6 }
        );
    }

    #[test]
    fn test_non_numeric_outlier_falls_back_to_text() {
        assert_eq!(infer(&["1", "2", "x"]), SqlType::Text { length: 50 });
    }

    #[test]
    fn test_infer_dates() {
        assert_eq!(infer(&["2024-01-15", "2024-02-20"]), SqlType::Date);
        assert_eq!(infer(&["15/01/2024", "1-2-24"]), SqlType::Date);
        assert_eq!(
            infer(&["2024-01-15 10:30:00", "2024-01-16"]),
            SqlType::DateTime
        );
        assert_eq!(infer(&["2024-01-15", "soon"]), SqlType::Text { length: 50 });
    }

    #[test]
    fn test_text_buckets() {
        let inferencer = TypeInferencer::new();
        assert_eq!(inferencer.text_type(0), SqlType::Text { length: 50 });
        assert_eq!(inferencer.text_type(50), SqlType::Text { length: 50 });
        assert_eq!(inferencer.text_type(51), SqlType::Text { length: 100 });
        assert_eq!(inferencer.text_type(10_000), SqlType::Text { length: 4000 });
    }

    #[test]
    fn test_long_text_sized_by_chars() {
        let long = "ñ".repeat(120);
        assert_eq!(infer(&[long.as_str()]), SqlType::Text { length: 150 });
    }

    #[test]
    fn test_empty_column_is_default_text() {
        assert_eq!(infer(&[]), SqlType::Text { length: 50 });
        assert_eq!(infer(&["", "  "]), SqlType::Text { length: 50 });
    }

    #[test]
    fn test_boolean_words_win_over_text_meaning() {
        // "no" used as a country code is still read as a boolean
        assert_eq!(infer(&["no", "y"]), SqlType::Boolean);
    }

    #[test]
    fn test_resolve_prefers_override() {
        let mut pinned = indexmap::IndexMap::new();
        pinned.insert("Fecha Ultima Compra".to_string(), SqlType::Date);
        let overrides = TypeOverrides::new(pinned);

        let inferencer = TypeInferencer::new();
        assert_eq!(
            inferencer.resolve("fecha_ultima_compra", &["44197", "44198"], &overrides),
            SqlType::Date
        );
        assert_eq!(
            inferencer.resolve("other", &["44197"], &overrides),
            SqlType::Integer
        );
    }

    #[test]
    fn test_custom_config() {
        let inferencer = TypeInferencer::with_config(InferenceConfig {
            text_bucket: 10,
            min_text_length: 10,
            max_text_length: 30,
            ..InferenceConfig::default()
        });
        assert_eq!(inferencer.infer(&["abcdefghijkl"]), SqlType::Text { length: 20 });
        assert_eq!(inferencer.infer(&["x".repeat(100)]), SqlType::Text { length: 30 });
    }
}
