//! Type-aware SQL literal formatting.

use chrono::{DateTime, NaiveDateTime};

use crate::inference::boolean_truth;
use crate::input::Value;
use crate::schema::SqlType;

/// Day 0 of the Unix epoch as a spreadsheet serial number.
const SERIAL_UNIX_EPOCH: f64 = 25569.0;
const SECONDS_PER_DAY: f64 = 86400.0;

/// Render a cell as a literal for a column of `sql_type`.
pub fn format_literal(value: &Value, sql_type: SqlType) -> String {
    let Some(text) = value.as_text() else {
        return "NULL".to_string();
    };

    match sql_type {
        SqlType::Boolean => {
            let truth = match value {
                Value::Number(n) => *n != 0.0,
                _ => boolean_truth(&text),
            };
            let literal = if truth { "1" } else { "0" };
            literal.to_string()
        }
        SqlType::Integer | SqlType::Decimal { .. } => match value.as_number() {
            Some(_) => text.into_owned(),
            None => quote_text(&text),
        },
        SqlType::Date | SqlType::DateTime => match value.as_number().and_then(serial_to_datetime) {
            Some(datetime) => format!("'{}'", format_temporal(datetime, sql_type)),
            None => quote_text(&text),
        },
        SqlType::Text { .. } => quote_text(&text),
    }
}

/// Quote text, doubling embedded single quotes.
pub fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Convert a spreadsheet serial day number into a UTC date-time.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let seconds = ((serial - SERIAL_UNIX_EPOCH) * SECONDS_PER_DAY).round();
    if seconds.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(seconds as i64, 0).map(|dt| dt.naive_utc())
}

fn format_temporal(datetime: NaiveDateTime, sql_type: SqlType) -> String {
    match sql_type {
        SqlType::DateTime => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => datetime.format("%Y-%m-%d").to_string(),
    }
}
