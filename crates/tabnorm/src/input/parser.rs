//! CSV/TSV, JSON and spreadsheet row parser with delimiter detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{NormalizeError, Result};
use super::source::{RowSet, SourceMetadata};
use super::value::Value;

/// Extensions read as workbooks; only the first sheet is used.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<char>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: '"',
        }
    }
}

/// Parses tabular data files into row sets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the row set and metadata.
    ///
    /// `.json` files are read as an array of row objects, workbooks by their
    /// first sheet; everything else is treated as delimited text.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(RowSet, SourceMetadata)> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mut file = File::open(path).map_err(|e| NormalizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| NormalizeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let (rows, format) = if extension == "json" {
            (self.parse_json(&contents)?, "json".to_string())
        } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
            (self.parse_spreadsheet(&contents)?, extension.clone())
        } else if contents.iter().all(|b| b.is_ascii_whitespace()) {
            (RowSet::default(), "empty".to_string())
        } else {
            let delimiter = match self.config.delimiter {
                Some(d) => delimiter_byte(d)?,
                None => detect_delimiter(&contents)?,
            };
            let rows = self.parse_bytes(&contents, delimiter)?;
            let format = match delimiter {
                b'\t' => "tsv",
                b',' => "csv",
                b';' => "csv-semicolon",
                b'|' => "psv",
                _ => "delimited",
            };
            (rows, format.to_string())
        };

        debug!(
            path = %path.display(),
            format = %format,
            rows = rows.row_count(),
            columns = rows.column_count(),
            "Parsed input file"
        );

        let metadata = SourceMetadata::file(path, hash, size_bytes, format, &rows);
        Ok((rows, metadata))
    }

    /// Parse a JSON array of row objects.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<RowSet> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        let rows = RowSet::from_json(&value)?;
        Ok(self.finish(rows))
    }

    /// Parse the first worksheet of a workbook.
    ///
    /// Numeric and date cells stay numbers, so date serials reach SQL
    /// generation untouched.
    pub fn parse_spreadsheet(&self, bytes: &[u8]) -> Result<RowSet> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| NormalizeError::EmptyData("Workbook has no sheets".to_string()))??;

        let mut sheet_rows = range.rows();
        let mut headers: Vec<String> = if self.config.has_header {
            sheet_rows
                .next()
                .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for row in sheet_rows {
            if !self.config.has_header && headers.len() < row.len() {
                headers = (0..row.len()).map(|i| format!("column_{}", i + 1)).collect();
            }
            rows.push(row.iter().map(spreadsheet_value).collect());
        }

        Ok(self.finish(RowSet::new(headers, rows)))
    }

    /// Parse delimited bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<RowSet> {
        let quote = delimiter_byte(self.config.quote)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .map(|s| s.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            if !self.config.has_header && headers.len() < record.len() {
                // Generate column names from the widest row seen
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }
            rows.push(record.iter().map(Value::from_cell).collect());
        }

        if rows.is_empty() && headers.is_empty() {
            return Err(NormalizeError::EmptyData("No columns found".to_string()));
        }

        Ok(self.finish(RowSet::new(headers, rows)))
    }

    /// Drop blank rows and apply the row cap.
    fn finish(&self, rows: RowSet) -> RowSet {
        let mut rows = rows.without_empty_rows();
        if let Some(max) = self.config.max_rows {
            rows.rows.truncate(max);
        }
        rows
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a workbook cell; errors and blanks become null.
fn spreadsheet_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::DateTime(dt) => Value::Number(dt.as_f64()),
        Data::Bool(b) => Value::Text(b.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::from_cell(s),
        _ => Value::Null,
    }
}

/// Convert a configured delimiter or quote character to a byte.
fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(NormalizeError::InvalidDelimiter(c.to_string()))
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(NormalizeError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tabs get a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
