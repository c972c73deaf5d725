//! Primary-key and low-cardinality candidate detection.

use crate::input::RowSet;

use super::profile::distinct_count;

/// Default distinct-value threshold below which a column is extractable.
pub const DEFAULT_LOW_CARDINALITY_THRESHOLD: usize = 20;

/// Finds identifier columns and categorical columns worth extracting.
///
/// The two detectors are independent. When a row set has fewer rows than
/// the threshold, a unique column is also reported as low-cardinality.
#[derive(Debug, Clone)]
pub struct KeyCandidateDetector {
    threshold: usize,
}

impl KeyCandidateDetector {
    /// Create a detector with the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_LOW_CARDINALITY_THRESHOLD)
    }

    /// Create a detector with a custom low-cardinality threshold.
    pub fn with_threshold(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Columns where every row holds a present, unique value.
    pub fn primary_key_candidates(&self, rows: &RowSet) -> Vec<String> {
        if rows.is_empty() {
            return Vec::new();
        }
        (0..rows.column_count())
            .filter(|&idx| {
                let values = rows.non_empty_values(idx);
                values.len() == rows.row_count() && distinct_count(&values) == rows.row_count()
            })
            .map(|idx| rows.columns[idx].clone())
            .collect()
    }

    /// Columns with at least one but fewer than `threshold` distinct values.
    pub fn low_cardinality_columns(&self, rows: &RowSet) -> Vec<String> {
        (0..rows.column_count())
            .filter(|&idx| {
                let distinct = distinct_count(&rows.non_empty_values(idx));
                distinct > 0 && distinct < self.threshold
            })
            .map(|idx| rows.columns[idx].clone())
            .collect()
    }
}

impl Default for KeyCandidateDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    fn make_rows(columns: &[&str], rows: Vec<Vec<&str>>) -> RowSet {
        RowSet::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(Value::from).collect())
                .collect(),
        )
    }

    #[test]
    fn test_primary_key_candidates() {
        let rows = make_rows(
            &["id", "country", "code"],
            vec![vec!["1", "US", "a"], vec!["2", "US", ""], vec!["3", "MX", "c"]],
        );
        let detector = KeyCandidateDetector::new();
        // "code" is unique among present values but has a gap
        assert_eq!(detector.primary_key_candidates(&rows), vec!["id"]);
    }

    #[test]
    fn test_low_cardinality_threshold() {
        let mut data = Vec::new();
        for i in 0..30 {
            let row = vec![i.to_string(), (i % 3).to_string()];
            data.push(row);
        }
        let rows = RowSet::new(
            vec!["n".into(), "group".into()],
            data.into_iter()
                .map(|r| r.into_iter().map(Value::from).collect())
                .collect(),
        );

        let detector = KeyCandidateDetector::new();
        assert_eq!(detector.low_cardinality_columns(&rows), vec!["group"]);
        assert_eq!(detector.primary_key_candidates(&rows), vec!["n"]);

        let strict = KeyCandidateDetector::with_threshold(3);
        assert!(strict.low_cardinality_columns(&rows).is_empty());
    }

    #[test]
    fn test_small_tables_overlap() {
        let rows = make_rows(&["id"], vec![vec!["1"], vec!["2"]]);
        let detector = KeyCandidateDetector::new();
        assert_eq!(detector.primary_key_candidates(&rows), vec!["id"]);
        assert_eq!(detector.low_cardinality_columns(&rows), vec!["id"]);
    }

    #[test]
    fn test_empty_inputs() {
        let rows = make_rows(&["a"], vec![]);
        let detector = KeyCandidateDetector::new();
        assert!(detector.primary_key_candidates(&rows).is_empty());
        assert!(detector.low_cardinality_columns(&rows).is_empty());

        let blank = make_rows(&["a"], vec![vec![""], vec![""]]);
        assert!(detector.low_cardinality_columns(&blank).is_empty());
    }
}
