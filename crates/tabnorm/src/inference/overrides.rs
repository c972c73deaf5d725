//! Per-run name→type override table.

use indexmap::IndexMap;

use crate::schema::{SqlType, names_match};

/// Type overrides consulted before inference.
///
/// Pinned entries come from configuration and always win. Reconciled
/// entries are recorded while foreign keys are unified during a run and
/// are visible to every later lookup in that run. Build a fresh table
/// (or call [`TypeOverrides::reset`]) for each run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeOverrides {
    pinned: IndexMap<String, SqlType>,
    reconciled: IndexMap<String, SqlType>,
}

impl TypeOverrides {
    /// Create a table seeded with operator-pinned types.
    pub fn new(pinned: IndexMap<String, SqlType>) -> Self {
        Self {
            pinned,
            reconciled: IndexMap::new(),
        }
    }

    /// Override for a column: exact name first, then normalized match.
    pub fn get(&self, column: &str) -> Option<SqlType> {
        lookup(&self.pinned, column).or_else(|| lookup(&self.reconciled, column))
    }

    /// Whether the column has an operator-pinned type.
    pub fn is_pinned(&self, column: &str) -> bool {
        lookup(&self.pinned, column).is_some()
    }

    /// Record a type chosen by reconciliation.
    pub fn record(&mut self, column: impl Into<String>, sql_type: SqlType) {
        self.reconciled.insert(column.into(), sql_type);
    }

    /// Types recorded by reconciliation in this run.
    pub fn reconciled(&self) -> impl Iterator<Item = (&str, SqlType)> {
        self.reconciled.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Forget everything recorded during the previous run.
    pub fn reset(&mut self) {
        self.reconciled.clear();
    }
}

fn lookup(map: &IndexMap<String, SqlType>, column: &str) -> Option<SqlType> {
    map.get(column).copied().or_else(|| {
        map.iter()
            .find(|(name, _)| names_match(name, column))
            .map(|(_, t)| *t)
    })
}
