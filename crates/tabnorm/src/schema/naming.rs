//! Canonical identifier handling.
//!
//! Every table and column name that reaches a schema graph goes through
//! [`normalize_identifier`], and every name the SQL generator prints goes
//! through [`quote_identifier`], which normalizes again. Normalization is
//! idempotent, so a constraint always references the exact identifier its
//! CREATE TABLE declared.

/// Collapse whitespace runs into `_` and trim the ends.
///
/// Blank names become `column`.
pub fn normalize_identifier(name: &str) -> String {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join("_");
    if normalized.is_empty() {
        "column".to_string()
    } else {
        normalized
    }
}

/// Bracket-quote an identifier for SQL Server, doubling embedded `]`.
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", normalize_identifier(name).replace(']', "]]"))
}

/// Quote a table name, optionally prefixed with a schema.
pub fn qualified_name(schema: Option<&str>, table: &str) -> String {
    match schema.map(str::trim).filter(|s| !s.is_empty()) {
        Some(schema) => format!("{}.{}", quote_identifier(schema), quote_identifier(table)),
        None => quote_identifier(table),
    }
}

/// Whether two names refer to the same identifier after normalization,
/// ignoring case.
pub fn names_match(a: &str, b: &str) -> bool {
    normalize_identifier(a).to_lowercase() == normalize_identifier(b).to_lowercase()
}

/// Identifier equality under SQL Server's default case-insensitive collation.
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Return `base`, or `base_2`, `base_3`, ... if `taken` reports a clash.
pub fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}
