//! SQL text helpers for statements rungs builds itself
//!
//! Migration statements are sent untouched; these helpers only apply to the
//! history-table SQL, which is built without parameter binding.

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Check that `table` is a plain identifier, optionally schema-qualified
/// (`schema.table`), so it can be interpolated into SQL.
pub fn is_valid_table_name(table: &str) -> bool {
    let parts: Vec<&str> = table.split('.').collect();
    parts.len() <= 2
        && parts.iter().all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
