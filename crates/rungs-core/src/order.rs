//! Application order across all migrations of a target
//!
//! Migrations sort by version triple, then by action kind
//! (procedure < undo < create). The sort is stable: files sharing both
//! version and kind keep their scan order, which is itself unspecified, so
//! such collisions should be avoided rather than relied on.

use crate::descriptor::Migration;
use std::collections::HashMap;

/// Sort migrations in place into application order.
pub fn sort_migrations(migrations: &mut [Migration]) {
    // `sort_by_key` is stable
    migrations.sort_by_key(Migration::sort_key);
}

/// Consume a list of migrations and return it in application order.
pub fn ordered(mut migrations: Vec<Migration>) -> Vec<Migration> {
    sort_migrations(&mut migrations);
    migrations
}

/// Group names of migrations whose (version, kind) key collides.
///
/// Each returned group has at least two names, in input order.
pub fn duplicate_keys(migrations: &[Migration]) -> Vec<Vec<String>> {
    let mut groups: HashMap<_, Vec<String>> = HashMap::new();
    let mut first_seen = Vec::new();
    for m in migrations {
        let key = m.sort_key();
        let group = groups.entry(key).or_default();
        if group.is_empty() {
            first_seen.push(key);
        }
        group.push(m.name.clone());
    }

    first_seen
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .filter(|names| names.len() > 1)
        .collect()
}

#[cfg(test)]
#[path = "order_test.rs"]
mod tests;
