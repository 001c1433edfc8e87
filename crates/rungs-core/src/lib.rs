//! rungs-core - Core library for rungs
//!
//! This crate turns a directory of migration files into an ordered list of
//! executable migrations: filename grammar, statement splitting, directory
//! scanning, ordering, and the configuration that names each target.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod order;
pub mod scan;
pub(crate) mod serde_helpers;
pub mod sql_utils;
pub mod statements;

pub use config::{Config, DbType, TargetConfig};
pub use descriptor::{parse_file_name, ActionKind, Migration, Version};
pub use error::{CoreError, CoreResult};
pub use order::{duplicate_keys, ordered, sort_migrations};
pub use scan::{load_migrations, scan_directory};
pub use sql_utils::{escape_sql_string, is_valid_table_name};
pub use statements::{split_statements, strip_line_comments};
