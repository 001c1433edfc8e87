//! Configuration types and parsing for rungs config files
//!
//! A config file names one or more targets. Each target pairs a database
//! connection with the directory its migration files live in:
//!
//! ```yaml
//! history_table: migration_history
//! targets:
//!   local:
//!     type: duckdb
//!     path: ./dev.duckdb
//!     migrations: ./migrations
//!   reporting:
//!     type: postgres
//!     host: localhost
//!     port: 5432
//!     user: reporter
//!     database: reports
//!     migrations: ./reporting/sql
//! ```
//!
//! The JSON layout used by older deployments (`dbParams`, `dbType`,
//! `username`, `queries`, string ports) is accepted as well.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::port_from_number_or_string;
use crate::sql_utils::is_valid_table_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--target` is given
pub const TARGET_ENV_VAR: &str = "RUNGS_TARGET";

const DEFAULT_HISTORY_TABLE: &str = "migration_history";

const DEFAULT_DB_PATH: &str = ":memory:";

const CONFIG_DIR: &str = ".rungs";

/// Top-level rungs configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Table recording applied migration names (optionally schema-qualified)
    #[serde(default = "default_history_table")]
    pub history_table: String,

    /// Named targets, applied in name order
    #[serde(alias = "dbParams")]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// PostgreSQL
    #[serde(alias = "postgresql")]
    Postgres,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
            DbType::Postgres => write!(f, "postgres"),
        }
    }
}

/// One target: a store connection plus its migration directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Backend discriminator
    #[serde(rename = "type", alias = "dbType", default)]
    pub db_type: DbType,

    /// Database file for DuckDB (`:memory:` when unset)
    #[serde(default)]
    pub path: Option<String>,

    /// PostgreSQL host
    #[serde(default)]
    pub host: Option<String>,

    /// PostgreSQL port
    #[serde(default, deserialize_with = "port_from_number_or_string")]
    pub port: Option<u16>,

    /// PostgreSQL user
    #[serde(default, alias = "username")]
    pub user: Option<String>,

    /// PostgreSQL password
    #[serde(default)]
    pub password: Option<String>,

    /// PostgreSQL database name
    #[serde(default)]
    pub database: Option<String>,

    /// Directory holding this target's migration files
    #[serde(alias = "queries")]
    pub migrations: String,

    /// Per-target override of the history table
    #[serde(default)]
    pub history_table: Option<String>,
}

fn default_history_table() -> String {
    DEFAULT_HISTORY_TABLE.to_string()
}

impl TargetConfig {
    /// DuckDB database path, defaulting to an in-memory database
    pub fn db_path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_DB_PATH)
    }

    /// Migration directory with a leading `~` expanded
    pub fn migrations_dir(&self) -> PathBuf {
        expand_home(&self.migrations)
    }
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
        .map_err(|message| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message,
        })?;

        config.validate()?;
        Ok(config)
    }

    fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Default config location: `~/.rungs/config.yml`, or `config.json` in
    /// the same directory when only that exists.
    pub fn default_path() -> PathBuf {
        let dir = expand_home("~").join(CONFIG_DIR);
        let yml = dir.join("config.yml");
        let json = dir.join("config.json");
        if !yml.exists() && json.exists() {
            json
        } else {
            yml
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.targets.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one target must be configured".to_string(),
            });
        }

        validate_table_name(&self.history_table)?;

        for (name, target) in &self.targets {
            if target.migrations.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Target '{name}' has no migrations directory"),
                });
            }
            if let Some(table) = &target.history_table {
                validate_table_name(table)?;
            }
            if target.db_type == DbType::Postgres {
                for (field, value) in [("host", &target.host), ("database", &target.database)] {
                    if value.as_deref().map_or(true, str::is_empty) {
                        return Err(CoreError::ConfigInvalid {
                            message: format!("Target '{name}' (postgres) requires '{field}'"),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Get the list of target names, in application order
    pub fn target_names(&self) -> Vec<&str> {
        self.targets.keys().map(|s| s.as_str()).collect()
    }

    /// Get target configuration by name
    pub fn get_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| self.unknown_target(name))
    }

    fn unknown_target(&self, name: &str) -> CoreError {
        CoreError::ConfigInvalid {
            message: format!(
                "Target '{}' not found. Available targets: {}",
                name,
                self.target_names().join(", ")
            ),
        }
    }

    /// Targets to process: only `selected` when given, otherwise all of them
    pub fn select_targets(&self, selected: Option<&str>) -> CoreResult<Vec<(&str, &TargetConfig)>> {
        match selected {
            Some(name) => match self.targets.get_key_value(name) {
                Some((key, target)) => Ok(vec![(key.as_str(), target)]),
                None => Err(self.unknown_target(name)),
            },
            None => Ok(self
                .targets
                .iter()
                .map(|(name, target)| (name.as_str(), target))
                .collect()),
        }
    }

    /// History table for a target, honouring its override
    pub fn history_table_for<'a>(&'a self, target: &'a TargetConfig) -> &'a str {
        target
            .history_table
            .as_deref()
            .unwrap_or(&self.history_table)
    }

    /// Resolve target from CLI flag or RUNGS_TARGET environment variable
    ///
    /// Priority: CLI flag > RUNGS_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

fn validate_table_name(table: &str) -> CoreResult<()> {
    if is_valid_table_name(table) {
        Ok(())
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!("Invalid history table name '{table}'"),
        })
    }
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
