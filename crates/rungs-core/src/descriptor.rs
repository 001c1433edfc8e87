//! Migration file descriptors and the filename grammar
//!
//! A migration file is named `<prefix><version>_<description>.<ext>`:
//!
//! - `v1.2_add_users.sql` creates (forward change) at version 1.2.0
//! - `u1.2.1_drop_users.sql` undoes at version 1.2.1
//! - `p_refresh_totals.sql` defines a stored procedure (no version)
//!
//! Everything after the first underscore is free-form description text.
//! File contents must be UTF-8; anything else fails to load with
//! [`CoreError::IoWithPath`].

use crate::error::{CoreError, CoreResult};
use crate::statements::split_statements;
use std::fmt;
use std::path::{Path, PathBuf};

/// What a migration file does to the schema.
///
/// Ordering between kinds at an identical version is defined by
/// [`ActionKind::ordinal`]: procedures first, then undo files, then creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Stored-procedure definition, executed verbatim as one statement
    Procedure,
    /// Inverse of a forward change
    Undo,
    /// Forward schema change
    Create,
}

impl ActionKind {
    /// Map a filename prefix character to its action kind
    pub fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'p' => Some(ActionKind::Procedure),
            'u' => Some(ActionKind::Undo),
            'v' => Some(ActionKind::Create),
            _ => None,
        }
    }

    /// Filename prefix character for this kind
    pub fn prefix(&self) -> char {
        match self {
            ActionKind::Procedure => 'p',
            ActionKind::Undo => 'u',
            ActionKind::Create => 'v',
        }
    }

    /// Position of this kind when versions tie
    pub fn ordinal(&self) -> u8 {
        match self {
            ActionKind::Procedure => 0,
            ActionKind::Undo => 1,
            ActionKind::Create => 2,
        }
    }

    /// Returns true for stored-procedure files
    pub fn is_procedure(&self) -> bool {
        matches!(self, ActionKind::Procedure)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Procedure => write!(f, "procedure"),
            ActionKind::Undo => write!(f, "undo"),
            ActionKind::Create => write!(f, "create"),
        }
    }
}

/// Version triple of a create/undo migration.
///
/// Field order matters: the derived `Ord` compares major, then minor, then fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub fix: u32,
}

impl Version {
    /// Create a version triple
    pub const fn new(major: u32, minor: u32, fix: u32) -> Self {
        Self { major, minor, fix }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.fix)
    }
}

/// One migration file, parsed and split into executable statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Original filename; the key recorded in the history table
    pub name: String,

    /// Resolved path the content was read from
    pub location: PathBuf,

    /// Version triple (always 0.0.0 for procedures)
    pub version: Version,

    /// Action kind derived from the filename prefix
    pub kind: ActionKind,

    /// Statements in execution order
    pub statements: Vec<String>,
}

impl Migration {
    /// Read and parse the migration file at `path`.
    ///
    /// The filename is validated before the file is opened, so a badly named
    /// file is reported as a naming error even when it is unreadable.
    /// Contents that are not valid UTF-8 are an IO error.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CoreError::file_name(&path.display().to_string(), "file name is not valid UTF-8")
            })?;

        let (kind, version) = parse_file_name(name)?;
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;

        Ok(Self::assemble(name, path.to_path_buf(), kind, version, &contents))
    }

    /// Build a migration from a filename and its already-read contents.
    pub fn from_contents(
        name: &str,
        location: impl Into<PathBuf>,
        contents: &str,
    ) -> CoreResult<Self> {
        let (kind, version) = parse_file_name(name)?;
        Ok(Self::assemble(name, location.into(), kind, version, contents))
    }

    fn assemble(
        name: &str,
        location: PathBuf,
        kind: ActionKind,
        version: Version,
        contents: &str,
    ) -> Self {
        // Procedure bodies keep their separators and comments intact.
        let statements = if kind.is_procedure() {
            vec![contents.to_string()]
        } else {
            split_statements(contents)
        };

        Self {
            name: name.to_string(),
            location,
            version,
            kind,
            statements,
        }
    }

    /// Returns true for stored-procedure files
    pub fn is_procedure(&self) -> bool {
        self.kind.is_procedure()
    }

    /// Key the orderer sorts by
    pub fn sort_key(&self) -> (Version, u8) {
        (self.version, self.kind.ordinal())
    }
}

/// Parse a migration filename into its action kind and version.
///
/// The version token is everything before the first underscore. Its first
/// character selects the kind; for create/undo files the rest is
/// `MAJOR.MINOR[.FIX[.EXTRA]]`. A dot directly after the prefix
/// (`v.1.0_x.sql`) is tolerated.
///
/// A fourth `EXTRA` component must be numeric. It does not take part in
/// ordering and is dropped with a warning.
pub fn parse_file_name(name: &str) -> CoreResult<(ActionKind, Version)> {
    let Some((token, _description)) = name.split_once('_') else {
        return Err(CoreError::file_name(name, "file name is not formatted properly"));
    };

    let mut chars = token.chars();
    let kind = chars
        .next()
        .and_then(ActionKind::from_prefix)
        .ok_or_else(|| CoreError::file_name(name, "unknown prefix"))?;

    if kind.is_procedure() {
        return Ok((kind, Version::default()));
    }

    let rest = chars.as_str();
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    let components: Vec<&str> = rest.split('.').collect();
    if !(2..=4).contains(&components.len()) {
        return Err(CoreError::file_name(
            name,
            "version requires at least a major and minor version",
        ));
    }

    let major = parse_component(name, "major", components[0])?;
    let minor = parse_component(name, "minor", components[1])?;
    let fix = match components.get(2) {
        Some(c) => parse_component(name, "fix", c)?,
        None => 0,
    };
    if let Some(extra) = components.get(3) {
        parse_component(name, "extra", extra)?;
        log::warn!(
            "Migration \"{}\" has a fourth version component ({}) which is ignored for ordering",
            name,
            extra
        );
    }

    Ok((kind, Version::new(major, minor, fix)))
}

fn parse_component(name: &str, label: &str, component: &str) -> CoreResult<u32> {
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::file_name(
            name,
            format!("error converting {label} version \"{component}\""),
        ));
    }
    component.parse::<u32>().map_err(|e| {
        CoreError::file_name(name, format!("error converting {label} version: {e}"))
    })
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
