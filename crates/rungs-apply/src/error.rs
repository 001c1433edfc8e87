//! Error types for rungs-apply

use rungs_core::CoreError;
use rungs_db::DbError;
use thiserror::Error;

/// Broad classification of a failed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A file or directory could not be read
    Io,
    /// A filename does not follow the naming grammar
    Format,
    /// A migration statement failed to prepare or execute
    Query,
    /// The history table could not be created, read, or written
    History,
    /// The configuration is missing or invalid
    Config,
}

/// Errors that abort a target's run
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Scanning, parsing, or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A001: A statement of a create/undo file failed
    #[error("[A001] Error executing statement in \"{file}\": {source}\n  statement: {statement}")]
    StatementFailed {
        file: String,
        statement: String,
        source: DbError,
    },

    /// A002: A stored-procedure file failed
    #[error("[A002] Error creating stored procedure \"{file}\": {source}")]
    ProcedureFailed {
        file: String,
        body: String,
        source: DbError,
    },

    /// A003: The history table exists but could not be read
    #[error("[A003] Failed to read history table '{table}': {source}")]
    HistoryRead { table: String, source: DbError },

    /// A004: The history table was missing and could not be created
    #[error("[A004] Failed to create history table '{table}': {source}")]
    HistoryCreate { table: String, source: DbError },

    /// A005: A file's statements ran but its name could not be recorded.
    ///
    /// The schema change has taken effect without a history entry.
    #[error("[A005] Error updating history table on file \"{file}\" (its statements were already executed): {source}")]
    HistoryInsert { file: String, source: DbError },

    /// A006: The migration name does not fit the history table's name column
    #[error("[A006] Migration name \"{file}\" is longer than {max} characters and cannot be recorded in the history table")]
    NameTooLong { file: String, max: usize },
}

impl ApplyError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApplyError::Core(CoreError::IoWithPath { .. }) => ErrorKind::Io,
            ApplyError::Core(CoreError::InvalidFileName { .. }) => ErrorKind::Format,
            ApplyError::Core(_) => ErrorKind::Config,
            ApplyError::StatementFailed { .. } | ApplyError::ProcedureFailed { .. } => {
                ErrorKind::Query
            }
            ApplyError::HistoryRead { .. }
            | ApplyError::HistoryCreate { .. }
            | ApplyError::HistoryInsert { .. }
            | ApplyError::NameTooLong { .. } => ErrorKind::History,
        }
    }

    /// Migration file the error is about, when there is one
    pub fn file(&self) -> Option<&str> {
        match self {
            ApplyError::Core(CoreError::InvalidFileName { name, .. }) => Some(name),
            ApplyError::StatementFailed { file, .. }
            | ApplyError::ProcedureFailed { file, .. }
            | ApplyError::HistoryInsert { file, .. }
            | ApplyError::NameTooLong { file, .. } => Some(file),
            _ => None,
        }
    }

    /// Whether the failing file was a stored-procedure file
    pub fn is_procedure(&self) -> bool {
        matches!(self, ApplyError::ProcedureFailed { .. })
    }

    /// Text of the statement that failed, when a statement failed
    pub fn statement(&self) -> Option<&str> {
        match self {
            ApplyError::StatementFailed { statement, .. } => Some(statement),
            ApplyError::ProcedureFailed { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Result type alias for ApplyError
pub type ApplyResult<T> = Result<T, ApplyError>;
