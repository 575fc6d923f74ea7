//! Backend failure classification
//!
//! Every `rusqlite::Error` crossing the storage boundary is mapped into a
//! closed taxonomy by the error *kind* SQLite reports (its result code),
//! never by comparing error values for identity. Classified failures are
//! logged and surfaced as recoverable errors; `Unknown` is logged at higher
//! severity since it means a failure the taxonomy does not account for.

use crate::Error;
use rusqlite::ErrorCode;

/// Closed taxonomy of backend failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Non-fatal condition, e.g. multiple statements passed to execute
    Warning,
    /// Bad parameter binding or misuse of the statement interface
    Interface,
    /// Value out of range or malformed column data
    Data,
    /// Connection, path, or transaction failure
    Operational,
    /// Constraint violation, e.g. duplicate item name
    Integrity,
    /// Backend runtime fault
    Internal,
    /// Invalid API usage, e.g. operating on a closed statement
    Programming,
    /// Feature unavailable in the underlying SQLite build
    NotSupported,
    /// Anything the taxonomy does not account for
    Unknown,
}

impl DbErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbErrorKind::Warning => "warning",
            DbErrorKind::Interface => "interface",
            DbErrorKind::Data => "data",
            DbErrorKind::Operational => "operational",
            DbErrorKind::Integrity => "integrity",
            DbErrorKind::Internal => "internal",
            DbErrorKind::Programming => "programming",
            DbErrorKind::NotSupported => "not supported",
            DbErrorKind::Unknown => "unknown",
        }
    }

    /// Classify a backend error by its reported kind
    pub fn classify(err: &rusqlite::Error) -> Self {
        use rusqlite::Error as E;
        match err {
            E::SqliteFailure(cause, _) => match cause.code {
                ErrorCode::ConstraintViolation => DbErrorKind::Integrity,
                ErrorCode::TypeMismatch | ErrorCode::TooBig => DbErrorKind::Data,
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::ReadOnly
                | ErrorCode::DiskFull
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::PermissionDenied
                | ErrorCode::SchemaChanged => DbErrorKind::Operational,
                ErrorCode::InternalMalfunction | ErrorCode::OutOfMemory => DbErrorKind::Internal,
                ErrorCode::ApiMisuse => DbErrorKind::Programming,
                ErrorCode::NoLargeFileSupport => DbErrorKind::NotSupported,
                _ => DbErrorKind::Unknown,
            },
            E::InvalidParameterCount(..)
            | E::InvalidParameterName(_)
            | E::ToSqlConversionFailure(_) => DbErrorKind::Interface,
            E::FromSqlConversionFailure(..)
            | E::IntegralValueOutOfRange(..)
            | E::Utf8Error(_)
            | E::InvalidColumnType(..) => DbErrorKind::Data,
            E::InvalidQuery
            | E::ExecuteReturnedResults
            | E::QueryReturnedNoRows
            | E::InvalidColumnIndex(_)
            | E::InvalidColumnName(_)
            | E::StatementChangedRows(_) => DbErrorKind::Programming,
            E::MultipleStatement => DbErrorKind::Warning,
            E::SqliteSingleThreadedMode => DbErrorKind::NotSupported,
            E::InvalidPath(_) => DbErrorKind::Operational,
            _ => DbErrorKind::Unknown,
        }
    }
}

impl std::fmt::Display for DbErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(source: rusqlite::Error) -> Self {
        let kind = DbErrorKind::classify(&source);
        match kind {
            DbErrorKind::Warning => tracing::warn!(%source, "sqlite warning"),
            DbErrorKind::Unknown => tracing::error!(%source, "unclassified sqlite failure"),
            _ => tracing::error!(%source, kind = kind.as_str(), "sqlite failure"),
        }
        Error::Db { kind, source }
    }
}
