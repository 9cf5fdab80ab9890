// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested ticket was not found.
    TicketNotFound(i64),
    /// The requested category was not found.
    CategoryNotFound(String),
    /// The requested assignment rule was not found.
    RuleNotFound(i64),
    /// A conditional put observed a different version than expected.
    VersionConflict {
        /// The ticket whose write collided.
        ticket_id: i64,
        /// The version the writer expected to replace.
        expected: i64,
    },
    /// An insert violated a uniqueness constraint.
    DuplicateKey(String),
    /// Category cannot be deleted because tickets still reference it.
    CategoryReferenced {
        /// The referenced category.
        category_id: i64,
    },
    /// A stored value failed to parse back into a domain type.
    CorruptRecord(String),
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::TicketNotFound(id) => write!(f, "Ticket not found: {id}"),
            Self::CategoryNotFound(value) => write!(f, "Category not found: {value}"),
            Self::RuleNotFound(id) => write!(f, "Assignment rule not found: {id}"),
            Self::VersionConflict {
                ticket_id,
                expected,
            } => write!(
                f,
                "Ticket {ticket_id} changed concurrently: expected version {expected}"
            ),
            Self::DuplicateKey(msg) => write!(f, "Duplicate key: {msg}"),
            Self::CategoryReferenced { category_id } => {
                write!(
                    f,
                    "Category {category_id} cannot be deleted: tickets still reference it"
                )
            }
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
