// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use ops_ticket::CoreError;
use ops_ticket_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from core and persistence errors and represent the
/// API contract. Core and persistence failures are translated explicitly
/// so internal error shapes never leak to transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// Why the actor may not perform it.
        reason: String,
    },
    /// The requested change is not legal from the ticket's current state.
    IllegalTransition {
        /// A human-readable description of the refusal.
        message: String,
    },
    /// A write collided with a concurrent change or violated uniqueness.
    Conflict {
        /// A human-readable description of the collision.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized { action, reason } => {
                write!(f, "Unauthorized: '{action}': {reason}")
            }
            Self::IllegalTransition { message } => {
                write!(f, "Illegal transition: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::NotFound { resource, id } => ApiError::ResourceNotFound {
            resource_type: resource.to_string(),
            message: format!("'{id}' does not exist"),
        },
        CoreError::IllegalTransition {
            from,
            action,
            reason,
        } => ApiError::IllegalTransition {
            message: format!("cannot {action} from status '{from}': {reason}"),
        },
        CoreError::Conflict { reason } => ApiError::Conflict { message: reason },
        CoreError::Validation { message } => ApiError::InvalidInput {
            field: String::from("request"),
            message,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Not-found and conflict shapes map to their API counterparts; anything
/// else is an internal error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::TicketNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {id} does not exist"),
        },
        PersistenceError::CategoryNotFound(value) => ApiError::ResourceNotFound {
            resource_type: String::from("Category"),
            message: format!("Category '{value}' does not exist"),
        },
        PersistenceError::RuleNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Assignment rule"),
            message: format!("Assignment rule {id} does not exist"),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::VersionConflict {
            ticket_id,
            expected,
        } => ApiError::Conflict {
            message: format!(
                "Ticket {ticket_id} was changed concurrently (expected version {expected}); retry with fresh state"
            ),
        },
        PersistenceError::DuplicateKey(message) => ApiError::Conflict {
            message: format!("{message} already exists"),
        },
        PersistenceError::CategoryReferenced { category_id } => ApiError::Conflict {
            message: format!("Category {category_id} is still referenced by tickets"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
