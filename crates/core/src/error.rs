// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ops_ticket_domain::{DomainError, TicketStatus};

/// Errors that can occur while applying a ticket command.
///
/// All four kinds are returned as typed failures to the caller; nothing
/// is silently swallowed. The transport layer maps them onto user-facing
/// messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A referenced ticket, category, or assignment rule does not exist.
    NotFound {
        /// The kind of resource (e.g., "ticket", "category").
        resource: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },
    /// The requested change is not reachable from the current status, or
    /// the acting role lacks permission for that transition.
    IllegalTransition {
        /// The status the ticket was in.
        from: TicketStatus,
        /// The attempted action.
        action: String,
        /// Why the attempt was refused.
        reason: String,
    },
    /// An optimistic write collided with a concurrent change, or a
    /// uniqueness constraint was violated.
    Conflict {
        /// Description of the collision.
        reason: String,
    },
    /// Malformed input reached the core boundary.
    Validation {
        /// Description of the violated invariant.
        message: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { resource, id } => write!(f, "{resource} '{id}' not found"),
            Self::IllegalTransition {
                from,
                action,
                reason,
            } => write!(
                f,
                "Illegal transition: cannot {action} from status '{from}': {reason}"
            ),
            Self::Conflict { reason } => write!(f, "Conflict: {reason}"),
            Self::Validation { message } => write!(f, "Validation failed: {message}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation {
            message: err.to_string(),
        }
    }
}
