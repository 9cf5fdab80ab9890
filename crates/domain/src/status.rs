// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle status of a ticket.
///
/// The status set is fixed. Legality of transitions between statuses is
/// enforced by the core state machine; this type only answers structural
/// questions (editable, resolved, terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Initial status after creation. Awaiting supervisor routing.
    #[default]
    Pending,
    /// An operator has been assigned and is working the order.
    InProgress,
    /// The operator reports the work done. Awaiting requester confirmation.
    Completed,
    /// The operator reports the work abandoned. Awaiting requester confirmation.
    Cancelled,
    /// The requester rejected a completed/cancelled resolution.
    Rejected,
    /// The requester confirmed the resolution. Terminal.
    Closed,
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "rejected" => Ok(Self::Rejected),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TicketStatus {
    /// Converts this status to its stable wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
            Self::Closed => "closed",
        }
    }

    /// Returns the human-readable display name for this status.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Rejected => "Rejected",
            Self::Closed => "Closed",
        }
    }

    /// Returns whether the assigned operator may still change the outcome.
    ///
    /// Only `Pending`, `Rejected`, and `InProgress` are operator-editable.
    /// Any operator update attempted from outside this set must fail as an
    /// illegal transition, never be silently ignored.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending | Self::Rejected | Self::InProgress)
    }

    /// Returns whether this status represents an operator resolution.
    ///
    /// Entering a resolved status sets `completed_at`; leaving the
    /// resolved/terminal set clears it.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether this status is terminal.
    ///
    /// `Closed` has no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns whether the requester may close the ticket from this status.
    #[must_use]
    pub const fn is_closable(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }
}
