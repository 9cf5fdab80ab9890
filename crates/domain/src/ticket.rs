// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::category::Category;
use crate::status::TicketStatus;
use crate::types::PersonRef;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A trackable unit of requested work.
///
/// Tickets are created once (status `Pending`), mutated in place through
/// the state machine, and never physically deleted; `Closed` is the
/// furthest terminal status.
///
/// # Invariant
///
/// `completed_at` is non-null if and only if the ticket has reached
/// `Completed` or `Cancelled` since its last reopen; it is null whenever
/// the status is `Pending`, `InProgress`, or `Rejected`. The core state
/// machine maintains this; persistence only stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Canonical identifier assigned by the database at creation.
    /// `None` indicates the ticket has not been persisted yet.
    pub ticket_id: Option<i64>,
    /// Short summary. Immutable after creation in practice; not tracked
    /// for history.
    pub title: String,
    /// Full description. Append-only: notes and the closure confirmation
    /// are appended, never truncated.
    pub description: String,
    /// The category this ticket belongs to.
    pub category: Category,
    /// Current lifecycle status.
    pub status: TicketStatus,
    /// The requester who created the ticket. Immutable after creation.
    pub creator: PersonRef,
    /// The routing supervisor, at most one at a time. Set at creation via
    /// the assignment resolver or later by an explicit claim.
    pub supervisor: Option<PersonRef>,
    /// The working operator, at most one at a time. Set only by a
    /// supervisor action.
    pub operator: Option<PersonRef>,
    /// Creation instant. Immutable.
    pub created_at: OffsetDateTime,
    /// Updated on every mutating action.
    pub modified_at: OffsetDateTime,
    /// Set when the status enters the resolved set; cleared on reopen.
    pub completed_at: Option<OffsetDateTime>,
    /// Supervisor-authored notes, distinct from the description.
    pub observation: String,
    /// Optimistic concurrency token. Starts at 1, incremented on every
    /// committed mutation; the conditional put in persistence compares it.
    pub version: i64,
}

impl Ticket {
    /// Creates a new unpersisted ticket in `Pending` status.
    #[must_use]
    pub fn new(
        title: String,
        description: String,
        category: Category,
        creator: PersonRef,
        supervisor: Option<PersonRef>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            ticket_id: None,
            title,
            description,
            category,
            status: TicketStatus::Pending,
            creator,
            supervisor,
            operator: None,
            created_at,
            modified_at: created_at,
            completed_at: None,
            observation: String::new(),
            version: 1,
        }
    }

    /// Returns whether the given person is the creator of this ticket.
    #[must_use]
    pub const fn is_creator(&self, person_id: i64) -> bool {
        self.creator.person_id == person_id
    }

    /// Returns whether the given person is the assigned operator.
    #[must_use]
    pub fn is_assigned_operator(&self, person_id: i64) -> bool {
        self.operator
            .as_ref()
            .is_some_and(|op| op.person_id == person_id)
    }

    /// Returns whether the given person is the assigned supervisor.
    #[must_use]
    pub fn is_assigned_supervisor(&self, person_id: i64) -> bool {
        self.supervisor
            .as_ref()
            .is_some_and(|sup| sup.person_id == person_id)
    }
}
