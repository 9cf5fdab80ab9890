// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ops_ticket_domain::{Category, PersonRef, Shift, TicketStatus};

/// Input for creating a new ticket.
///
/// The category is referenced by slug value; the caller resolves it to a
/// stored [`ops_ticket_domain::Category`] before invoking [`crate::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicket {
    /// Short summary of the requested work.
    pub title: String,
    /// Full description of the requested work.
    pub description: String,
    /// Slug of the category the work falls under.
    pub category: String,
    /// The shift during which the work is requested.
    pub shift: Shift,
}

/// A mutation applied to an existing ticket.
///
/// Each variant corresponds to one lifecycle action. The engine validates
/// the acting principal and the ticket's current status before producing
/// a new ticket state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketCommand {
    /// A supervisor takes ownership of an unassigned ticket.
    Claim,
    /// The owning supervisor delegates the ticket to an operator.
    AssignOperator {
        /// The operator receiving the assignment.
        operator: PersonRef,
    },
    /// The assigned operator records an outcome for the ticket.
    UpdateStatus {
        /// The outcome status. Must be a resolved status.
        status: TicketStatus,
        /// Optional closing remark appended to the observation log.
        note: Option<String>,
    },
    /// The requester disputes a resolved outcome and sends the ticket
    /// back to the operator.
    Reject {
        /// Mandatory explanation of why the outcome is disputed.
        note: String,
    },
    /// The requester confirms the outcome and closes the ticket for good.
    Close,
    /// The requester appends a note to an open ticket.
    AddNote {
        /// The note text.
        note: String,
    },
    /// A supervisor or administrator corrects ticket fields directly.
    Edit(TicketEdit),
}

impl TicketCommand {
    /// A short verb describing the command, used in error messages.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::AssignOperator { .. } => "assign operator",
            Self::UpdateStatus { .. } => "update status",
            Self::Reject { .. } => "reject resolution",
            Self::Close => "close",
            Self::AddNote { .. } => "add note",
            Self::Edit(_) => "edit",
        }
    }
}

/// Field-level corrections applied by a supervisor or administrator.
///
/// Every field is optional; `None` means "leave unchanged". The operator
/// field is doubly optional so that `Some(None)` clears an existing
/// assignment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketEdit {
    /// Replacement category, already resolved from its slug.
    pub category: Option<Category>,
    /// Replacement status. Any status except closed may be set.
    pub status: Option<TicketStatus>,
    /// Replacement description text.
    pub description: Option<String>,
    /// Replacement observation text. An empty string clears it.
    pub observation: Option<String>,
    /// Replacement operator assignment. `Some(None)` unassigns.
    pub operator: Option<Option<PersonRef>>,
}

impl TicketEdit {
    /// Returns `true` when the edit changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.status.is_none()
            && self.description.is_none()
            && self.observation.is_none()
            && self.operator.is_none()
    }
}
