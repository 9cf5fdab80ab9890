// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ops_ticket_domain::{FieldChange, TicketStatus, TrackedField};

/// Who a notification is addressed to, relative to the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyAudience {
    /// The person who created the ticket.
    Requester,
    /// The operator assigned to the ticket after the change.
    Operator,
    /// The supervisor the ticket was routed to at creation.
    Supervisor,
}

/// Why a notification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyReason {
    /// The ticket reached a resolved status.
    Resolved,
    /// A new ticket was routed to a supervisor.
    Routed,
    /// An operator was assigned to the ticket.
    Assigned,
    /// The ticket's category changed while work was still open.
    CategoryChanged,
    /// The requester added a note while work was still open.
    NoteAdded,
}

/// A single notification decision produced by the engine.
///
/// The engine only decides who should hear about what; delivery is the
/// caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    /// Who to notify.
    pub audience: NotifyAudience,
    /// What happened.
    pub reason: NotifyReason,
}

impl Notification {
    #[must_use]
    pub const fn new(audience: NotifyAudience, reason: NotifyReason) -> Self {
        Self { audience, reason }
    }
}

/// Decides which notifications a completed transition should raise.
///
/// The requester hears when the ticket first reaches a resolved status.
/// The assigned operator hears about a fresh assignment, and about
/// category changes or requester notes while the ticket is still in an
/// editable status. A transition that matches none of these raises
/// nothing.
#[must_use]
pub fn evaluate_notifications(
    old_status: TicketStatus,
    new_status: TicketStatus,
    changes: &[FieldChange],
    note_added: bool,
    operator_assigned: bool,
) -> Vec<Notification> {
    let mut notifications: Vec<Notification> = Vec::new();

    if !old_status.is_resolved() && new_status.is_resolved() {
        notifications.push(Notification::new(
            NotifyAudience::Requester,
            NotifyReason::Resolved,
        ));
    }

    if !operator_assigned {
        return notifications;
    }

    let operator_newly_assigned: bool = changes
        .iter()
        .any(|change| change.field == TrackedField::Operator && change.new.is_some());
    if operator_newly_assigned {
        notifications.push(Notification::new(
            NotifyAudience::Operator,
            NotifyReason::Assigned,
        ));
    }

    if new_status.is_editable() {
        let category_changed: bool = changes
            .iter()
            .any(|change| change.field == TrackedField::Category);
        if category_changed && !operator_newly_assigned {
            notifications.push(Notification::new(
                NotifyAudience::Operator,
                NotifyReason::CategoryChanged,
            ));
        }
        if note_added {
            notifications.push(Notification::new(
                NotifyAudience::Operator,
                NotifyReason::NoteAdded,
            ));
        }
    }

    notifications
}
