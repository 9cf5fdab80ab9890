// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification delivery seam.
//!
//! The core decides who should hear about a transition; this module
//! resolves those decisions to concrete recipients and hands them to a
//! [`NotificationSink`]. Delivery is best-effort and fire-and-forget:
//! a sink failure is logged and never fails the transition that
//! triggered it.

use ops_ticket::{Notification, NotifyAudience, NotifyReason};
use ops_ticket_domain::{PersonRef, Ticket};
use tracing::warn;

/// A rendered notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    /// The ticket the notification is about.
    pub ticket_id: Option<i64>,
    /// The ticket title, for subject lines.
    pub title: String,
    /// Who to deliver to.
    pub recipient: PersonRef,
    /// Template key for the delivery layer.
    pub template: &'static str,
}

/// Outbound notification delivery.
///
/// Implementations deliver however they like (email, webhook, queue);
/// the API layer never observes success or failure beyond logging.
pub trait NotificationSink {
    /// Delivers a single message.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; callers ignore it beyond
    /// logging.
    fn deliver(&self, message: &NotificationMessage) -> Result<(), String>;
}

/// A sink that drops every message. Useful for tests and for running
/// without outbound delivery configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn deliver(&self, _message: &NotificationMessage) -> Result<(), String> {
        Ok(())
    }
}

const fn template_for(reason: NotifyReason) -> &'static str {
    match reason {
        NotifyReason::Resolved => "ticket_resolved",
        NotifyReason::Routed => "ticket_routed",
        NotifyReason::Assigned => "ticket_assigned",
        NotifyReason::CategoryChanged => "ticket_category_changed",
        NotifyReason::NoteAdded => "ticket_note_added",
    }
}

fn recipient_for(ticket: &Ticket, audience: NotifyAudience) -> Option<PersonRef> {
    match audience {
        NotifyAudience::Requester => Some(ticket.creator.clone()),
        NotifyAudience::Operator => ticket.operator.clone(),
        NotifyAudience::Supervisor => ticket.supervisor.clone(),
    }
}

/// Resolves notification decisions against the post-transition ticket and
/// hands them to the sink. An audience with no resolvable recipient is
/// skipped silently.
pub fn dispatch_notifications(
    sink: &dyn NotificationSink,
    ticket: &Ticket,
    notifications: &[Notification],
) {
    for notification in notifications {
        let Some(recipient) = recipient_for(ticket, notification.audience) else {
            continue;
        };
        let message: NotificationMessage = NotificationMessage {
            ticket_id: ticket.ticket_id,
            title: ticket.title.clone(),
            recipient,
            template: template_for(notification.reason),
        };
        if let Err(reason) = sink.deliver(&message) {
            warn!(
                ticket_id = ?ticket.ticket_id,
                template = message.template,
                %reason,
                "notification delivery failed"
            );
        }
    }
}
