// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{CreateTicket, TicketCommand, TicketEdit};
use crate::error::CoreError;
use crate::notify::{self, Notification, NotifyAudience, NotifyReason};
use crate::resolver::AssignmentRules;
use ops_ticket_audit::{ChangeType, HistoryActor, HistoryEntry};
use ops_ticket_domain::{
    Category, PersonRef, Principal, Role, Ticket, TicketStatus, TrackedFields, validate_note,
    validate_ticket_fields,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// The outcome of creating a ticket: the unpersisted ticket, its creation
/// history entry, the notifications to emit, and whether routing found no
/// supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    /// The new ticket, not yet assigned a database id.
    pub ticket: Ticket,
    /// The creation history entry, `old_values` empty.
    pub history: HistoryEntry,
    /// Notifications the caller should hand to the delivery sink.
    pub notifications: Vec<Notification>,
    /// `true` when no assignment rule matched. Informational only; the
    /// creation itself still succeeds.
    pub unrouted: bool,
}

/// The outcome of applying a command to an existing ticket.
///
/// Persistence must write the ticket and append the history entry as one
/// atomic unit; if the append fails the state write is not committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The post-mutation ticket, version incremented.
    pub ticket: Ticket,
    /// The single history entry this mutation produces.
    pub history: HistoryEntry,
    /// Notifications the caller should hand to the delivery sink.
    pub notifications: Vec<Notification>,
}

/// Creates a new ticket in `Pending` status, routing it to a supervisor
/// when an assignment rule matches the category and shift.
///
/// A missing rule is not an error: the ticket is created unassigned and
/// the result flags it so the caller can surface a non-blocking notice.
///
/// # Errors
///
/// Returns a validation error for an empty title or description, or an
/// illegal-transition error when the acting role may not open tickets.
pub fn create(
    actor: &Principal,
    input: &CreateTicket,
    category: Category,
    rules: &AssignmentRules,
    now: OffsetDateTime,
) -> Result<CreationResult, CoreError> {
    if matches!(actor.role, Role::Supervisor | Role::Operator) {
        return Err(CoreError::IllegalTransition {
            from: TicketStatus::Pending,
            action: String::from("create"),
            reason: String::from("only requesters may open tickets"),
        });
    }
    validate_ticket_fields(&input.title, &input.description)?;

    let supervisor: Option<PersonRef> = rules.resolve(category.value(), input.shift).cloned();
    let unrouted: bool = supervisor.is_none();

    let ticket: Ticket = Ticket::new(
        input.title.trim().to_string(),
        input.description.trim().to_string(),
        category,
        actor.as_person_ref(),
        supervisor,
        now,
    );

    tracing::info!(
        creator = %actor.username,
        category = %ticket.category.value(),
        shift = %input.shift,
        routed = !unrouted,
        "ticket created"
    );

    let history: HistoryEntry = HistoryEntry::new(
        None,
        now,
        HistoryActor::of(actor),
        ChangeType::Creation,
        TrackedFields::empty(),
        TrackedFields::of(&ticket),
        None,
    );

    let mut notifications: Vec<Notification> = Vec::new();
    if !unrouted {
        notifications.push(Notification::new(
            NotifyAudience::Supervisor,
            NotifyReason::Routed,
        ));
    }

    Ok(CreationResult {
        ticket,
        history,
        notifications,
        unrouted,
    })
}

/// Applies a single command to a ticket, producing the new ticket state,
/// exactly one history entry, and the notification decisions.
///
/// The input ticket is not modified; the caller commits the returned
/// state with a conditional put against `ticket.version`.
///
/// # Errors
///
/// Returns an illegal-transition error when the command is not reachable
/// from the current status or the actor lacks permission, a conflict
/// error for a claim on an already-claimed ticket, and a validation error
/// for malformed input such as an empty note.
pub fn apply(
    actor: &Principal,
    ticket: &Ticket,
    command: &TicketCommand,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    if ticket.status.is_terminal() {
        return Err(illegal(
            ticket.status,
            command.action_name(),
            "closed tickets accept no further changes",
        ));
    }

    let old_values: TrackedFields = TrackedFields::of(ticket);
    let mut next: Ticket = ticket.clone();
    let mut note_added: bool = false;

    let (change_type, details) = match command {
        TicketCommand::Claim => apply_claim(actor, &mut next)?,
        TicketCommand::AssignOperator { operator } => {
            apply_assign(actor, ticket, &mut next, operator)?
        }
        TicketCommand::UpdateStatus { status, note } => {
            apply_update_status(actor, ticket, &mut next, *status, note.as_deref(), now)?
        }
        TicketCommand::Reject { note } => apply_reject(actor, ticket, &mut next, note)?,
        TicketCommand::Close => apply_close(actor, ticket, &mut next, now)?,
        TicketCommand::AddNote { note } => {
            let outcome = apply_add_note(actor, ticket, &mut next, note, now)?;
            note_added = true;
            outcome
        }
        TicketCommand::Edit(edit) => apply_edit(actor, ticket, &mut next, edit, now)?,
    };

    next.modified_at = now;
    next.version = ticket.version + 1;

    let new_values: TrackedFields = TrackedFields::of(&next);
    let changes = TrackedFields::diff(&old_values, &new_values);
    let notifications: Vec<Notification> = notify::evaluate_notifications(
        ticket.status,
        next.status,
        &changes,
        note_added,
        next.operator.is_some(),
    );

    tracing::debug!(
        ticket_id = ?ticket.ticket_id,
        actor = %actor.username,
        action = command.action_name(),
        from = %ticket.status,
        to = %next.status,
        "ticket transition applied"
    );

    let history: HistoryEntry = HistoryEntry::new(
        ticket.ticket_id,
        now,
        HistoryActor::of(actor),
        change_type,
        old_values,
        new_values,
        details,
    );

    Ok(TransitionResult {
        ticket: next,
        history,
        notifications,
    })
}

type StepOutcome = (ChangeType, Option<String>);

fn apply_claim(actor: &Principal, next: &mut Ticket) -> Result<StepOutcome, CoreError> {
    if actor.role != Role::Supervisor && !actor.is_admin() {
        return Err(illegal(
            next.status,
            "claim",
            "only supervisors may claim tickets",
        ));
    }
    if next.supervisor.is_some() {
        return Err(CoreError::Conflict {
            reason: String::from("ticket already has a supervisor"),
        });
    }
    next.supervisor = Some(actor.as_person_ref());
    Ok((ChangeType::Claim, None))
}

fn apply_assign(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    operator: &PersonRef,
) -> Result<StepOutcome, CoreError> {
    let owns_ticket: bool =
        actor.role == Role::Supervisor && ticket.is_assigned_supervisor(actor.person_id);
    if !owns_ticket && !actor.is_admin() {
        return Err(illegal(
            ticket.status,
            "assign operator",
            "only the ticket's supervisor may assign an operator",
        ));
    }
    if !ticket.status.is_editable() {
        return Err(illegal(
            ticket.status,
            "assign operator",
            "operators can only be assigned while the ticket is open",
        ));
    }
    next.operator = Some(operator.clone());
    next.status = TicketStatus::InProgress;
    next.completed_at = None;
    Ok((ChangeType::Assignment, None))
}

fn apply_update_status(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    status: TicketStatus,
    note: Option<&str>,
    now: OffsetDateTime,
) -> Result<StepOutcome, CoreError> {
    let is_assigned: bool =
        actor.role == Role::Operator && ticket.is_assigned_operator(actor.person_id);
    if !is_assigned && !actor.is_admin() {
        return Err(illegal(
            ticket.status,
            "update status",
            "only the assigned operator may record an outcome",
        ));
    }
    if !ticket.status.is_editable() {
        return Err(illegal(
            ticket.status,
            "update status",
            "the ticket is no longer editable by the operator",
        ));
    }
    if !status.is_resolved() {
        return Err(illegal(
            ticket.status,
            "update status",
            "operators may only record completed or cancelled outcomes",
        ));
    }
    next.status = status;
    if next.completed_at.is_none() {
        next.completed_at = Some(now);
    }
    if let Some(text) = note {
        validate_note(text)?;
        append_observation(next, actor, text, now);
    }
    Ok((ChangeType::StatusUpdate, note.map(str::to_string)))
}

fn apply_reject(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    note: &str,
) -> Result<StepOutcome, CoreError> {
    if !ticket.is_creator(actor.person_id) {
        return Err(illegal(
            ticket.status,
            "reject resolution",
            "only the ticket's creator may dispute an outcome",
        ));
    }
    if !ticket.status.is_resolved() {
        return Err(illegal(
            ticket.status,
            "reject resolution",
            "only a completed or cancelled outcome can be disputed",
        ));
    }
    validate_note(note)?;
    next.status = TicketStatus::Rejected;
    next.completed_at = None;
    Ok((ChangeType::Rejection, Some(note.trim().to_string())))
}

fn apply_close(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    now: OffsetDateTime,
) -> Result<StepOutcome, CoreError> {
    if !ticket.is_creator(actor.person_id) {
        return Err(illegal(
            ticket.status,
            "close",
            "only the ticket's creator may close it",
        ));
    }
    if !ticket.status.is_closable() {
        return Err(illegal(
            ticket.status,
            "close",
            "only a resolved or rejected ticket can be closed",
        ));
    }
    let confirmation: String = format!(
        "\n\n[{}] Resolution confirmed and ticket closed by {}.",
        format_stamp(now),
        actor.username
    );
    next.description.push_str(&confirmation);
    next.status = TicketStatus::Closed;
    Ok((ChangeType::Closure, None))
}

fn apply_add_note(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    note: &str,
    now: OffsetDateTime,
) -> Result<StepOutcome, CoreError> {
    if !ticket.is_creator(actor.person_id) {
        return Err(illegal(
            ticket.status,
            "add note",
            "only the ticket's creator may add notes",
        ));
    }
    validate_note(note)?;
    let appended: String = format!(
        "\n\n[{}] Note from {}: {}",
        format_stamp(now),
        actor.username,
        note.trim()
    );
    next.description.push_str(&appended);
    Ok((ChangeType::Note, Some(note.trim().to_string())))
}

fn apply_edit(
    actor: &Principal,
    ticket: &Ticket,
    next: &mut Ticket,
    edit: &TicketEdit,
    now: OffsetDateTime,
) -> Result<StepOutcome, CoreError> {
    let supervises: bool = actor.role == Role::Supervisor
        && (ticket.supervisor.is_none() || ticket.is_assigned_supervisor(actor.person_id));
    if !supervises && !actor.is_admin() {
        return Err(illegal(
            ticket.status,
            "edit",
            "only the ticket's supervisor or an administrator may edit it",
        ));
    }
    if edit.is_empty() {
        return Err(CoreError::Validation {
            message: String::from("edit changes nothing"),
        });
    }
    if let Some(category) = &edit.category {
        next.category = category.clone();
    }
    if let Some(description) = &edit.description {
        validate_ticket_fields(&next.title, description)?;
        next.description = description.trim().to_string();
    }
    if let Some(observation) = &edit.observation {
        next.observation = observation.trim().to_string();
    }
    if let Some(operator) = &edit.operator {
        next.operator = operator.clone();
    }
    let mut reopened: bool = false;
    if let Some(status) = edit.status {
        if status.is_terminal() {
            return Err(illegal(
                ticket.status,
                "edit",
                "closing a ticket requires the creator's confirmation",
            ));
        }
        next.status = status;
        if status.is_resolved() {
            if next.completed_at.is_none() {
                next.completed_at = Some(now);
            }
        } else {
            reopened = ticket.status.is_resolved();
            next.completed_at = None;
        }
    }
    let change_type: ChangeType = if reopened {
        ChangeType::Reopened
    } else {
        ChangeType::Edit
    };
    Ok((change_type, None))
}

fn append_observation(next: &mut Ticket, actor: &Principal, text: &str, now: OffsetDateTime) {
    let entry: String = format!("[{}] {}: {}", format_stamp(now), actor.username, text.trim());
    if next.observation.is_empty() {
        next.observation = entry;
    } else {
        next.observation.push('\n');
        next.observation.push_str(&entry);
    }
}

fn format_stamp(now: OffsetDateTime) -> String {
    now.format(&Rfc3339).unwrap_or_else(|_| now.to_string())
}

fn illegal(from: TicketStatus, action: &str, reason: &str) -> CoreError {
    CoreError::IllegalTransition {
        from,
        action: action.to_string(),
        reason: reason.to_string(),
    }
}
