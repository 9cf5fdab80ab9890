// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Responses carry timestamps as RFC 3339 strings and enums as their wire
//! values, so transport serialization is a plain serde pass.

use ops_ticket_audit::HistoryEntry;
use ops_ticket_domain::{AssignmentRule, Category, PersonRef, Ticket, TrackedFields};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

fn render_timestamp(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

/// A person reference as it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    /// Identity provider id.
    pub id: i64,
    /// Display name.
    pub username: String,
}

impl PersonInfo {
    fn of(person: &PersonRef) -> Self {
        Self {
            id: person.person_id,
            username: person.username.clone(),
        }
    }
}

/// API request to create a new ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketRequest {
    /// Short summary of the requested work.
    pub title: String,
    /// Full description of the requested work.
    pub description: String,
    /// Category internal value.
    pub category: String,
    /// Shift code (one of the six wire values).
    pub shift: String,
}

/// API response for a successful ticket creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTicketResponse {
    /// The created ticket.
    pub ticket: TicketInfo,
    /// Informational notice when no assignment rule matched. The
    /// creation itself still succeeded.
    pub routing_notice: Option<String>,
}

/// A ticket as it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketInfo {
    /// Canonical ticket id.
    pub ticket_id: i64,
    /// Short summary.
    pub title: String,
    /// Full description, including appended notes.
    pub description: String,
    /// Category display name.
    pub category: String,
    /// Category internal value.
    pub category_value: String,
    /// Status wire value.
    pub status: String,
    /// Status display label.
    pub status_display: String,
    /// The requester who created the ticket.
    pub creator: PersonInfo,
    /// The routing supervisor, when assigned.
    pub supervisor: Option<PersonInfo>,
    /// The working operator, when assigned.
    pub operator: Option<PersonInfo>,
    /// Creation instant, RFC 3339.
    pub created_at: String,
    /// Last mutation instant, RFC 3339.
    pub modified_at: String,
    /// Resolution instant, RFC 3339, when resolved.
    pub completed_at: Option<String>,
    /// Supervisor/operator observation log.
    pub observation: String,
    /// Optimistic concurrency token.
    pub version: i64,
}

impl TicketInfo {
    /// Renders a stored ticket. Unpersisted tickets never reach the API
    /// boundary, so a missing id renders as 0.
    #[must_use]
    pub fn of(ticket: &Ticket) -> Self {
        Self {
            ticket_id: ticket.ticket_id.unwrap_or(0),
            title: ticket.title.clone(),
            description: ticket.description.clone(),
            category: ticket.category.name().to_string(),
            category_value: ticket.category.value().to_string(),
            status: ticket.status.as_str().to_string(),
            status_display: ticket.status.display_name().to_string(),
            creator: PersonInfo::of(&ticket.creator),
            supervisor: ticket.supervisor.as_ref().map(PersonInfo::of),
            operator: ticket.operator.as_ref().map(PersonInfo::of),
            created_at: render_timestamp(ticket.created_at),
            modified_at: render_timestamp(ticket.modified_at),
            completed_at: ticket.completed_at.map(render_timestamp),
            observation: ticket.observation.clone(),
            version: ticket.version,
        }
    }
}

/// API request to assign an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignOperatorRequest {
    /// The operator's identity provider id.
    pub operator_id: i64,
    /// The operator's display name.
    pub operator_name: String,
}

/// API request for an operator outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status wire value. Must be `completed` or `cancelled`.
    pub status: String,
    /// Optional closing remark for the observation log.
    pub note: Option<String>,
}

/// API request to dispute a resolved outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectRequest {
    /// Mandatory reason for the dispute.
    pub note: String,
}

/// API request to append a requester note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNoteRequest {
    /// The note text.
    pub note: String,
}

/// API request for a supervisor/administrator direct edit.
///
/// Absent fields are left unchanged. `clear_operator` unassigns the
/// operator and wins over `operator_id`/`operator_name`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditTicketRequest {
    /// Replacement category internal value.
    pub category: Option<String>,
    /// Replacement status wire value (anything except `closed`).
    pub status: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement observation text. An empty string clears it.
    pub observation: Option<String>,
    /// Replacement operator id.
    pub operator_id: Option<i64>,
    /// Replacement operator display name.
    pub operator_name: Option<String>,
    /// Unassign the current operator.
    #[serde(default)]
    pub clear_operator: bool,
}

/// Optional listing filters, all lenient: an unparsable value simply
/// yields no matches rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListTicketsRequest {
    /// Id to match exactly, or a fragment of the decimal id.
    pub id: Option<String>,
    /// Title fragment, case-insensitive.
    pub title: Option<String>,
    /// Creator name fragment, case-insensitive.
    pub creator: Option<String>,
    /// Operator name fragment, case-insensitive.
    pub operator: Option<String>,
    /// Supervisor name fragment, case-insensitive.
    pub supervisor: Option<String>,
    /// Status wire value.
    pub status: Option<String>,
    /// Category internal value.
    pub category: Option<String>,
    /// Creation window start, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Creation window end, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

/// A history entry as it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntryInfo {
    /// Canonical entry id.
    pub history_id: i64,
    /// When the change was committed, RFC 3339.
    pub changed_at: String,
    /// Display name of the actor.
    pub actor: String,
    /// Role the actor acted under.
    pub actor_role: String,
    /// Change type display label.
    pub change_type: String,
    /// Tracked-field snapshot before the mutation.
    pub old_values: TrackedFields,
    /// Tracked-field snapshot after the mutation.
    pub new_values: TrackedFields,
    /// Optional free text: rejection reason, note body.
    pub details: Option<String>,
}

impl HistoryEntryInfo {
    /// Renders a stored history entry.
    #[must_use]
    pub fn of(entry: &HistoryEntry) -> Self {
        Self {
            history_id: entry.history_id.unwrap_or(0),
            changed_at: render_timestamp(entry.changed_at),
            actor: entry.actor.username.clone(),
            actor_role: entry.actor.role.as_str().to_string(),
            change_type: entry.change_type.as_str().to_string(),
            old_values: entry.old_values.clone(),
            new_values: entry.new_values.clone(),
            details: entry.details.clone(),
        }
    }
}

/// API request to create a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    /// Display name; the internal value is derived from it.
    pub name: String,
}

/// A category as it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Canonical category id.
    pub category_id: i64,
    /// Display name.
    pub name: String,
    /// Stable internal value.
    pub value: String,
}

impl CategoryInfo {
    /// Renders a stored category.
    #[must_use]
    pub fn of(category: &Category) -> Self {
        Self {
            category_id: category.category_id().unwrap_or(0),
            name: category.name().to_string(),
            value: category.value().to_string(),
        }
    }
}

/// API request to create an assignment rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRuleRequest {
    /// Category internal value to route.
    pub category: String,
    /// Shift wire value to route.
    pub shift: String,
    /// The receiving supervisor's id.
    pub supervisor_id: i64,
    /// The receiving supervisor's display name.
    pub supervisor_name: String,
}

/// An assignment rule as it appears in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Canonical rule id.
    pub rule_id: i64,
    /// Routed category internal value.
    pub category: String,
    /// Routed shift wire value.
    pub shift: String,
    /// The receiving supervisor.
    pub supervisor: PersonInfo,
}

impl RuleInfo {
    /// Renders a stored rule.
    #[must_use]
    pub fn of(rule: &AssignmentRule) -> Self {
        Self {
            rule_id: rule.rule_id.unwrap_or(0),
            category: rule.category_value.clone(),
            shift: rule.shift.as_str().to_string(),
            supervisor: PersonInfo::of(&rule.supervisor),
        }
    }
}
