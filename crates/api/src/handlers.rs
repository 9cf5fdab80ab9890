// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API entry points.
//!
//! Each handler follows the same shape: parse and validate the request,
//! run the core engine against the current stored state, commit through
//! the conditional put, then hand notification decisions to the sink.
//! Handlers never hold state between calls; the acting principal arrives
//! fully formed from the transport layer.

use std::str::FromStr;

use time::{Date, OffsetDateTime};
use tracing::info;

use ops_ticket::{
    AssignmentRules, CreateTicket, CreationResult, RoleScope, TicketCommand, TicketEdit,
    TicketFilter, TicketQuery, TransitionResult,
};
use ops_ticket_audit::HistoryEntry;
use ops_ticket_domain::{AssignmentRule, Category, PersonRef, Principal, Shift, Ticket, TicketStatus};
use ops_ticket_persistence::Persistence;

use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::export;
use crate::notify::{NotificationSink, dispatch_notifications};
use crate::request_response::{
    AddNoteRequest, AssignOperatorRequest, CategoryInfo, CreateCategoryRequest,
    CreateRuleRequest, CreateTicketRequest, CreateTicketResponse, EditTicketRequest,
    HistoryEntryInfo, ListTicketsRequest, RejectRequest, RuleInfo, TicketInfo,
    UpdateStatusRequest,
};

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

fn require_admin(actor: &Principal, action: &str) -> Result<(), ApiError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized {
            action: action.to_string(),
            reason: String::from("administrator role required"),
        })
    }
}

fn parse_shift(value: &str) -> Result<Shift, ApiError> {
    Shift::from_str(value).map_err(|e| ApiError::InvalidInput {
        field: String::from("shift"),
        message: e.to_string(),
    })
}

fn parse_status(value: &str) -> Result<TicketStatus, ApiError> {
    TicketStatus::from_str(value).map_err(|e| ApiError::InvalidInput {
        field: String::from("status"),
        message: e.to_string(),
    })
}

fn person_from_parts(id: i64, name: &str, field: &str) -> Result<PersonRef, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("name cannot be empty"),
        });
    }
    Ok(PersonRef::new(id, name.trim().to_string()))
}

/// Runs one lifecycle command against the stored ticket and commits the
/// outcome. The conditional put turns a lost race into a `Conflict` the
/// caller can retry after re-reading.
fn run_transition(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    command: TicketCommand,
) -> Result<TicketInfo, ApiError> {
    let ticket: Ticket = store
        .get_ticket(ticket_id)
        .map_err(translate_persistence_error)?;
    let result: TransitionResult =
        ops_ticket::apply(actor, &ticket, &command, OffsetDateTime::now_utc())
            .map_err(translate_core_error)?;
    let (stored, _entry) = store
        .commit_transition(&result)
        .map_err(translate_persistence_error)?;
    dispatch_notifications(sink, &stored, &result.notifications);
    Ok(TicketInfo::of(&stored))
}

/// Creates a new ticket, routing it to a supervisor when an assignment
/// rule matches its category and shift.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown category, `InvalidInput` for
/// a bad shift or empty title/description, and `IllegalTransition` when
/// the acting role may not open tickets.
pub fn create_ticket(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    request: &CreateTicketRequest,
) -> Result<CreateTicketResponse, ApiError> {
    let shift: Shift = parse_shift(&request.shift)?;
    let category: Category = store
        .find_category(&request.category)
        .map_err(translate_persistence_error)?;
    let rules: AssignmentRules =
        AssignmentRules::from_rules(store.load_rules().map_err(translate_persistence_error)?)
            .map_err(translate_core_error)?;

    let input: CreateTicket = CreateTicket {
        title: request.title.clone(),
        description: request.description.clone(),
        category: request.category.clone(),
        shift,
    };
    let creation: CreationResult =
        ops_ticket::create(actor, &input, category, &rules, OffsetDateTime::now_utc())
            .map_err(translate_core_error)?;
    let unrouted: bool = creation.unrouted;

    let (stored, _entry) = store
        .insert_ticket(&creation)
        .map_err(translate_persistence_error)?;
    dispatch_notifications(sink, &stored, &creation.notifications);

    info!(ticket_id = ?stored.ticket_id, creator = %actor.username, "ticket opened");

    Ok(CreateTicketResponse {
        ticket: TicketInfo::of(&stored),
        routing_notice: unrouted.then(|| {
            String::from("no supervisor is configured for this category and shift; the ticket awaits a manual claim")
        }),
    })
}

/// A supervisor takes ownership of an unassigned ticket.
///
/// # Errors
///
/// Returns `Conflict` when another supervisor already owns the ticket and
/// `IllegalTransition` when the acting role may not claim.
pub fn claim_ticket(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
) -> Result<TicketInfo, ApiError> {
    run_transition(store, actor, sink, ticket_id, TicketCommand::Claim)
}

/// The owning supervisor delegates the ticket to an operator, moving it
/// to in-progress.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty operator name and
/// `IllegalTransition` when the actor does not own the ticket or the
/// ticket is not open.
pub fn assign_operator(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    request: &AssignOperatorRequest,
) -> Result<TicketInfo, ApiError> {
    let operator: PersonRef =
        person_from_parts(request.operator_id, &request.operator_name, "operator_name")?;
    run_transition(
        store,
        actor,
        sink,
        ticket_id,
        TicketCommand::AssignOperator { operator },
    )
}

/// The assigned operator records a completed or cancelled outcome.
///
/// # Errors
///
/// Returns `InvalidInput` for a non-resolved target status and
/// `IllegalTransition` when the actor is not the assigned operator.
pub fn update_ticket_status(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    request: &UpdateStatusRequest,
) -> Result<TicketInfo, ApiError> {
    let status: TicketStatus = parse_status(&request.status)?;
    run_transition(
        store,
        actor,
        sink,
        ticket_id,
        TicketCommand::UpdateStatus {
            status,
            note: request.note.clone(),
        },
    )
}

/// The requester disputes a resolved outcome, sending the ticket back to
/// the operator as rejected.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty note and `IllegalTransition` when
/// the actor is not the creator or the ticket is not resolved.
pub fn reject_resolution(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    request: &RejectRequest,
) -> Result<TicketInfo, ApiError> {
    run_transition(
        store,
        actor,
        sink,
        ticket_id,
        TicketCommand::Reject {
            note: request.note.clone(),
        },
    )
}

/// The requester confirms the outcome and closes the ticket for good.
///
/// # Errors
///
/// Returns `IllegalTransition` when the actor is not the creator or the
/// ticket has no confirmable outcome.
pub fn close_ticket(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
) -> Result<TicketInfo, ApiError> {
    run_transition(store, actor, sink, ticket_id, TicketCommand::Close)
}

/// The requester appends a note to their ticket's description.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty note and `IllegalTransition` when
/// the actor is not the creator.
pub fn add_note(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    request: &AddNoteRequest,
) -> Result<TicketInfo, ApiError> {
    run_transition(
        store,
        actor,
        sink,
        ticket_id,
        TicketCommand::AddNote {
            note: request.note.clone(),
        },
    )
}

fn edit_from_request(
    store: &mut Persistence,
    request: &EditTicketRequest,
) -> Result<TicketEdit, ApiError> {
    let category: Option<Category> = match &request.category {
        Some(value) => Some(
            store
                .find_category(value)
                .map_err(translate_persistence_error)?,
        ),
        None => None,
    };
    let status: Option<TicketStatus> = match &request.status {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };
    let operator: Option<Option<PersonRef>> = if request.clear_operator {
        Some(None)
    } else {
        match (request.operator_id, &request.operator_name) {
            (Some(id), Some(name)) => Some(Some(person_from_parts(id, name, "operator_name")?)),
            (None, None) => None,
            _ => {
                return Err(ApiError::InvalidInput {
                    field: String::from("operator_id"),
                    message: String::from(
                        "operator_id and operator_name must be supplied together",
                    ),
                });
            }
        }
    };
    Ok(TicketEdit {
        category,
        status,
        description: request.description.clone(),
        observation: request.observation.clone(),
        operator,
    })
}

/// A supervisor or administrator corrects ticket fields directly.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty edit, `ResourceNotFound` for an
/// unknown replacement category, and `IllegalTransition` when the edit
/// tries to close the ticket or the actor lacks authority over it.
pub fn edit_ticket(
    store: &mut Persistence,
    actor: &Principal,
    sink: &dyn NotificationSink,
    ticket_id: i64,
    request: &EditTicketRequest,
) -> Result<TicketInfo, ApiError> {
    let edit: TicketEdit = edit_from_request(store, request)?;
    run_transition(store, actor, sink, ticket_id, TicketCommand::Edit(edit))
}

/// Retrieves a single ticket the acting principal is allowed to see.
///
/// A ticket outside the principal's visibility scope reads as not found,
/// so point lookups never reveal which ids exist.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the ticket does not exist or is not
/// visible to the actor.
pub fn get_ticket(
    store: &mut Persistence,
    actor: &Principal,
    ticket_id: i64,
) -> Result<TicketInfo, ApiError> {
    let ticket: Ticket = store
        .get_ticket(ticket_id)
        .map_err(translate_persistence_error)?;
    if !RoleScope::for_principal(actor).permits(&ticket) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Ticket"),
            message: format!("Ticket {ticket_id} does not exist"),
        });
    }
    Ok(TicketInfo::of(&ticket))
}

/// Builds the engine filter from the request's string fields. `None`
/// means some supplied value can never match, so the listing is empty
/// without being an error.
fn filter_from_request(request: &ListTicketsRequest) -> Option<TicketFilter> {
    let status: Option<TicketStatus> = match &request.status {
        Some(value) => Some(TicketStatus::from_str(value).ok()?),
        None => None,
    };
    let created_from: Option<Date> = match &request.date_from {
        Some(value) => Some(Date::parse(value, DATE_FORMAT).ok()?),
        None => None,
    };
    let created_to: Option<Date> = match &request.date_to {
        Some(value) => Some(Date::parse(value, DATE_FORMAT).ok()?),
        None => None,
    };
    Some(TicketFilter {
        id_fragment: request.id.clone(),
        title_fragment: request.title.clone(),
        creator_fragment: request.creator.clone(),
        operator_fragment: request.operator.clone(),
        supervisor_fragment: request.supervisor.clone(),
        status,
        category: request.category.clone(),
        created_from,
        created_to,
    })
}

fn scoped_scan(
    store: &mut Persistence,
    actor: &Principal,
    request: &ListTicketsRequest,
) -> Result<Vec<Ticket>, ApiError> {
    let Some(filter) = filter_from_request(request) else {
        return Ok(Vec::new());
    };
    let query: TicketQuery = TicketQuery::build(actor, filter);
    store.scan_tickets(&query).map_err(translate_persistence_error)
}

/// Lists tickets visible to the acting principal, newest first, with
/// optional filters applied inside the role's visibility boundary.
///
/// # Errors
///
/// Returns an error only when the underlying scan fails; unparsable
/// filter values yield an empty listing.
pub fn list_tickets(
    store: &mut Persistence,
    actor: &Principal,
    request: &ListTicketsRequest,
) -> Result<Vec<TicketInfo>, ApiError> {
    let tickets: Vec<Ticket> = scoped_scan(store, actor, request)?;
    Ok(tickets.iter().map(TicketInfo::of).collect())
}

/// Retrieves the change timeline of a visible ticket, newest entry first.
///
/// # Errors
///
/// Returns `ResourceNotFound` when the ticket does not exist or is not
/// visible to the actor.
pub fn list_ticket_history(
    store: &mut Persistence,
    actor: &Principal,
    ticket_id: i64,
) -> Result<Vec<HistoryEntryInfo>, ApiError> {
    // Reuses the point-lookup visibility rule.
    get_ticket(store, actor, ticket_id)?;
    let entries: Vec<HistoryEntry> = store
        .list_history(ticket_id)
        .map_err(translate_persistence_error)?;
    Ok(entries.iter().map(HistoryEntryInfo::of).collect())
}

/// Exports the acting principal's visible ticket listing as CSV, with the
/// same filters a listing accepts.
///
/// # Errors
///
/// Returns `Internal` when CSV rendering fails.
pub fn export_tickets(
    store: &mut Persistence,
    actor: &Principal,
    request: &ListTicketsRequest,
) -> Result<String, ApiError> {
    let tickets: Vec<Ticket> = scoped_scan(store, actor, request)?;
    export::export_tickets_csv(&tickets).map_err(|e| ApiError::Internal {
        message: e.to_string(),
    })
}

/// Lists all categories, ordered by display name. Visible to every role;
/// requesters need the list to open tickets.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_categories(store: &mut Persistence) -> Result<Vec<CategoryInfo>, ApiError> {
    let categories: Vec<Category> = store
        .list_categories()
        .map_err(translate_persistence_error)?;
    Ok(categories.iter().map(CategoryInfo::of).collect())
}

/// Creates a category, deriving its stable internal value from the name.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators, `InvalidInput` for a
/// name that slugifies to nothing, and `Conflict` when the derived value
/// already exists.
pub fn create_category(
    store: &mut Persistence,
    actor: &Principal,
    request: &CreateCategoryRequest,
) -> Result<CategoryInfo, ApiError> {
    require_admin(actor, "create category")?;
    let category: Category = Category::new(&request.name).map_err(|e| ApiError::InvalidInput {
        field: String::from("name"),
        message: e.to_string(),
    })?;
    let stored: Category = store
        .create_category(&category)
        .map_err(translate_persistence_error)?;
    info!(category = %stored.value(), admin = %actor.username, "category created");
    Ok(CategoryInfo::of(&stored))
}

/// Renames a category, re-deriving its internal value from the new name.
/// Tickets keep their category id and recorded history stays as written.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators, `InvalidInput` for a
/// name that slugifies to nothing, `Conflict` when the derived value
/// collides with another category, and `ResourceNotFound` for an
/// unknown category id.
pub fn update_category(
    store: &mut Persistence,
    actor: &Principal,
    category_id: i64,
    request: &CreateCategoryRequest,
) -> Result<CategoryInfo, ApiError> {
    require_admin(actor, "rename category")?;
    let category: Category = Category::new(&request.name).map_err(|e| ApiError::InvalidInput {
        field: String::from("name"),
        message: e.to_string(),
    })?;
    let stored: Category = store
        .update_category(category_id, &category)
        .map_err(translate_persistence_error)?;
    info!(category_id, value = %stored.value(), admin = %actor.username, "category renamed");
    Ok(CategoryInfo::of(&stored))
}

/// Deletes a category that no ticket references.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators and `Conflict` while
/// tickets still reference the category.
pub fn delete_category(
    store: &mut Persistence,
    actor: &Principal,
    category_id: i64,
) -> Result<(), ApiError> {
    require_admin(actor, "delete category")?;
    store
        .delete_category(category_id)
        .map_err(translate_persistence_error)?;
    info!(category_id, admin = %actor.username, "category deleted");
    Ok(())
}

/// Lists every assignment rule in the routing table.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators.
pub fn list_rules(store: &mut Persistence, actor: &Principal) -> Result<Vec<RuleInfo>, ApiError> {
    require_admin(actor, "list assignment rules")?;
    let rules: Vec<AssignmentRule> = store.load_rules().map_err(translate_persistence_error)?;
    Ok(rules.iter().map(RuleInfo::of).collect())
}

/// Creates an assignment rule routing a `(category, shift)` pair to a
/// supervisor. Affects only tickets created after the rule exists.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators, `ResourceNotFound` for
/// an unknown category, and `Conflict` when the pair is already routed.
pub fn create_rule(
    store: &mut Persistence,
    actor: &Principal,
    request: &CreateRuleRequest,
) -> Result<RuleInfo, ApiError> {
    require_admin(actor, "create assignment rule")?;
    let shift: Shift = parse_shift(&request.shift)?;
    let supervisor: PersonRef =
        person_from_parts(request.supervisor_id, &request.supervisor_name, "supervisor_name")?;
    // The category must exist before the pair can be routed.
    let category: Category = store
        .find_category(&request.category)
        .map_err(translate_persistence_error)?;
    let rule: AssignmentRule =
        AssignmentRule::new(category.value().to_string(), shift, supervisor);
    let stored: AssignmentRule = store
        .create_rule(&rule)
        .map_err(translate_persistence_error)?;
    info!(
        rule_id = ?stored.rule_id,
        category = %stored.category_value,
        shift = %stored.shift,
        admin = %actor.username,
        "assignment rule created"
    );
    Ok(RuleInfo::of(&stored))
}

/// Deletes an assignment rule. Existing tickets keep their routing.
///
/// # Errors
///
/// Returns `Unauthorized` for non-administrators and `ResourceNotFound`
/// when no rule has the given id.
pub fn delete_rule(
    store: &mut Persistence,
    actor: &Principal,
    rule_id: i64,
) -> Result<(), ApiError> {
    require_admin(actor, "delete assignment rule")?;
    store
        .delete_rule(rule_id)
        .map_err(translate_persistence_error)?;
    info!(rule_id, admin = %actor.username, "assignment rule deleted");
    Ok(())
}
