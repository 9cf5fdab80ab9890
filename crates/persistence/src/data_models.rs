// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row structs and their conversions to and from domain types.
//!
//! Timestamps are stored as RFC 3339 text, enums as their wire strings,
//! and history snapshots as JSON. Conversion failures surface as
//! `CorruptRecord` rather than panicking.

use diesel::prelude::*;
use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use ops_ticket_audit::{ChangeType, HistoryActor, HistoryEntry};
use ops_ticket_domain::{
    AssignmentRule, Category, PersonRef, Role, Shift, Ticket, TicketStatus, TrackedFields,
};

use crate::diesel_schema::{assignment_rules, categories, ticket_history, tickets};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub status: String,
    pub creator_id: i64,
    pub creator_name: String,
    pub supervisor_id: Option<i64>,
    pub supervisor_name: Option<String>,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub created_at: String,
    pub modified_at: String,
    pub completed_at: Option<String>,
    pub observation: String,
    pub version: i64,
}

#[derive(Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow {
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub status: String,
    pub creator_id: i64,
    pub creator_name: String,
    pub supervisor_id: Option<i64>,
    pub supervisor_name: Option<String>,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub created_at: String,
    pub modified_at: String,
    pub completed_at: Option<String>,
    pub observation: String,
    pub version: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = ticket_history)]
pub struct HistoryRow {
    pub history_id: i64,
    pub ticket_id: i64,
    pub changed_at: String,
    pub actor_id: i64,
    pub actor_name: String,
    pub actor_role: String,
    pub change_type: String,
    pub old_values_json: String,
    pub new_values_json: String,
    pub details: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = ticket_history)]
pub struct NewHistoryRow {
    pub ticket_id: i64,
    pub changed_at: String,
    pub actor_id: i64,
    pub actor_name: String,
    pub actor_role: String,
    pub change_type: String,
    pub old_values_json: String,
    pub new_values_json: String,
    pub details: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = categories)]
pub struct CategoryRow {
    pub category_id: i64,
    pub name: String,
    pub value: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignment_rules)]
pub struct RuleRow {
    pub rule_id: i64,
    pub category_value: String,
    pub shift: String,
    pub supervisor_id: i64,
    pub supervisor_name: String,
}

#[derive(Insertable)]
#[diesel(table_name = assignment_rules)]
pub struct NewRuleRow {
    pub category_value: String,
    pub shift: String,
    pub supervisor_id: i64,
    pub supervisor_name: String,
}

pub fn format_timestamp(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(text, &Rfc3339)
        .map_err(|e| PersistenceError::CorruptRecord(format!("bad timestamp '{text}': {e}")))
}

fn person_from_columns(id: Option<i64>, name: Option<String>) -> Option<PersonRef> {
    match (id, name) {
        (Some(person_id), Some(username)) => Some(PersonRef::new(person_id, username)),
        _ => None,
    }
}

/// Reassembles a domain `Ticket` from its row and joined category columns.
///
/// # Errors
///
/// Returns `CorruptRecord` if a stored status or timestamp fails to parse.
pub fn ticket_from_row(
    row: TicketRow,
    category_name: String,
    category_value: String,
) -> Result<Ticket, PersistenceError> {
    let status: TicketStatus = TicketStatus::from_str(&row.status)
        .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
    let completed_at: Option<OffsetDateTime> = row
        .completed_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    Ok(Ticket {
        ticket_id: Some(row.ticket_id),
        title: row.title,
        description: row.description,
        category: Category::with_id(row.category_id, category_name, category_value),
        status,
        creator: PersonRef::new(row.creator_id, row.creator_name),
        supervisor: person_from_columns(row.supervisor_id, row.supervisor_name),
        operator: person_from_columns(row.operator_id, row.operator_name),
        created_at: parse_timestamp(&row.created_at)?,
        modified_at: parse_timestamp(&row.modified_at)?,
        completed_at,
        observation: row.observation,
        version: row.version,
    })
}

/// Flattens a domain `Ticket` into an insertable row.
///
/// # Errors
///
/// Returns an error if a timestamp cannot be formatted.
pub fn new_ticket_row(ticket: &Ticket, category_id: i64) -> Result<NewTicketRow, PersistenceError> {
    Ok(NewTicketRow {
        title: ticket.title.clone(),
        description: ticket.description.clone(),
        category_id,
        status: ticket.status.as_str().to_string(),
        creator_id: ticket.creator.person_id,
        creator_name: ticket.creator.username.clone(),
        supervisor_id: ticket.supervisor.as_ref().map(|p| p.person_id),
        supervisor_name: ticket.supervisor.as_ref().map(|p| p.username.clone()),
        operator_id: ticket.operator.as_ref().map(|p| p.person_id),
        operator_name: ticket.operator.as_ref().map(|p| p.username.clone()),
        created_at: format_timestamp(ticket.created_at)?,
        modified_at: format_timestamp(ticket.modified_at)?,
        completed_at: ticket.completed_at.map(format_timestamp).transpose()?,
        observation: ticket.observation.clone(),
        version: ticket.version,
    })
}

/// Reassembles a `HistoryEntry` from its row, deserializing the snapshot
/// JSON columns.
///
/// # Errors
///
/// Returns `CorruptRecord` for an unknown change type, actor role, or
/// timestamp; serialization errors for malformed snapshot JSON.
pub fn history_from_row(row: HistoryRow) -> Result<HistoryEntry, PersistenceError> {
    let change_type: ChangeType = ChangeType::parse(&row.change_type).ok_or_else(|| {
        PersistenceError::CorruptRecord(format!("unknown change type '{}'", row.change_type))
    })?;
    let role: Role = Role::from_str(&row.actor_role)
        .map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
    let old_values: TrackedFields = serde_json::from_str(&row.old_values_json)?;
    let new_values: TrackedFields = serde_json::from_str(&row.new_values_json)?;

    Ok(HistoryEntry {
        history_id: Some(row.history_id),
        ticket_id: Some(row.ticket_id),
        changed_at: parse_timestamp(&row.changed_at)?,
        actor: HistoryActor::new(row.actor_id, row.actor_name, role),
        change_type,
        old_values,
        new_values,
        details: row.details,
    })
}

/// Flattens a `HistoryEntry` into an insertable row for the given ticket.
///
/// # Errors
///
/// Returns an error if a snapshot fails to serialize or a timestamp fails
/// to format.
pub fn new_history_row(
    entry: &HistoryEntry,
    ticket_id: i64,
) -> Result<NewHistoryRow, PersistenceError> {
    Ok(NewHistoryRow {
        ticket_id,
        changed_at: format_timestamp(entry.changed_at)?,
        actor_id: entry.actor.person_id,
        actor_name: entry.actor.username.clone(),
        actor_role: entry.actor.role.as_str().to_string(),
        change_type: entry.change_type.as_str().to_string(),
        old_values_json: serde_json::to_string(&entry.old_values)?,
        new_values_json: serde_json::to_string(&entry.new_values)?,
        details: entry.details.clone(),
    })
}

pub fn category_from_row(row: CategoryRow) -> Category {
    Category::with_id(row.category_id, row.name, row.value)
}

/// Reassembles an `AssignmentRule` from its row.
///
/// # Errors
///
/// Returns `CorruptRecord` for an unknown shift code.
pub fn rule_from_row(row: RuleRow) -> Result<AssignmentRule, PersistenceError> {
    let shift: Shift =
        Shift::from_str(&row.shift).map_err(|e| PersistenceError::CorruptRecord(e.to_string()))?;
    Ok(AssignmentRule::with_id(
        row.rule_id,
        row.category_value,
        shift,
        PersonRef::new(row.supervisor_id, row.supervisor_name),
    ))
}
