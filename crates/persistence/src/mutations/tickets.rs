// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket mutations: creation inserts and the conditional-put commit.
//!
//! Both paths write the ticket and its history entry inside a single
//! transaction, so a failed history append rolls back the state write.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use ops_ticket::{CreationResult, TransitionResult};
use ops_ticket_audit::HistoryEntry;
use ops_ticket_domain::Ticket;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{format_timestamp, new_history_row, new_ticket_row};
use crate::diesel_schema::{ticket_history, tickets};
use crate::error::PersistenceError;
use crate::queries::catalog::resolve_category_id;

/// Inserts a freshly created ticket together with its creation history
/// entry, returning both with their assigned ids.
///
/// # Errors
///
/// Returns an error if the category cannot be resolved or the insert
/// fails.
pub fn insert_ticket(
    conn: &mut SqliteConnection,
    creation: &CreationResult,
) -> Result<(Ticket, HistoryEntry), PersistenceError> {
    conn.transaction(|conn| {
        let category_id: i64 = resolve_category_id(conn, &creation.ticket.category)?;

        let row = new_ticket_row(&creation.ticket, category_id)?;
        diesel::insert_into(tickets::table)
            .values(&row)
            .execute(conn)?;
        let ticket_id: i64 = get_last_insert_rowid(conn)?;

        let history_row = new_history_row(&creation.history, ticket_id)?;
        diesel::insert_into(ticket_history::table)
            .values(&history_row)
            .execute(conn)?;
        let history_id: i64 = get_last_insert_rowid(conn)?;

        debug!(ticket_id, "ticket inserted");

        let mut ticket: Ticket = creation.ticket.clone();
        ticket.ticket_id = Some(ticket_id);
        let mut history: HistoryEntry = creation.history.clone();
        history.history_id = Some(history_id);
        history.ticket_id = Some(ticket_id);

        Ok((ticket, history))
    })
}

/// Commits a transition with a conditional put: the update only applies
/// if the stored version still equals the version the transition was
/// computed from. A concurrent writer makes the put fail with a version
/// conflict instead of silently overwriting.
///
/// # Errors
///
/// Returns `VersionConflict` when the stored version moved, and
/// `TicketNotFound` when the ticket no longer exists.
pub fn commit_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<(Ticket, HistoryEntry), PersistenceError> {
    let ticket_id: i64 = result
        .ticket
        .ticket_id
        .ok_or_else(|| PersistenceError::Other("transition on unpersisted ticket".to_string()))?;
    let expected_version: i64 = result.ticket.version - 1;

    conn.transaction(|conn| {
        let category_id: i64 = resolve_category_id(conn, &result.ticket.category)?;

        let updated: usize = diesel::update(
            tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .filter(tickets::version.eq(expected_version)),
        )
        .set((
            tickets::description.eq(&result.ticket.description),
            tickets::category_id.eq(category_id),
            tickets::status.eq(result.ticket.status.as_str()),
            tickets::supervisor_id.eq(result.ticket.supervisor.as_ref().map(|p| p.person_id)),
            tickets::supervisor_name
                .eq(result.ticket.supervisor.as_ref().map(|p| p.username.clone())),
            tickets::operator_id.eq(result.ticket.operator.as_ref().map(|p| p.person_id)),
            tickets::operator_name.eq(result.ticket.operator.as_ref().map(|p| p.username.clone())),
            tickets::modified_at.eq(format_timestamp(result.ticket.modified_at)?),
            tickets::completed_at.eq(result
                .ticket
                .completed_at
                .map(format_timestamp)
                .transpose()?),
            tickets::observation.eq(&result.ticket.observation),
            tickets::version.eq(result.ticket.version),
        ))
        .execute(conn)?;

        if updated == 0 {
            let exists: i64 = tickets::table
                .filter(tickets::ticket_id.eq(ticket_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(PersistenceError::TicketNotFound(ticket_id));
            }
            return Err(PersistenceError::VersionConflict {
                ticket_id,
                expected: expected_version,
            });
        }

        let history_row = new_history_row(&result.history, ticket_id)?;
        diesel::insert_into(ticket_history::table)
            .values(&history_row)
            .execute(conn)?;
        let history_id: i64 = get_last_insert_rowid(conn)?;

        debug!(
            ticket_id,
            version = result.ticket.version,
            "ticket transition committed"
        );

        let mut history: HistoryEntry = result.history.clone();
        history.history_id = Some(history_id);
        history.ticket_id = Some(ticket_id);

        Ok((result.ticket.clone(), history))
    })
}
