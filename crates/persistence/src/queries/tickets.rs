// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ticket queries: point lookup, role-scoped scans, and the history
//! timeline.
//!
//! The scan pushes the role-scope predicate down into SQL and applies the
//! remaining user filters through `TicketQuery::matches`, so the scope can
//! never be widened by filter input.

use diesel::SqliteConnection;
use diesel::prelude::*;

use ops_ticket::{RoleScope, TicketQuery, sort_listing};
use ops_ticket_audit::HistoryEntry;
use ops_ticket_domain::Ticket;

use crate::data_models::{HistoryRow, TicketRow, history_from_row, ticket_from_row};
use crate::diesel_schema::{categories, ticket_history, tickets};
use crate::error::PersistenceError;

/// Retrieves a single ticket by id, with its category joined in.
///
/// # Errors
///
/// Returns `TicketNotFound` when no ticket has the given id.
pub fn get_ticket(conn: &mut SqliteConnection, ticket_id: i64) -> Result<Ticket, PersistenceError> {
    let result = tickets::table
        .inner_join(categories::table)
        .filter(tickets::ticket_id.eq(ticket_id))
        .select((TicketRow::as_select(), categories::name, categories::value))
        .first::<(TicketRow, String, String)>(conn);

    let (row, category_name, category_value): (TicketRow, String, String) = match result {
        Ok(r) => r,
        Err(diesel::result::Error::NotFound) => {
            return Err(PersistenceError::TicketNotFound(ticket_id));
        }
        Err(e) => return Err(PersistenceError::from(e)),
    };

    ticket_from_row(row, category_name, category_value)
}

/// Scans tickets visible under the query's role scope, applies the user
/// filters, and returns the listing newest-first.
///
/// # Errors
///
/// Returns an error if the scan fails or a stored row is corrupt.
pub fn scan_tickets(
    conn: &mut SqliteConnection,
    query: &TicketQuery,
) -> Result<Vec<Ticket>, PersistenceError> {
    let mut scan = tickets::table
        .inner_join(categories::table)
        .select((TicketRow::as_select(), categories::name, categories::value))
        .into_boxed();

    scan = match query.scope {
        RoleScope::Creator { person_id } => scan.filter(tickets::creator_id.eq(person_id)),
        RoleScope::AssignedOperator { person_id } => {
            scan.filter(tickets::operator_id.eq(person_id))
        }
        RoleScope::SupervisorOrUnassigned { person_id } => scan.filter(
            tickets::supervisor_id
                .eq(person_id)
                .or(tickets::supervisor_id.is_null()),
        ),
        RoleScope::Unrestricted => scan,
    };

    let rows: Vec<(TicketRow, String, String)> =
        scan.load::<(TicketRow, String, String)>(conn)?;

    let mut listing: Vec<Ticket> = Vec::with_capacity(rows.len());
    for (row, category_name, category_value) in rows {
        let ticket: Ticket = ticket_from_row(row, category_name, category_value)?;
        if query.matches(&ticket) {
            listing.push(ticket);
        }
    }
    sort_listing(&mut listing);
    Ok(listing)
}

/// Retrieves the history timeline of a ticket, newest entry first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored entry is corrupt.
pub fn list_history(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let rows: Vec<HistoryRow> = ticket_history::table
        .filter(ticket_history::ticket_id.eq(ticket_id))
        .order((
            ticket_history::changed_at.desc(),
            ticket_history::history_id.desc(),
        ))
        .select(HistoryRow::as_select())
        .load::<HistoryRow>(conn)?;

    rows.into_iter().map(history_from_row).collect()
}
