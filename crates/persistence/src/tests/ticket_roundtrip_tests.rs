// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the insert and conditional-put paths: tickets and history
//! entries commit together, and stale writers observe a version conflict.

use crate::{Persistence, PersistenceError};
use ops_ticket::{TicketCommand, TransitionResult, apply};
use ops_ticket_audit::ChangeType;
use ops_ticket_domain::{Category, Ticket, TicketStatus};
use time::Duration;

use super::{base_time, persist_pending_ticket, store_with_category, supervisor};

#[test]
fn test_insert_assigns_ids_and_writes_creation_entry() {
    let (mut store, category) = store_with_category();

    let ticket: Ticket = persist_pending_ticket(&mut store, &category);

    let ticket_id: i64 = ticket.ticket_id.expect("id assigned");
    let stored: Ticket = store.get_ticket(ticket_id).expect("ticket readable");
    assert_eq!(stored, ticket);

    let history = store.list_history(ticket_id).expect("history readable");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ChangeType::Creation);
    assert_eq!(history[0].ticket_id, Some(ticket_id));
    assert!(history[0].history_id.is_some());
}

#[test]
fn test_stored_ticket_round_trips_every_field() {
    let (mut store, category) = store_with_category();
    let ticket: Ticket = persist_pending_ticket(&mut store, &category);

    let stored: Ticket = store.get_ticket(ticket.ticket_id.unwrap()).unwrap();

    assert_eq!(stored.title, "Switch port down");
    assert_eq!(stored.category.value(), "network");
    assert_eq!(stored.status, TicketStatus::Pending);
    assert_eq!(stored.creator.username, "alice");
    assert_eq!(stored.created_at, base_time());
    assert!(stored.completed_at.is_none());
    assert_eq!(stored.version, 1);
}

#[test]
fn test_get_unknown_ticket_is_not_found() {
    let (mut store, _category) = store_with_category();

    let result = store.get_ticket(4242);

    assert_eq!(result, Err(PersistenceError::TicketNotFound(4242)));
}

#[test]
fn test_commit_transition_updates_state_and_appends_history() {
    let (mut store, category) = store_with_category();
    let ticket: Ticket = persist_pending_ticket(&mut store, &category);

    let transition: TransitionResult = apply(
        &supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time() + Duration::minutes(5),
    )
    .expect("claim applies");
    store.commit_transition(&transition).expect("commit succeeds");

    let stored: Ticket = store.get_ticket(ticket.ticket_id.unwrap()).unwrap();
    assert_eq!(stored.supervisor, Some(supervisor().as_person_ref()));
    assert_eq!(stored.version, 2);

    let history = store.list_history(ticket.ticket_id.unwrap()).unwrap();
    assert_eq!(history.len(), 2);
    // Newest first.
    assert_eq!(history[0].change_type, ChangeType::Claim);
    assert_eq!(history[1].change_type, ChangeType::Creation);
}

#[test]
fn test_stale_commit_is_a_version_conflict() {
    let (mut store, category) = store_with_category();
    let ticket: Ticket = persist_pending_ticket(&mut store, &category);

    // Two supervisors claim from the same prior state.
    let first: TransitionResult = apply(
        &supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time() + Duration::minutes(1),
    )
    .unwrap();
    let second: TransitionResult = apply(
        &super::other_supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time() + Duration::minutes(1),
    )
    .unwrap();

    store.commit_transition(&first).expect("first wins");
    let result = store.commit_transition(&second);

    assert_eq!(
        result,
        Err(PersistenceError::VersionConflict {
            ticket_id: ticket.ticket_id.unwrap(),
            expected: 1,
        })
    );

    // The loser left no trace: state and history are from the winner only.
    let stored: Ticket = store.get_ticket(ticket.ticket_id.unwrap()).unwrap();
    assert_eq!(stored.version, 2);
    let history = store.list_history(ticket.ticket_id.unwrap()).unwrap();
    assert_eq!(history.len(), 2);
}

#[test]
fn test_commit_on_missing_ticket_reports_not_found() {
    let (mut store, category) = store_with_category();
    let mut ticket: Ticket = persist_pending_ticket(&mut store, &category);
    // Point the transition at a ticket id that was never inserted.
    ticket.ticket_id = Some(999);

    let transition: TransitionResult = apply(
        &supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time() + Duration::minutes(1),
    )
    .unwrap();
    let result = store.commit_transition(&transition);

    assert_eq!(result, Err(PersistenceError::TicketNotFound(999)));
}

#[test]
fn test_history_snapshots_survive_the_round_trip() {
    let (mut store, category) = store_with_category();
    let ticket: Ticket = persist_pending_ticket(&mut store, &category);

    let transition: TransitionResult = apply(
        &supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time() + Duration::minutes(5),
    )
    .unwrap();
    store.commit_transition(&transition).unwrap();

    let history = store.list_history(ticket.ticket_id.unwrap()).unwrap();
    let claim = &history[0];
    assert_eq!(claim.old_values, transition.history.old_values);
    assert_eq!(claim.new_values, transition.history.new_values);
    assert_eq!(claim.actor.username, "bruno");
}

#[test]
fn test_unknown_category_fails_the_insert() {
    let mut store: Persistence = Persistence::new_in_memory().unwrap();
    // Category never stored.
    let phantom: Category = Category::new("Phantom").unwrap();

    let creation = ops_ticket::create(
        &super::requester(),
        &ops_ticket::CreateTicket {
            title: String::from("t"),
            description: String::from("d"),
            category: phantom.value().to_string(),
            shift: ops_ticket_domain::Shift::WeekdayMorning,
        },
        phantom,
        &ops_ticket::AssignmentRules::default(),
        base_time(),
    )
    .unwrap();

    let result = store.insert_ticket(&creation);

    assert!(matches!(
        result,
        Err(PersistenceError::CategoryNotFound(_))
    ));
}
