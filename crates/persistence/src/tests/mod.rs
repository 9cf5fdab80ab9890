// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod ticket_roundtrip_tests;

use crate::Persistence;
use ops_ticket::{AssignmentRules, CreateTicket, CreationResult};
use ops_ticket_domain::{Category, Principal, Role, Shift, Ticket};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-03-01 10:00:00 UTC)
}

pub fn requester() -> Principal {
    Principal::new(1, String::from("alice"), Role::Requester).unwrap()
}

pub fn supervisor() -> Principal {
    Principal::new(2, String::from("bruno"), Role::Supervisor).unwrap()
}

pub fn other_supervisor() -> Principal {
    Principal::new(3, String::from("carla"), Role::Supervisor).unwrap()
}

pub fn operator() -> Principal {
    Principal::new(4, String::from("diego"), Role::Operator).unwrap()
}

/// A fresh in-memory store with one category ("Network") already created.
pub fn store_with_category() -> (Persistence, Category) {
    let mut store: Persistence = Persistence::new_in_memory().expect("in-memory store");
    let category: Category = store
        .create_category(&Category::new("Network").unwrap())
        .expect("category created");
    (store, category)
}

/// Creates and persists a pending ticket in the given category, returning
/// the stored ticket.
pub fn persist_pending_ticket(store: &mut Persistence, category: &Category) -> Ticket {
    let creation: CreationResult = ops_ticket::create(
        &requester(),
        &CreateTicket {
            title: String::from("Switch port down"),
            description: String::from("Port 12 on the floor switch has no link."),
            category: category.value().to_string(),
            shift: Shift::WeekdayMorning,
        },
        category.clone(),
        &AssignmentRules::default(),
        base_time(),
    )
    .expect("creation applies");
    let (ticket, _history) = store.insert_ticket(&creation).expect("ticket persisted");
    ticket
}
