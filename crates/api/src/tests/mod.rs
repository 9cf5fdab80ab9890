// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod catalog_tests;

use std::cell::RefCell;

use ops_ticket_domain::{Principal, Role};
use ops_ticket_persistence::Persistence;

use crate::handlers;
use crate::notify::{NotificationMessage, NotificationSink};
use crate::request_response::{
    CreateCategoryRequest, CreateRuleRequest, CreateTicketRequest, CreateTicketResponse,
};

pub fn requester() -> Principal {
    Principal::new(1, String::from("alice"), Role::Requester).unwrap()
}

pub fn other_requester() -> Principal {
    Principal::new(6, String::from("elena"), Role::Requester).unwrap()
}

pub fn supervisor() -> Principal {
    Principal::new(2, String::from("bruno"), Role::Supervisor).unwrap()
}

pub fn operator() -> Principal {
    Principal::new(4, String::from("diego"), Role::Operator).unwrap()
}

pub fn admin() -> Principal {
    Principal::new(5, String::from("root"), Role::Administrator).unwrap()
}

/// A sink that records every delivered message for assertion.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub delivered: RefCell<Vec<NotificationMessage>>,
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, message: &NotificationMessage) -> Result<(), String> {
        self.delivered.borrow_mut().push(message.clone());
        Ok(())
    }
}

impl RecordingSink {
    pub fn templates(&self) -> Vec<&'static str> {
        self.delivered
            .borrow()
            .iter()
            .map(|message| message.template)
            .collect()
    }
}

/// A fresh store with one category ("Network") created by the admin.
pub fn seeded_store() -> Persistence {
    let mut store: Persistence = Persistence::new_in_memory().expect("in-memory store");
    handlers::create_category(
        &mut store,
        &admin(),
        &CreateCategoryRequest {
            name: String::from("Network"),
        },
    )
    .expect("category created");
    store
}

/// Routes weekday-morning network tickets to bruno.
pub fn route_network_to_bruno(store: &mut Persistence) {
    handlers::create_rule(
        store,
        &admin(),
        &CreateRuleRequest {
            category: String::from("network"),
            shift: String::from("weekday_morning"),
            supervisor_id: 2,
            supervisor_name: String::from("bruno"),
        },
    )
    .expect("rule created");
}

pub fn ticket_request() -> CreateTicketRequest {
    CreateTicketRequest {
        title: String::from("Switch port down"),
        description: String::from("Port 12 on the floor switch has no link."),
        category: String::from("network"),
        shift: String::from("weekday_morning"),
    }
}

/// Opens a ticket as alice, returning the full creation response.
pub fn open_ticket(store: &mut Persistence, sink: &dyn NotificationSink) -> CreateTicketResponse {
    handlers::create_ticket(store, &requester(), sink, &ticket_request()).expect("ticket opened")
}
