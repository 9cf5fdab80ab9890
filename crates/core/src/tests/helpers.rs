// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ops_ticket_domain::{Category, PersonRef, Principal, Role, Shift, Ticket};
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

pub fn admin() -> Principal {
    Principal::new(5, String::from("root"), Role::Administrator).unwrap()
}

pub fn network_category() -> Category {
    Category::with_id(10, String::from("Network"), String::from("network"))
}

pub fn operator_ref() -> PersonRef {
    PersonRef::new(4, String::from("diego"))
}

/// A persisted pending ticket created by the requester, unassigned.
pub fn pending_ticket() -> Ticket {
    let mut ticket: Ticket = Ticket::new(
        String::from("Switch port down"),
        String::from("Port 12 on the floor switch has no link."),
        network_category(),
        requester().as_person_ref(),
        None,
        base_time(),
    );
    ticket.ticket_id = Some(100);
    ticket
}

/// A pending ticket already claimed by [`supervisor`].
pub fn claimed_ticket() -> Ticket {
    let mut ticket: Ticket = pending_ticket();
    ticket.supervisor = Some(supervisor().as_person_ref());
    ticket
}

/// An in-progress ticket claimed by [`supervisor`] and assigned to
/// [`operator`].
pub fn assigned_ticket() -> Ticket {
    let mut ticket: Ticket = claimed_ticket();
    ticket.operator = Some(operator_ref());
    ticket.status = ops_ticket_domain::TicketStatus::InProgress;
    ticket
}

pub fn shift() -> Shift {
    Shift::WeekdayMorning
}
