// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, Principal, Role, Shift, TicketStatus};
use std::str::FromStr;

#[test]
fn test_status_round_trips_through_wire_values() {
    for status in [
        TicketStatus::Pending,
        TicketStatus::InProgress,
        TicketStatus::Completed,
        TicketStatus::Cancelled,
        TicketStatus::Rejected,
        TicketStatus::Closed,
    ] {
        let parsed: TicketStatus = TicketStatus::from_str(status.as_str()).unwrap();
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_unknown_status_is_rejected() {
    let result: Result<TicketStatus, DomainError> = TicketStatus::from_str("archived");
    assert!(matches!(result, Err(DomainError::InvalidStatus(_))));
}

#[test]
fn test_editable_set_is_pending_rejected_in_progress() {
    assert!(TicketStatus::Pending.is_editable());
    assert!(TicketStatus::Rejected.is_editable());
    assert!(TicketStatus::InProgress.is_editable());

    assert!(!TicketStatus::Completed.is_editable());
    assert!(!TicketStatus::Cancelled.is_editable());
    assert!(!TicketStatus::Closed.is_editable());
}

#[test]
fn test_resolved_and_terminal_predicates() {
    assert!(TicketStatus::Completed.is_resolved());
    assert!(TicketStatus::Cancelled.is_resolved());
    assert!(!TicketStatus::Rejected.is_resolved());

    assert!(TicketStatus::Closed.is_terminal());
    assert!(!TicketStatus::Completed.is_terminal());
}

#[test]
fn test_closable_from_resolved_or_rejected() {
    assert!(TicketStatus::Completed.is_closable());
    assert!(TicketStatus::Cancelled.is_closable());
    assert!(TicketStatus::Rejected.is_closable());
    assert!(!TicketStatus::Pending.is_closable());
    assert!(!TicketStatus::Closed.is_closable());
}

#[test]
fn test_all_six_shift_codes_parse() {
    for shift in Shift::all() {
        let parsed: Shift = Shift::from_str(shift.as_str()).unwrap();
        assert_eq!(parsed, shift);
    }
}

#[test]
fn test_unknown_shift_is_rejected() {
    let result: Result<Shift, DomainError> = Shift::from_str("weekday_evening");
    assert!(matches!(result, Err(DomainError::InvalidShift(_))));
}

#[test]
fn test_role_parsing() {
    assert_eq!(Role::from_str("requester").unwrap(), Role::Requester);
    assert_eq!(Role::from_str("supervisor").unwrap(), Role::Supervisor);
    assert_eq!(Role::from_str("operator").unwrap(), Role::Operator);
    assert_eq!(
        Role::from_str("administrator").unwrap(),
        Role::Administrator
    );
    assert!(Role::from_str("root").is_err());
}

#[test]
fn test_principal_rejects_empty_username() {
    let result: Result<Principal, DomainError> =
        Principal::new(1, String::from("  "), Role::Requester);
    assert!(matches!(result, Err(DomainError::InvalidPrincipal(_))));
}

#[test]
fn test_only_administrator_is_admin() {
    let admin: Principal =
        Principal::new(1, String::from("admin"), Role::Administrator).unwrap();
    let supervisor: Principal =
        Principal::new(2, String::from("sup"), Role::Supervisor).unwrap();

    assert!(admin.is_admin());
    assert!(!supervisor.is_admin());
}
