// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Category, FieldChange, PersonRef, Ticket, TicketStatus, TrackedField, TrackedFields,
};
use time::OffsetDateTime;

fn create_test_ticket() -> Ticket {
    Ticket::new(
        String::from("Broken switch"),
        String::from("Port 12 is flapping"),
        Category::new("Redes").unwrap(),
        PersonRef::new(10, String::from("requester1")),
        None,
        OffsetDateTime::UNIX_EPOCH,
    )
}

#[test]
fn test_snapshot_captures_all_tracked_fields() {
    let ticket: Ticket = create_test_ticket();
    let snapshot: TrackedFields = TrackedFields::of(&ticket);

    assert_eq!(snapshot.category.as_deref(), Some("redes"));
    assert_eq!(snapshot.status, Some(TicketStatus::Pending));
    assert_eq!(snapshot.description.as_deref(), Some("Port 12 is flapping"));
    assert_eq!(snapshot.observation.as_deref(), Some(""));
    assert!(snapshot.supervisor.is_none());
    assert!(snapshot.operator.is_none());
}

#[test]
fn test_diff_of_identical_snapshots_is_empty() {
    let ticket: Ticket = create_test_ticket();
    let snapshot: TrackedFields = TrackedFields::of(&ticket);

    assert!(TrackedFields::diff(&snapshot, &snapshot).is_empty());
}

#[test]
fn test_diff_reports_only_changed_fields() {
    let before: Ticket = create_test_ticket();
    let mut after: Ticket = before.clone();
    after.status = TicketStatus::InProgress;
    after.operator = Some(PersonRef::new(20, String::from("operator1")));

    let changes: Vec<FieldChange> =
        TrackedFields::diff(&TrackedFields::of(&before), &TrackedFields::of(&after));

    assert_eq!(changes.len(), 2);

    let status_change: &FieldChange = changes
        .iter()
        .find(|c| c.field == TrackedField::Status)
        .unwrap();
    assert_eq!(status_change.old.as_deref(), Some("pending"));
    assert_eq!(status_change.new.as_deref(), Some("in_progress"));

    let operator_change: &FieldChange = changes
        .iter()
        .find(|c| c.field == TrackedField::Operator)
        .unwrap();
    assert_eq!(operator_change.old, None);
    assert_eq!(operator_change.new.as_deref(), Some("operator1"));
}

#[test]
fn test_diff_against_empty_snapshot_reports_creation_fields() {
    let ticket: Ticket = create_test_ticket();
    let changes: Vec<FieldChange> =
        TrackedFields::diff(&TrackedFields::empty(), &TrackedFields::of(&ticket));

    // Category, status, description, and observation are all set on a new
    // ticket; supervisor and operator are unset and therefore unchanged.
    assert_eq!(changes.len(), 4);
    assert!(changes.iter().all(|c| c.old.is_none()));
}
