// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-command tests for the state machine: who may do what, from which
//! status, and what each transition leaves behind.

use crate::{
    AssignmentRules, CoreError, CreateTicket, CreationResult, TicketCommand, TicketEdit,
    TransitionResult, apply, create,
};
use ops_ticket_audit::ChangeType;
use ops_ticket_domain::{AssignmentRule, Ticket, TicketStatus, TrackedFields};
use time::Duration;

use super::helpers::{
    admin, assigned_ticket, base_time, claimed_ticket, network_category, operator, operator_ref,
    other_supervisor, pending_ticket, requester, shift, supervisor,
};

fn create_input() -> CreateTicket {
    CreateTicket {
        title: String::from("Switch port down"),
        description: String::from("Port 12 on the floor switch has no link."),
        category: String::from("network"),
        shift: shift(),
    }
}

#[test]
fn test_create_yields_pending_unrouted_ticket() {
    let result: CreationResult = create(
        &requester(),
        &create_input(),
        network_category(),
        &AssignmentRules::default(),
        base_time(),
    )
    .unwrap();

    assert_eq!(result.ticket.status, TicketStatus::Pending);
    assert!(result.ticket.supervisor.is_none());
    assert!(result.ticket.operator.is_none());
    assert!(result.ticket.completed_at.is_none());
    assert_eq!(result.ticket.version, 1);
    assert!(result.unrouted);
    assert!(result.notifications.is_empty());
    assert_eq!(result.history.change_type, ChangeType::Creation);
    assert_eq!(result.history.old_values, TrackedFields::empty());
    assert_eq!(result.history.new_values, TrackedFields::of(&result.ticket));
}

#[test]
fn test_create_routes_through_matching_rule() {
    let rules: AssignmentRules = AssignmentRules::from_rules(vec![AssignmentRule::new(
        String::from("network"),
        shift(),
        supervisor().as_person_ref(),
    )])
    .unwrap();

    let result: CreationResult = create(
        &requester(),
        &create_input(),
        network_category(),
        &rules,
        base_time(),
    )
    .unwrap();

    assert_eq!(result.ticket.supervisor, Some(supervisor().as_person_ref()));
    assert!(!result.unrouted);
    assert_eq!(result.notifications.len(), 1);
}

#[test]
fn test_create_rejects_empty_description() {
    let mut input: CreateTicket = create_input();
    input.description = String::from("   ");

    let result = create(
        &requester(),
        &input,
        network_category(),
        &AssignmentRules::default(),
        base_time(),
    );

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_create_refuses_operator_role() {
    let result = create(
        &operator(),
        &create_input(),
        network_category(),
        &AssignmentRules::default(),
        base_time(),
    );

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_claim_sets_supervisor_without_touching_status() {
    let ticket: Ticket = pending_ticket();

    let result: TransitionResult =
        apply(&supervisor(), &ticket, &TicketCommand::Claim, base_time()).unwrap();

    assert_eq!(result.ticket.supervisor, Some(supervisor().as_person_ref()));
    assert_eq!(result.ticket.status, TicketStatus::Pending);
    assert_eq!(result.ticket.version, ticket.version + 1);
    assert_eq!(result.history.change_type, ChangeType::Claim);
}

#[test]
fn test_claim_on_claimed_ticket_is_a_conflict() {
    let ticket: Ticket = claimed_ticket();

    let result = apply(
        &other_supervisor(),
        &ticket,
        &TicketCommand::Claim,
        base_time(),
    );

    assert!(matches!(result, Err(CoreError::Conflict { .. })));
}

#[test]
fn test_claim_requires_supervisor_role() {
    let ticket: Ticket = pending_ticket();

    let result = apply(&requester(), &ticket, &TicketCommand::Claim, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_assign_operator_moves_to_in_progress() {
    let ticket: Ticket = claimed_ticket();
    let command: TicketCommand = TicketCommand::AssignOperator {
        operator: operator_ref(),
    };

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert_eq!(result.ticket.status, TicketStatus::InProgress);
    assert_eq!(result.ticket.operator, Some(operator_ref()));
    assert_eq!(result.history.change_type, ChangeType::Assignment);
}

#[test]
fn test_assign_operator_refused_for_other_supervisor() {
    let ticket: Ticket = claimed_ticket();
    let command: TicketCommand = TicketCommand::AssignOperator {
        operator: operator_ref(),
    };

    let result = apply(&other_supervisor(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_assign_operator_refused_from_completed() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::AssignOperator {
        operator: operator_ref(),
    };

    let result = apply(&supervisor(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_operator_completion_sets_completed_at() {
    let ticket: Ticket = assigned_ticket();
    let later = base_time() + Duration::hours(2);
    let command: TicketCommand = TicketCommand::UpdateStatus {
        status: TicketStatus::Completed,
        note: Some(String::from("Replaced the patch cable.")),
    };

    let result: TransitionResult = apply(&operator(), &ticket, &command, later).unwrap();

    assert_eq!(result.ticket.status, TicketStatus::Completed);
    assert_eq!(result.ticket.completed_at, Some(later));
    assert_eq!(result.ticket.modified_at, later);
    assert!(result.ticket.observation.contains("Replaced the patch cable."));
    assert_eq!(result.history.change_type, ChangeType::StatusUpdate);
}

#[test]
fn test_operator_cannot_pick_non_resolved_target() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::UpdateStatus {
        status: TicketStatus::Pending,
        note: None,
    };

    let result = apply(&operator(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_unassigned_operator_cannot_update_status() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.operator = Some(ops_ticket_domain::PersonRef::new(
        99,
        String::from("someone-else"),
    ));
    let command: TicketCommand = TicketCommand::UpdateStatus {
        status: TicketStatus::Completed,
        note: None,
    };

    let result = apply(&operator(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_operator_update_on_completed_ticket_fails() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::UpdateStatus {
        status: TicketStatus::Cancelled,
        note: None,
    };

    let result = apply(&operator(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_reject_clears_completed_at_and_records_reason() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::Reject {
        note: String::from("incomplete work"),
    };

    let result: TransitionResult = apply(&requester(), &ticket, &command, base_time()).unwrap();

    assert_eq!(result.ticket.status, TicketStatus::Rejected);
    assert!(result.ticket.completed_at.is_none());
    assert_eq!(result.history.change_type, ChangeType::Rejection);
    assert_eq!(result.history.details, Some(String::from("incomplete work")));
}

#[test]
fn test_reject_requires_a_reason() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::Reject {
        note: String::from("  "),
    };

    let result = apply(&requester(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_reject_refused_from_pending() {
    let ticket: Ticket = pending_ticket();
    let command: TicketCommand = TicketCommand::Reject {
        note: String::from("not happy"),
    };

    let result = apply(&requester(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_reject_refused_for_non_creator() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::Reject {
        note: String::from("not happy"),
    };

    let result = apply(&operator(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_close_appends_confirmation_to_description() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let original_description: String = ticket.description.clone();

    let result: TransitionResult =
        apply(&requester(), &ticket, &TicketCommand::Close, base_time()).unwrap();

    assert_eq!(result.ticket.status, TicketStatus::Closed);
    assert!(result.ticket.description.starts_with(&original_description));
    assert!(result.ticket.description.contains("closed by alice"));
    assert_eq!(result.history.change_type, ChangeType::Closure);
}

#[test]
fn test_close_refused_from_in_progress() {
    let ticket: Ticket = assigned_ticket();

    let result = apply(&requester(), &ticket, &TicketCommand::Close, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_closed_ticket_refuses_every_command() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Closed;

    let commands: Vec<TicketCommand> = vec![
        TicketCommand::Claim,
        TicketCommand::AssignOperator {
            operator: operator_ref(),
        },
        TicketCommand::UpdateStatus {
            status: TicketStatus::Completed,
            note: None,
        },
        TicketCommand::Reject {
            note: String::from("too late"),
        },
        TicketCommand::Close,
        TicketCommand::AddNote {
            note: String::from("hello?"),
        },
        TicketCommand::Edit(TicketEdit {
            status: Some(TicketStatus::Pending),
            ..TicketEdit::default()
        }),
    ];

    for command in commands {
        let result = apply(&admin(), &ticket, &command, base_time());
        assert!(
            matches!(result, Err(CoreError::IllegalTransition { .. })),
            "closed ticket accepted {}",
            command.action_name()
        );
    }
}

#[test]
fn test_add_note_appends_to_description() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::AddNote {
        note: String::from("Any update on this?"),
    };

    let result: TransitionResult = apply(&requester(), &ticket, &command, base_time()).unwrap();

    assert!(result.ticket.description.contains("Any update on this?"));
    assert!(result.ticket.description.contains("Note from alice"));
    assert_eq!(result.history.change_type, ChangeType::Note);
}

#[test]
fn test_add_note_refused_for_non_creator() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::AddNote {
        note: String::from("drive-by comment"),
    };

    let result = apply(&supervisor(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_edit_reopening_resolved_ticket_clears_completed_at() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.status = TicketStatus::Completed;
    ticket.completed_at = Some(base_time());
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        status: Some(TicketStatus::InProgress),
        ..TicketEdit::default()
    });

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert_eq!(result.ticket.status, TicketStatus::InProgress);
    assert!(result.ticket.completed_at.is_none());
    assert_eq!(result.history.change_type, ChangeType::Reopened);
}

#[test]
fn test_edit_to_resolved_sets_completed_at_once() {
    let ticket: Ticket = assigned_ticket();
    let later = base_time() + Duration::hours(1);
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        status: Some(TicketStatus::Cancelled),
        ..TicketEdit::default()
    });

    let result: TransitionResult = apply(&admin(), &ticket, &command, later).unwrap();

    assert_eq!(result.ticket.completed_at, Some(later));
    assert_eq!(result.history.change_type, ChangeType::Edit);
}

#[test]
fn test_edit_cannot_close() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        status: Some(TicketStatus::Closed),
        ..TicketEdit::default()
    });

    let result = apply(&admin(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_empty_edit_is_rejected() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::Edit(TicketEdit::default());

    let result = apply(&supervisor(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::Validation { .. })));
}

#[test]
fn test_edit_replaces_the_observation() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.observation = String::from("old operator note");
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        observation: Some(String::from("Swapped for a tested cable.  ")),
        ..TicketEdit::default()
    });

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert_eq!(result.ticket.observation, "Swapped for a tested cable.");
    assert_eq!(result.history.change_type, ChangeType::Edit);
}

#[test]
fn test_edit_can_clear_the_observation() {
    let mut ticket: Ticket = assigned_ticket();
    ticket.observation = String::from("stale note");
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        observation: Some(String::new()),
        ..TicketEdit::default()
    });

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert!(result.ticket.observation.is_empty());
}

#[test]
fn test_edit_can_unassign_operator() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        operator: Some(None),
        ..TicketEdit::default()
    });

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert!(result.ticket.operator.is_none());
}

#[test]
fn test_edit_refused_for_unrelated_supervisor() {
    let ticket: Ticket = assigned_ticket();
    let command: TicketCommand = TicketCommand::Edit(TicketEdit {
        description: Some(String::from("rewritten")),
        ..TicketEdit::default()
    });

    let result = apply(&other_supervisor(), &ticket, &command, base_time());

    assert!(matches!(result, Err(CoreError::IllegalTransition { .. })));
}

#[test]
fn test_every_mutation_snapshots_old_and_new_values() {
    let ticket: Ticket = claimed_ticket();
    let command: TicketCommand = TicketCommand::AssignOperator {
        operator: operator_ref(),
    };

    let result: TransitionResult = apply(&supervisor(), &ticket, &command, base_time()).unwrap();

    assert_eq!(result.history.old_values, TrackedFields::of(&ticket));
    assert_eq!(result.history.new_values, TrackedFields::of(&result.ticket));
    assert_eq!(result.history.ticket_id, ticket.ticket_id);
    assert_eq!(result.history.actor.username, "bruno");
}
