// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use ops_ticket_domain::{Principal, Role, TrackedFields};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The kind of change a history entry records.
///
/// Labels match the history vocabulary of the ticket views; `as_str`
/// yields the display label stored alongside each entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    /// Ticket created by a requester.
    Creation,
    /// Operator outcome or supervisor/admin status change.
    StatusUpdate,
    /// Supervisor assigned an operator.
    Assignment,
    /// Supervisor self-assigned to an unassigned ticket.
    Claim,
    /// Requester rejected a completed/cancelled resolution.
    Rejection,
    /// Requester confirmed the resolution. Terminal.
    Closure,
    /// Requester appended a note to the description.
    Note,
    /// Supervisor/admin direct edit of tracked fields.
    Edit,
    /// A resolved or closed ticket re-entered an editable status.
    Reopened,
}

impl ChangeType {
    /// Returns the display label for this change type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creation => "Creation",
            Self::StatusUpdate => "Status Update",
            Self::Assignment => "Assignment",
            Self::Claim => "Claim",
            Self::Rejection => "Rejection",
            Self::Closure => "Closure",
            Self::Note => "Note",
            Self::Edit => "Edit",
            Self::Reopened => "Reopened",
        }
    }

    /// Parses a change type from its display label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Creation" => Some(Self::Creation),
            "Status Update" => Some(Self::StatusUpdate),
            "Assignment" => Some(Self::Assignment),
            "Claim" => Some(Self::Claim),
            "Rejection" => Some(Self::Rejection),
            "Closure" => Some(Self::Closure),
            "Note" => Some(Self::Note),
            "Edit" => Some(Self::Edit),
            "Reopened" => Some(Self::Reopened),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The identity that performed a recorded change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryActor {
    /// The identity provider's identifier for the actor.
    pub person_id: i64,
    /// Display name at the time of the change.
    pub username: String,
    /// The role the actor acted under.
    pub role: Role,
}

impl HistoryActor {
    /// Creates a new `HistoryActor`.
    #[must_use]
    pub const fn new(person_id: i64, username: String, role: Role) -> Self {
        Self {
            person_id,
            username,
            role,
        }
    }

    /// Captures the attribution of an acting principal.
    #[must_use]
    pub fn of(principal: &Principal) -> Self {
        Self::new(principal.person_id, principal.username.clone(), principal.role)
    }
}

/// An immutable record of one committed ticket mutation.
///
/// Every committed mutation appends exactly one entry. Entries are never
/// updated or deleted; `old_values` and `new_values` are full snapshots
/// of the tracked-field subset taken immediately before and after the
/// mutation (empty on the `old` side for `Creation`). Display order is
/// timestamp descending with id descending as the tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the entry has not been persisted yet.
    pub history_id: Option<i64>,
    /// The ticket this entry belongs to. `None` only for the creation
    /// entry before the ticket itself has been assigned an id.
    pub ticket_id: Option<i64>,
    /// When the change was committed.
    pub changed_at: OffsetDateTime,
    /// Who made the change.
    pub actor: HistoryActor,
    /// What kind of change this was.
    pub change_type: ChangeType,
    /// Tracked-field snapshot before the mutation.
    pub old_values: TrackedFields,
    /// Tracked-field snapshot after the mutation.
    pub new_values: TrackedFields,
    /// Optional free text: rejection reason, note body, edit remarks.
    pub details: Option<String>,
}

impl HistoryEntry {
    /// Creates a new unpersisted `HistoryEntry`.
    ///
    /// Once created, an entry is immutable.
    #[must_use]
    pub const fn new(
        ticket_id: Option<i64>,
        changed_at: OffsetDateTime,
        actor: HistoryActor,
        change_type: ChangeType,
        old_values: TrackedFields,
        new_values: TrackedFields,
        details: Option<String>,
    ) -> Self {
        Self {
            history_id: None,
            ticket_id,
            changed_at,
            actor,
            change_type,
            old_values,
            new_values,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ops_ticket_domain::TrackedFields;

    fn create_test_actor() -> HistoryActor {
        HistoryActor::new(42, String::from("supervisor1"), Role::Supervisor)
    }

    #[test]
    fn test_change_type_labels_round_trip() {
        for change_type in [
            ChangeType::Creation,
            ChangeType::StatusUpdate,
            ChangeType::Assignment,
            ChangeType::Claim,
            ChangeType::Rejection,
            ChangeType::Closure,
            ChangeType::Note,
            ChangeType::Edit,
            ChangeType::Reopened,
        ] {
            assert_eq!(ChangeType::parse(change_type.as_str()), Some(change_type));
        }
    }

    #[test]
    fn test_unknown_label_does_not_parse() {
        assert_eq!(ChangeType::parse("Deletion"), None);
    }

    #[test]
    fn test_entry_creation_requires_all_fields() {
        let entry: HistoryEntry = HistoryEntry::new(
            Some(7),
            OffsetDateTime::UNIX_EPOCH,
            create_test_actor(),
            ChangeType::Assignment,
            TrackedFields::empty(),
            TrackedFields::empty(),
            Some(String::from("assigned operator1")),
        );

        assert_eq!(entry.history_id, None);
        assert_eq!(entry.ticket_id, Some(7));
        assert_eq!(entry.change_type, ChangeType::Assignment);
        assert_eq!(entry.actor.username, "supervisor1");
        assert_eq!(entry.details.as_deref(), Some("assigned operator1"));
    }

    #[test]
    fn test_entry_is_immutable_once_created() {
        let entry: HistoryEntry = HistoryEntry::new(
            None,
            OffsetDateTime::UNIX_EPOCH,
            create_test_actor(),
            ChangeType::Creation,
            TrackedFields::empty(),
            TrackedFields::empty(),
            None,
        );

        // Entries can be cloned but carry no mutating API.
        let cloned: HistoryEntry = entry.clone();
        assert_eq!(entry, cloned);
    }

    #[test]
    fn test_actor_captures_principal_attribution() {
        let principal: Principal =
            Principal::new(9, String::from("op-9"), Role::Operator).unwrap();
        let actor: HistoryActor = HistoryActor::of(&principal);

        assert_eq!(actor.person_id, 9);
        assert_eq!(actor.username, "op-9");
        assert_eq!(actor.role, Role::Operator);
    }
}
