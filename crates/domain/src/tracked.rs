// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::TicketStatus;
use crate::ticket::Ticket;
use crate::types::PersonRef;
use serde::{Deserialize, Serialize};

/// Names of the audited ticket fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Category,
    Status,
    Description,
    Observation,
    Supervisor,
    Operator,
}

impl TrackedField {
    /// Converts this field name to its stable wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Status => "status",
            Self::Description => "description",
            Self::Observation => "observation",
            Self::Supervisor => "supervisor",
            Self::Operator => "operator",
        }
    }
}

impl std::fmt::Display for TrackedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One field that differs between two tracked snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Which field changed.
    pub field: TrackedField,
    /// Rendered value before the change, `None` when previously unset.
    pub old: Option<String>,
    /// Rendered value after the change, `None` when now unset.
    pub new: Option<String>,
}

/// The audited subset of ticket fields, captured as a snapshot.
///
/// History entries store a full snapshot pair (pre- and post-mutation);
/// `diff` derives the changed-field list from the pair. This is the single
/// comparison utility — nothing else in the system compares tracked fields
/// field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFields {
    /// Category internal value.
    pub category: Option<String>,
    /// Status wire value.
    pub status: Option<TicketStatus>,
    /// Full description text.
    pub description: Option<String>,
    /// Full observation text.
    pub observation: Option<String>,
    /// Assigned supervisor, if any.
    pub supervisor: Option<PersonRef>,
    /// Assigned operator, if any.
    pub operator: Option<PersonRef>,
}

impl TrackedFields {
    /// Captures the tracked-field snapshot of a ticket.
    #[must_use]
    pub fn of(ticket: &Ticket) -> Self {
        Self {
            category: Some(ticket.category.value().to_string()),
            status: Some(ticket.status),
            description: Some(ticket.description.clone()),
            observation: Some(ticket.observation.clone()),
            supervisor: ticket.supervisor.clone(),
            operator: ticket.operator.clone(),
        }
    }

    /// The empty snapshot, used as the pre-mutation side of a creation.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Computes the fields that differ between two snapshots.
    ///
    /// Each differing field yields exactly one `FieldChange` with rendered
    /// old/new values. Identical fields are omitted.
    #[must_use]
    pub fn diff(old: &Self, new: &Self) -> Vec<FieldChange> {
        let mut changes: Vec<FieldChange> = Vec::new();

        push_if_changed(
            &mut changes,
            TrackedField::Category,
            old.category.as_deref(),
            new.category.as_deref(),
        );
        push_if_changed(
            &mut changes,
            TrackedField::Status,
            old.status.map(|s| s.as_str()),
            new.status.map(|s| s.as_str()),
        );
        push_if_changed(
            &mut changes,
            TrackedField::Description,
            old.description.as_deref(),
            new.description.as_deref(),
        );
        push_if_changed(
            &mut changes,
            TrackedField::Observation,
            old.observation.as_deref(),
            new.observation.as_deref(),
        );
        push_if_changed(
            &mut changes,
            TrackedField::Supervisor,
            old.supervisor.as_ref().map(|p| p.username.as_str()),
            new.supervisor.as_ref().map(|p| p.username.as_str()),
        );
        push_if_changed(
            &mut changes,
            TrackedField::Operator,
            old.operator.as_ref().map(|p| p.username.as_str()),
            new.operator.as_ref().map(|p| p.username.as_str()),
        );

        changes
    }
}

fn push_if_changed(
    changes: &mut Vec<FieldChange>,
    field: TrackedField,
    old: Option<&str>,
    new: Option<&str>,
) {
    if old != new {
        changes.push(FieldChange {
            field,
            old: old.map(ToString::to_string),
            new: new.map(ToString::to_string),
        });
    }
}
