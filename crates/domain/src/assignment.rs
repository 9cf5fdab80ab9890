// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{PersonRef, Shift};
use serde::{Deserialize, Serialize};

/// A supervisor routing rule: `(category, shift) → supervisor`.
///
/// Rules are unique per `(category, shift)` pair and consulted only at
/// ticket-creation time; adding or deleting a rule never retroactively
/// reassigns existing tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRule {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the rule has not been persisted yet.
    pub rule_id: Option<i64>,
    /// The category internal value this rule routes.
    pub category_value: String,
    /// The shift code this rule routes.
    pub shift: Shift,
    /// The supervisor who receives tickets matching this rule.
    pub supervisor: PersonRef,
}

impl AssignmentRule {
    /// Creates a new unpersisted `AssignmentRule`.
    #[must_use]
    pub const fn new(category_value: String, shift: Shift, supervisor: PersonRef) -> Self {
        Self {
            rule_id: None,
            category_value,
            shift,
            supervisor,
        }
    }

    /// Creates an `AssignmentRule` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(
        rule_id: i64,
        category_value: String,
        shift: Shift,
        supervisor: PersonRef,
    ) -> Self {
        Self {
            rule_id: Some(rule_id),
            category_value,
            shift,
            supervisor,
        }
    }

    /// Returns whether this rule routes the given `(category, shift)` pair.
    #[must_use]
    pub fn matches(&self, category_value: &str, shift: Shift) -> bool {
        self.category_value == category_value && self.shift == shift
    }
}
