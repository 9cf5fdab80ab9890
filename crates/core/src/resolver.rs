// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use ops_ticket_domain::{AssignmentRule, PersonRef, Shift};

/// An in-memory index of routing rules, keyed by `(category, shift)`.
///
/// Built from the stored rules at resolution time. Resolution is an exact
/// match only; a missing rule leaves the ticket unrouted rather than
/// falling back to a partial match.
#[derive(Debug, Clone, Default)]
pub struct AssignmentRules {
    rules: Vec<AssignmentRule>,
}

impl AssignmentRules {
    /// Builds the index from a list of stored rules, rejecting duplicates
    /// on the `(category, shift)` key.
    ///
    /// # Errors
    /// Returns a conflict error if two rules share the same key.
    pub fn from_rules(rules: Vec<AssignmentRule>) -> Result<Self, CoreError> {
        let mut index: Self = Self { rules: Vec::new() };
        for rule in rules {
            index.insert(rule)?;
        }
        Ok(index)
    }

    /// Adds a rule, refusing a duplicate `(category, shift)` key.
    ///
    /// # Errors
    /// Returns a conflict error if a rule for the same key already exists.
    pub fn insert(&mut self, rule: AssignmentRule) -> Result<(), CoreError> {
        if self
            .rules
            .iter()
            .any(|existing| existing.matches(&rule.category_value, rule.shift))
        {
            return Err(CoreError::Conflict {
                reason: format!(
                    "an assignment rule for category '{}' and shift '{}' already exists",
                    rule.category_value, rule.shift
                ),
            });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Looks up the supervisor responsible for the given category and
    /// shift. Returns `None` when no rule matches.
    #[must_use]
    pub fn resolve(&self, category_value: &str, shift: Shift) -> Option<&PersonRef> {
        self.rules
            .iter()
            .find(|rule| rule.matches(category_value, shift))
            .map(|rule| &rule.supervisor)
    }

    /// Number of rules held by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` when no rules are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
