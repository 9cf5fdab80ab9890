// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Actor roles for authorization.
///
/// The role is supplied by the external identity provider alongside the
/// principal's identity and is passed explicitly into every core call.
/// Permission checks are plain conditional logic in the state machine and
/// the visibility filter; there is no ambient per-request principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Creates tickets, rejects or confirms resolutions on their own tickets.
    Requester,
    /// Routes tickets: claims unassigned tickets, assigns operators, edits directly.
    Supervisor,
    /// Works assigned tickets and records the outcome.
    Operator,
    /// Unrestricted visibility and structural authority (categories, rules).
    Administrator,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requester" => Ok(Self::Requester),
            "supervisor" => Ok(Self::Supervisor),
            "operator" => Ok(Self::Operator),
            "administrator" => Ok(Self::Administrator),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its stable wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requester => "requester",
            Self::Supervisor => "supervisor",
            Self::Operator => "operator",
            Self::Administrator => "administrator",
        }
    }
}

/// One of the six time-window codes used for supervisor routing.
///
/// Weekday/weekend crossed with morning/afternoon/night. Lookup in the
/// assignment resolver is exact-match on `(category, shift)`; there is no
/// partial or hierarchical fallback between shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shift {
    WeekdayMorning,
    WeekdayAfternoon,
    WeekdayNight,
    WeekendMorning,
    WeekendAfternoon,
    WeekendNight,
}

impl FromStr for Shift {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekday_morning" => Ok(Self::WeekdayMorning),
            "weekday_afternoon" => Ok(Self::WeekdayAfternoon),
            "weekday_night" => Ok(Self::WeekdayNight),
            "weekend_morning" => Ok(Self::WeekendMorning),
            "weekend_afternoon" => Ok(Self::WeekendAfternoon),
            "weekend_night" => Ok(Self::WeekendNight),
            _ => Err(DomainError::InvalidShift(s.to_string())),
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Shift {
    /// Converts this shift to its stable wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WeekdayMorning => "weekday_morning",
            Self::WeekdayAfternoon => "weekday_afternoon",
            Self::WeekdayNight => "weekday_night",
            Self::WeekendMorning => "weekend_morning",
            Self::WeekendAfternoon => "weekend_afternoon",
            Self::WeekendNight => "weekend_night",
        }
    }

    /// All six shift codes, in routing-table display order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::WeekdayMorning,
            Self::WeekdayAfternoon,
            Self::WeekdayNight,
            Self::WeekendMorning,
            Self::WeekendAfternoon,
            Self::WeekendNight,
        ]
    }
}

/// A persisted reference to a person occupying a ticket slot
/// (creator, supervisor, or operator).
///
/// The username is denormalized for display and username filtering; the
/// identity provider owns the authoritative record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonRef {
    /// The identity provider's identifier for this person.
    pub person_id: i64,
    /// Display name, used for listings and username filters.
    pub username: String,
}

impl PersonRef {
    /// Creates a new `PersonRef`.
    #[must_use]
    pub const fn new(person_id: i64, username: String) -> Self {
        Self {
            person_id,
            username,
        }
    }
}

/// The acting identity for a single core invocation.
///
/// Supplied by the external identity provider as `(id, display name, role)`
/// and treated as opaque input; the core never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The identity provider's identifier for this person.
    pub person_id: i64,
    /// Display name.
    pub username: String,
    /// The role this principal acts under.
    pub role: Role,
}

impl Principal {
    /// Creates a new `Principal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is empty.
    pub fn new(person_id: i64, username: String, role: Role) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::InvalidPrincipal(String::from(
                "username cannot be empty",
            )));
        }
        Ok(Self {
            person_id,
            username,
            role,
        })
    }

    /// Returns the persisted reference form of this principal.
    #[must_use]
    pub fn as_person_ref(&self) -> PersonRef {
        PersonRef::new(self.person_id, self.username.clone())
    }

    /// Returns whether this principal has administrator authority.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Administrator)
    }
}
