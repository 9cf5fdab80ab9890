// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ops_ticket_domain::{Principal, Role, Ticket, TicketStatus};
use time::Date;

/// The visibility boundary for a principal's ticket listing.
///
/// Scope is derived from the role alone and is applied before any
/// user-supplied filter, so a caller can never widen what their role
/// permits by crafting filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleScope {
    /// Requesters see only tickets they created.
    Creator {
        /// The requester's person id.
        person_id: i64,
    },
    /// Operators see only tickets currently assigned to them.
    AssignedOperator {
        /// The operator's person id.
        person_id: i64,
    },
    /// Supervisors see tickets they own plus unassigned tickets.
    SupervisorOrUnassigned {
        /// The supervisor's person id.
        person_id: i64,
    },
    /// Administrators see everything.
    Unrestricted,
}

impl RoleScope {
    /// Derives the scope for the given acting principal.
    #[must_use]
    pub const fn for_principal(principal: &Principal) -> Self {
        match principal.role {
            Role::Requester => Self::Creator {
                person_id: principal.person_id,
            },
            Role::Operator => Self::AssignedOperator {
                person_id: principal.person_id,
            },
            Role::Supervisor => Self::SupervisorOrUnassigned {
                person_id: principal.person_id,
            },
            Role::Administrator => Self::Unrestricted,
        }
    }

    /// Whether the scope allows the principal to see this ticket at all.
    #[must_use]
    pub fn permits(&self, ticket: &Ticket) -> bool {
        match self {
            Self::Creator { person_id } => ticket.creator.person_id == *person_id,
            Self::AssignedOperator { person_id } => ticket
                .operator
                .as_ref()
                .is_some_and(|operator| operator.person_id == *person_id),
            Self::SupervisorOrUnassigned { person_id } => ticket
                .supervisor
                .as_ref()
                .is_none_or(|supervisor| supervisor.person_id == *person_id),
            Self::Unrestricted => true,
        }
    }
}

/// User-supplied listing filters, all optional and combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketFilter {
    /// Exact id match when the fragment parses as an id, substring
    /// match against the decimal text otherwise.
    pub id_fragment: Option<String>,
    /// Case-insensitive substring match against the title.
    pub title_fragment: Option<String>,
    /// Case-insensitive substring match against the creator's name.
    pub creator_fragment: Option<String>,
    /// Case-insensitive substring match against the operator's name.
    pub operator_fragment: Option<String>,
    /// Case-insensitive substring match against the supervisor's name.
    pub supervisor_fragment: Option<String>,
    /// Exact status match.
    pub status: Option<TicketStatus>,
    /// Exact category slug match.
    pub category: Option<String>,
    /// Inclusive start date of the creation window. A lone start date
    /// matches that whole day.
    pub created_from: Option<Date>,
    /// Inclusive end date of the creation window. A lone end date
    /// matches that whole day.
    pub created_to: Option<Date>,
}

impl TicketFilter {
    /// Returns `true` when no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.id_fragment.is_none()
            && self.title_fragment.is_none()
            && self.creator_fragment.is_none()
            && self.operator_fragment.is_none()
            && self.supervisor_fragment.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.created_from.is_none()
            && self.created_to.is_none()
    }
}

/// A role scope combined with user filters, ready to evaluate against
/// tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    /// Visibility boundary derived from the acting role.
    pub scope: RoleScope,
    /// User-supplied filters applied inside the boundary.
    pub filter: TicketFilter,
}

impl TicketQuery {
    /// Builds a query for the given principal and filters.
    #[must_use]
    pub const fn build(principal: &Principal, filter: TicketFilter) -> Self {
        Self {
            scope: RoleScope::for_principal(principal),
            filter,
        }
    }

    /// Evaluates the query against a single ticket. Scope is checked
    /// first, then each supplied filter. An id fragment that parses as
    /// an id matches that id exactly; anything else falls back to a
    /// substring match on the decimal text, so a malformed fragment
    /// never errors.
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !self.scope.permits(ticket) {
            return false;
        }
        if let Some(fragment) = &self.filter.id_fragment {
            let matched: bool = match fragment.trim().parse::<i64>() {
                Ok(wanted) => ticket.ticket_id == Some(wanted),
                Err(_) => ticket
                    .ticket_id
                    .map(|id| id.to_string())
                    .unwrap_or_default()
                    .contains(fragment.as_str()),
            };
            if !matched {
                return false;
            }
        }
        if let Some(fragment) = &self.filter.title_fragment {
            if !contains_ci(&ticket.title, fragment) {
                return false;
            }
        }
        if let Some(fragment) = &self.filter.creator_fragment {
            if !contains_ci(&ticket.creator.username, fragment) {
                return false;
            }
        }
        if let Some(fragment) = &self.filter.operator_fragment {
            let matched: bool = ticket
                .operator
                .as_ref()
                .is_some_and(|operator| contains_ci(&operator.username, fragment));
            if !matched {
                return false;
            }
        }
        if let Some(fragment) = &self.filter.supervisor_fragment {
            let matched: bool = ticket
                .supervisor
                .as_ref()
                .is_some_and(|supervisor| contains_ci(&supervisor.username, fragment));
            if !matched {
                return false;
            }
        }
        if let Some(status) = self.filter.status {
            if ticket.status != status {
                return false;
            }
        }
        if let Some(category) = &self.filter.category {
            if ticket.category.value() != category {
                return false;
            }
        }
        let created: Date = ticket.created_at.date();
        match (self.filter.created_from, self.filter.created_to) {
            (Some(from), Some(to)) => {
                if created < from || created > to {
                    return false;
                }
            }
            // A lone bound matches that whole day only.
            (Some(day), None) | (None, Some(day)) => {
                if created != day {
                    return false;
                }
            }
            (None, None) => {}
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Sorts a listing newest-first: creation time descending, then ticket id
/// descending as a tiebreaker.
pub fn sort_listing(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.ticket_id.cmp(&a.ticket_id))
    });
}
