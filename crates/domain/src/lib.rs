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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod category;
mod error;
mod status;
mod ticket;
mod tracked;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use assignment::AssignmentRule;
pub use category::Category;
pub use error::DomainError;
pub use status::TicketStatus;
pub use ticket::Ticket;
pub use tracked::{FieldChange, TrackedField, TrackedFields};
pub use types::{PersonRef, Principal, Role, Shift};
pub use validation::{validate_note, validate_ticket_fields};
