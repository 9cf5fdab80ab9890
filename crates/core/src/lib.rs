// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The ticket lifecycle engine.
//!
//! Four tightly-coupled pieces live here: the status state machine
//! (`apply`/`create`), the category/shift assignment resolver, the
//! role-aware visibility filter, and the notification trigger. Every
//! mutation computed by `apply` simultaneously respects transition
//! legality, yields exactly one history entry, and classifies who should
//! be notified. Persistence and transport are the callers' concern.

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

mod apply;
mod command;
mod error;
mod filter;
mod notify;
mod resolver;

#[cfg(test)]
mod tests;

pub use apply::{CreationResult, TransitionResult, apply, create};
pub use command::{CreateTicket, TicketCommand, TicketEdit};
pub use error::CoreError;
pub use filter::{RoleScope, TicketFilter, TicketQuery, sort_listing};
pub use notify::{Notification, NotifyAudience, NotifyReason, evaluate_notifications};
pub use resolver::AssignmentRules;
