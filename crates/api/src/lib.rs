// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API layer for the Ops Ticket System.
//!
//! Handlers tie the lifecycle engine to the store: each call reads the
//! current state, runs the engine, commits through the conditional put,
//! and hands notification decisions to a delivery sink. Transport (HTTP
//! routing, status codes, principal extraction) lives above this crate;
//! everything here takes an already-authenticated [`Principal`] and
//! returns [`ApiError`] values a transport can map to its own codes.
//!
//! [`Principal`]: ops_ticket_domain::Principal

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
#![allow(clippy::multiple_crate_versions)]

mod error;
mod export;
mod handlers;
mod notify;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{ApiError, translate_core_error, translate_persistence_error};
pub use export::{ExportError, export_tickets_csv};
pub use handlers::{
    add_note, assign_operator, claim_ticket, close_ticket, create_category, create_rule,
    create_ticket, delete_category, delete_rule, edit_ticket, export_tickets, get_ticket,
    list_categories, list_rules, list_ticket_history, list_tickets, reject_resolution,
    update_category, update_ticket_status,
};
pub use notify::{NotificationMessage, NotificationSink, NullSink, dispatch_notifications};
pub use request_response::{
    AddNoteRequest, AssignOperatorRequest, CategoryInfo, CreateCategoryRequest,
    CreateRuleRequest, CreateTicketRequest, CreateTicketResponse, EditTicketRequest,
    HistoryEntryInfo, ListTicketsRequest, PersonInfo, RejectRequest, RuleInfo, TicketInfo,
    UpdateStatusRequest,
};
