// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence
//! layer. Mutations use Diesel DSL, with the `last_insert_rowid()` helper
//! imported from the `backend` module.
//!
//! - `tickets` — ticket insertion and the conditional-put commit path
//! - `catalog` — category and assignment rule management

pub mod catalog;
pub mod tickets;

pub use catalog::{delete_category, delete_rule, insert_category, insert_rule, update_category};
pub use tickets::{commit_transition, insert_ticket};
