// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! - `tickets` — point lookup, role-scoped scan, history timeline
//! - `catalog` — category and assignment rule lookups

pub mod catalog;
pub mod tickets;

pub use catalog::{find_category, list_categories, load_rules};
pub use tickets::{get_ticket, list_history, scan_tickets};
