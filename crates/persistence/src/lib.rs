// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Ops Ticket System.
//!
//! This crate stores tickets, their append-only history, categories, and
//! assignment rules. It is built on Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the only backend: in-memory databases for tests and
//! file-based databases (with WAL mode) for deployments. Support requires
//! no external infrastructure.
//!
//! ## Concurrency contract
//!
//! Ticket mutations commit through a conditional put keyed on the
//! ticket's version column: the update applies only when the stored
//! version equals the version the transition was computed against, and
//! the history append happens in the same transaction. Two concurrent
//! transitions from the same prior state cannot both succeed; the loser
//! observes a `VersionConflict` and must re-read and re-validate.

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

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use ops_ticket::{CreationResult, TicketQuery, TransitionResult};
use ops_ticket_audit::HistoryEntry;
use ops_ticket_domain::{AssignmentRule, Category, Ticket};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for tickets, history, categories, and rules.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based
    /// collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Persists a freshly created ticket and its creation history entry
    /// as one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the category cannot be resolved or the insert
    /// fails.
    pub fn insert_ticket(
        &mut self,
        creation: &CreationResult,
    ) -> Result<(Ticket, HistoryEntry), PersistenceError> {
        mutations::insert_ticket(&mut self.conn, creation)
    }

    /// Commits a ticket transition with a conditional put on the version
    /// column, appending the history entry in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` when a concurrent writer got there
    /// first, and `TicketNotFound` when the ticket no longer exists.
    pub fn commit_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<(Ticket, HistoryEntry), PersistenceError> {
        mutations::commit_transition(&mut self.conn, result)
    }

    /// Retrieves a single ticket by id.
    ///
    /// # Errors
    ///
    /// Returns `TicketNotFound` when no ticket has the given id.
    pub fn get_ticket(&mut self, ticket_id: i64) -> Result<Ticket, PersistenceError> {
        queries::get_ticket(&mut self.conn, ticket_id)
    }

    /// Scans tickets visible under the query's role scope and filters,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails.
    pub fn scan_tickets(&mut self, query: &TicketQuery) -> Result<Vec<Ticket>, PersistenceError> {
        queries::scan_tickets(&mut self.conn, query)
    }

    /// Retrieves the history timeline of a ticket, newest entry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_history(&mut self, ticket_id: i64) -> Result<Vec<HistoryEntry>, PersistenceError> {
        queries::list_history(&mut self.conn, ticket_id)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` when the internal value already exists.
    pub fn create_category(&mut self, category: &Category) -> Result<Category, PersistenceError> {
        mutations::insert_category(&mut self.conn, category)
    }

    /// Renames a category, re-deriving its internal value. Tickets keep
    /// their category id and recorded history is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` when the new internal value collides with
    /// another category and `NotFound` when the category does not exist.
    pub fn update_category(
        &mut self,
        category_id: i64,
        category: &Category,
    ) -> Result<Category, PersistenceError> {
        mutations::update_category(&mut self.conn, category_id, category)
    }

    /// Deletes a category, refusing while any ticket still references it.
    ///
    /// # Errors
    ///
    /// Returns `CategoryReferenced` when tickets reference the category.
    pub fn delete_category(&mut self, category_id: i64) -> Result<(), PersistenceError> {
        mutations::delete_category(&mut self.conn, category_id)
    }

    /// Lists all categories, ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(&mut self) -> Result<Vec<Category>, PersistenceError> {
        queries::list_categories(&mut self.conn)
    }

    /// Finds a category by its internal value.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` when no category has the given value.
    pub fn find_category(&mut self, value: &str) -> Result<Category, PersistenceError> {
        queries::find_category(&mut self.conn, value)
    }

    // ========================================================================
    // Assignment rules
    // ========================================================================

    /// Creates an assignment rule.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` when a rule for the same
    /// `(category, shift)` pair already exists.
    pub fn create_rule(&mut self, rule: &AssignmentRule) -> Result<AssignmentRule, PersistenceError> {
        mutations::insert_rule(&mut self.conn, rule)
    }

    /// Deletes an assignment rule. Never retroactive: existing tickets
    /// keep their routing.
    ///
    /// # Errors
    ///
    /// Returns `RuleNotFound` when no rule has the given id.
    pub fn delete_rule(&mut self, rule_id: i64) -> Result<(), PersistenceError> {
        mutations::delete_rule(&mut self.conn, rule_id)
    }

    /// Loads every assignment rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_rules(&mut self) -> Result<Vec<AssignmentRule>, PersistenceError> {
        queries::load_rules(&mut self.conn)
    }
}
