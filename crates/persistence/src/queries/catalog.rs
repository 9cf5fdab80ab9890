// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Category and assignment rule lookups.

use diesel::SqliteConnection;
use diesel::prelude::*;

use ops_ticket_domain::{AssignmentRule, Category};

use crate::data_models::{CategoryRow, RuleRow, category_from_row, rule_from_row};
use crate::diesel_schema::{assignment_rules, categories};
use crate::error::PersistenceError;

/// Lists all categories, ordered by display name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, PersistenceError> {
    let rows: Vec<CategoryRow> = categories::table
        .order(categories::name.asc())
        .select(CategoryRow::as_select())
        .load::<CategoryRow>(conn)?;
    Ok(rows.into_iter().map(category_from_row).collect())
}

/// Finds a category by its internal value.
///
/// # Errors
///
/// Returns `CategoryNotFound` when no category has the given value.
pub fn find_category(
    conn: &mut SqliteConnection,
    value: &str,
) -> Result<Category, PersistenceError> {
    let result = categories::table
        .filter(categories::value.eq(value))
        .select(CategoryRow::as_select())
        .first::<CategoryRow>(conn);

    match result {
        Ok(row) => Ok(category_from_row(row)),
        Err(diesel::result::Error::NotFound) => {
            Err(PersistenceError::CategoryNotFound(value.to_string()))
        }
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Resolves the database id of a category, preferring the id it already
/// carries and falling back to a lookup by value.
///
/// # Errors
///
/// Returns `CategoryNotFound` when the category is not stored.
pub fn resolve_category_id(
    conn: &mut SqliteConnection,
    category: &Category,
) -> Result<i64, PersistenceError> {
    if let Some(category_id) = category.category_id() {
        return Ok(category_id);
    }
    find_category(conn, category.value())?
        .category_id()
        .ok_or_else(|| PersistenceError::CategoryNotFound(category.value().to_string()))
}

/// Loads every assignment rule, ordered by category then shift.
///
/// # Errors
///
/// Returns an error if the query fails or a stored shift code is corrupt.
pub fn load_rules(conn: &mut SqliteConnection) -> Result<Vec<AssignmentRule>, PersistenceError> {
    let rows: Vec<RuleRow> = assignment_rules::table
        .order((
            assignment_rules::category_value.asc(),
            assignment_rules::shift.asc(),
        ))
        .select(RuleRow::as_select())
        .load::<RuleRow>(conn)?;
    rows.into_iter().map(rule_from_row).collect()
}
