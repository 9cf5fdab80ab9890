// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Category and assignment rule mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use tracing::debug;

use ops_ticket_domain::{AssignmentRule, Category};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::NewRuleRow;
use crate::diesel_schema::{assignment_rules, categories, tickets};
use crate::error::PersistenceError;

fn map_unique_violation(err: diesel::result::Error, what: String) -> PersistenceError {
    match err {
        diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PersistenceError::DuplicateKey(what)
        }
        other => PersistenceError::from(other),
    }
}

/// Inserts a category, returning it with its assigned id.
///
/// # Errors
///
/// Returns `DuplicateKey` when a category with the same internal value
/// already exists.
pub fn insert_category(
    conn: &mut SqliteConnection,
    category: &Category,
) -> Result<Category, PersistenceError> {
    diesel::insert_into(categories::table)
        .values((
            categories::name.eq(category.name()),
            categories::value.eq(category.value()),
        ))
        .execute(conn)
        .map_err(|e| map_unique_violation(e, format!("category '{}'", category.value())))?;
    let category_id: i64 = get_last_insert_rowid(conn)?;

    debug!(category_id, value = %category.value(), "category created");

    Ok(Category::with_id(
        category_id,
        category.name().to_string(),
        category.value().to_string(),
    ))
}

/// Renames a category in place, replacing both its display name and its
/// derived internal value. Referencing tickets keep their category id, so
/// history text is never rewritten.
///
/// # Errors
///
/// Returns `DuplicateKey` when the new internal value collides with
/// another category and `NotFound` when the category does not exist.
pub fn update_category(
    conn: &mut SqliteConnection,
    category_id: i64,
    category: &Category,
) -> Result<Category, PersistenceError> {
    let updated: usize =
        diesel::update(categories::table.filter(categories::category_id.eq(category_id)))
            .set((
                categories::name.eq(category.name()),
                categories::value.eq(category.value()),
            ))
            .execute(conn)
            .map_err(|e| map_unique_violation(e, format!("category '{}'", category.value())))?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "category {category_id}"
        )));
    }

    debug!(category_id, value = %category.value(), "category renamed");

    Ok(Category::with_id(
        category_id,
        category.name().to_string(),
        category.value().to_string(),
    ))
}

/// Deletes a category, refusing while any ticket still references it.
///
/// # Errors
///
/// Returns `CategoryReferenced` when tickets reference the category and
/// `NotFound` when it does not exist.
pub fn delete_category(
    conn: &mut SqliteConnection,
    category_id: i64,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let referencing: i64 = tickets::table
            .filter(tickets::category_id.eq(category_id))
            .count()
            .get_result(conn)?;
        if referencing > 0 {
            return Err(PersistenceError::CategoryReferenced { category_id });
        }

        let deleted: usize =
            diesel::delete(categories::table.filter(categories::category_id.eq(category_id)))
                .execute(conn)?;
        if deleted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "category {category_id}"
            )));
        }

        debug!(category_id, "category deleted");
        Ok(())
    })
}

/// Inserts an assignment rule, returning it with its assigned id.
///
/// # Errors
///
/// Returns `DuplicateKey` when a rule for the same `(category, shift)`
/// pair already exists.
pub fn insert_rule(
    conn: &mut SqliteConnection,
    rule: &AssignmentRule,
) -> Result<AssignmentRule, PersistenceError> {
    let row: NewRuleRow = NewRuleRow {
        category_value: rule.category_value.clone(),
        shift: rule.shift.as_str().to_string(),
        supervisor_id: rule.supervisor.person_id,
        supervisor_name: rule.supervisor.username.clone(),
    };
    diesel::insert_into(assignment_rules::table)
        .values(&row)
        .execute(conn)
        .map_err(|e| {
            map_unique_violation(
                e,
                format!("rule ({}, {})", rule.category_value, rule.shift),
            )
        })?;
    let rule_id: i64 = get_last_insert_rowid(conn)?;

    debug!(rule_id, category = %rule.category_value, shift = %rule.shift, "assignment rule created");

    Ok(AssignmentRule::with_id(
        rule_id,
        rule.category_value.clone(),
        rule.shift,
        rule.supervisor.clone(),
    ))
}

/// Deletes an assignment rule by id.
///
/// Existing tickets keep whatever routing the rule produced; deletion is
/// never retroactive.
///
/// # Errors
///
/// Returns `RuleNotFound` when no rule has the given id.
pub fn delete_rule(conn: &mut SqliteConnection, rule_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(assignment_rules::table.filter(assignment_rules::rule_id.eq(rule_id)))
            .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::RuleNotFound(rule_id));
    }
    debug!(rule_id, "assignment rule deleted");
    Ok(())
}
