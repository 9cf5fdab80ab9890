// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// Validates ticket creation field constraints.
///
/// Input shape validation belongs to the excluded form layer; the core
/// re-validates only the invariants it depends on: non-empty title and
/// description.
///
/// # Errors
///
/// Returns an error if the title or description is empty after trimming.
pub fn validate_ticket_fields(title: &str, description: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidTitle(String::from(
            "Title cannot be empty",
        )));
    }
    if description.trim().is_empty() {
        return Err(DomainError::InvalidDescription(String::from(
            "Description cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a required free-text note (rejection reason, appended note).
///
/// # Errors
///
/// Returns `DomainError::EmptyNote` if the note is empty after trimming.
pub fn validate_note(note: &str) -> Result<(), DomainError> {
    if note.trim().is_empty() {
        return Err(DomainError::EmptyNote);
    }
    Ok(())
}
