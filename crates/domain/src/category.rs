// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// A named work-order bucket.
///
/// The display `name` is what administrators type; the `value` is the
/// stable internal key, derived deterministically from the name by
/// slugification and unique across categories. Tickets and assignment
/// rules reference categories by `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the category has not been persisted yet.
    category_id: Option<i64>,
    /// Display name (e.g., "Soporte Técnico").
    name: String,
    /// Stable internal key (e.g., "soporte_tecnico").
    value: String,
}

// Two categories are equal if they have the same value, regardless of IDs.
impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Category {}

impl std::hash::Hash for Category {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl Category {
    /// Creates a new `Category` without a persisted ID, deriving the
    /// internal value from the display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name slugifies to an empty value.
    pub fn new(name: &str) -> Result<Self, DomainError> {
        let value: String = slugify(name);
        if value.is_empty() {
            return Err(DomainError::InvalidCategoryName(format!(
                "'{name}' produces an empty internal value"
            )));
        }
        Ok(Self {
            category_id: None,
            name: name.trim().to_string(),
            value,
        })
    }

    /// Creates a `Category` with an existing persisted ID.
    ///
    /// Used when rehydrating from storage; the stored value is trusted
    /// and not re-derived.
    #[must_use]
    pub const fn with_id(category_id: i64, name: String, value: String) -> Self {
        Self {
            category_id: Some(category_id),
            name,
            value,
        }
    }

    /// Returns the canonical numeric identifier if persisted.
    #[must_use]
    pub const fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stable internal key.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Derives the stable internal key for a category name.
///
/// Lowercases, folds common accented Latin letters to ASCII, keeps
/// alphanumerics, and collapses every other run of characters to a single
/// underscore. The derivation is deterministic so renaming a category to
/// the same name always yields the same value.
fn slugify(name: &str) -> String {
    let mut slug: String = String::with_capacity(name.len());
    let mut pending_separator: bool = false;

    for c in name.trim().to_lowercase().chars() {
        let folded: Option<char> = match c {
            'á' | 'à' | 'ä' | 'â' => Some('a'),
            'é' | 'è' | 'ë' | 'ê' => Some('e'),
            'í' | 'ì' | 'ï' | 'î' => Some('i'),
            'ó' | 'ò' | 'ö' | 'ô' => Some('o'),
            'ú' | 'ù' | 'ü' | 'û' => Some('u'),
            'ñ' => Some('n'),
            'ç' => Some('c'),
            _ if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        };

        match folded {
            Some(keep) => {
                if pending_separator && !slug.is_empty() {
                    slug.push('_');
                }
                pending_separator = false;
                slug.push(keep);
            }
            None => pending_separator = true,
        }
    }

    slug
}
