// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Ticket status string is not a recognized status value.
    InvalidStatus(String),
    /// Shift code is not one of the six recognized codes.
    InvalidShift(String),
    /// Role string is not a recognized role value.
    InvalidRole(String),
    /// Category name is empty or slugifies to an empty value.
    InvalidCategoryName(String),
    /// Ticket title is empty or invalid.
    InvalidTitle(String),
    /// Ticket description is empty or invalid.
    InvalidDescription(String),
    /// A required free-text note is empty.
    EmptyNote,
    /// Acting principal is malformed (empty id or username).
    InvalidPrincipal(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatus(value) => write!(f, "Unknown ticket status: '{value}'"),
            Self::InvalidShift(value) => write!(f, "Unknown shift code: '{value}'"),
            Self::InvalidRole(value) => write!(f, "Unknown role: '{value}'"),
            Self::InvalidCategoryName(msg) => write!(f, "Invalid category name: {msg}"),
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidDescription(msg) => write!(f, "Invalid description: {msg}"),
            Self::EmptyNote => write!(f, "Note text cannot be empty"),
            Self::InvalidPrincipal(msg) => write!(f, "Invalid principal: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
