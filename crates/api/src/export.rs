// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of ticket listings.
//!
//! A read-only projection: the caller supplies an already role-filtered
//! listing and receives a tabular artifact. Nothing here touches the
//! store.

use ops_ticket_domain::{PersonRef, Ticket};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Errors raised while producing a CSV export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The CSV writer failed.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),
    /// The finished buffer was not valid UTF-8.
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// A timestamp could not be formatted.
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}

fn person_cell(person: Option<&PersonRef>) -> String {
    person.map(|p| p.username.clone()).unwrap_or_default()
}

fn timestamp_cell(instant: OffsetDateTime) -> Result<String, ExportError> {
    Ok(instant.format(&Rfc3339)?)
}

/// Renders a ticket listing as CSV, one row per ticket, header included.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_tickets_csv(tickets: &[Ticket]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "id",
        "title",
        "category",
        "status",
        "creator",
        "supervisor",
        "operator",
        "created_at",
        "modified_at",
        "completed_at",
    ])?;

    for ticket in tickets {
        let completed_at: String = ticket
            .completed_at
            .map(timestamp_cell)
            .transpose()?
            .unwrap_or_default();
        writer.write_record([
            ticket
                .ticket_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            ticket.title.clone(),
            ticket.category.name().to_string(),
            ticket.status.display_name().to_string(),
            ticket.creator.username.clone(),
            person_cell(ticket.supervisor.as_ref()),
            person_cell(ticket.operator.as_ref()),
            timestamp_cell(ticket.created_at)?,
            timestamp_cell(ticket.modified_at)?,
            completed_at,
        ])?;
    }

    let buffer: Vec<u8> = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    Ok(String::from_utf8(buffer)?)
}
