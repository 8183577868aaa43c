//! Spreadsheet reader (xlsx, xls, xlsb, ods).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, NaiveTime};

use crate::convert::Table;
use crate::{Error, Result, SourceFormat, TargetFormat};

/// Open an in-memory workbook and encode the records of its first sheet as `target`.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the document cannot be opened, has no
/// sheets, or its first sheet is empty.
pub fn read(body: &[u8], target: TargetFormat) -> Result<Vec<u8>> {
    parse(body)?.normalize(target)
}

/// Read the first sheet of an in-memory workbook into a [`Table`].
///
/// Cells are rendered in their display form: `42.0` becomes `"42"`, `true`
/// becomes `"TRUE"`, and a date cell becomes ISO text (`2024-01-15`, or
/// `2024-01-15T10:30:00` when it has a time part). Trailing empty cells of each
/// row are dropped.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the document cannot be opened or has no sheets.
pub fn parse(body: &[u8]) -> Result<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(body))
        .map_err(|e| Error::malformed(SourceFormat::Spreadsheet, e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::malformed(SourceFormat::Spreadsheet, "no sheets present"))?
        .map_err(|e| Error::malformed(SourceFormat::Spreadsheet, e.to_string()))?;

    let rows = range.rows().map(row_cells).collect();
    Ok(Table::new(SourceFormat::Spreadsheet, rows))
}

fn row_cells(row: &[Data]) -> Vec<String> {
    let used = row
        .iter()
        .rposition(|cell| !matches!(cell, Data::Empty))
        .map_or(0, |last| last + 1);

    row.iter().take(used).map(display).collect()
}

fn display(cell: &Data) -> String {
    match cell {
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(value) if value.is_duration() => value
            .as_duration()
            .map_or_else(|| cell.to_string(), |duration| {
                let seconds = duration.num_seconds();
                format!("{}:{:02}:{:02}", seconds / 3600, seconds % 3600 / 60, seconds % 60)
            }),
        Data::DateTime(value) => value
            .as_datetime()
            .map_or_else(|| cell.to_string(), iso_datetime),
        Data::DateTimeIso(text) | Data::DurationIso(text) => text.clone(),
        other => other.to_string(),
    }
}

fn iso_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
