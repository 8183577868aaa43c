//! CSV reader.

use crate::convert::Table;
use crate::{Error, Result, SourceFormat, TargetFormat};

/// Parse a comma-separated body and encode its records as `target`.
///
/// The first row is the header. Quoted fields follow RFC 4180; every row must
/// have as many fields as the first one.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the body is not valid UTF-8 CSV, if
/// field counts differ, or if it holds no rows at all.
pub fn read(body: &[u8], target: TargetFormat) -> Result<Vec<u8>> {
    parse(body)?.normalize(target)
}

/// Parse a comma-separated body into a [`Table`].
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if the body is not valid UTF-8 CSV or its
/// quoting is broken.
pub fn parse(body: &[u8]) -> Result<Table> {
    check_quotes(body)?;

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(body);

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_owned).collect())
                .map_err(|e| Error::malformed(SourceFormat::Csv, e.to_string()))
        })
        .collect::<Result<Vec<Vec<String>>>>()?;

    Ok(Table::new(SourceFormat::Csv, rows))
}

#[derive(Clone, Copy)]
enum Quoting {
    FieldStart,
    Bare,
    Quoted,
    // A `"` inside a quoted field, either closing it or escaping the next one.
    QuoteInQuoted,
}

/// Reject quotes the `csv` crate would silently keep.
///
/// A `"` may only open a field, close it, or be doubled inside it; a quoted
/// field must be closed before the body ends.
fn check_quotes(body: &[u8]) -> Result<()> {
    let mut state = Quoting::FieldStart;
    let mut line = 1;

    for &byte in body {
        state = match (state, byte) {
            (Quoting::FieldStart | Quoting::QuoteInQuoted, b'"') => Quoting::Quoted,
            (Quoting::Bare, b'"') => {
                return Err(Error::malformed(
                    SourceFormat::Csv,
                    format!("line {line}: bare \" in non-quoted field"),
                ));
            }
            (Quoting::Quoted, b'"') => Quoting::QuoteInQuoted,
            (Quoting::Quoted, _) => Quoting::Quoted,
            (_, b',' | b'\n' | b'\r') => Quoting::FieldStart,
            (Quoting::QuoteInQuoted, _) => {
                return Err(Error::malformed(
                    SourceFormat::Csv,
                    format!("line {line}: extraneous \" in quoted field"),
                ));
            }
            (Quoting::FieldStart | Quoting::Bare, _) => Quoting::Bare,
        };
        if byte == b'\n' {
            line += 1;
        }
    }

    if matches!(state, Quoting::Quoted) {
        return Err(Error::malformed(
            SourceFormat::Csv,
            format!("line {line}: quoted field is never closed"),
        ));
    }
    Ok(())
}
