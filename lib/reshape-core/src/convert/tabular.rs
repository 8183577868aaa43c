//! Header-keyed records from a grid of cells.

use serde_json::{Map, Value};

use crate::{Error, Result, SourceFormat, TargetFormat};

/// One data row keyed by header name. Every value is a string.
pub type Record = Map<String, Value>;

/// A grid of string cells whose first row holds the column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    source: SourceFormat,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Wrap the rows read from a `source` body.
    #[must_use]
    pub const fn new(source: SourceFormat, rows: Vec<Vec<String>>) -> Self {
        Self { source, rows }
    }

    /// The rows, header first.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Build one record per data row, in row order.
    ///
    /// Header and row cells are paired by position. A short row only yields
    /// the headers it reaches; cells past the last header are dropped. When a
    /// header repeats, the key keeps its first position and the later cell wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the table has no header row.
    pub fn records(&self) -> Result<Vec<Record>> {
        let (header, data) = self
            .rows
            .split_first()
            .ok_or_else(|| Error::malformed(self.source, "table has no header row"))?;

        let records = data
            .iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.clone(), Value::String(cell.clone())))
                    .collect()
            })
            .collect();
        Ok(records)
    }

    /// Encode the records as a `target` document: a JSON array of objects,
    /// or one `<item>` element per record under the XML root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if the table has no header row.
    pub fn normalize(&self, target: TargetFormat) -> Result<Vec<u8>> {
        let records = self.records()?;
        tracing::trace!(source = %self.source, %target, records = records.len(), "normalizing table");

        let value = Value::Array(records.into_iter().map(Value::Object).collect());
        super::transcode::encode_value(&value, target)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn table(rows: &[&[&str]]) -> Table {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        Table::new(SourceFormat::Csv, rows)
    }

    fn json_records(table: &Table) -> Value {
        let bytes = table.normalize(TargetFormat::Json).expect("normalize");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[test]
    fn header_and_one_row() {
        let table = table(&[&["a", "b"], &["1", "2"]]);
        assert_eq!(json_records(&table), json!([{ "a": "1", "b": "2" }]));
    }

    #[test]
    fn header_only_yields_empty_array() {
        let table = table(&[&["a", "b"]]);
        assert_eq!(json_records(&table), json!([]));
    }

    #[test]
    fn short_row_omits_missing_keys() {
        let table = table(&[&["a", "b", "c"], &["1", "2"]]);
        let records = table.records().expect("records");

        assert_eq!(records.len(), 1);
        let record = records.first().expect("one record");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a"), Some(&json!("1")));
        assert_eq!(record.get("b"), Some(&json!("2")));
        assert!(!record.contains_key("c"));
    }

    #[test]
    fn long_row_drops_extra_cells() {
        let table = table(&[&["a"], &["1", "2", "3"]]);
        assert_eq!(json_records(&table), json!([{ "a": "1" }]));
    }

    #[test]
    fn repeated_header_keeps_later_value() {
        let table = table(&[&["k", "k"], &["first", "second"]]);
        let records = table.records().expect("records");
        assert_eq!(records, vec![json!({ "k": "second" }).as_object().cloned().expect("object")]);
    }

    #[test]
    fn records_keep_row_and_column_order() {
        let table = table(&[&["z", "a"], &["1", "2"], &["3", "4"]]);
        let bytes = table.normalize(TargetFormat::Json).expect("normalize");
        assert_eq!(bytes, br#"[{"z":"1","a":"2"},{"z":"3","a":"4"}]"#);
    }

    #[test]
    fn xml_target_wraps_each_record() {
        let table = table(&[&["a", "b"], &["1", "2"]]);
        let bytes = table.normalize(TargetFormat::Xml).expect("normalize");
        assert_eq!(
            String::from_utf8(bytes).expect("utf8"),
            "<root><item><a>1</a><b>2</b></item></root>"
        );
    }

    #[test]
    fn empty_grid_is_malformed() {
        let err = Table::new(SourceFormat::Spreadsheet, Vec::new())
            .normalize(TargetFormat::Json)
            .expect_err("empty grid");
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("spreadsheet"));
    }
}
