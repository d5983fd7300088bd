//! CSV table model and reader.
//!
//! Screening output files vary in shape: column sets differ per
//! strategy, rows can be shorter than the header, and a file may not
//! exist at all at request time. The table keeps everything as strings
//! (row 0 is the header) and leaves interpretation to the callers.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors from reading a CSV file into a table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// An ordered sequence of rows of string cells. Row 0 is the header.
///
/// Rows are not required to match the header's cell count; absent
/// cells read as `None` through [`cell`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CsvTable {
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// The header row, if the table has any rows at all.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows (everything after the header).
    pub fn data_rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().skip(1).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read `path` into a table, honoring standard CSV quoting (quoted
/// delimiters, embedded newlines, doubled quotes).
///
/// A missing file yields an empty table. A malformed record is skipped
/// with a warning and never fails the file. The underlying handle is
/// dropped on every exit path.
pub fn read_csv_table(path: &Path) -> Result<CsvTable, TableError> {
    if !path.exists() {
        return Ok(CsvTable::default());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| TableError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        match record {
            Ok(rec) => rows.push(rec.iter().map(str::to_string).collect()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed CSV record");
            }
        }
    }

    Ok(CsvTable { rows })
}

/// Fetch a cell from a row. Missing and blank cells read as absent.
pub fn cell(row: &[String], index: usize) -> Option<&str> {
    row.get(index).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Column-name lookup built from a header row.
///
/// Names are trimmed and compared case-insensitively. Header order is
/// preserved so both lookups are deterministic.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    entries: Vec<(String, usize)>,
}

impl HeaderMap {
    pub fn from_header(header: &[String]) -> Self {
        let entries = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_lowercase(), i))
            .collect();
        Self { entries }
    }

    /// Exact (case-insensitive, trimmed) column lookup.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let needle = name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|(n, _)| *n == needle)
            .map(|(_, i)| *i)
    }

    /// Fuzzy column lookup: the first header, in header order, whose
    /// normalized name contains `token` as a substring. `hold` matches
    /// `hold_days`. Deliberately loose; the upstream scripts do not
    /// agree on exact column names.
    pub fn find_containing(&self, token: &str) -> Option<usize> {
        self.indices_containing(token).next()
    }

    /// All column indices whose normalized name contains `token`, in
    /// header order.
    pub fn indices_containing(&self, token: &str) -> impl Iterator<Item = usize> + '_ {
        let needle = token.trim().to_lowercase();
        self.entries
            .iter()
            .filter(move |(n, _)| n.contains(&needle))
            .map(|(_, i)| *i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_reads_as_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = read_csv_table(&dir.path().join("absent.csv")).unwrap();
        assert!(table.is_empty());
        assert!(table.header().is_none());
    }

    #[test]
    fn quoted_fields_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quoted.csv");

        let mut wtr = csv::Writer::from_path(&path).unwrap();
        wtr.write_record(["date", "note"]).unwrap();
        wtr.write_record(["2024-01-02", "a,b"]).unwrap();
        wtr.write_record(["2024-01-03", "line1\nline2"]).unwrap();
        wtr.write_record(["2024-01-04", "say \"hi\""]).unwrap();
        wtr.flush().unwrap();
        drop(wtr);

        let table = read_csv_table(&path).unwrap();
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[1][1], "a,b");
        assert_eq!(table.rows[2][1], "line1\nline2");
        assert_eq!(table.rows[3][1], "say \"hi\"");
    }

    #[test]
    fn ragged_rows_are_tolerated() {
        let (_dir, path) = write_temp("ragged.csv", "date,open,close\n2024-01-02,10\n2024-01-03,11,12,13\n");
        let table = read_csv_table(&path).unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].len(), 2);
        assert_eq!(table.rows[2].len(), 4);

        let row = &table.rows[1];
        assert_eq!(cell(row, 1), Some("10"));
        assert_eq!(cell(row, 2), None);
    }

    #[test]
    fn blank_cells_read_as_absent() {
        let row = vec!["2024-01-02".to_string(), "  ".to_string(), "5".to_string()];
        assert_eq!(cell(&row, 0), Some("2024-01-02"));
        assert_eq!(cell(&row, 1), None);
        assert_eq!(cell(&row, 2), Some("5"));
        assert_eq!(cell(&row, 9), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_trimmed() {
        let header = vec![" Date ".to_string(), "OPEN".to_string(), "hold_days".to_string()];
        let map = HeaderMap::from_header(&header);

        assert_eq!(map.index_of("date"), Some(0));
        assert_eq!(map.index_of("Open"), Some(1));
        assert_eq!(map.index_of("close"), None);
    }

    #[test]
    fn find_containing_takes_first_in_header_order() {
        let header = vec![
            "date".to_string(),
            "raw_signal".to_string(),
            "signal".to_string(),
            "hold_days".to_string(),
        ];
        let map = HeaderMap::from_header(&header);

        // First match in header order, not the exact name.
        assert_eq!(map.find_containing("signal"), Some(1));
        assert_eq!(map.find_containing("hold"), Some(3));
        assert_eq!(map.find_containing("position"), None);
    }
}
