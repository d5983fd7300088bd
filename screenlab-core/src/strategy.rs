//! Strategy output files.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::table::{read_csv_table, CsvTable, TableError};

/// One screening output file: the parsed table plus the strategy name
/// derived from the file name.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyFile {
    pub path: PathBuf,
    pub strategy: String,
    pub table: CsvTable,
}

impl StrategyFile {
    pub fn load(path: &Path) -> Result<Self, TableError> {
        Ok(Self {
            path: path.to_path_buf(),
            strategy: strategy_name(path),
            table: read_csv_table(path)?,
        })
    }
}

/// Derive the strategy name from a file name.
///
/// Selection output follows `<stockId>_<token>_<strategyName>.csv`;
/// with exactly three underscore-delimited segments the third one is
/// the strategy name. Any other shape falls back to the whole stem.
pub fn strategy_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() == 3 {
        parts[2].to_string()
    } else {
        stem
    }
}
