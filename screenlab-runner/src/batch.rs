//! The fixed-file batch flow.
//!
//! The batch script writes five CSV files with pre-assigned meanings
//! into the results directory. This flow optionally triggers the
//! script, then reads all five files independently; there is no
//! cross-file join. The file set is assumed complete: a missing file
//! or a file without a header row fails the whole request before any
//! table is returned.

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

use screenlab_core::table::{read_csv_table, CsvTable, TableError};

use crate::config::ScreenConfig;
use crate::script::{run_batch_script, ScriptError, ScriptOutcome};

/// One batch output category: a stable id, a display title, and the
/// fixed file it is read from.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BatchCategory {
    pub id: &'static str,
    pub title: &'static str,
    pub file_name: &'static str,
}

/// The five fixed batch outputs, in display order. Each file is one
/// stage of the batch script's screening funnel.
pub const BATCH_CATEGORIES: [BatchCategory; 5] = [
    BatchCategory {
        id: "data1",
        title: "Gainers between 3% and 5%",
        file_name: "data1.csv",
    },
    BatchCategory {
        id: "data2",
        title: "Volume ratio at least 1",
        file_name: "data2.csv",
    },
    BatchCategory {
        id: "data3",
        title: "Turnover rate between 5% and 10%",
        file_name: "data3.csv",
    },
    BatchCategory {
        id: "data4",
        title: "Float market cap between 5B and 20B",
        file_name: "data4.csv",
    },
    BatchCategory {
        id: "data5",
        title: "Price above the daily average",
        file_name: "data5.csv",
    },
];

/// Errors that halt a batch request.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("batch result file is missing: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("batch result file has no header row: {}", .0.display())]
    MissingHeader(PathBuf),

    #[error("failed to stat {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// One loaded batch table with its provenance.
#[derive(Debug, Serialize)]
pub struct BatchTable {
    pub category: BatchCategory,
    pub path: PathBuf,
    /// Last-modified timestamp of the file, for display.
    pub modified: DateTime<Local>,
    pub table: CsvTable,
}

/// Everything one batch request produced.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    /// Outcome of the batch script, when regeneration was requested.
    pub script: Option<ScriptOutcome>,
    pub tables: Vec<BatchTable>,
}

/// Run the batch flow: optionally regenerate, then load the five
/// fixed result files.
pub fn run_batch(config: &ScreenConfig, regenerate: bool) -> Result<BatchReport, BatchError> {
    let script = if regenerate {
        Some(run_batch_script(config)?)
    } else {
        None
    };

    // Verify the complete file set up front so a missing file fails
    // before any table is produced.
    let paths: Vec<PathBuf> = BATCH_CATEGORIES
        .iter()
        .map(|c| config.results_dir.join(c.file_name))
        .collect();
    for path in &paths {
        if !path.is_file() {
            return Err(BatchError::FileMissing(path.clone()));
        }
    }

    let mut tables = Vec::with_capacity(BATCH_CATEGORIES.len());
    for (category, path) in BATCH_CATEGORIES.iter().zip(paths) {
        let modified = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map(DateTime::<Local>::from)
            .map_err(|e| BatchError::Io {
                path: path.clone(),
                source: e,
            })?;

        let table = read_csv_table(&path)?;
        if table.header().is_none() {
            return Err(BatchError::MissingHeader(path));
        }

        tables.push(BatchTable {
            category: *category,
            path,
            modified,
            table,
        });
    }

    Ok(BatchReport { script, tables })
}
