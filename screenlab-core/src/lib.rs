//! ScreenLab core — CSV tables, strategy output files, and the daily
//! position summary.
//!
//! This crate owns the parsing side of the system:
//! - `table` — tolerant CSV reader, table model, header maps
//! - `strategy` — screening output files and strategy naming
//! - `summary` — the cross-strategy per-date aggregation
//!
//! Script invocation, file discovery, and the request flows live in
//! `screenlab-runner`.

pub mod strategy;
pub mod summary;
pub mod table;

pub use strategy::{strategy_name, StrategyFile};
pub use summary::{build_summary, DailySummary, Summary};
pub use table::{cell, read_csv_table, CsvTable, HeaderMap, TableError};
