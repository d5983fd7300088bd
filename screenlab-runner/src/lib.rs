//! ScreenLab runner — orchestration around the external screening
//! scripts.
//!
//! This crate builds on `screenlab-core` to provide:
//! - TOML configuration with full defaults
//! - Identifier sanitization and safe script invocation with a bounded
//!   timeout
//! - Discovery of per-stock `<id>_*.csv` output files
//! - The single-stock screen flow (invoke, discover, parse, summarize)
//! - The fixed-file batch flow (five pre-assigned category tables)

pub mod batch;
pub mod config;
pub mod discover;
pub mod report;
pub mod script;

pub use batch::{run_batch, BatchCategory, BatchError, BatchReport, BatchTable, BATCH_CATEGORIES};
pub use config::{ConfigError, ScreenConfig};
pub use discover::{discover_strategy_files, DiscoverError};
pub use report::{run_screen, ScreenError, ScreenOptions, ScreenReport};
pub use script::{
    run_batch_script, run_selection, sanitize_identifier, ScriptError, ScriptOutcome,
};
