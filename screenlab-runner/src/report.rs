//! The single-stock screen flow.
//!
//! Sanitize the identifier, optionally invoke the selection script,
//! discover its `<id>_*.csv` output, parse each file, and build the
//! cross-strategy daily summary. One request in, one report out.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use screenlab_core::strategy::StrategyFile;
use screenlab_core::summary::{build_summary, Summary};
use screenlab_core::table::TableError;

use crate::config::ScreenConfig;
use crate::discover::{discover_strategy_files, DiscoverError};
use crate::script::{run_selection, sanitize_identifier, ScriptError, ScriptOutcome};

/// Errors that halt a screen request.
#[derive(Debug, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Options for one screen request.
#[derive(Debug, Clone, Default)]
pub struct ScreenOptions {
    /// Skip the selection script and only read existing output files.
    pub no_run: bool,
    /// Forward `--print N`, asking the script not to echo its tables.
    pub quiet: bool,
}

/// Everything one screen request produced.
#[derive(Debug, Serialize)]
pub struct ScreenReport {
    /// The identifier after sanitization. Empty means the request
    /// carried nothing usable and no work was done.
    pub identifier: String,
    /// Outcome of the selection script, when it was invoked.
    pub script: Option<ScriptOutcome>,
    /// One parsed table per discovered strategy file, in lexical path
    /// order.
    pub files: Vec<StrategyFile>,
    /// The cross-strategy daily summary.
    pub summary: Summary,
}

impl ScreenReport {
    fn empty(identifier: String) -> Self {
        Self {
            identifier,
            script: None,
            files: Vec::new(),
            summary: Summary::default(),
        }
    }
}

/// Run the screen flow for a raw, caller-supplied identifier.
///
/// A script failure (non-zero exit, timeout) is surfaced on the report
/// and does not stop file discovery; zero discovered files is a valid
/// empty result. The one fatal filesystem condition is a missing
/// selection output directory.
pub fn run_screen(
    config: &ScreenConfig,
    raw_id: &str,
    options: &ScreenOptions,
) -> Result<ScreenReport, ScreenError> {
    let id = sanitize_identifier(raw_id);
    if id.is_empty() {
        return Ok(ScreenReport::empty(id));
    }

    let script = if options.no_run {
        None
    } else {
        run_selection(config, &id, options.quiet)?
    };

    let paths = discover_strategy_files(&config.selection_dir, &id)?;
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        debug!(path = %path.display(), "loading strategy file");
        files.push(StrategyFile::load(path)?);
    }

    let summary = build_summary(&files);

    Ok(ScreenReport {
        identifier: id,
        script,
        files,
        summary,
    })
}
