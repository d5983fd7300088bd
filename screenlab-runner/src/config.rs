//! Runner configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Paths and limits for the screening scripts and their output.
///
/// Every field has a default, so running without a config file works
/// out of the box against the conventional layout (`./selection.py`,
/// `./topgun.py`, `./selection/`, `./results/`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Interpreter the external scripts are run with.
    pub runtime: String,
    /// Per-stock selection script.
    pub selection_script: PathBuf,
    /// Batch screening script (run with no arguments).
    pub batch_script: PathBuf,
    /// Directory the selection script writes `<id>_*.csv` files into.
    pub selection_dir: PathBuf,
    /// Directory holding the fixed batch output files.
    pub results_dir: PathBuf,
    /// Upper bound on a single script invocation, in seconds.
    pub script_timeout_secs: u64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            runtime: "python3".to_string(),
            selection_script: PathBuf::from("./selection.py"),
            batch_script: PathBuf::from("./topgun.py"),
            selection_dir: PathBuf::from("./selection"),
            results_dir: PathBuf::from("./results"),
            script_timeout_secs: 120,
        }
    }
}

impl ScreenConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_conventional_layout() {
        let config = ScreenConfig::default();
        assert_eq!(config.runtime, "python3");
        assert_eq!(config.selection_dir, PathBuf::from("./selection"));
        assert_eq!(config.results_dir, PathBuf::from("./results"));
        assert_eq!(config.script_timeout_secs, 120);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config = ScreenConfig::from_toml(
            r#"
runtime = "python"
script_timeout_secs = 10
"#,
        )
        .unwrap();
        assert_eq!(config.runtime, "python");
        assert_eq!(config.script_timeout_secs, 10);
        assert_eq!(config.selection_script, PathBuf::from("./selection.py"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = ScreenConfig::from_toml("runtime = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScreenConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
