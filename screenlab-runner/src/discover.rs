//! Selection output discovery.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from enumerating the selection output directory.
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// The output directory is an operational precondition; its
    /// absence halts the whole request.
    #[error("selection output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("failed to list {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Find every `<id>_*.csv` under `dir`, sorted lexically.
///
/// An existing directory with no matches is an empty result, not an
/// error.
pub fn discover_strategy_files(dir: &Path, id: &str) -> Result<Vec<PathBuf>, DiscoverError> {
    if !dir.is_dir() {
        return Err(DiscoverError::OutputDirMissing(dir.to_path_buf()));
    }

    let prefix = format!("{id}_");
    let mut matches = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| DiscoverError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| DiscoverError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with(&prefix) && name.ends_with(".csv") {
            matches.push(entry.path());
        }
    }

    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "date\n").unwrap();
    }

    #[test]
    fn matches_only_the_identifier_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "600519_1_MovingAverageStrategy.csv");
        touch(dir.path(), "600519_2_BoxBreakoutStrategy.csv");
        touch(dir.path(), "300302_1_MovingAverageStrategy.csv");
        touch(dir.path(), "600519_notes.txt");

        let found = discover_strategy_files(dir.path(), "600519").unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "600519_1_MovingAverageStrategy.csv",
                "600519_2_BoxBreakoutStrategy.csv",
            ]
        );
    }

    #[test]
    fn results_are_sorted_lexically() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "X_b_Strat2.csv");
        touch(dir.path(), "X_a_Strat1.csv");

        let found = discover_strategy_files(dir.path(), "X").unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["X_a_Strat1.csv", "X_b_Strat2.csv"]);
    }

    #[test]
    fn no_matches_is_an_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_strategy_files(dir.path(), "600519").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = discover_strategy_files(&missing, "600519").unwrap_err();
        assert!(matches!(err, DiscoverError::OutputDirMissing(_)));
        assert!(err.to_string().contains("absent"));
    }
}
