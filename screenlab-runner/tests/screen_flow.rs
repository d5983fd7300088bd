//! End-to-end screen flow over a populated selection directory.

use std::path::Path;

use screenlab_runner::{run_screen, ScreenConfig, ScreenOptions};

fn write_fixture(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn fixture_config(selection_dir: &Path) -> ScreenConfig {
    ScreenConfig {
        selection_dir: selection_dir.to_path_buf(),
        ..ScreenConfig::default()
    }
}

const NO_RUN: ScreenOptions = ScreenOptions {
    no_run: true,
    quiet: false,
};

#[test]
fn two_strategies_merge_into_one_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "X_a_Strat1.csv",
        "date,open,high,low,volume,signal,position,hold_days\n\
         2024-01-02,10.0,10.5,9.8,12000,1,500,3\n\
         2024-01-03,10.2,10.8,10.0,13000,0,500,4\n",
    );
    write_fixture(
        dir.path(),
        "X_b_Strat2.csv",
        "date,signal,position,hold_days\n\
         2024-01-02,1,200,1\n",
    );

    let report = run_screen(&fixture_config(dir.path()), "X", &NO_RUN).unwrap();

    assert_eq!(report.identifier, "X");
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.summary.strategies, vec!["Strat1", "Strat2"]);
    assert_eq!(report.summary.rows.len(), 2);

    let day1 = &report.summary.rows["2024-01-02"];
    assert_eq!(day1.open.as_deref(), Some("10.0"));
    assert_eq!(day1.cell("Strat1_position"), Some("500"));
    assert_eq!(day1.cell("Strat2_position"), Some("200"));
    assert!((day1.position_summary - 700.0).abs() < 1e-9);

    // Only Strat1 covers the second day.
    let day2 = &report.summary.rows["2024-01-03"];
    assert_eq!(day2.cell("Strat2_position"), None);
    assert!((day2.position_summary - 500.0).abs() < 1e-9);
}

#[test]
fn identifier_is_sanitized_before_discovery() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "X_a_Strat1.csv",
        "date,position\n2024-01-02,100\n",
    );

    // The junk around the identifier must not reach the glob.
    let report = run_screen(&fixture_config(dir.path()), " X $%", &NO_RUN).unwrap();

    assert_eq!(report.identifier, "X");
    assert_eq!(report.files.len(), 1);
}

#[test]
fn script_failure_does_not_block_file_parsing() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(
        dir.path(),
        "X_a_Strat1.csv",
        "date,position\n2024-01-02,100\n",
    );

    // `sh <selection_script> --id X` exits non-zero because the script
    // path does not exist; the flow must still read the files.
    let config = ScreenConfig {
        runtime: "sh".to_string(),
        selection_dir: dir.path().to_path_buf(),
        selection_script: dir.path().join("no-such-script.sh"),
        script_timeout_secs: 5,
        ..ScreenConfig::default()
    };
    let report = run_screen(&config, "X", &ScreenOptions::default()).unwrap();

    let script = report.script.expect("script outcome");
    assert!(!script.succeeded());
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.summary.rows.len(), 1);
}

#[test]
fn header_only_files_yield_columns_but_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path(), "X_a_Strat1.csv", "date,signal,position\n");

    let report = run_screen(&fixture_config(dir.path()), "X", &NO_RUN).unwrap();

    assert_eq!(report.summary.strategies, vec!["Strat1"]);
    assert!(report.summary.rows.is_empty());
}
