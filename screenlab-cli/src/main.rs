//! ScreenLab CLI — run the screening scripts and display their CSV
//! output.
//!
//! Commands:
//! - `screen` — run the per-stock selection script, then show each
//!   strategy's raw table plus the combined daily summary
//! - `batch` — show the five fixed batch screening tables, optionally
//!   regenerating them first

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use screenlab_runner::{run_batch, run_screen, ScreenConfig, ScreenOptions};

#[derive(Parser)]
#[command(
    name = "screenlab",
    about = "Viewer for external stock-screening output"
)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when absent.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the selection script for one stock and display its output.
    Screen {
        /// Stock identifier. Sanitized to `[0-9A-Za-z.]` before use.
        id: String,

        /// Do not invoke the selection script; only read existing files.
        #[arg(long, default_value_t = false)]
        no_run: bool,

        /// Ask the script to skip echoing its own tables (--print N).
        #[arg(long, default_value_t = false)]
        quiet: bool,

        /// Print the report as JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Display the fixed batch screening tables.
    Batch {
        /// Invoke the batch script before reading the result files.
        #[arg(long, default_value_t = false)]
        regenerate: bool,

        /// Print the report as JSON instead of tables.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Screen {
            id,
            no_run,
            quiet,
            json,
        } => screen_cmd(&config, &id, ScreenOptions { no_run, quiet }, json),
        Commands::Batch { regenerate, json } => batch_cmd(&config, regenerate, json),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScreenConfig> {
    match path {
        Some(path) => ScreenConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ScreenConfig::default()),
    }
}

fn screen_cmd(config: &ScreenConfig, id: &str, options: ScreenOptions, json: bool) -> Result<()> {
    let report = run_screen(config, id, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.identifier.is_empty() {
        println!("Identifier is empty after sanitization; nothing to do.");
        return Ok(());
    }

    if let Some(script) = &report.script {
        print!("{}", render::render_script_outcome(script));
        println!();
    }

    if report.files.is_empty() {
        println!("No results for {}.", report.identifier);
        return Ok(());
    }

    for file in &report.files {
        println!("=== {} ({}) ===", file.strategy, file.path.display());
        print!("{}", render::render_table(&file.table));
        println!();
    }

    println!("=== Daily summary ({}) ===", report.identifier);
    print!("{}", render::render_summary(&report.summary));

    Ok(())
}

fn batch_cmd(config: &ScreenConfig, regenerate: bool, json: bool) -> Result<()> {
    let report = run_batch(config, regenerate)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(script) = &report.script {
        print!("{}", render::render_script_outcome(script));
        println!();
    }

    for table in &report.tables {
        print!("{}", render::render_batch_table(table));
        println!();
    }

    Ok(())
}
