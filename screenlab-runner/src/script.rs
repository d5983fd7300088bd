//! External script invocation.
//!
//! The screening scripts are opaque executables: they take a stock
//! identifier and/or mode flags, write CSV files into the output
//! directory, and report through text output and an exit status. The
//! identifier is passed as a discrete argument vector element, so no
//! shell ever parses it; the character allow-list stays on as defense
//! in depth.

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScreenConfig;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errors from launching or reaping a script process.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for script: {0}")]
    Wait(#[from] std::io::Error),
}

/// Outcome of one external script invocation.
///
/// A non-zero exit code and a timeout are both recoverable: the caller
/// surfaces them and continues to look for output files regardless.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptOutcome {
    /// The command line that ran, for display.
    pub command: String,
    /// Captured transcript: stdout lines followed by stderr lines.
    pub output: Vec<String>,
    /// Exit code, when the process exited on its own.
    pub exit_code: Option<i32>,
    /// True when the process was killed at the timeout deadline.
    pub timed_out: bool,
}

impl ScriptOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Remove every character outside `[0-9A-Za-z.]`.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '.')
        .collect()
}

/// Run the per-stock selection script for an already-sanitized
/// identifier.
///
/// An empty identifier performs no invocation and yields `None`. The
/// quiet variant forwards `--print N`, asking the script not to echo
/// its own result tables.
pub fn run_selection(
    config: &ScreenConfig,
    id: &str,
    quiet: bool,
) -> Result<Option<ScriptOutcome>, ScriptError> {
    if id.is_empty() {
        return Ok(None);
    }

    let mut args = vec![
        config.selection_script.display().to_string(),
        "--id".to_string(),
        id.to_string(),
    ];
    if quiet {
        args.push("--print".to_string());
        args.push("N".to_string());
    }

    run_command(
        &config.runtime,
        &args,
        Duration::from_secs(config.script_timeout_secs),
    )
    .map(Some)
}

/// Run the batch screening script, which takes no arguments.
pub fn run_batch_script(config: &ScreenConfig) -> Result<ScriptOutcome, ScriptError> {
    let args = vec![config.batch_script.display().to_string()];
    run_command(
        &config.runtime,
        &args,
        Duration::from_secs(config.script_timeout_secs),
    )
}

/// Spawn `program` with `args`, capture stdout and stderr, and enforce
/// a deadline by polling the child.
///
/// On expiry the child is killed and the partial transcript is
/// returned with `timed_out` set; expiry is not an error.
pub fn run_command(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<ScriptOutcome, ScriptError> {
    let command = format!("{program} {}", args.join(" "));
    info!(command = %command, "running external script");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ScriptError::Spawn {
            program: program.to_string(),
            source: e,
        })?;

    let deadline = Instant::now() + timeout;
    let mut timed_out = false;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break Some(status),
            None if Instant::now() >= deadline => {
                warn!(command = %command, timeout_secs = timeout.as_secs(), "script timed out, killing");
                let _ = child.kill();
                let _ = child.wait();
                timed_out = true;
                break None;
            }
            None => std::thread::sleep(POLL_INTERVAL),
        }
    };

    let mut output = Vec::new();
    collect_lines(child.stdout.take(), &mut output);
    collect_lines(child.stderr.take(), &mut output);

    let exit_code = status.and_then(|s| s.code());
    if let Some(code) = exit_code {
        if code != 0 {
            info!(command = %command, code, "script exited non-zero");
        }
    }

    Ok(ScriptOutcome {
        command,
        output,
        exit_code,
        timed_out,
    })
}

fn collect_lines<R: Read>(pipe: Option<R>, out: &mut Vec<String>) {
    let Some(mut pipe) = pipe else {
        return;
    };
    let mut buf = String::new();
    if pipe.read_to_string(&mut buf).is_ok() {
        out.extend(buf.lines().map(str::to_string));
    }
}
