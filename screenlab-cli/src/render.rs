//! Plain-text rendering of parsed tables and reports.
//!
//! Stateless formatting only; every function takes a parsed structure
//! and returns a string for stdout.

use screenlab_core::summary::Summary;
use screenlab_core::table::CsvTable;
use screenlab_runner::{BatchTable, ScriptOutcome};

/// Render a raw CSV table with width-aligned columns.
pub fn render_table(table: &CsvTable) -> String {
    if table.rows.is_empty() {
        return "(empty)\n".to_string();
    }

    let columns = table.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &table.rows {
        let mut line = String::new();
        for (i, width) in widths.iter().enumerate() {
            let cell = row.get(i).map(String::as_str).unwrap_or("");
            line.push_str(&format!("{cell:<width$}", width = *width));
            if i + 1 < columns {
                line.push_str("  ");
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render the combined summary: date, market fields, one
/// signal/position/hold-days column set per strategy, and the derived
/// position summary.
///
/// A hold-days cell holding a positive integer gets a trailing `*` as
/// the active-position cue.
pub fn render_summary(summary: &Summary) -> String {
    let mut header = vec![
        "date".to_string(),
        "open".to_string(),
        "high".to_string(),
        "low".to_string(),
        "volume".to_string(),
        "amount".to_string(),
    ];
    for strategy in &summary.strategies {
        header.push(format!("{strategy}_signal"));
        header.push(format!("{strategy}_position"));
        header.push(format!("{strategy}_hold_days"));
    }
    header.push("position_summary".to_string());

    let mut rows = vec![header];
    for day in summary.rows.values() {
        let mut row = vec![
            day.date.clone(),
            day.open.clone().unwrap_or_default(),
            day.high.clone().unwrap_or_default(),
            day.low.clone().unwrap_or_default(),
            day.volume.clone().unwrap_or_default(),
            day.amount.clone().unwrap_or_default(),
        ];
        for strategy in &summary.strategies {
            row.push(day.cell(&format!("{strategy}_signal")).unwrap_or("").to_string());
            row.push(day.cell(&format!("{strategy}_position")).unwrap_or("").to_string());

            let hold = day.cell(&format!("{strategy}_hold_days")).unwrap_or("");
            if is_active_hold(hold) {
                row.push(format!("{hold}*"));
            } else {
                row.push(hold.to_string());
            }
        }
        row.push(format!("{:.1}", day.position_summary));
        rows.push(row);
    }

    render_table(&CsvTable { rows })
}

/// Render one batch table with its title, path, and last-modified
/// timestamp.
pub fn render_batch_table(batch: &BatchTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("--- {} ---\n", batch.category.title));
    out.push_str(&format!(
        "{}  (updated {})\n",
        batch.path.display(),
        batch.modified.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str(&render_table(&batch.table));
    out
}

/// Render a script invocation transcript.
pub fn render_script_outcome(outcome: &ScriptOutcome) -> String {
    let mut out = format!("$ {}\n", outcome.command);
    for line in &outcome.output {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    if outcome.timed_out {
        out.push_str("(script timed out and was killed)\n");
    } else {
        match outcome.exit_code {
            Some(0) => {}
            Some(code) => out.push_str(&format!("(exit code {code})\n")),
            None => out.push_str("(script terminated by signal)\n"),
        }
    }
    out
}

/// Active position cue: a hold-days value that is a positive integer.
fn is_active_hold(value: &str) -> bool {
    value.trim().parse::<i64>().map(|n| n > 0).unwrap_or(false)
}
