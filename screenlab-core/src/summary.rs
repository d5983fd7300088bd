//! Cross-strategy daily summary.
//!
//! Joins every strategy file for one stock by date into a single row
//! per date: market fields from whichever file supplies them, a
//! signal/position/hold-days column set per strategy, and a running
//! `position_summary` scalar combining all strategies' position
//! contributions for that date.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::strategy::StrategyFile;
use crate::table::{cell, HeaderMap};

/// Market fields copied through when a file supplies them. When more
/// than one file carries the same field for the same date, the last
/// file processed wins.
const MARKET_FIELDS: [&str; 5] = ["open", "high", "low", "volume", "amount"];

/// Strategy whose position values arrive in raw capital units and are
/// scaled down by this divisor before entering the summary.
const VOLATILITY_CONTROL_STRATEGY: &str = "VolatilityControlStrategy";
const VOLATILITY_CONTROL_DIVISOR: f64 = 2000.0;

/// One date's merged view across every strategy file.
///
/// Dates stay literal strings; upstream writes ISO `YYYY-MM-DD`, which
/// keeps lexical order equal to date order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DailySummary {
    pub date: String,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub volume: Option<String>,
    pub amount: Option<String>,
    /// Strategy-qualified cells: `<strategy>_signal`,
    /// `<strategy>_position`, `<strategy>_hold_days`.
    pub cells: BTreeMap<String, String>,
    /// Sum of every strategy's rounded position contribution.
    pub position_summary: f64,
}

impl DailySummary {
    fn set_market_field(&mut self, field: &str, value: String) {
        match field {
            "open" => self.open = Some(value),
            "high" => self.high = Some(value),
            "low" => self.low = Some(value),
            "volume" => self.volume = Some(value),
            "amount" => self.amount = Some(value),
            _ => {}
        }
    }

    /// A strategy-qualified cell, e.g. `Strat1_signal`.
    pub fn cell(&self, key: &str) -> Option<&str> {
        self.cells.get(key).map(String::as_str)
    }
}

/// The aggregated table plus the column layout it was built from.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Rows keyed by the literal date string, iterated ascending.
    pub rows: BTreeMap<String, DailySummary>,
    /// Distinct strategy names in first-seen order.
    pub strategies: Vec<String>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the summary from a set of strategy files, in the given order.
pub fn build_summary(files: &[StrategyFile]) -> Summary {
    let mut summary = Summary::default();
    for file in files {
        add_file(&mut summary, file);
    }
    summary
}

fn add_file(summary: &mut Summary, file: &StrategyFile) {
    let Some(header) = file.table.header() else {
        return;
    };
    let headers = HeaderMap::from_header(header);

    if !summary.strategies.iter().any(|s| s == &file.strategy) {
        summary.strategies.push(file.strategy.clone());
    }

    let date_idx = headers.index_of("date");

    for row in file.table.data_rows() {
        // Prefer the `date` column; fall back to the first cell. Rows
        // without a usable date contribute nothing.
        let date = match date_idx {
            Some(i) => cell(row, i),
            None => cell(row, 0),
        };
        let Some(date) = date else {
            continue;
        };

        let entry = summary
            .rows
            .entry(date.to_string())
            .or_insert_with(|| DailySummary {
                date: date.to_string(),
                ..Default::default()
            });

        for field in MARKET_FIELDS {
            if let Some(value) = headers.index_of(field).and_then(|i| cell(row, i)) {
                entry.set_market_field(field, value.to_string());
            }
        }

        let signal = fuzzy_cell(&headers, row, "signal");
        let position = fuzzy_cell(&headers, row, "position");
        let hold = fuzzy_cell(&headers, row, "hold");

        if let Some(value) = signal {
            entry
                .cells
                .insert(format!("{}_signal", file.strategy), value.to_string());
        }
        if let Some(value) = position {
            entry
                .cells
                .insert(format!("{}_position", file.strategy), value.to_string());
        }
        if let Some(value) = hold {
            entry
                .cells
                .insert(format!("{}_hold_days", file.strategy), value.to_string());
        }

        entry.position_summary += contribution(&file.strategy, position, hold);
    }
}

/// First header containing `token` whose cell is present in this row.
///
/// The presence check is part of the lookup: a blank cell under the
/// first matching column falls through to the next matching column.
fn fuzzy_cell<'a>(headers: &HeaderMap, row: &'a [String], token: &str) -> Option<&'a str> {
    headers.indices_containing(token).find_map(|i| cell(row, i))
}

/// One strategy's rounded position contribution for one date.
///
/// The position value is parsed loosely (thousands separators and
/// percent signs stripped; unparseable reads as 0). A hold value that
/// is purely numeric and equal to 0 forces the contribution to 0:
/// a reported "no active hold" overrides any position reading.
fn contribution(strategy: &str, position: Option<&str>, hold: Option<&str>) -> f64 {
    let mut value = position.map(parse_position).unwrap_or(0.0);

    if strategy.eq_ignore_ascii_case(VOLATILITY_CONTROL_STRATEGY) {
        value /= VOLATILITY_CONTROL_DIVISOR;
    }

    if let Some(hold) = hold {
        if is_unsigned_integer(hold) && hold.trim().parse::<i64>() == Ok(0) {
            value = 0.0;
        }
    }

    (value * 10.0).round() / 10.0
}

fn parse_position(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && *c != '%').collect();
    cleaned.trim().parse().unwrap_or(0.0)
}

fn is_unsigned_integer(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}
