use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dataset::AgentStatRecord;

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").unwrap_or_else(|_| unreachable!("static pattern")));

pub const NUMERIC_COLUMNS: [&str; 8] = [
    "Kills",
    "Deaths",
    "Assists",
    "Win %",
    "Pick %",
    "Avg. Score",
    "First Blood %",
    "Matches",
];

pub const LABEL_COLUMN: &str = "Win %";
pub const AGENT_PREFIX: &str = "Agent_";

/// Dense numeric view of a filtered dataset. Missing cells are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn agent_column(agent: &str) -> String {
    format!("{AGENT_PREFIX}{agent}")
}

/// Numeric columns first, then one 0/1 column per agent present, sorted by
/// name. The agent set, and so the width, depends on the input rows.
pub fn preprocess_data(records: &[AgentStatRecord]) -> FeatureTable {
    let agents: BTreeSet<&str> = records.iter().map(|r| r.agent.as_str()).collect();

    let mut columns: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(agents.iter().map(|a| agent_column(a)));

    let rows = records
        .iter()
        .map(|r| {
            let mut row = vec![
                r.kills.unwrap_or(f64::NAN),
                r.deaths.unwrap_or(f64::NAN),
                r.assists.unwrap_or(f64::NAN),
                r.win_rate.unwrap_or(f64::NAN),
                r.pick_rate.unwrap_or(f64::NAN),
                parse_number(&r.avg_score).unwrap_or(f64::NAN),
                r.first_blood_rate.unwrap_or(f64::NAN),
                parse_matches(&r.matches).unwrap_or(f64::NAN),
            ];
            row.extend(agents.iter().map(|a| if *a == r.agent { 1.0 } else { 0.0 }));
            row
        })
        .collect();

    FeatureTable { columns, rows }
}

/// First run of digits, e.g. `"1204 matches"` -> 1204.
pub fn parse_matches(raw: &str) -> Option<f64> {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(|n| n as f64)
}

fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
