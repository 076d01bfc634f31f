use std::path::Path;

use serde::Serialize;

use crate::catalog::{MapName, RankTier};
use crate::dataset::{self, AgentStatRecord};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRates {
    pub agent: String,
    pub pick_rate: Option<f64>,
    pub win_rate: Option<f64>,
}

/// Mean of the present values among `agent`'s rows; `None` when there are none.
pub fn mean_rate(
    records: &[AgentStatRecord],
    agent: &str,
    value: impl Fn(&AgentStatRecord) -> Option<f64>,
) -> Option<f64> {
    let (sum, count) = records
        .iter()
        .filter(|r| r.agent == agent)
        .filter_map(&value)
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn roster_records<S: AsRef<str>>(
    rank: RankTier,
    map: MapName,
    base: &Path,
    roster: &[S],
) -> Result<Vec<AgentStatRecord>> {
    let data = dataset::load_data(rank, map, base)?;
    Ok(dataset::filter_agents(&data, roster))
}

/// Average pick rate of `agent` within the rows of the selected roster.
pub fn get_pick_rate<S: AsRef<str>>(
    agent: &str,
    rank: RankTier,
    map: MapName,
    base: &Path,
    roster: &[S],
) -> Result<Option<f64>> {
    let rows = roster_records(rank, map, base, roster)?;
    Ok(mean_rate(&rows, agent, |r| r.pick_rate))
}

pub fn get_win_rate<S: AsRef<str>>(
    agent: &str,
    rank: RankTier,
    map: MapName,
    base: &Path,
    roster: &[S],
) -> Result<Option<f64>> {
    let rows = roster_records(rank, map, base, roster)?;
    Ok(mean_rate(&rows, agent, |r| r.win_rate))
}

/// Pick and win rate for every roster agent from a single load.
pub fn roster_rates<S: AsRef<str>>(
    rank: RankTier,
    map: MapName,
    base: &Path,
    roster: &[S],
) -> Result<Vec<AgentRates>> {
    let rows = roster_records(rank, map, base, roster)?;
    Ok(roster
        .iter()
        .map(|agent| {
            let agent = agent.as_ref();
            AgentRates {
                agent: agent.to_string(),
                pick_rate: mean_rate(&rows, agent, |r| r.pick_rate),
                win_rate: mean_rate(&rows, agent, |r| r.win_rate),
            }
        })
        .collect())
}
