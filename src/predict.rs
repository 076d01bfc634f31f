use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{self, MapName, RankTier};
use crate::dataset;
use crate::error::{PredictError, Result};
use crate::features::{self, agent_column};
use crate::model::{self, TrainedModel, WIN_THRESHOLD};

pub const TEAM_SIZE: usize = 5;

pub const TEAM1_WINS: &str = "Team 1 is predicted to win!";
pub const TEAM2_WINS: &str = "Team 2 is predicted to win!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    Team1,
    Team2,
}

impl Winner {
    pub fn label(self) -> &'static str {
        match self {
            Winner::Team1 => TEAM1_WINS,
            Winner::Team2 => TEAM2_WINS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub winner: Winner,
    /// Winner label plus holdout accuracy, ready to show.
    pub result: String,
    pub team1_probability: f64,
    pub team2_probability: f64,
    pub accuracy: f64,
}

/// A checked request: known tier and map, two rosters of five catalog agents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchupRequest {
    pub rank: RankTier,
    pub map: MapName,
    pub team1: Vec<&'static str>,
    pub team2: Vec<&'static str>,
}

impl MatchupRequest {
    pub fn roster(&self) -> Vec<&'static str> {
        self.team1.iter().chain(&self.team2).copied().collect()
    }
}

/// Pure check of user input; touches neither disk nor network.
pub fn validate_inputs<S: AsRef<str>>(
    rank: &str,
    map: &str,
    team1: &[S],
    team2: &[S],
) -> Result<MatchupRequest> {
    let invalid = |msg: String| PredictError::Validation(msg);

    if rank.trim().is_empty() {
        return Err(invalid("Please select a rank.".to_string()));
    }
    if map.trim().is_empty() {
        return Err(invalid("Please select a map.".to_string()));
    }
    let complete = |team: &[S]| {
        team.len() == TEAM_SIZE && team.iter().all(|a| !a.as_ref().trim().is_empty())
    };
    if !complete(team1) || !complete(team2) {
        return Err(invalid(format!(
            "Please select all {TEAM_SIZE} agents for both Team 1 and Team 2."
        )));
    }

    let rank_tier =
        RankTier::parse(rank).ok_or_else(|| invalid(format!("Unknown rank: {}.", rank.trim())))?;
    let map_name =
        MapName::parse(map).ok_or_else(|| invalid(format!("Unknown map: {}.", map.trim())))?;

    Ok(MatchupRequest {
        rank: rank_tier,
        map: map_name,
        team1: resolve_team("Team 1", team1)?,
        team2: resolve_team("Team 2", team2)?,
    })
}

fn resolve_team<S: AsRef<str>>(name: &str, team: &[S]) -> Result<Vec<&'static str>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(team.len());
    for raw in team {
        let raw = raw.as_ref().trim();
        let agent = catalog::canonical_agent(raw)
            .ok_or_else(|| PredictError::Validation(format!("Unknown agent: {raw}.")))?;
        if !seen.insert(agent) {
            return Err(PredictError::Validation(format!(
                "{name} has {agent} selected more than once."
            )));
        }
        out.push(agent);
    }
    Ok(out)
}

/// +1 for team 1 only, -1 for team 2 only, 0 elsewhere. Agents without a
/// column, or on both sides, add nothing.
pub fn synthetic_row(feature_names: &[String], team1: &[&str], team2: &[&str]) -> Vec<f64> {
    let mut row = vec![0.0; feature_names.len()];
    for agent in team1 {
        if !team2.contains(agent) {
            set_column(&mut row, feature_names, agent, 1.0);
        }
    }
    for agent in team2 {
        if !team1.contains(agent) {
            set_column(&mut row, feature_names, agent, -1.0);
        }
    }
    row
}

fn set_column(row: &mut [f64], feature_names: &[String], agent: &str, value: f64) {
    let column = agent_column(agent);
    if let Some(idx) = feature_names.iter().position(|c| *c == column) {
        row[idx] = value;
    }
}

pub fn predict_winner(model: &TrainedModel, team1: &[&str], team2: &[&str]) -> Prediction {
    // Fed to the classifier as is: the row already lives in one-hot
    // difference space.
    let row = synthetic_row(&model.feature_names, team1, team2);
    let p_team1 = model.classifier.predict_proba(&row);
    let winner = if p_team1 > WIN_THRESHOLD {
        Winner::Team1
    } else {
        Winner::Team2
    };

    let team1_probability = p_team1 * 100.0;
    Prediction {
        winner,
        result: format!(
            "{}\nPrediction Accuracy: {:.2}%",
            winner.label(),
            model.accuracy * 100.0
        ),
        team1_probability,
        team2_probability: 100.0 - team1_probability,
        accuracy: model.accuracy,
    }
}

/// Validate, load, retrain and predict. Nothing is cached between calls.
pub fn get_prediction<S: AsRef<str>>(
    base: &Path,
    rank: &str,
    map: &str,
    team1: &[S],
    team2: &[S],
) -> Result<Prediction> {
    let req = validate_inputs(rank, map, team1, team2)?;
    let records =
        dataset::load_and_filter_data(req.rank, req.map, base, &req.team1, &req.team2)?;
    if records.is_empty() {
        warn!(rank = %req.rank, map = %req.map, "no rows for any selected agent");
    }

    let table = features::preprocess_data(&records);
    let model = model::fit_model(&table)?;
    debug!(
        rows = table.len(),
        train = model.train_rows,
        test = model.test_rows,
        accuracy = model.accuracy,
        "trained matchup model"
    );
    Ok(predict_winner(&model, &req.team1, &req.team2))
}
