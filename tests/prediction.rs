use std::fs;
use std::path::{Path, PathBuf};

use valorant_predictor::PredictError;
use valorant_predictor::catalog::{MapName, RankTier};
use valorant_predictor::dataset::{self, AgentStatRecord};
use valorant_predictor::predict::{TEAM1_WINS, TEAM2_WINS, Winner, get_prediction};
use valorant_predictor::rates;

const TEAM1: [&str; 5] = ["Jett", "Sage", "Omen", "Sova", "Killjoy"];
const TEAM2: [&str; 5] = ["Raze", "Skye", "Viper", "Cypher", "Reyna"];

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("valorant_predictor_{name}"));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// Two rows per agent, wins and losses alternating, plus a few unrelated rows.
fn seed_gold_ascent(base: &Path) {
    let mut records = Vec::new();
    for (i, agent) in TEAM1.iter().chain(&TEAM2).enumerate() {
        for j in 0..2 {
            let win = if (i + j) % 2 == 0 { 0.53 } else { 0.46 };
            records.push(AgentStatRecord {
                rank: format!("{}", 2 * i + j + 1),
                agent: agent.to_string(),
                kills: Some(12.0 + i as f64 * 0.5),
                deaths: Some(14.0 - j as f64),
                assists: if i == 3 && j == 1 { None } else { Some(4.0 + j as f64) },
                win_rate: Some(win),
                pick_rate: Some(0.05 + 0.01 * i as f64 + 0.02 * j as f64),
                avg_score: format!("{}", 190 + 5 * i + j),
                first_blood_rate: Some(0.08 + 0.005 * i as f64),
                matches: format!("{}", 1000 + 37 * i + 11 * j),
            });
        }
    }
    records.push(AgentStatRecord {
        rank: "21".into(),
        agent: "Neon".into(),
        kills: Some(16.0),
        deaths: Some(15.0),
        assists: Some(3.0),
        win_rate: Some(0.6),
        pick_rate: Some(0.02),
        avg_score: "230".into(),
        first_blood_rate: Some(0.2),
        matches: "800".into(),
    });

    let path = dataset::combined_path(base, RankTier::Gold, MapName::Ascent);
    fs::create_dir_all(path.parent().expect("parent")).expect("map dir");
    dataset::write_records(&path, &records).expect("combined file");
}

#[test]
fn scenario_prediction_is_well_formed_and_deterministic() {
    let base = scratch_dir("predict_scenario");
    seed_gold_ascent(&base);

    let first = get_prediction(&base, "Gold", "Ascent", &TEAM1, &TEAM2).expect("prediction");
    let second = get_prediction(&base, "gold", "ascent", &TEAM1, &TEAM2).expect("prediction");
    assert_eq!(first, second);

    assert!((first.team1_probability + first.team2_probability - 100.0).abs() < 1e-9);
    assert!((0.0..=100.0).contains(&first.team1_probability));
    assert!((0.0..=1.0).contains(&first.accuracy));

    let label = match first.winner {
        Winner::Team1 => {
            assert!(first.team1_probability > 50.0);
            TEAM1_WINS
        }
        Winner::Team2 => {
            assert!(first.team1_probability <= 50.0);
            TEAM2_WINS
        }
    };
    let expected = format!("{label}\nPrediction Accuracy: {:.2}%", first.accuracy * 100.0);
    assert_eq!(first.result, expected);
    let _ = fs::remove_dir_all(&base);
}

#[test]
fn validation_runs_before_any_io() {
    let base = scratch_dir("predict_validation");
    assert!(!base.exists());

    let err = get_prediction(&base, "Gold", "Ascent", &TEAM1[..4], &TEAM2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please select all 5 agents for both Team 1 and Team 2."
    );
    let err = get_prediction(&base, "", "Ascent", &TEAM1, &TEAM2).unwrap_err();
    assert_eq!(err.to_string(), "Please select a rank.");
    let err = get_prediction(&base, "Gold", "", &TEAM1, &TEAM2).unwrap_err();
    assert_eq!(err.to_string(), "Please select a map.");
    assert!(!base.exists());
}

#[test]
fn missing_combined_file_is_not_found() {
    let base = scratch_dir("predict_missing");
    seed_gold_ascent(&base);
    let err = get_prediction(&base, "Gold", "Bind", &TEAM1, &TEAM2).unwrap_err();
    assert!(matches!(err, PredictError::NotFound { .. }), "{err}");
    let _ = fs::remove_dir_all(&base);
}

#[test]
fn single_outcome_data_cannot_train() {
    let base = scratch_dir("predict_single_class");
    let records: Vec<AgentStatRecord> = TEAM1
        .iter()
        .chain(&TEAM2)
        .map(|agent| AgentStatRecord {
            rank: "1".into(),
            agent: agent.to_string(),
            kills: Some(15.0),
            deaths: Some(15.0),
            assists: Some(5.0),
            win_rate: Some(0.3),
            pick_rate: Some(0.1),
            avg_score: "200".into(),
            first_blood_rate: Some(0.1),
            matches: "100".into(),
        })
        .collect();
    let path = dataset::combined_path(&base, RankTier::Iron, MapName::Lotus);
    fs::create_dir_all(path.parent().expect("parent")).expect("map dir");
    dataset::write_records(&path, &records).expect("combined file");

    let err = get_prediction(&base, "Iron", "Lotus", &TEAM1, &TEAM2).unwrap_err();
    assert!(matches!(err, PredictError::Training(_)), "{err}");
    let _ = fs::remove_dir_all(&base);
}

#[test]
fn rates_are_scoped_to_the_roster() {
    let base = scratch_dir("predict_rates");
    seed_gold_ascent(&base);
    let roster: Vec<&str> = TEAM1.iter().chain(&TEAM2).copied().collect();

    let pick = rates::get_pick_rate("Jett", RankTier::Gold, MapName::Ascent, &base, &roster)
        .expect("pick rate")
        .expect("jett has rows");
    assert!((pick - 0.06).abs() < 1e-9);
    let win = rates::get_win_rate("Jett", RankTier::Gold, MapName::Ascent, &base, &roster)
        .expect("win rate")
        .expect("jett has rows");
    assert!((win - 0.495).abs() < 1e-9);

    // Neon has data but is not in the matchup.
    let neon = rates::get_pick_rate("Neon", RankTier::Gold, MapName::Ascent, &base, &roster)
        .expect("pick rate");
    assert_eq!(neon, None);

    let table = rates::roster_rates(RankTier::Gold, MapName::Ascent, &base, &roster)
        .expect("roster rates");
    assert_eq!(table.len(), 10);
    assert!(table.iter().all(|r| r.pick_rate.is_some() && r.win_rate.is_some()));
    let _ = fs::remove_dir_all(&base);
}
