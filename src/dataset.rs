use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::{MapName, RankTier};
use crate::error::{PredictError, Result};

/// Column order of every raw and combined stats file.
pub const COLUMNS: [&str; 10] = [
    "Rank",
    "Agent",
    "Kills",
    "Deaths",
    "Assists",
    "Win %",
    "Pick %",
    "Avg. Score",
    "First Blood %",
    "Matches",
];

pub const DATA_DIR: &str = "CompetitiveData";

/// One aggregate row for one agent in one (rank, map) context. Blank numeric
/// cells load as `None`; score and matches stay as the text the site printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStatRecord {
    #[serde(rename = "Rank")]
    pub rank: String,
    #[serde(rename = "Agent")]
    pub agent: String,
    #[serde(rename = "Kills")]
    pub kills: Option<f64>,
    #[serde(rename = "Deaths")]
    pub deaths: Option<f64>,
    #[serde(rename = "Assists")]
    pub assists: Option<f64>,
    #[serde(rename = "Win %")]
    pub win_rate: Option<f64>,
    #[serde(rename = "Pick %")]
    pub pick_rate: Option<f64>,
    #[serde(rename = "Avg. Score")]
    pub avg_score: String,
    #[serde(rename = "First Blood %")]
    pub first_blood_rate: Option<f64>,
    #[serde(rename = "Matches")]
    pub matches: String,
}

pub fn map_dir(base: &Path, rank: RankTier, map: MapName) -> PathBuf {
    base.join(DATA_DIR).join(rank.name()).join(map.name())
}

pub fn combined_file_name(rank: RankTier, map: MapName) -> String {
    format!("{}_{}_CombinedData.csv", rank.name(), map.name())
}

pub fn combined_path(base: &Path, rank: RankTier, map: MapName) -> PathBuf {
    map_dir(base, rank, map).join(combined_file_name(rank, map))
}

pub fn read_records_from<R: Read>(rdr: R) -> std::result::Result<Vec<AgentStatRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    reader.deserialize::<AgentStatRecord>().collect()
}

pub fn write_records_to<W: Write>(
    wtr: W,
    records: &[AgentStatRecord],
) -> std::result::Result<(), csv::Error> {
    // Header is written by hand so a page with no rows still gets one.
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(wtr);
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> Result<Vec<AgentStatRecord>> {
    let file = fs::File::open(path).map_err(|err| PredictError::io(path, err))?;
    read_records_from(file).map_err(|err| PredictError::csv(path, err))
}

/// Overwrites `path`.
pub fn write_records(path: &Path, records: &[AgentStatRecord]) -> Result<()> {
    let file = fs::File::create(path).map_err(|err| PredictError::io(path, err))?;
    write_records_to(file, records).map_err(|err| PredictError::csv(path, err))
}

pub fn load_data(rank: RankTier, map: MapName, base: &Path) -> Result<Vec<AgentStatRecord>> {
    let path = combined_path(base, rank, map);
    if !path.is_file() {
        return Err(PredictError::NotFound {
            rank: rank.name().to_string(),
            map: map.name().to_string(),
            path,
        });
    }
    read_records(&path)
}

/// Keeps rows whose agent is listed, in their original order. Repeated rows
/// for an agent are separate observations and all survive.
pub fn filter_agents<S: AsRef<str>>(records: &[AgentStatRecord], agents: &[S]) -> Vec<AgentStatRecord> {
    records
        .iter()
        .filter(|r| agents.iter().any(|a| a.as_ref() == r.agent))
        .cloned()
        .collect()
}

pub fn load_and_filter_data<S: AsRef<str>>(
    rank: RankTier,
    map: MapName,
    base: &Path,
    team1: &[S],
    team2: &[S],
) -> Result<Vec<AgentStatRecord>> {
    let data = load_data(rank, map, base)?;
    let selected: Vec<&str> = team1
        .iter()
        .chain(team2.iter())
        .map(|a| a.as_ref())
        .collect();
    Ok(filter_agents(&data, &selected))
}
