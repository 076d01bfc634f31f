use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::catalog::{MapName, RankTier};
use crate::dataset::{self, DATA_DIR};
use crate::error::{PredictError, Result};

#[derive(Debug, Clone, Default)]
pub struct OrganizeSummary {
    pub files_moved: usize,
    pub combined_written: usize,
    pub rows_combined: usize,
    /// Keys with no raw files at all; their combined file is left untouched.
    pub skipped: Vec<(RankTier, MapName)>,
}

/// No-op when the directory already exists.
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| PredictError::io(path, err))
}

/// Raw names like `gold2_ascent.csv`: tier, optional sub-rank digits, map.
/// Anchored at both ends so the combined file never matches.
pub fn raw_file_pattern(rank: RankTier, map: MapName) -> Result<Regex> {
    let pattern = format!(
        "(?i)^{}[0-9]*_{}\\.csv$",
        regex::escape(rank.name()),
        regex::escape(map.name())
    );
    Regex::new(&pattern).map_err(|err| PredictError::Parse(err.to_string()))
}

pub fn matching_files(dir: &Path, pattern: &Regex) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| PredictError::io(dir, err))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| PredictError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if pattern.is_match(name) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Moves every source into `target_dir`, replacing same-named files there.
/// Each file is staged (copied and size-checked) before its source is removed.
pub fn move_and_delete_files(sources: &[PathBuf], target_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut moved = Vec::with_capacity(sources.len());
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = target_dir.join(name);
        stage_file(source, &target)?;
        fs::remove_file(source).map_err(|err| PredictError::io(source, err))?;
        moved.push(target);
    }
    Ok(moved)
}

fn stage_file(source: &Path, target: &Path) -> Result<()> {
    let copied = fs::copy(source, target).map_err(|err| PredictError::io(target, err))?;
    let expected = fs::metadata(source)
        .map_err(|err| PredictError::io(source, err))?
        .len();
    if copied != expected {
        return Err(PredictError::io(
            target,
            std::io::Error::other(format!("staged {copied} of {expected} bytes")),
        ));
    }
    Ok(())
}

/// Concatenates rows of `files` in order into `output`, replacing it.
/// Returns the number of rows written.
pub fn concat_files(files: &[PathBuf], output: &Path) -> Result<usize> {
    let mut rows = Vec::new();
    for file in files {
        rows.extend(dataset::read_records(file)?);
    }
    let tmp = output.with_extension("csv.tmp");
    dataset::write_records(&tmp, &rows)?;
    fs::rename(&tmp, output).map_err(|err| PredictError::io(output, err))?;
    Ok(rows.len())
}

/// Sorts raw scrape files in `base` into `CompetitiveData/<Rank>/<Map>/` and
/// rebuilds each key's combined file from every raw file now in place.
pub fn organize_data_files(base: &Path) -> Result<OrganizeSummary> {
    let root = base.join(DATA_DIR);
    create_directory(&root)?;

    let mut summary = OrganizeSummary::default();
    for rank in RankTier::ALL {
        create_directory(&root.join(rank.name()))?;
        for map in MapName::ALL {
            let map_dir = dataset::map_dir(base, rank, map);
            create_directory(&map_dir)?;

            let pattern = raw_file_pattern(rank, map)?;
            let sources = matching_files(base, &pattern)?;
            let moved = move_and_delete_files(&sources, &map_dir)?;
            summary.files_moved += moved.len();

            let raw_files = matching_files(&map_dir, &pattern)?;
            if raw_files.is_empty() {
                debug!(rank = %rank, map = %map, "no raw files, skipping combine");
                summary.skipped.push((rank, map));
                continue;
            }

            let combined = map_dir.join(dataset::combined_file_name(rank, map));
            let rows = concat_files(&raw_files, &combined)?;
            info!(rank = %rank, map = %map, files = raw_files.len(), rows, "wrote combined data");
            summary.combined_written += 1;
            summary.rows_combined += rows;
        }
    }
    Ok(summary)
}
