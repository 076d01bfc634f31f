use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{MapName, SUB_RANKS};
use crate::config::Config;
use crate::error::Result;
use crate::http_client::{self, PageFetcher};
use crate::scrape::{self, SelectorParser, StatsPageParser};
use crate::store::{self, OrganizeSummary};

#[derive(Debug, Clone, Serialize)]
pub struct RefreshSummary {
    pub pages: usize,
    pub rows: usize,
    pub files_moved: usize,
    pub combined_written: usize,
    pub keys_skipped: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Scrape every sub-rank on every map into the base directory, then organize.
pub fn refresh(config: &Config) -> Result<RefreshSummary> {
    let client = http_client::http_client(config)?;
    let parser = SelectorParser::new(&config.row_selector)?;
    refresh_with(config, &client, &parser)
}

/// Same as [`refresh`] with caller-supplied fetcher and parser.
pub fn refresh_with(
    config: &Config,
    fetcher: &dyn PageFetcher,
    parser: &dyn StatsPageParser,
) -> Result<RefreshSummary> {
    let started_at = Utc::now();
    store::create_directory(&config.base_dir)?;

    let report = scrape::scrape_data(
        fetcher,
        parser,
        &config.stats_url,
        &config.base_dir,
        &SUB_RANKS,
        &MapName::ALL,
    )?;
    let organized: OrganizeSummary = store::organize_data_files(&config.base_dir)?;
    let finished_at = Utc::now();

    info!(
        pages = report.pages,
        rows = report.rows,
        combined = organized.combined_written,
        secs = (finished_at - started_at).num_seconds(),
        "refresh complete"
    );
    Ok(RefreshSummary {
        pages: report.pages,
        rows: report.rows,
        files_moved: organized.files_moved,
        combined_written: organized.combined_written,
        keys_skipped: organized.skipped.len(),
        started_at,
        finished_at,
    })
}
