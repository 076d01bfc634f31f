use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::catalog::{MapName, SubRank};
use crate::dataset::{self, AgentStatRecord};
use crate::error::{PredictError, Result};
use crate::http_client::PageFetcher;

// First, second and third numeric tokens of the KDA cell.
static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\.\d+|\d+").unwrap_or_else(|_| unreachable!("static pattern"))
});

const MIN_CELLS: usize = 10;

/// Turns one stats page into rows. Markup knowledge stays behind this trait.
pub trait StatsPageParser {
    fn parse(&self, html: &str) -> Result<Vec<AgentStatRecord>>;
}

/// Rows come from a structural selector; cells are every `div` inside a row,
/// read positionally.
pub struct SelectorParser {
    rows: Selector,
    cells: Selector,
}

impl SelectorParser {
    pub fn new(row_selector: &str) -> Result<Self> {
        let rows = Selector::parse(row_selector)
            .map_err(|err| PredictError::Parse(format!("bad row selector: {err:?}")))?;
        let cells = Selector::parse("div")
            .map_err(|err| PredictError::Parse(format!("bad cell selector: {err:?}")))?;
        Ok(Self { rows, cells })
    }
}

impl StatsPageParser for SelectorParser {
    fn parse(&self, html: &str) -> Result<Vec<AgentStatRecord>> {
        let document = Html::parse_document(html);
        document
            .select(&self.rows)
            .enumerate()
            .map(|(idx, row)| {
                let cells: Vec<String> = row
                    .select(&self.cells)
                    .map(|cell| cell.text().collect::<String>())
                    .collect();
                parse_row_cells(&cells)
                    .map_err(|reason| PredictError::Parse(format!("row {}: {reason}", idx + 1)))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    pub pages: usize,
    pub rows: usize,
    pub files: Vec<PathBuf>,
}

pub fn construct_url(stats_url: &str, rank_id: u32, map: MapName) -> String {
    format!(
        "{stats_url}?sortBy=winRate&type=general&sortDirection=DESC&mode=competitive&rank={rank_id}&map={}",
        map.slug()
    )
}

/// Fetches and writes one raw file per (sub-rank, map). The first failure
/// aborts the run; files written before it stay on disk.
pub fn scrape_data(
    fetcher: &dyn PageFetcher,
    parser: &dyn StatsPageParser,
    stats_url: &str,
    out_dir: &Path,
    ranks: &[SubRank],
    maps: &[MapName],
) -> Result<ScrapeReport> {
    let mut report = ScrapeReport::default();
    for rank in ranks {
        for &map in maps {
            let url = construct_url(stats_url, rank.id, map);
            let html = fetcher.fetch(&url)?;
            let records = parser.parse(&html).map_err(|err| match err {
                PredictError::Parse(reason) => PredictError::Parse(format!("{url}: {reason}")),
                other => other,
            })?;

            let path = out_dir.join(rank.raw_file_name(map));
            dataset::write_records(&path, &records)?;
            info!(rank = rank.label, map = %map, rows = records.len(), "scraped stats page");

            report.pages += 1;
            report.rows += records.len();
            report.files.push(path);
        }
    }
    debug!(pages = report.pages, rows = report.rows, "scrape finished");
    Ok(report)
}

pub fn parse_row_cells(cells: &[String]) -> std::result::Result<AgentStatRecord, String> {
    if cells.len() < MIN_CELLS {
        return Err(format!(
            "expected at least {MIN_CELLS} cells, found {}",
            cells.len()
        ));
    }
    let (kills, deaths, assists) = parse_kda(&cells[3])?;
    Ok(AgentStatRecord {
        rank: cells[0].trim().to_string(),
        agent: cells[1].trim().to_string(),
        kills: Some(kills),
        deaths: Some(deaths),
        assists: Some(assists),
        win_rate: Some(parse_percent(&cells[5])?),
        pick_rate: Some(parse_percent(&cells[6])?),
        avg_score: cells[7].trim().to_string(),
        first_blood_rate: Some(parse_percent(&cells[8])?),
        matches: clean_matches(&cells[9]),
    })
}

/// "51.2%" -> 0.512
pub fn parse_percent(raw: &str) -> std::result::Result<f64, String> {
    let s = raw.trim().trim_end_matches('%').trim();
    s.parse::<f64>()
        .map(|v| v / 100.0)
        .map_err(|_| format!("not a percentage: {raw:?}"))
}

pub fn parse_kda(raw: &str) -> std::result::Result<(f64, f64, f64), String> {
    let mut tokens = NUMBER_TOKEN
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse::<f64>().ok());
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(k), Some(d), Some(a)) => Ok((k, d, a)),
        _ => Err(format!("KDA cell needs three numbers: {raw:?}")),
    }
}

/// `"12,345"` -> `12345`
pub fn clean_matches(raw: &str) -> String {
    raw.replace(',', "").trim().trim_matches('"').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parse_percent_handles_signs_and_spaces() {
        assert!((parse_percent("51.2%").unwrap() - 0.512).abs() < 1e-12);
        assert!((parse_percent(" 7 % ").unwrap() - 0.07).abs() < 1e-12);
        assert!(parse_percent("-").is_err());
    }

    #[test]
    fn kda_takes_first_three_numbers() {
        assert_eq!(parse_kda("18.2 / 15.1 / 4.3").unwrap(), (18.2, 15.1, 4.3));
        assert_eq!(parse_kda("K 18 D 15 A 4 (1.49)").unwrap(), (18.0, 15.0, 4.0));
        assert!(parse_kda("18.2 / 15.1").is_err());
    }

    #[test]
    fn matches_lose_quotes_and_separators() {
        assert_eq!(clean_matches("\"12,345\""), "12345");
        assert_eq!(clean_matches(" 987 "), "987");
    }

    #[test]
    fn row_cells_map_positionally() {
        let row = cells(&[
            "1",
            "Jett",
            "",
            "18.2 / 15.1 / 4.3",
            "1.49",
            "51.2%",
            "22.4%",
            "245",
            "18.1%",
            "\"12,345\"",
        ]);
        let rec = parse_row_cells(&row).unwrap();
        assert_eq!(rec.agent, "Jett");
        assert_eq!(rec.kills, Some(18.2));
        assert_eq!(rec.assists, Some(4.3));
        assert!((rec.win_rate.unwrap() - 0.512).abs() < 1e-12);
        assert_eq!(rec.avg_score, "245");
        assert_eq!(rec.matches, "12345");
    }

    #[test]
    fn short_rows_are_rejected() {
        let row = cells(&["1", "Jett", "", "18 / 15 / 4"]);
        assert!(parse_row_cells(&row).unwrap_err().contains("found 4"));
    }

    #[test]
    fn url_uses_rank_id_and_lowercase_map() {
        let url = construct_url("https://example.test/agents", 13, MapName::Fracture);
        assert!(url.starts_with("https://example.test/agents?sortBy=winRate"));
        assert!(url.contains("&rank=13&"));
        assert!(url.ends_with("&map=fracture"));
    }

    #[test]
    fn default_selector_compiles() {
        assert!(SelectorParser::new(crate::config::DEFAULT_ROW_SELECTOR).is_ok());
        assert!(SelectorParser::new("div >").is_err());
    }
}
