use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_STATS_URL: &str = "https://blitz.gg/valorant/stats/agents";

// Generated class names; any site redesign breaks this.
pub const DEFAULT_ROW_SELECTOR: &str = "#main-content > div > div.⚡de27659b.inner-wrapper-col > div > div:nth-child(4) > section > div > div.⚡e728021b.⚡197afe09 > div > div.⚡516a5f38 > div > div";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct Config {
    /// Holds the raw scrape files and the `CompetitiveData/` tree.
    pub base_dir: PathBuf,
    pub stats_url: String,
    pub row_selector: String,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            stats_url: DEFAULT_STATS_URL.to_string(),
            row_selector: DEFAULT_ROW_SELECTOR.to_string(),
            request_timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Reads `AGENT_STATS_*` variables; anything unset keeps its default.
    /// Call `dotenvy` first if `.env` files should count.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();
        if let Some(dir) = non_empty_var("AGENT_STATS_DIR") {
            cfg.base_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty_var("AGENT_STATS_URL") {
            cfg.stats_url = url.trim_end_matches('?').to_string();
        }
        if let Some(selector) = non_empty_var("AGENT_STATS_SELECTOR") {
            cfg.row_selector = selector;
        }
        if let Some(raw) = non_empty_var("AGENT_STATS_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.request_timeout = Some(Duration::from_secs(secs)),
                _ => warn!(value = %raw, "ignoring invalid AGENT_STATS_TIMEOUT_SECS"),
            }
        }
        if let Some(agent) = non_empty_var("AGENT_STATS_USER_AGENT") {
            cfg.user_agent = agent;
        }
        cfg
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}
