use anyhow::Context;
use reqwest::blocking::Client;

use crate::config::Config;
use crate::error::{PredictError, Result};

/// Anything that can turn a URL into a page body. The scraper only needs this.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

pub fn http_client(config: &Config) -> Result<Client> {
    // No timeout unless configured; a stalled endpoint stalls the refresh.
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .build()
        .context("failed to build http client")
        .map_err(|err| PredictError::Network {
            url: config.stats_url.clone(),
            reason: format!("{err:#}"),
        })
}

impl PageFetcher for Client {
    fn fetch(&self, url: &str) -> Result<String> {
        let network = |reason: String| PredictError::Network {
            url: url.to_string(),
            reason,
        };

        let resp = self
            .get(url)
            .send()
            .map_err(|err| network(err.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|err| network(format!("failed reading body: {err}")))?;
        if !status.is_success() {
            return Err(network(format!("http {status}")));
        }
        Ok(body)
    }
}
