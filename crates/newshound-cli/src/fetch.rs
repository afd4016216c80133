//! Article page fetching.

use crate::error::{CliError, Result};
use std::time::Duration;
use tracing::info;

/// Some publishers serve bot-detection pages to unknown agents; a plain
/// browser agent string gets the same markup a reader sees.
const USER_AGENT: &str = "Mozilla/5.0";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch a page's HTML.
pub fn fetch(url: &str) -> Result<String> {
    info!(url, "fetching page");
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| CliError::Fetch(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| CliError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Fetch(format!("{url} returned {status}")));
    }

    response.text().map_err(|e| CliError::Fetch(e.to_string()))
}
