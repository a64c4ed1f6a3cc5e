//! Environment-driven configuration
//!
//! Every knob has a default so the binaries come up without a .env file.
//! The scrape delay bounds are configurable so tests can zero them out.

use crate::error::ToolServiceError;
use crate::Result;
use std::env;

const DEFAULT_FINANCIALS_BASE_URL: &str = "https://stockanalysis.com";
const DEFAULT_SEARCH_BASE_URL: &str = "https://html.duckduckgo.com/html/";
const DEFAULT_IMAGE_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/black-forest-labs/FLUX.1-schnell";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the financials site being scraped
    pub financials_base_url: String,
    /// Outbound HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// Randomized pre-scrape delay bounds in milliseconds (min, max).
    /// A max of 0 disables the delay entirely.
    pub scrape_delay_ms: (u64, u64),
    /// HTML search endpoint for the web search tool
    pub search_base_url: String,
    /// Maximum results returned by the web search tool
    pub search_max_results: usize,
    /// Hosted text-to-image inference endpoint
    pub image_endpoint: String,
    /// Hugging Face API token for the image endpoint (may be empty)
    pub hf_api_token: String,
    /// API server port
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let scrape_delay_min_ms = parse_env("SCRAPE_DELAY_MIN_MS", 500)?;
        let scrape_delay_max_ms = parse_env("SCRAPE_DELAY_MAX_MS", 2000)?;

        if scrape_delay_min_ms > scrape_delay_max_ms {
            return Err(ToolServiceError::ConfigError(format!(
                "SCRAPE_DELAY_MIN_MS ({}) exceeds SCRAPE_DELAY_MAX_MS ({})",
                scrape_delay_min_ms, scrape_delay_max_ms
            )));
        }

        Ok(Self {
            financials_base_url: env_or("FINANCIALS_BASE_URL", DEFAULT_FINANCIALS_BASE_URL),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30)?,
            scrape_delay_ms: (scrape_delay_min_ms, scrape_delay_max_ms),
            search_base_url: env_or("SEARCH_BASE_URL", DEFAULT_SEARCH_BASE_URL),
            search_max_results: parse_env("SEARCH_MAX_RESULTS", 5)?,
            image_endpoint: env_or("IMAGE_MODEL_ENDPOINT", DEFAULT_IMAGE_ENDPOINT),
            hf_api_token: env::var("HF_API_TOKEN").unwrap_or_default(),
            port: parse_env("PORT", 8080)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            financials_base_url: DEFAULT_FINANCIALS_BASE_URL.to_string(),
            request_timeout_secs: 30,
            scrape_delay_ms: (500, 2000),
            search_base_url: DEFAULT_SEARCH_BASE_URL.to_string(),
            search_max_results: 5,
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            hf_api_token: String::new(),
            port: 8080,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().map_err(|e| {
            ToolServiceError::ConfigError(format!("Invalid value for {}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.financials_base_url, DEFAULT_FINANCIALS_BASE_URL);
        assert_eq!(config.scrape_delay_ms, (500, 2000));
        assert_eq!(config.port, 8080);
    }
}
