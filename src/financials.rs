//! Income statement extractor
//!
//! The financials site embeds its data as a JavaScript object literal inside
//! an inline script block, not as strict JSON (bareword keys, shorthand
//! decimals). The extractor locates the script, captures the `financialData`
//! object, and repairs the text into something serde_json will accept.
//!
//! Extraction is regex-driven and breaks silently if the upstream markup
//! changes; the only failure signal for that is the downstream decode error.

use crate::config::Config;
use crate::error::FinancialsError;
use crate::models::FinancialRecord;
use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Marker identifying the script block that carries the financial payload
const DATA_SCRIPT_MARKER: &str = "const data";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

lazy_static! {
    static ref SCRIPT_BLOCK: Regex =
        Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("valid script regex");
    static ref FINANCIAL_DATA: Regex =
        Regex::new(r"(?s)financialData:\s*(\{.*?\})").expect("valid payload regex");
    static ref BARE_KEY: Regex = Regex::new(r"(\w+):").expect("valid key regex");
    static ref NEG_DECIMAL: Regex = Regex::new(r"(-)\.(\d+)").expect("valid decimal regex");
    static ref POS_DECIMAL: Regex = Regex::new(r"([:, \[])\.(\d+)").expect("valid decimal regex");
}

/// HTTP client for the financials site, with browser-mimicking headers and a
/// randomized politeness delay before each request.
pub struct FinancialsClient {
    client: Client,
    base_url: String,
    delay_ms: (u64, u64),
}

impl FinancialsClient {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.financials_base_url.trim_end_matches('/').to_string(),
            delay_ms: config.scrape_delay_ms,
        }
    }

    /// Fetch and parse the income statement for a ticker.
    ///
    /// The ticker is embedded in the URL path verbatim; malformed tickers
    /// surface as a 404-class `Request` failure rather than being validated
    /// up front.
    pub async fn fetch_income_statement(
        &self,
        ticker: &str,
    ) -> std::result::Result<FinancialRecord, FinancialsError> {
        let url = format!("{}/stocks/{}/financials/", self.base_url, ticker);

        // Short randomized pause to mimic human browsing cadence. A zero max
        // bound disables it (tests rely on this).
        let (min_ms, max_ms) = self.delay_ms;
        if max_ms > 0 {
            let wait = rand::rng().random_range(min_ms..=max_ms);
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }

        debug!(%ticker, %url, "Fetching financials page");

        let response = self
            .client
            .get(&url)
            .header("User-Agent", BROWSER_USER_AGENT)
            .header("Accept-Language", "en-US,en;q=0.9")
            .header("Referer", "https://www.google.com/")
            .header("DNT", "1")
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Connection", "keep-alive")
            .send()
            .await
            .map_err(|e| FinancialsError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinancialsError::Request(format!(
                "HTTP {} for {}",
                status, url
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FinancialsError::Request(e.to_string()))?;

        parse_financials_page(&body)
    }
}

/// Walk the page's inline scripts and parse the embedded financial payload.
pub fn parse_financials_page(
    html: &str,
) -> std::result::Result<FinancialRecord, FinancialsError> {
    let script = locate_data_script(html).ok_or(FinancialsError::NotFound)?;
    let block = extract_financial_block(script).ok_or(FinancialsError::NotFound)?;
    let repaired = repair_financial_json(block);

    serde_json::from_str(&repaired).map_err(|e| FinancialsError::Decode(e.to_string()))
}

/// First inline script block containing the `const data` marker, if any.
pub fn locate_data_script(html: &str) -> Option<&str> {
    SCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|content| content.contains(DATA_SCRIPT_MARKER))
}

/// Capture the `financialData: { ... }` object inside a script block.
///
/// The capture is non-greedy, so a payload with nested objects truncates at
/// the first closing brace and fails JSON decoding downstream.
pub fn extract_financial_block(script: &str) -> Option<&str> {
    FINANCIAL_DATA
        .captures(script)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Repair a near-JSON object literal into strict JSON.
///
/// Three ordered passes: quote bareword keys, then give negative and positive
/// shorthand decimals their leading zero. The passes are order-sensitive, and
/// the positive-decimal pass only fires after a `:`/`,`/space/`[` delimiter
/// so it cannot touch digits inside already-valid tokens. Keys already quoted
/// and decimals already zero-prefixed pass through unchanged.
pub fn repair_financial_json(block: &str) -> String {
    let repaired = BARE_KEY.replace_all(block, "\"${1}\":");
    let repaired = NEG_DECIMAL.replace_all(&repaired, "${1}0.${2}");
    let repaired = POS_DECIMAL.replace_all(&repaired, "${1}0.${2}");
    repaired.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE_PAGE: &str = r#"<html><head>
        <script src="/build/app.js"></script>
        <script>window.__sveltekit = {};</script>
        </head><body>
        <script>const data = [{type:"data",data:{financialData:{revenue:100,margin:-.05,growth:.12}}}];</script>
        </body></html>"#;

    #[test]
    fn test_locates_marker_script() {
        let script = locate_data_script(SAMPLE_PAGE);
        assert!(script.is_some());
        assert!(script.unwrap().contains("financialData"));
    }

    #[test]
    fn test_missing_marker_script_is_not_found() {
        let html = "<html><script>var x = 1;</script></html>";
        let err = parse_financials_page(html).unwrap_err();
        assert!(matches!(err, FinancialsError::NotFound));
        assert_eq!(err.to_string(), "Income statement data not found");
    }

    #[test]
    fn test_marker_script_without_payload_is_not_found() {
        let html = "<html><script>const data = [];</script></html>";
        let err = parse_financials_page(html).unwrap_err();
        assert!(matches!(err, FinancialsError::NotFound));
    }

    #[test]
    fn test_repair_and_parse_sample_fragment() {
        let record = parse_financials_page(SAMPLE_PAGE).unwrap();
        assert_eq!(record.get("revenue"), Some(&json!(100)));
        assert_eq!(record.get("margin"), Some(&json!(-0.05)));
        assert_eq!(record.get("growth"), Some(&json!(0.12)));
    }

    #[test]
    fn test_repair_decimal_delimiters() {
        let repaired = repair_financial_json("{a:-.5,b:.5,c:[.25,.75]}");
        let parsed: serde_json::Value = serde_json::from_str(&repaired).unwrap();
        assert_eq!(parsed, json!({"a": -0.5, "b": 0.5, "c": [0.25, 0.75]}));
    }

    #[test]
    fn test_repair_is_idempotent_on_valid_json() {
        let valid = r#"{"revenue":100,"margin":-0.05,"growth":0.12}"#;
        let once = repair_financial_json(valid);
        let twice = repair_financial_json(&once);
        assert_eq!(once, valid);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_nested_braces_truncate_at_first_close() {
        let script = "const data = {financialData: {a:1,b:{c:2}}};";
        let block = extract_financial_block(script).unwrap();
        assert_eq!(block, "{a:1,b:{c:2}");
    }

    #[test]
    fn test_truncated_nested_payload_is_decode_error() {
        let html = "<html><script>const data = {financialData: {a:1,b:{c:2}}};</script></html>";
        let err = parse_financials_page(html).unwrap_err();
        assert!(matches!(err, FinancialsError::Decode(_)));
        assert!(err.to_string().starts_with("JSON parsing error:"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_request_error() {
        let config = Config {
            financials_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            scrape_delay_ms: (0, 0),
            ..Config::default()
        };

        let client = FinancialsClient::new(&config);
        let err = client.fetch_income_statement("AAPL").await.unwrap_err();
        assert!(matches!(err, FinancialsError::Request(_)));
        assert!(err.to_string().starts_with("Request failed:"));
    }
}
