//! Web search tool backed by the DuckDuckGo HTML endpoint
//!
//! The HTML endpoint is server-rendered, so results can be pulled out with a
//! pair of regexes instead of a headless browser.

use crate::config::Config;
use crate::error::ToolServiceError;
use crate::models::{ToolInput, ToolOutput};
use crate::tools::Tool;
use crate::Result;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

lazy_static! {
    static ref RESULT_LINK: Regex =
        Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
            .expect("valid link regex");
    static ref RESULT_SNIPPET: Regex =
        Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)
            .expect("valid snippet regex");
    static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").expect("valid tag regex");
}

#[derive(Debug, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

pub struct WebSearchTool {
    client: Client,
    base_url: String,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.search_base_url.clone(),
            max_results: config.search_max_results,
        }
    }
}

#[async_trait::async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web and return titles, URLs, and snippets"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "max_results": { "type": "integer", "description": "Number of results", "minimum": 1, "maximum": 10 }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let query = super::require_str_param(input, "query")?;
        let max_results = input
            .parameters
            .get("max_results")
            .and_then(|v| v.as_u64())
            .map(|n| n as usize)
            .unwrap_or(self.max_results);

        debug!(%query, "Executing web search");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .header("User-Agent", "Mozilla/5.0 (compatible; financial-agent-tools/0.1)")
            .send()
            .await
            .map_err(|e| ToolServiceError::ToolError(format!("Search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolServiceError::ToolError(format!(
                "Search returned HTTP {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            ToolServiceError::ToolError(format!("Failed to read search response: {}", e))
        })?;

        let results = parse_search_results(&body, max_results);
        Ok(ToolOutput::ok(Value::String(format_results(
            query, &results,
        ))))
    }
}

/// Pull (title, url, snippet) triples out of the rendered results page.
pub fn parse_search_results(html: &str, max_results: usize) -> Vec<SearchResult> {
    let snippets: Vec<String> = RESULT_SNIPPET
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| strip_tags(m.as_str()))
        .collect();

    RESULT_LINK
        .captures_iter(html)
        .take(max_results)
        .enumerate()
        .filter_map(|(i, caps)| {
            let url = caps.get(1)?.as_str().to_string();
            let title = strip_tags(caps.get(2)?.as_str());
            let snippet = snippets.get(i).cloned().unwrap_or_default();
            Some(SearchResult {
                title,
                url,
                snippet,
            })
        })
        .collect()
}

fn strip_tags(fragment: &str) -> String {
    let text = HTML_TAG.replace_all(fragment, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'.", query);
    }

    let mut output = format!("Search results for '{}':\n\n", query);
    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. {}\n   URL: {}\n   {}\n\n",
            i + 1,
            result.title,
            result.url,
            result.snippet
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESULTS: &str = r#"
        <div class="result">
            <a rel="nofollow" class="result__a" href="https://example.com/one">First <b>Result</b></a>
            <a class="result__snippet" href="https://example.com/one">Snippet   for
            the first result</a>
        </div>
        <div class="result">
            <a rel="nofollow" class="result__a" href="https://example.com/two">Second Result</a>
            <a class="result__snippet" href="https://example.com/two">Second snippet</a>
        </div>"#;

    #[test]
    fn test_parses_titles_urls_and_snippets() {
        let results = parse_search_results(SAMPLE_RESULTS, 5);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "First Result");
        assert_eq!(results[0].url, "https://example.com/one");
        assert_eq!(results[0].snippet, "Snippet for the first result");
        assert_eq!(results[1].title, "Second Result");
    }

    #[test]
    fn test_respects_max_results() {
        let results = parse_search_results(SAMPLE_RESULTS, 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_formats_empty_results() {
        let text = format_results("rust agents", &[]);
        assert_eq!(text, "No results found for 'rust agents'.");
    }

    #[test]
    fn test_formats_numbered_listing() {
        let results = parse_search_results(SAMPLE_RESULTS, 5);
        let text = format_results("rust agents", &results);

        assert!(text.starts_with("Search results for 'rust agents':"));
        assert!(text.contains("1. First Result"));
        assert!(text.contains("2. Second Result"));
        assert!(text.contains("URL: https://example.com/two"));
    }
}
