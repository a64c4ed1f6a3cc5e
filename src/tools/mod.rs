//! Tool trait and registry
//!
//! Tools are the callable units the hosting agent runtime invokes. Each one
//! performs at most a single outbound HTTP call per invocation and holds no
//! mutable state across calls.

pub mod image;
pub mod search;

use crate::config::Config;
use crate::error::ToolServiceError;
use crate::financials::FinancialsClient;
use crate::models::{ToolInput, ToolOutput, ToolSpec};
use crate::Result;
use chrono::Utc;
use chrono_tz::Tz;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Trait for a single tool (deterministic execution)
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON schema of the accepted parameters, surfaced to the runtime
    fn parameters(&self) -> Value;
    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools
            .values()
            .map(|tool| ToolSpec {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn require_str_param<'a>(input: &'a ToolInput, key: &str) -> Result<&'a str> {
    input
        .parameters
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            ToolServiceError::InvalidToolInput(format!("Expected '{}' in tool_input", key))
        })
}

/// Scrapes the income statement of a US stock from its financials page.
///
/// Extraction failures never surface as errors: the output carries either the
/// parsed record or an `{"error": ...}` mapping, which is the wire contract
/// the hosting runtime relies on.
pub struct IncomeStatementTool {
    client: FinancialsClient,
}

impl IncomeStatementTool {
    pub fn new(config: &Config) -> Self {
        Self {
            client: FinancialsClient::new(config),
        }
    }
}

#[async_trait::async_trait]
impl Tool for IncomeStatementTool {
    fn name(&self) -> &'static str {
        "get_income_statement"
    }

    fn description(&self) -> &'static str {
        "Fetch the income statement of a US stock as a mapping of line items"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": { "type": "string", "description": "Stock ticker symbol, e.g. 'AAPL'" }
            },
            "required": ["ticker"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let ticker = require_str_param(input, "ticker")?;

        let data = match self.client.fetch_income_statement(ticker).await {
            Ok(record) => Value::Object(record),
            Err(e) => {
                warn!(%ticker, error = %e, "Income statement fetch failed");
                json!({ "error": e.to_string() })
            }
        };

        Ok(ToolOutput::ok(data))
    }
}

/// Reports the current local time in an IANA timezone.
pub struct CurrentTimeTool;

#[async_trait::async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &'static str {
        "get_current_time_in_timezone"
    }

    fn description(&self) -> &'static str {
        "Fetch the current local time in a specified timezone"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone": { "type": "string", "description": "A valid timezone, e.g. 'America/New_York'" }
            },
            "required": ["timezone"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let timezone = require_str_param(input, "timezone")?;

        let data = match timezone.parse::<Tz>() {
            Ok(tz) => {
                let local_time = Utc::now().with_timezone(&tz).format("%Y-%m-%d %H:%M:%S");
                Value::String(format!(
                    "The current local time in {} is: {}",
                    timezone, local_time
                ))
            }
            Err(e) => Value::String(format!(
                "Error fetching time for timezone '{}': {}",
                timezone, e
            )),
        };

        Ok(ToolOutput::ok(data))
    }
}

/// Terminal tool the agent runtime calls to hand its answer back to the user.
pub struct FinalAnswerTool;

#[async_trait::async_trait]
impl Tool for FinalAnswerTool {
    fn name(&self) -> &'static str {
        "final_answer"
    }

    fn description(&self) -> &'static str {
        "Provide the final answer to the user"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "answer": { "description": "The final answer to return" }
            },
            "required": ["answer"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let answer = input.parameters.get("answer").cloned().ok_or_else(|| {
            ToolServiceError::InvalidToolInput("Expected 'answer' in tool_input".to_string())
        })?;

        Ok(ToolOutput::ok(answer))
    }
}

/// Create the default registry with all service tools wired up.
pub fn create_default_registry(config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(FinalAnswerTool));
    registry.register(Arc::new(CurrentTimeTool));
    registry.register(Arc::new(IncomeStatementTool::new(config)));
    registry.register(Arc::new(search::WebSearchTool::new(config)));
    registry.register(Arc::new(image::TextToImageTool::new(config)));

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_for(tool_name: &str, parameters: Value) -> ToolInput {
        ToolInput {
            tool_name: tool_name.to_string(),
            parameters,
        }
    }

    #[test]
    fn test_default_registry_has_all_tools() {
        let registry = create_default_registry(&Config::default());
        let mut names = registry.list();
        names.sort();

        assert_eq!(
            names,
            vec![
                "final_answer",
                "get_current_time_in_timezone",
                "get_income_statement",
                "text_to_image",
                "web_search",
            ]
        );
        assert_eq!(registry.specs().len(), 5);
    }

    #[tokio::test]
    async fn test_clock_tool_known_timezone() {
        let tool = CurrentTimeTool;
        let input = input_for(tool.name(), json!({"timezone": "America/New_York"}));

        let output = tool.execute(&input).await.unwrap();
        let text = output.data.as_str().unwrap();
        assert!(text.starts_with("The current local time in America/New_York is:"));
    }

    #[tokio::test]
    async fn test_clock_tool_invalid_timezone_reports_error_string() {
        let tool = CurrentTimeTool;
        let input = input_for(tool.name(), json!({"timezone": "Mars/Olympus_Mons"}));

        let output = tool.execute(&input).await.unwrap();
        let text = output.data.as_str().unwrap();
        assert!(text.starts_with("Error fetching time for timezone 'Mars/Olympus_Mons'"));
    }

    #[tokio::test]
    async fn test_final_answer_echoes_value() {
        let tool = FinalAnswerTool;
        let input = input_for(tool.name(), json!({"answer": {"verdict": 42}}));

        let output = tool.execute(&input).await.unwrap();
        assert_eq!(output.data, json!({"verdict": 42}));
    }

    #[tokio::test]
    async fn test_missing_parameter_is_invalid_input() {
        let tool = CurrentTimeTool;
        let input = input_for(tool.name(), json!({}));

        let err = tool.execute(&input).await.unwrap_err();
        assert!(matches!(err, ToolServiceError::InvalidToolInput(_)));
    }

    #[tokio::test]
    async fn test_income_statement_transport_failure_yields_sentinel() {
        let config = Config {
            financials_base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_secs: 2,
            scrape_delay_ms: (0, 0),
            ..Config::default()
        };

        let tool = IncomeStatementTool::new(&config);
        let input = input_for(tool.name(), json!({"ticker": "AAPL"}));

        // The tool never errors on fetch failures; it returns the sentinel.
        let output = tool.execute(&input).await.unwrap();
        assert!(output.success);

        let message = output.data.get("error").and_then(|v| v.as_str()).unwrap();
        assert!(message.starts_with("Request failed:"));
    }
}
