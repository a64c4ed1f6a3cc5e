//! Text-to-image tool backed by a hosted inference endpoint
//!
//! Posts the prompt to a Hugging Face inference model and returns the raw
//! image bytes base64-encoded, leaving rendering to the hosting UI.

use crate::config::Config;
use crate::error::ToolServiceError;
use crate::models::{ToolInput, ToolOutput};
use crate::tools::Tool;
use crate::Result;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

/// Image generation can be slow on cold model starts, so the timeout is
/// decoupled from the general request timeout.
const IMAGE_TIMEOUT_SECS: u64 = 120;

pub struct TextToImageTool {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl TextToImageTool {
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(IMAGE_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.image_endpoint.clone(),
            api_token: config.hf_api_token.clone(),
        }
    }
}

#[async_trait::async_trait]
impl Tool for TextToImageTool {
    fn name(&self) -> &'static str {
        "text_to_image"
    }

    fn description(&self) -> &'static str {
        "Generate an image from a text prompt"
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": { "type": "string", "description": "Text description of the image to generate" }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<ToolOutput> {
        let prompt = super::require_str_param(input, "prompt")?;

        if self.api_token.is_empty() {
            return Err(ToolServiceError::ToolError(
                "HF_API_TOKEN is not configured".to_string(),
            ));
        }

        info!(%prompt, endpoint = %self.endpoint, "Generating image");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(|e| {
                ToolServiceError::ToolError(format!("Image generation request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ToolServiceError::ToolError(format!(
                "Image endpoint returned {}: {}",
                status, detail
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/png")
            .to_string();

        let bytes = response.bytes().await.map_err(|e| {
            ToolServiceError::ToolError(format!("Failed to read image bytes: {}", e))
        })?;

        Ok(ToolOutput::ok(json!({
            "content_type": content_type,
            "image_base64": base64::engine::general_purpose::STANDARD.encode(&bytes),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToolInput;

    #[tokio::test]
    async fn test_missing_token_is_tool_error() {
        let config = Config {
            hf_api_token: String::new(),
            ..Config::default()
        };
        let tool = TextToImageTool::new(&config);
        let input = ToolInput {
            tool_name: tool.name().to_string(),
            parameters: json!({"prompt": "a red fox"}),
        };

        let err = tool.execute(&input).await.unwrap_err();
        assert!(matches!(err, ToolServiceError::ToolError(_)));
    }
}
