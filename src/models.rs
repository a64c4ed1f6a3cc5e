//! Core data models for the tool service

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parsed income statement line items keyed by field name.
pub type FinancialRecord = serde_json::Map<String, Value>;

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub data: Value,
    pub error: Option<String>,
}

impl ToolOutput {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

//
// ================= Tool Listing =================
//

/// Descriptor the hosting agent runtime reads when deciding what to call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}
