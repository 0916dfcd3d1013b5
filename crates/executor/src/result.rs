//! Normalized operation results
//!
//! The compact structured form appended to the conversation as a tool
//! turn's content.

use serde::{Deserialize, Serialize};

/// Outcome of one operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updates: Option<UpdateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(text.into()),
            version: None,
            updates: None,
            error: None,
        }
    }

    pub fn version(version: impl Into<String>) -> Self {
        Self {
            success: true,
            output: None,
            version: Some(version.into()),
            updates: None,
            error: None,
        }
    }

    pub fn updates(report: UpdateReport) -> Self {
        Self {
            success: report.failed.is_empty(),
            output: None,
            version: None,
            updates: Some(report),
            error: None,
        }
    }

    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            output: None,
            version: None,
            updates: None,
            error: Some(error.to_string()),
        }
    }

    /// Serialize for the tool turn. Serialization of this shape cannot
    /// fail, but the fallback keeps the loop alive regardless.
    pub fn to_tool_content(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"{}"}}"#, e))
    }
}

/// Aggregate outcome of an update-all run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReport {
    pub upgraded: Vec<String>,
    pub failed: Vec<UpdateFailure>,
}

/// One package that could not be upgraded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFailure {
    pub name: String,
    pub error: String,
}
