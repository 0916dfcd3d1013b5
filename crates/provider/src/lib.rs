//! Chat-completion provider interface
//!
//! Wire types for the chat-completions API and the `Provider` trait the
//! dispatch loop is written against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use thiserror::Error;

pub mod mistral;

pub use mistral::MistralProvider;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("api error: {0}")]
    Api(String),

    #[error("no api key configured")]
    NoApiKey,

    #[error("malformed response")]
    InvalidResponse,

    #[error("rate limited")]
    RateLimited,

    #[error("request timed out")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// One model response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// The first requested call, if any. The dispatch loop only ever acts
    /// on one call per turn.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.tool_calls.first()
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }
}

/// Token accounting reported by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One turn in the conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallDef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// A tool-result turn, correlated to the assistant turn that requested
    /// the call via `call_id`.
    pub fn tool(
        call_id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(result.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
            name: Some(name.into()),
        }
    }
}

/// Tool-call metadata carried on an assistant turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallDef {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCallDef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            call_type: "function".to_string(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// Requested function and its arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Value,
}

/// A tool the model is allowed to request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Function schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Parameters for one chat call
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<Tool>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub tool_choice: ToolChoice,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            tools: Vec::new(),
            max_tokens: 4096,
            temperature: 0.7,
            tool_choice: ToolChoice::Auto,
        }
    }
}

/// Tool selection mode
#[derive(Debug, Clone)]
pub enum ToolChoice {
    Auto,
    None,
}

/// A chat-completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse>;
    fn default_model(&self) -> String;
    fn is_configured(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_display() {
        assert_eq!(ProviderError::NoApiKey.to_string(), "no api key configured");
        assert_eq!(
            ProviderError::Api("bad model".to_string()).to_string(),
            "api error: bad model"
        );
        assert_eq!(
            ProviderError::InvalidResponse.to_string(),
            "malformed response"
        );
        assert_eq!(ProviderError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn text_builder() {
        let response = ChatResponse::text("All packages are up to date.");
        assert_eq!(
            response.content,
            Some("All packages are up to date.".to_string())
        );
        assert!(!response.has_tool_calls());
        assert_eq!(response.finish_reason, "stop");
    }

    #[test]
    fn first_tool_call_picks_the_head() {
        let response = ChatResponse {
            content: None,
            tool_calls: vec![
                ToolCall {
                    id: "call_1".to_string(),
                    name: "install_package".to_string(),
                    arguments: json!({"package_name": "numpy"}),
                },
                ToolCall {
                    id: "call_2".to_string(),
                    name: "list_packages".to_string(),
                    arguments: json!({}),
                },
            ],
            finish_reason: "tool_calls".to_string(),
            usage: Usage::default(),
        };

        assert!(response.has_tool_calls());
        let first = response.first_tool_call().unwrap();
        assert_eq!(first.id, "call_1");
        assert_eq!(first.name, "install_package");
    }

    #[test]
    fn message_builders() {
        let msg = Message::system("You are PAMM.");
        assert_eq!(msg.role, "system");
        assert_eq!(msg.content, Some("You are PAMM.".to_string()));
        assert!(msg.tool_call_id.is_none());

        let msg = Message::user("install numpy");
        assert_eq!(msg.role, "user");

        let msg = Message::assistant("Done.");
        assert_eq!(msg.role, "assistant");
        assert!(msg.tool_calls.is_none());

        let msg = Message::tool("call_9", "get_package_version", r#"{"version":"1.2.3"}"#);
        assert_eq!(msg.role, "tool");
        assert_eq!(msg.tool_call_id, Some("call_9".to_string()));
        assert_eq!(msg.name, Some("get_package_version".to_string()));
        assert_eq!(msg.content, Some(r#"{"version":"1.2.3"}"#.to_string()));
    }

    #[test]
    fn message_serialization_skips_empty_fields() {
        let json_str = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(json_str.contains("\"role\":\"user\""));
        assert!(!json_str.contains("tool_call_id"));
        assert!(!json_str.contains("\"name\""));
    }

    #[test]
    fn tool_call_def_new() {
        let def = ToolCallDef::new("call_1", "remove_package", json!({"package_name": "numpy"}));
        assert_eq!(def.id, "call_1");
        assert_eq!(def.call_type, "function");
        assert_eq!(def.function.name, "remove_package");
        assert_eq!(def.function.arguments["package_name"], "numpy");
    }

    #[test]
    fn tool_serializes_as_function() {
        let tool = Tool::new("list_packages", "List all installed packages", json!({}));
        let json_str = serde_json::to_string(&tool).unwrap();
        assert!(json_str.contains("\"type\":\"function\""));
        assert!(json_str.contains("\"name\":\"list_packages\""));
    }

    #[test]
    fn chat_params_default() {
        let params = ChatParams::default();
        assert!(params.messages.is_empty());
        assert!(params.tools.is_empty());
        assert_eq!(params.max_tokens, 4096);
        assert!(matches!(params.tool_choice, ToolChoice::Auto));
    }
}
