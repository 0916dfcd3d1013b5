//! The dispatch loop
//!
//! One `handle` call per user line: decision call, optional local
//! operation, synthesis call. The session owns the conversation and the
//! provider handle; nothing lives in globals.

use std::sync::Arc;
use tracing::{debug, warn};

use pamm_executor::{registry, Executor};
use pamm_provider::{ChatParams, Provider, ToolCallDef, ToolChoice};

use crate::conversation::Conversation;
use crate::Result;

/// Answer used when the model replies with no content at all.
const EMPTY_ANSWER: &str = "Done.";

/// System prompt for the package assistant.
fn system_prompt() -> String {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");

    format!(
        "You are PAMM, an AI package manager assistant. Help users manage \
         their Python packages.\n\nCurrent time: {}",
        now
    )
}

/// One interactive session: provider, executor, and the conversation log.
pub struct ChatSession<P: Provider> {
    provider: Arc<P>,
    executor: Executor,
    model: String,
    max_tokens: u32,
    temperature: f32,
    conversation: Conversation,
}

impl<P: Provider> ChatSession<P> {
    pub fn new(provider: P, executor: Executor, model: impl Into<String>) -> Self {
        Self::with_params(provider, executor, model, 4096, 0.7)
    }

    pub fn with_params(
        provider: P,
        executor: Executor,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            executor,
            model: model.into(),
            max_tokens,
            temperature,
            conversation: Conversation::new(system_prompt()),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Process one user utterance and return the final answer.
    ///
    /// On a transport error the turn is aborted: the user turn stays in
    /// the conversation and the caller decides what to tell the user.
    pub async fn handle(&mut self, input: &str) -> Result<String> {
        self.conversation.push_user(input);

        // Decision call: full history plus the operation catalog.
        let response = self
            .provider
            .chat(ChatParams {
                model: self.model.clone(),
                messages: self.conversation.snapshot(),
                tools: registry::schemas(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::Auto,
            })
            .await?;

        let call = match response.first_tool_call().cloned() {
            Some(call) => call,
            None => {
                // Direct answer, no operation requested.
                let content = response
                    .content
                    .unwrap_or_else(|| EMPTY_ANSWER.to_string());
                self.conversation.push_assistant(Some(&content), None);
                return Ok(content);
            }
        };

        if response.tool_calls.len() > 1 {
            warn!(
                "model requested {} tool calls, executing only the first",
                response.tool_calls.len()
            );
        }

        debug!("executing tool call {} ({})", call.name, call.id);

        // The assistant turn carrying the request goes in first, then the
        // correlated tool result, and only then the synthesis call: the
        // second response is defined over a history that already contains
        // the result.
        self.conversation.push_assistant(
            response.content.as_deref(),
            Some(vec![ToolCallDef::new(
                &call.id,
                &call.name,
                call.arguments.clone(),
            )]),
        );

        let result = self.executor.execute_call(&call.name, &call.arguments).await;
        self.conversation
            .push_tool_result(&call.id, &call.name, &result.to_tool_content());

        // Synthesis call: no tools, pure phrasing of the result.
        let response = self
            .provider
            .chat(ChatParams {
                model: self.model.clone(),
                messages: self.conversation.snapshot(),
                tools: Vec::new(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::None,
            })
            .await?;

        let content = response
            .content
            .unwrap_or_else(|| EMPTY_ANSWER.to_string());
        self.conversation.push_assistant(Some(&content), None);
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_names_the_assistant() {
        let prompt = system_prompt();
        assert!(prompt.contains("You are PAMM"));
        assert!(prompt.contains("Python packages"));
    }
}
