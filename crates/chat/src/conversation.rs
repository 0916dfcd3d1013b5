//! Append-only conversation log
//!
//! The literal context window sent to the model, and the audit trail of
//! what was executed. Turns are only ever appended; the first turn is
//! always the single system turn.

use pamm_provider::{Message, ToolCallDef};

/// Ordered turn history for one session
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<Message>,
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Message::system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: &str) {
        self.turns.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: Option<&str>, tool_calls: Option<Vec<ToolCallDef>>) {
        let mut msg = Message::assistant(content.unwrap_or(""));
        if let Some(calls) = tool_calls {
            msg.tool_calls = Some(calls);
        }
        self.turns.push(msg);
    }

    /// Append a tool-result turn correlated to the assistant turn that
    /// requested the call.
    pub fn push_tool_result(&mut self, call_id: &str, name: &str, content: &str) {
        self.turns.push(Message::tool(call_id, name, content));
    }

    pub fn turns(&self) -> &[Message] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Message> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clone the history for a chat call.
    pub fn snapshot(&self) -> Vec<Message> {
        self.turns.clone()
    }
}
