//! Fakes shared by the unit tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::agent::{ Agent, AgentContext, AgentError, AgentInput, SessionKey, StructuredReply };
use crate::llm::chat::ChatClient;
use crate::llm::LlmError;
use crate::models::chat::Message;

/// Replies from a fixed script and records every conversation it was sent.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Mutex<Vec<Vec<Message>>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new<I, S>(replies: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Sleeps before answering, so overlapping calls can interleave.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(message.to_string())])),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(messages.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(LlmError::Provider(message)),
            None => Err(LlmError::Provider("script exhausted".into())),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// Records each invocation and answers with `{field: "echo: <message>"}`.
pub struct RecordingAgent {
    field: String,
    fail: bool,
    pub invocations: Mutex<Vec<(String, String, String)>>,
}

impl RecordingAgent {
    pub fn new(field: &str) -> Self {
        Self { field: field.to_string(), fail: false, invocations: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { field: String::new(), fail: true, invocations: Mutex::new(Vec::new()) }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

#[async_trait]
impl Agent for RecordingAgent {
    async fn invoke(
        &self,
        input: AgentInput,
        session: &SessionKey,
        context: &AgentContext
    ) -> Result<StructuredReply, AgentError> {
        let text = input.messages
            .last()
            .map(|m| m.content().to_string())
            .unwrap_or_default();
        self.invocations
            .lock()
            .unwrap()
            .push((session.as_str().to_string(), context.user_id.clone(), text.clone()));
        if self.fail {
            return Err(AgentError::Llm(LlmError::Provider("agent offline".into())));
        }
        Ok(StructuredReply::from_field(&self.field, format!("echo: {}", text)))
    }
}
