#![allow(dead_code)]

use async_trait::async_trait;
use graph_chatbot::agent::{ Agent, AgentContext, AgentError, AgentInput, SessionKey, StructuredReply };
use graph_chatbot::llm::chat::ChatClient;
use graph_chatbot::llm::LlmError;
use graph_chatbot::models::chat::Message;
use std::sync::Mutex;

/// Answers `reply-<n>` and counts calls.
#[derive(Default)]
pub struct CountingClient {
    pub calls: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl ChatClient for CountingClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(messages.to_vec());
        Ok(format!("reply-{}", calls.len()))
    }

    fn model(&self) -> &str {
        "counting"
    }
}

/// Answers a ```json fenced `{"punny_response": "reply-<n>"}` and keeps every
/// conversation it was sent.
#[derive(Default)]
pub struct FencedJsonClient {
    pub calls: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl ChatClient for FencedJsonClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(messages.to_vec());
        Ok(format!("```json\n{{\"punny_response\": \"reply-{}\"}}\n```", calls.len()))
    }

    fn model(&self) -> &str {
        "fenced-json"
    }
}

/// Records the session key and context of every invocation.
#[derive(Default)]
pub struct SessionRecorder {
    pub seen: Mutex<Vec<(SessionKey, AgentContext, String)>>,
}

#[async_trait]
impl Agent for SessionRecorder {
    async fn invoke(
        &self,
        input: AgentInput,
        session: &SessionKey,
        context: &AgentContext
    ) -> Result<StructuredReply, AgentError> {
        let text = input.messages.last().map(|m| m.content().to_string()).unwrap_or_default();
        self.seen.lock().unwrap().push((session.clone(), context.clone(), text.clone()));
        Ok(StructuredReply::parse(&format!(r#"{{"punny_response": "heard {}"}}"#, text), "punny_response"))
    }
}
