use crate::config::ChatbotConfig;
use crate::history::{ HistoryStore, MemoryHistoryStore };
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::llm::LlmError;
use crate::models::chat::Message;

use async_trait::async_trait;
use log::{ debug, info, warn };
use serde_json::{ Map, Value as JsonValue };
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Opaque key correlating several requests into one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request values handed to the agent next to the messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentContext {
    pub user_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct AgentInput {
    pub messages: Vec<Message>,
}

impl AgentInput {
    pub fn user(text: impl Into<String>) -> Self {
        Self { messages: vec![Message::user(text)] }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent received no messages")]
    EmptyInput,
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("history store error: {0}")]
    History(String),
    #[error("structured reply has no string field '{0}'")]
    MissingField(String),
}

/// JSON object produced by the agent. Its shape belongs to the agent; callers
/// pick the field they were configured to read.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredReply(Map<String, JsonValue>);

impl StructuredReply {
    pub fn from_field(field: &str, text: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(field.to_string(), JsonValue::String(text.into()));
        Self(map)
    }

    /// Accepts a bare or ```json fenced object; anything else becomes
    /// `{field: raw}`.
    pub fn parse(raw: &str, field: &str) -> Self {
        let body = strip_code_fence(raw.trim());
        match serde_json::from_str::<JsonValue>(body) {
            Ok(JsonValue::Object(map)) => Self(map),
            _ => {
                debug!("Reply is not a JSON object, wrapping it as '{}'", field);
                Self::from_field(field, raw.trim())
            }
        }
    }

    pub fn field(&self, name: &str) -> Result<&str, AgentError> {
        self.0
            .get(name)
            .and_then(JsonValue::as_str)
            .ok_or_else(|| AgentError::MissingField(name.to_string()))
    }
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
pub trait Agent: Send + Sync {
    async fn invoke(
        &self,
        input: AgentInput,
        session: &SessionKey,
        context: &AgentContext
    ) -> Result<StructuredReply, AgentError>;
}

/// Keeps a conversation per session key and asks the model for a JSON reply.
///
/// Turns of one session run one at a time, so concurrent requests with the
/// same key each see the other's completed turn. Different sessions never wait
/// on each other.
#[derive(Clone)]
pub struct SessionAgent {
    chat_client: Arc<dyn ChatClient>,
    history_store: Arc<dyn HistoryStore>,
    response_field: String,
    session_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionAgent {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        history_store: Arc<dyn HistoryStore>,
        response_field: impl Into<String>
    ) -> Self {
        Self {
            chat_client,
            history_store,
            response_field: response_field.into(),
            session_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    async fn session_lock(&self, session: &SessionKey) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        locks.entry(session.as_str().to_string()).or_default().clone()
    }

    pub fn from_config(config: &ChatbotConfig) -> Result<Self, LlmError> {
        let chat_client = new_chat_client(&config.agent_llm())?;
        info!("Session agent reads reply field '{}'", config.profile.response_field);
        Ok(Self::new(chat_client, Arc::new(MemoryHistoryStore::new()), config.profile.response_field.clone()))
    }

    pub fn response_field(&self) -> &str {
        &self.response_field
    }
}

#[async_trait]
impl Agent for SessionAgent {
    async fn invoke(
        &self,
        input: AgentInput,
        session: &SessionKey,
        context: &AgentContext
    ) -> Result<StructuredReply, AgentError> {
        if input.messages.is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let lock = self.session_lock(session).await;
        let _turn_guard = lock.lock().await;
        let mut conversation = self.history_store
            .get_conversation(session.as_str()).await
            .map_err(|e| AgentError::History(e.to_string()))?;
        let prior = conversation.len();
        conversation.extend(input.messages.iter().cloned());
        info!(
            "Agent invoke: session={} user_id={} prior_messages={}",
            session,
            context.user_id,
            prior
        );

        let raw = self.chat_client.generate(conversation.messages()).await?;
        let reply = StructuredReply::parse(&raw, &self.response_field);
        if let Err(e) = reply.field(&self.response_field) {
            warn!("Session {} got a reply without '{}'", session, self.response_field);
            return Err(e);
        }

        let mut turn = input.messages;
        turn.push(Message::assistant(raw));
        self.history_store
            .add_messages(session.as_str(), turn).await
            .map_err(|e| AgentError::History(e.to_string()))?;

        Ok(reply)
    }
}
