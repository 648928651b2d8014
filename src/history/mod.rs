use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::error::Error;
use tokio::sync::Mutex;
use crate::models::chat::{ ConversationState, Message };

/// Per-session conversation memory used by the agent behind `POST /chat`.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    async fn get_conversation(
        &self,
        session_id: &str
    ) -> Result<ConversationState, Box<dyn Error + Send + Sync>>;
}

/// Process-local store. Everything is gone when the process exits.
#[derive(Default)]
pub struct MemoryHistoryStore {
    sessions: Mutex<HashMap<String, Vec<Message>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn add_messages(
        &self,
        session_id: &str,
        messages: Vec<Message>
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.entry(session_id.to_string()).or_default();
        entry.extend(messages);
        debug!("Session '{}' now holds {} messages", session_id, entry.len());
        Ok(())
    }

    async fn get_conversation(
        &self,
        session_id: &str
    ) -> Result<ConversationState, Box<dyn Error + Send + Sync>> {
        let sessions = self.sessions.lock().await;
        let messages = sessions.get(session_id).cloned().unwrap_or_default();
        Ok(ConversationState::from_messages(messages))
    }
}
