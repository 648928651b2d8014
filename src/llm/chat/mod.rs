pub mod backend;

use async_trait::async_trait;
use std::sync::Arc;
use log::info;

use super::{ LlmConfig, LlmError };
use self::backend::RllmChatClient;
use crate::models::chat::Message;

/// A text-generation service that answers a full conversation with one reply.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError>;

    fn model(&self) -> &str;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = RllmChatClient::from_config(config)?;
    info!(
        "Chat client configured: Type={}, Model={}, BaseURL={:?}",
        config.llm_type,
        client.model(),
        config.base_url.as_deref().unwrap_or("adapter default")
    );
    Ok(Arc::new(client))
}
