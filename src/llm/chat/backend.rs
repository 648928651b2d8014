use async_trait::async_trait;
use log::{ debug, info };

use super::ChatClient;
use crate::llm::{ LlmConfig, LlmError, LlmType };
use crate::models::chat::{ Message, Role };
use rllm::chat::{ ChatMessage, ChatRole, MessageType };
use rllm::builder::LLMBuilder;
use rllm::LLMProvider;

pub struct RllmChatClient {
    llm: Box<dyn LLMProvider>,
    llm_type: LlmType,
    model: String,
    base_url: Option<String>,
}

impl RllmChatClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let model = config.model_or_default();
        // Ollama runs without a key; the hosted backends reject an empty one later.
        let api_key = config.api_key.clone().unwrap_or_default();

        let mut builder = LLMBuilder::new()
            .backend(config.llm_type.backend())
            .api_key(api_key)
            .model(&model)
            .stream(false);

        if let Some(url) = &config.base_url {
            builder = builder.base_url(url);
        }
        if let Some(tokens) = config.max_tokens {
            builder = builder.max_tokens(tokens);
        }
        if let Some(temp) = config.temperature {
            builder = builder.temperature(temp);
        }
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout_seconds(secs);
        }
        if let Some(system) = config.system.as_deref().filter(|s| !s.trim().is_empty()) {
            builder = builder.system(system);
        }

        let llm = builder.build().map_err(|e| LlmError::Build {
            backend: config.llm_type,
            message: e.to_string(),
        })?;

        Ok(Self {
            llm,
            llm_type: config.llm_type,
            model,
            base_url: config.base_url.clone(),
        })
    }
}

/// Gemini has no in-band system turn, so system messages travel as user text.
pub(crate) fn to_provider_message(message: &Message) -> ChatMessage {
    let role = match message.role() {
        Role::Assistant => ChatRole::Assistant,
        Role::User | Role::System => ChatRole::User,
    };
    ChatMessage {
        role,
        content: message.content().to_string(),
        message_type: MessageType::Text,
    }
}

#[async_trait]
impl ChatClient for RllmChatClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        if messages.is_empty() {
            return Err(LlmError::EmptyConversation);
        }
        info!(
            "RllmChatClient::generate() → type={} model={} base_url={:?} messages={}",
            self.llm_type,
            self.model,
            self.base_url,
            messages.len()
        );
        let payload: Vec<ChatMessage> = messages.iter().map(to_provider_message).collect();
        let resp = self.llm.chat(&payload).await?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .unwrap_or_else(|| resp.to_string());
        debug!("Provider reply: {} chars", text.len());
        if text.trim().is_empty() {
            return Err(LlmError::EmptyReply);
        }
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
