pub mod chat;
use rllm::builder::LLMBackend;
use serde::{ Deserialize, Serialize };
use std::str::FromStr;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmType {
    Google,
    OpenAI,
    Anthropic,
    Ollama,
    DeepSeek,
    XAI,
    Groq,
}

impl LlmType {
    pub fn backend(&self) -> LLMBackend {
        match self {
            LlmType::Google => LLMBackend::Google,
            LlmType::OpenAI => LLMBackend::OpenAI,
            LlmType::Anthropic => LLMBackend::Anthropic,
            LlmType::Ollama => LLMBackend::Ollama,
            LlmType::DeepSeek => LLMBackend::DeepSeek,
            LlmType::XAI => LLMBackend::XAI,
            LlmType::Groq => LLMBackend::Groq,
        }
    }
}

impl fmt::Display for LlmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmType::Google => "google",
            LlmType::OpenAI => "openai",
            LlmType::Anthropic => "anthropic",
            LlmType::Ollama => "ollama",
            LlmType::DeepSeek => "deepseek",
            LlmType::XAI => "xai",
            LlmType::Groq => "groq",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParseLlmTypeError {
    message: String,
}

impl fmt::Display for ParseLlmTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseLlmTypeError {}
impl FromStr for LlmType {
    type Err = ParseLlmTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "gemini" | "google_genai" => Ok(LlmType::Google),
            "openai" => Ok(LlmType::OpenAI),
            "anthropic" => Ok(LlmType::Anthropic),
            "ollama" => Ok(LlmType::Ollama),
            "deepseek" => Ok(LlmType::DeepSeek),
            "xai" => Ok(LlmType::XAI),
            "groq" => Ok(LlmType::Groq),
            _ =>
                Err(ParseLlmTypeError {
                    message: format!("Invalid LLM type: '{}'", s),
                }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub llm_type: LlmType,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub system: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            llm_type: LlmType::Google,
            api_key: None,
            model: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_seconds: None,
            system: None,
        }
    }
}

impl LlmConfig {
    pub fn model_or_default(&self) -> String {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_CHAT_MODEL)
            .to_string()
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("cannot generate a reply for an empty conversation")]
    EmptyConversation,
    #[error("failed to build {backend} client: {message}")]
    Build { backend: LlmType, message: String },
    #[error("provider request failed: {0}")]
    Provider(String),
    #[error("provider returned an empty reply")]
    EmptyReply,
}

impl From<rllm::error::LLMError> for LlmError {
    fn from(err: rllm::error::LLMError) -> Self {
        LlmError::Provider(err.to_string())
    }
}
