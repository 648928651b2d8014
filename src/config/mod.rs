pub mod profile;

use crate::cli::Args;
use crate::llm::{ LlmConfig, LlmType, ParseLlmTypeError };
use log::{ info, warn };
use std::str::FromStr;
use thiserror::Error;

use self::profile::{ load_profile, AgentProfile, ProfileError };

/// Value shipped in sample `.env` files; treated the same as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Missing,
    Placeholder,
    Present,
}

pub fn check_api_key(key: Option<&str>) -> ApiKeyStatus {
    match key.map(str::trim) {
        None | Some("") => ApiKeyStatus::Missing,
        Some(API_KEY_PLACEHOLDER) => ApiKeyStatus::Placeholder,
        Some(_) => ApiKeyStatus::Present,
    }
}

/// Never fatal: a bad key surfaces later as a provider error.
pub fn report_api_key(status: ApiKeyStatus) {
    match status {
        ApiKeyStatus::Missing => warn!("GOOGLE_API_KEY is not set. Calls to the model will fail."),
        ApiKeyStatus::Placeholder =>
            warn!("GOOGLE_API_KEY still holds '{}'. Replace it with your actual API key.", API_KEY_PLACEHOLDER),
        ApiKeyStatus::Present => info!("API key is set up"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Console,
    Serve,
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" | "chat" => Ok(RunMode::Console),
            "serve" | "server" | "http" => Ok(RunMode::Serve),
            _ => Err(ConfigError::InvalidMode(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid mode '{0}', expected 'console' or 'serve'")]
    InvalidMode(String),
    #[error(transparent)]
    LlmType(#[from] ParseLlmTypeError),
    #[error("failed to load agent profile: {0}")]
    Profile(#[from] ProfileError),
    #[error("both --tls-cert-path and --tls-key-path must be provided to enable TLS")]
    IncompleteTls,
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

/// Everything the components need, resolved once at start-up and passed
/// around explicitly.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    pub mode: RunMode,
    pub skip_demo: bool,
    pub api_key_status: ApiKeyStatus,
    pub llm: LlmConfig,
    pub profile: AgentProfile,
    pub server_addr: String,
    pub tls: Option<TlsPaths>,
}

impl ChatbotConfig {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mode = args.mode.parse::<RunMode>()?;
        let llm_type = args.chat_llm_type.parse::<LlmType>()?;
        let api_key_status = check_api_key(args.api_key.as_deref());

        let llm = LlmConfig {
            llm_type,
            api_key: args.api_key.clone().filter(|_| api_key_status == ApiKeyStatus::Present),
            model: Some(args.chat_model.clone()),
            base_url: args.chat_base_url.clone().filter(|u| !u.trim().is_empty()),
            temperature: args.chat_temperature,
            max_tokens: args.chat_max_tokens,
            timeout_seconds: args.chat_timeout_seconds,
            system: args.system_prompt.clone(),
        };

        let profile = match &args.agent_profile_path {
            Some(path) => load_profile(path)?,
            None => AgentProfile::default(),
        }.with_response_field(args.response_field.as_deref());

        let tls = if args.enable_tls {
            match (&args.tls_cert_path, &args.tls_key_path) {
                (Some(cert_path), Some(key_path)) =>
                    Some(TlsPaths { cert_path: cert_path.clone(), key_path: key_path.clone() }),
                _ => {
                    return Err(ConfigError::IncompleteTls);
                }
            }
        } else {
            None
        };

        Ok(Self {
            mode,
            skip_demo: args.skip_demo,
            api_key_status,
            llm,
            profile,
            server_addr: args.server_addr.clone(),
            tls,
        })
    }

    /// Client settings for the session agent: same backend, profile prompt.
    pub fn agent_llm(&self) -> LlmConfig {
        LlmConfig {
            system: Some(self.profile.render_system_prompt()),
            ..self.llm.clone()
        }
    }
}
