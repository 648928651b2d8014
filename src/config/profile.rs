use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use log::info;

pub const DEFAULT_RESPONSE_FIELD: &str = "punny_response";

const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a friendly assistant who speaks in puns. Keep answers short and warm.";

const DEFAULT_RESPONSE_INSTRUCTIONS: &str =
    "Reply with a single JSON object and nothing else. Put your answer to the user in the string field \"{field}\".";

#[derive(Debug)]
pub enum ProfileError {
    MissingField(&'static str),
    IoError(std::io::Error),
    JsonError(serde_json::Error),
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::MissingField(key) => write!(f, "Agent profile field '{}' is empty", key),
            ProfileError::IoError(e) => write!(f, "Agent profile IO error: {}", e),
            ProfileError::JsonError(e) => write!(f, "Agent profile JSON parsing error: {}", e),
        }
    }
}

impl Error for ProfileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProfileError::IoError(e) => Some(e),
            ProfileError::JsonError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        ProfileError::IoError(err)
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::JsonError(err)
    }
}

/// How the session agent behind `POST /chat` talks and what its structured
/// reply looks like.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AgentProfile {
    pub system_prompt: String,
    pub response_field: String,
    /// `{field}` is replaced with `response_field`.
    #[serde(default = "default_instructions")]
    pub response_instructions: String,
}

fn default_instructions() -> String {
    DEFAULT_RESPONSE_INSTRUCTIONS.to_string()
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            response_field: DEFAULT_RESPONSE_FIELD.to_string(),
            response_instructions: default_instructions(),
        }
    }
}

impl AgentProfile {
    fn validate(&self) -> Result<(), ProfileError> {
        if self.system_prompt.trim().is_empty() {
            return Err(ProfileError::MissingField("system_prompt"));
        }
        if self.response_field.trim().is_empty() {
            return Err(ProfileError::MissingField("response_field"));
        }
        Ok(())
    }

    pub fn with_response_field(mut self, field: Option<&str>) -> Self {
        if let Some(field) = field.map(str::trim).filter(|f| !f.is_empty()) {
            self.response_field = field.to_string();
        }
        self
    }

    /// The full system prompt: persona followed by the reply-format contract.
    pub fn render_system_prompt(&self) -> String {
        format!(
            "{}\n\n{}",
            self.system_prompt.trim(),
            self.response_instructions.replace("{field}", &self.response_field)
        )
    }
}

pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<AgentProfile, ProfileError> {
    let file_content = fs::read_to_string(&path)?;
    let profile: AgentProfile = serde_json::from_str(&file_content)?;
    profile.validate()?;
    info!("Agent profile loaded from {}", path.as_ref().display());
    Ok(profile)
}
