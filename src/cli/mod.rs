use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// API key for the text-generation service. Read from the environment or a local .env file.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Type of LLM provider for chat completion (google, openai, anthropic, ollama, groq, deepseek, xai)
    #[arg(long, env = "CHAT_LLM_TYPE", default_value = "google")]
    pub chat_llm_type: String,

    /// Model name for chat completion (e.g., gemini-2.0-flash, gpt-4o, llama3)
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-2.0-flash")]
    pub chat_model: String,

    /// Base URL for the Chat LLM provider API. No default, the backend picks its own.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Sampling temperature passed to the model
    #[arg(long, env = "CHAT_TEMPERATURE")]
    pub chat_temperature: Option<f32>,

    /// Upper bound on generated tokens per reply
    #[arg(long, env = "CHAT_MAX_TOKENS")]
    pub chat_max_tokens: Option<u32>,

    /// Request timeout in seconds. Unset means wait for the provider indefinitely.
    #[arg(long, env = "CHAT_TIMEOUT_SECONDS")]
    pub chat_timeout_seconds: Option<u64>,

    /// System prompt for the console chatbot and demo runner
    #[arg(long, env = "SYSTEM_PROMPT")]
    pub system_prompt: Option<String>,

    // --- Agent Args ---
    /// Path to the agent profile JSON (system prompt and structured reply field) used by POST /chat.
    #[arg(long, env = "AGENT_PROFILE_PATH")]
    pub agent_profile_path: Option<String>,

    /// Field of the agent's structured reply returned as `response`. Overrides the profile.
    #[arg(long, env = "RESPONSE_FIELD")]
    pub response_field: Option<String>,

    // --- General App Args ---
    /// What to run: `console` (demo + interactive chat) or `serve` (HTTP API)
    #[arg(long, env = "CHATBOT_MODE", default_value = "console")]
    pub mode: String,

    /// Skip the canned demo messages before the interactive chat
    #[arg(long, env = "SKIP_DEMO", default_value = "false")]
    pub skip_demo: bool,

    /// Host address and port for the HTTP server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:8000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
