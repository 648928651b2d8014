pub mod agent;
pub mod chatbot;
pub mod cli;
pub mod config;
pub mod console;
pub mod demo;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

#[cfg(test)]
mod testing;

use agent::SessionAgent;
use chatbot::Chatbot;
use cli::Args;
use config::{ report_api_key, ChatbotConfig, RunMode };
use console::{ interrupt_from, ChatConsole };
use llm::chat::new_client as new_chat_client;
use log::{ error, info };
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ChatbotConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Mode: {:?}", config.mode);
    info!("Chat LLM Type: {}", config.llm.llm_type);
    info!("Chat Model: {}", config.llm.model_or_default());
    info!("Chat Base URL: {}", config.llm.base_url.as_deref().unwrap_or("adapter default"));
    if config.mode == RunMode::Serve {
        info!("Server Address: {}", config.server_addr);
        info!("Response Field: {}", config.profile.response_field);
        info!("TLS Enabled: {}", config.tls.is_some());
    }
    info!("-------------------------");
    report_api_key(config.api_key_status);

    match config.mode {
        RunMode::Console => run_console(&config).await,
        RunMode::Serve => run_server(&config).await,
    }
}

async fn run_console(config: &ChatbotConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chatbot = Chatbot::new(new_chat_client(&config.llm)?);
    info!("Console chatbot using model {}", chatbot.model());
    let mut stdout = tokio::io::stdout();

    if !config.skip_demo {
        if let Err(e) = demo::run_demo(&chatbot, &mut stdout).await {
            error!("Demo aborted: {}", e);
        }
    }

    let interrupt = interrupt_from(tokio::signal::ctrl_c());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut chat = ChatConsole::new(chatbot, stdin, stdout);
    match chat.run(interrupt).await {
        Ok(end) => info!("Chat finished: {:?}", end),
        Err(fault) => error!("Chat stopped after a fault: {}", fault),
    }
    Ok(())
}

async fn run_server(config: &ChatbotConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    let agent = Arc::new(SessionAgent::from_config(config)?);
    let response_field = agent.response_field().to_string();
    let server = Server::new(
        config.server_addr.clone(),
        agent,
        response_field,
        config.tls.clone(),
    );
    server.run().await
}
