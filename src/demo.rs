use crate::chatbot::Chatbot;
use crate::llm::LlmError;
use crate::models::chat::ConversationState;
use thiserror::Error;
use tokio::io::{ AsyncWrite, AsyncWriteExt };

pub const DEMO_MESSAGES: [&str; 4] = [
    "Why should I become an AI Engineer today",
    "Can you explain what Python is in simple terms?",
    "I'm new to AI and chatbots. What should I learn next?",
    "Write a short poem about robots learning to code",
];

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("demo message failed: {0}")]
    Turn(#[from] LlmError),
    #[error("demo output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Each demo message starts from an empty conversation.
pub async fn send_message<W>(chatbot: &Chatbot, text: &str, out: &mut W) -> Result<String, DemoError>
    where W: AsyncWrite + Unpin
{
    out.write_all(format!("User: {}\n", text).as_bytes()).await?;
    let (_, reply) = chatbot.run_turn(ConversationState::new(), text).await?;
    out.write_all(format!("Assistant: {}\n{}\n", reply, "-".repeat(50)).as_bytes()).await?;
    out.flush().await?;
    Ok(reply)
}

pub async fn run_demo<W>(chatbot: &Chatbot, out: &mut W) -> Result<(), DemoError>
    where W: AsyncWrite + Unpin
{
    for text in DEMO_MESSAGES {
        send_message(chatbot, text, out).await?;
    }
    Ok(())
}
