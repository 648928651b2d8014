use crate::chatbot::Chatbot;
use crate::llm::LlmError;
use crate::models::chat::ConversationState;
use log::{ error, info };
use std::future::Future;
use std::io;
use thiserror::Error;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines };

pub const EXIT_COMMANDS: [&str; 4] = ["quit", "exit", "q", "bye"];

const FAREWELL: &str = "Chatbot: Goodbye! Thanks for chatting! 👋";
const FALLBACK_NOTICE: &str = "Chatbot: Sorry, something went wrong. Ending the chat.";

/// Matches the whole line, ignoring case only.
pub fn is_exit_command(input: &str) -> bool {
    EXIT_COMMANDS.iter().any(|cmd| input.eq_ignore_ascii_case(cmd))
}

/// Resolves when `signal` fires. If the handler could not be installed the
/// future never resolves, so the session only ends on input.
pub async fn interrupt_from<F>(signal: F) where F: Future<Output = io::Result<()>> {
    if let Err(e) = signal.await {
        error!("Failed to listen for interrupt signal: {}", e);
        std::future::pending::<()>().await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Exit,
    Interrupted,
    EndOfInput,
}

#[derive(Debug, Error)]
pub enum ConsoleFault {
    #[error("turn failed: {0}")]
    Turn(#[from] LlmError),
    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive loop over any line source, so stdin and test buffers drive it
/// the same way.
pub struct ChatConsole<R, W> {
    chatbot: Chatbot,
    lines: Lines<R>,
    output: W,
    state: ConversationState,
    turns: usize,
}

impl<R, W> ChatConsole<R, W> where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin {
    pub fn new(chatbot: Chatbot, input: R, output: W) -> Self {
        Self {
            chatbot,
            lines: input.lines(),
            output,
            state: ConversationState::new(),
            turns: 0,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until an exit keyword, end of input or `interrupt` resolves.
    /// Any failure inside the loop prints the fallback notice and ends it.
    pub async fn run<F>(&mut self, interrupt: F) -> Result<SessionEnd, ConsoleFault>
        where F: Future<Output = ()>
    {
        tokio::pin!(interrupt);
        self.write_line("🤖 Welcome to your chatbot!").await?;
        self.write_line("Type your messages below. Type 'quit' to exit.").await?;
        self.write_line(&"=".repeat(50)).await?;

        let outcome = loop {
            let step = tokio::select! {
                _ = &mut interrupt => Ok(Some(SessionEnd::Interrupted)),
                step = self.step() => step,
            };
            match step {
                Ok(Some(end)) => {
                    break Ok(end);
                }
                Ok(None) => {}
                Err(fault) => {
                    break Err(fault);
                }
            }
        };

        match outcome {
            Ok(end) => {
                if end == SessionEnd::Interrupted {
                    self.write_line("").await?;
                }
                self.write_line(FAREWELL).await?;
                info!("Console session ended ({:?}) after {} turns", end, self.turns);
                Ok(end)
            }
            Err(fault) => {
                error!("Console session aborted: {}", fault);
                // Best effort: the output itself may be what failed.
                let _ = self.write_line(FALLBACK_NOTICE).await;
                Err(fault)
            }
        }
    }

    async fn step(&mut self) -> Result<Option<SessionEnd>, ConsoleFault> {
        self.output.write_all(b"\nYou: ").await?;
        self.output.flush().await?;

        let Some(line) = self.lines.next_line().await? else {
            return Ok(Some(SessionEnd::EndOfInput));
        };
        if is_exit_command(&line) {
            return Ok(Some(SessionEnd::Exit));
        }

        let state = std::mem::take(&mut self.state);
        let (state, reply) = self.chatbot.run_turn(state, &line).await?;
        self.state = state;
        self.turns += 1;
        self.write_line(&format!("Chatbot: {}", reply)).await?;
        Ok(None)
    }

    async fn write_line(&mut self, text: &str) -> Result<(), ConsoleFault> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }
}
