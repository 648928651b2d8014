use crate::llm::chat::ChatClient;
use crate::llm::LlmError;
use crate::models::chat::{ ConversationState, Message };
use log::debug;
use std::sync::Arc;

/// One turn is a fixed straight line: append the user message, ask the model
/// once, append the reply. There is no branching and no retry.
#[derive(Clone)]
pub struct Chatbot {
    client: Arc<dyn ChatClient>,
}

impl Chatbot {
    pub fn new(client: Arc<dyn ChatClient>) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Sends the whole conversation and returns the single assistant reply.
    pub async fn generate(&self, state: &ConversationState) -> Result<Message, LlmError> {
        if state.is_empty() {
            return Err(LlmError::EmptyConversation);
        }
        let reply = self.client.generate(state.messages()).await?;
        Ok(Message::assistant(reply))
    }

    pub async fn run_turn(
        &self,
        mut state: ConversationState,
        user_text: &str
    ) -> Result<(ConversationState, String), LlmError> {
        state.push(Message::user(user_text));
        let reply = self.generate(&state).await?;
        let text = reply.content().to_string();
        state.push(reply);
        debug!("Turn complete, conversation holds {} messages", state.len());
        Ok((state, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use crate::testing::ScriptedClient;

    #[tokio::test]
    async fn run_turn_appends_user_then_assistant() {
        let client = Arc::new(ScriptedClient::new(["Hi there"]));
        let bot = Chatbot::new(client.clone());

        let mut prior = ConversationState::new();
        prior.push(Message::user("earlier"));
        prior.push(Message::assistant("earlier reply"));

        let (state, reply) = bot.run_turn(prior.clone(), "hello").await.unwrap();

        assert_eq!(reply, "Hi there");
        assert_eq!(&state.messages()[..2], prior.messages());
        assert_eq!(state.messages()[2], Message::user("hello"));
        assert_eq!(state.messages()[3], Message::assistant("Hi there"));
        assert_eq!(state.len(), 4);
    }

    #[tokio::test]
    async fn generator_sees_entire_history() {
        let client = Arc::new(ScriptedClient::new(["a", "b"]));
        let bot = Chatbot::new(client.clone());

        let (state, _) = bot.run_turn(ConversationState::new(), "first").await.unwrap();
        let (_, _) = bot.run_turn(state, "second").await.unwrap();

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].len(), 1);
        let roles: Vec<Role> = calls[1].iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(calls[1][2].content(), "second");
    }

    #[test]
    fn reports_the_client_model() {
        let bot = Chatbot::new(Arc::new(ScriptedClient::new(Vec::<String>::new())));
        assert_eq!(bot.model(), "scripted");
    }

    #[tokio::test]
    async fn generate_refuses_empty_state() {
        let client = Arc::new(ScriptedClient::new(["unused"]));
        let bot = Chatbot::new(client.clone());
        let err = bot.generate(&ConversationState::new()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyConversation));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let client = Arc::new(ScriptedClient::failing("quota exceeded"));
        let bot = Chatbot::new(client);
        let err = bot.run_turn(ConversationState::new(), "hello").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
    }
}
