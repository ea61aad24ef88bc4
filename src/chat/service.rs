use std::sync::Arc;

use tracing::info;

use crate::chat::{assemble_turn, history::project_history, ChatError, MessageStore, TurnStream};
use crate::db::{Role, SessionId};
use crate::llm::{
    models::{ChatOptions, Message},
    LlmProvider,
};

/// Starts chat turns: stores the prompt, replays the history to the model and
/// hands back the live reply.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn MessageStore>,
    llm: Arc<dyn LlmProvider>,
    options: ChatOptions,
}

impl ChatService {
    pub fn new(store: Arc<dyn MessageStore>, llm: Arc<dyn LlmProvider>, options: ChatOptions) -> Self {
        Self { store, llm, options }
    }

    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    /// The session is expected to exist already.
    pub async fn start_turn(&self, session_id: SessionId, prompt: &str) -> Result<TurnStream, ChatError> {
        let history = self.store.load_history(session_id).await?;
        let mut messages = project_history(&history);

        self.store.append_message(session_id, prompt, Role::User).await?;
        messages.push(Message::new(Role::User, prompt));

        info!(
            "Starting turn for session {} with {} prior messages via {}",
            session_id,
            history.len(),
            self.llm.name()
        );

        let units = self.llm.chat_stream(&messages, self.options.clone()).await?;
        Ok(assemble_turn(self.store.clone(), session_id, units))
    }
}
