use async_trait::async_trait;

use crate::db::{HistoryRow, Message, Role, SessionId, StoreError};

/// Persistence used by a chat turn.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends one message. Fails with [`StoreError::SessionNotFound`] for an unknown session.
    async fn append_message(
        &self,
        session_id: SessionId,
        text: &str,
        role: Role,
    ) -> Result<Message, StoreError>;

    /// The session's messages, oldest first.
    async fn load_history(&self, session_id: SessionId) -> Result<Vec<HistoryRow>, StoreError>;
}
