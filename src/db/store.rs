use async_trait::async_trait;

use crate::chat::store::MessageStore;
use crate::db::{service::DbService, DbPool, HistoryRow, Message, Role, SessionId, StoreError};

/// [`MessageStore`] backed by the shared DuckDB handle.
#[derive(Clone)]
pub struct DbStore {
    pool: DbPool,
}

impl DbStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl MessageStore for DbStore {
    async fn append_message(
        &self,
        session_id: SessionId,
        text: &str,
        role: Role,
    ) -> Result<Message, StoreError> {
        let conn = self.pool.lock().map_err(|_| StoreError::Poisoned)?;
        DbService::insert_message(&conn, session_id, text, role)
    }

    async fn load_history(&self, session_id: SessionId) -> Result<Vec<HistoryRow>, StoreError> {
        let conn = self.pool.lock().map_err(|_| StoreError::Poisoned)?;
        let messages = DbService::get_history(&conn, session_id)?;
        Ok(messages.into_iter().map(HistoryRow::from).collect())
    }
}
