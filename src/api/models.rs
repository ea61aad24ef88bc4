use serde::Deserialize;

use crate::db::SessionId;

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub session_id: SessionId,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatHistoryRequest {
    pub session_id: SessionId,
}
