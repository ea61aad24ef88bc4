#![allow(dead_code)]

use async_trait::async_trait;
use chatrelay::chat::MessageStore;
use chatrelay::db::{HistoryRow, Message, Role, SessionId, StoreError};
use chatrelay::llm::{
    models::{ChatOptions, Message as LlmMessage, StreamUnit},
    LlmError, LlmProvider, TokenStream,
};
use chrono::Utc;
use futures_util::stream;
use std::sync::Mutex;

/// In-memory store that records every append.
#[derive(Default)]
pub struct RecordingStore {
    pub history: Vec<HistoryRow>,
    pub fail_appends: bool,
    appended: Mutex<Vec<(SessionId, String, Role)>>,
}

impl RecordingStore {
    pub fn with_history(history: Vec<HistoryRow>) -> Self {
        Self {
            history,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_appends: true,
            ..Default::default()
        }
    }

    pub fn appended(&self) -> Vec<(SessionId, String, Role)> {
        self.appended.lock().unwrap().clone()
    }

    pub fn assistant_appends(&self) -> Vec<String> {
        self.appended()
            .into_iter()
            .filter(|(_, _, role)| *role == Role::Assistant)
            .map(|(_, text, _)| text)
            .collect()
    }
}

#[async_trait]
impl MessageStore for RecordingStore {
    async fn append_message(
        &self,
        session_id: SessionId,
        text: &str,
        role: Role,
    ) -> Result<Message, StoreError> {
        if self.fail_appends {
            return Err(StoreError::SessionNotFound(session_id));
        }
        let mut appended = self.appended.lock().unwrap();
        appended.push((session_id, text.to_string(), role));
        Ok(Message {
            id: appended.len() as i64,
            session_id,
            content: text.to_string(),
            role,
            created_at: Utc::now(),
        })
    }

    async fn load_history(&self, _session_id: SessionId) -> Result<Vec<HistoryRow>, StoreError> {
        Ok(self.history.clone())
    }
}

/// Provider that replays fixed units and remembers the conversations it was sent.
pub struct ScriptedProvider {
    pub units: Vec<Result<StreamUnit, String>>,
    seen: Mutex<Vec<Vec<LlmMessage>>>,
}

impl ScriptedProvider {
    pub fn new(units: Vec<StreamUnit>) -> Self {
        Self {
            units: units.into_iter().map(Ok).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Replays `units`, then fails with a network error.
    pub fn failing_after(units: Vec<StreamUnit>) -> Self {
        let mut provider = Self::new(units);
        provider.units.push(Err("connection reset".to_string()));
        provider
    }

    pub fn seen(&self) -> Vec<Vec<LlmMessage>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat_stream(&self, messages: &[LlmMessage], _options: ChatOptions) -> Result<TokenStream, LlmError> {
        self.seen.lock().unwrap().push(messages.to_vec());
        Ok(token_stream(self.units.clone()))
    }
}

pub fn token_stream(units: Vec<Result<StreamUnit, String>>) -> TokenStream {
    Box::pin(stream::iter(
        units.into_iter().map(|u| u.map_err(LlmError::Network)),
    ))
}

pub fn ok_units(units: Vec<StreamUnit>) -> TokenStream {
    token_stream(units.into_iter().map(Ok).collect())
}
