//! Turn processing: classifying streamed units, assembling the assistant
//! reply, and committing it to the store.

pub mod aggregator;
pub mod classifier;
pub mod finalizer;
pub mod history;
pub mod service;
pub mod store;

use thiserror::Error;

use crate::db::StoreError;
use crate::llm::LlmError;

pub use aggregator::{assemble_turn, AssembledTurn, TurnAssembler, TurnState, TurnStream};
pub use service::ChatService;
pub use store::MessageStore;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("LLM Error: {0}")]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
