use std::pin::Pin;
use std::sync::Arc;

use futures_util::{Stream, StreamExt};
use tracing::{info, warn};

use crate::chat::{classifier::classify, finalizer::finalize_function_payload, ChatError, MessageStore};
use crate::db::{Role, SessionId};
use crate::llm::{models::StreamUnit, TokenStream};

/// Chunks forwarded to the caller during one turn. Ends when the turn is committed.
pub type TurnStream = Pin<Box<dyn Stream<Item = Result<String, ChatError>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Streaming,
    Finalizing,
    Committed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTurn {
    /// Flattened function arguments, forwarded after the last fragment.
    pub final_chunk: String,
    /// Text buffer followed by `final_chunk`; this is what gets persisted.
    pub combined: String,
}

/// Buffers for one assistant reply.
#[derive(Debug)]
pub struct TurnAssembler {
    text: String,
    function_args: String,
    state: TurnState,
}

impl Default for TurnAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnAssembler {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            function_args: String::new(),
            state: TurnState::Streaming,
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Buffers the unit's fragment and returns it for forwarding.
    ///
    /// When a unit carries both kinds, only the text is kept and the
    /// function fragment of that unit is dropped.
    pub fn accept(&mut self, unit: &StreamUnit) -> Option<String> {
        debug_assert_eq!(self.state, TurnState::Streaming);
        match classify(unit) {
            (Some(text), _) => {
                self.text.push_str(text);
                Some(text.to_string())
            }
            (None, Some(args)) => {
                self.function_args.push_str(args);
                Some(args.to_string())
            }
            (None, None) => None,
        }
    }

    /// Ends the streaming phase and builds the final chunk and the combined message.
    pub fn finish(&mut self) -> AssembledTurn {
        debug_assert_eq!(self.state, TurnState::Streaming);
        self.state = TurnState::Finalizing;

        let final_chunk = finalize_function_payload(&self.function_args);
        let mut combined = String::with_capacity(self.text.len() + final_chunk.len());
        combined.push_str(&self.text);
        combined.push_str(&final_chunk);

        AssembledTurn {
            final_chunk,
            combined,
        }
    }

    pub fn mark_committed(&mut self) {
        debug_assert_eq!(self.state, TurnState::Finalizing);
        self.state = TurnState::Committed;
    }
}

/// Forwards each fragment of `units` as it arrives, then the finalized
/// function text, then commits the combined reply as the assistant message.
///
/// The returned stream is lazy: units are only pulled while the caller polls.
/// Dropping it before it ends skips the commit. A fault from `units` or from
/// the store is yielded as the last item.
pub fn assemble_turn(store: Arc<dyn MessageStore>, session_id: SessionId, mut units: TokenStream) -> TurnStream {
    Box::pin(async_stream::stream! {
        let mut assembler = TurnAssembler::new();

        while let Some(unit) = units.next().await {
            match unit {
                Ok(unit) => {
                    if let Some(fragment) = assembler.accept(&unit) {
                        yield Ok(fragment);
                    }
                }
                Err(e) => {
                    warn!("Token stream failed for session {}: {}", session_id, e);
                    yield Err(ChatError::from(e));
                    return;
                }
            }
        }

        let turn = assembler.finish();
        yield Ok(turn.final_chunk);

        if let Err(e) = store
            .append_message(session_id, &turn.combined, Role::Assistant)
            .await
        {
            warn!("Failed to save assistant reply for session {}: {}", session_id, e);
            yield Err(ChatError::from(e));
            return;
        }

        assembler.mark_committed();
        info!("Committed assistant reply for session {} ({} bytes)", session_id, turn.combined.len());
    })
}
