use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use tracing::error;

use crate::chat::TurnStream;

/// `\r\n`, `\r` and `\n` all end an SSE line, so each one starts a new `data:` field.
fn push_data_lines(frame: &mut String, data: &str) {
    for line in data.split("\r\n").flat_map(|part| part.split(['\r', '\n'])) {
        frame.push_str("data: ");
        frame.push_str(line);
        frame.push('\n');
    }
}

/// One `data:` event. Every line of `data` gets its own field so that newlines survive.
pub fn encode_event(data: &str) -> Bytes {
    let mut frame = String::with_capacity(data.len() + 8);
    push_data_lines(&mut frame, data);
    frame.push('\n');
    Bytes::from(frame)
}

pub fn encode_error(message: &str) -> Bytes {
    let mut frame = String::from("event: error\n");
    push_data_lines(&mut frame, message);
    frame.push('\n');
    Bytes::from(frame)
}

/// SSE response body for a turn. A failed turn ends with an `error` event.
pub fn turn_body(mut turn: TurnStream) -> impl Stream<Item = Result<Bytes, actix_web::Error>> {
    async_stream::stream! {
        while let Some(item) = turn.next().await {
            match item {
                Ok(chunk) => yield Ok::<Bytes, actix_web::Error>(encode_event(&chunk)),
                Err(e) => {
                    error!("Chat turn failed: {}", e);
                    yield Ok::<Bytes, actix_web::Error>(encode_error(&e.to_string()));
                    break;
                }
            }
        }
    }
}
