use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::llm::{
    models::{ChatOptions, Message, Role, StreamUnit},
    LlmError, LlmProvider, TokenStream,
};

pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, base_url: String, default_model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            default_model,
        }
    }

    fn request_body(&self, messages: &[Message], options: &ChatOptions) -> serde_json::Value {
        let model = options.model.as_deref().unwrap_or(&self.default_model);

        let mut body = json!({
            "model": model,
            "messages": with_system_prompt(messages, options.system_prompt.as_deref()),
            "stream": true,
            "temperature": options.temperature.unwrap_or(0.7),
            "max_tokens": options.max_tokens.unwrap_or(4096),
        });

        if !options.tools.is_empty() {
            body["tools"] = json!(options.tools);
        }

        body
    }
}

fn with_system_prompt(messages: &[Message], system_prompt: Option<&str>) -> Vec<Message> {
    let mut final_messages = Vec::with_capacity(messages.len() + 1);
    if let Some(system) = system_prompt {
        final_messages.push(Message::new(Role::System, system));
    }
    final_messages.extend_from_slice(messages);
    final_messages
}

/// Parses the `data` of one SSE event. Payloads that are not a chunk yield `None`.
pub(crate) fn parse_stream_data(data: &str) -> Option<StreamUnit> {
    match serde_json::from_str::<StreamUnit>(data) {
        Ok(unit) => Some(unit),
        Err(e) => {
            debug!("Skipping unparseable stream event: {}", e);
            None
        }
    }
}

/// Turns an SSE response body into stream units.
///
/// The completion ends at `data: [DONE]`. A body that closes before it is a
/// dropped connection and ends the stream with a network error.
pub(crate) fn units_from_sse<S, B, E>(body: S) -> TokenStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let mut events = Box::pin(body.eventsource());

    Box::pin(async_stream::stream! {
        let mut done = false;
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    if event.data == "[DONE]" {
                        done = true;
                        break;
                    }
                    if let Some(unit) = parse_stream_data(&event.data) {
                        yield Ok(unit);
                    }
                }
                Err(e) => {
                    yield Err(LlmError::Network(e.to_string()));
                    return;
                }
            }
        }
        if !done {
            warn!("OpenAI stream closed before [DONE]");
            yield Err(LlmError::Network("stream ended before [DONE]".to_string()));
        }
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn chat_stream(&self, messages: &[Message], options: ChatOptions) -> Result<TokenStream, LlmError> {
        let body = self.request_body(messages, &options);

        info!("Opening OpenAI stream with {} messages", messages.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::Api(format!("OpenAI Stream Error {}: {}", status, text)));
        }

        Ok(units_from_sse(response.bytes_stream()))
    }
}
