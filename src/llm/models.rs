use serde::{Deserialize, Serialize};

pub use crate::db::models::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatOptions {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub r#type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

// Streamed chat completion chunks. Every level is optional so that any
// partial shape still deserializes and simply carries no fragment.

/// One increment of a streamed completion.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamUnit {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallDelta>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolCallDelta {
    #[serde(default)]
    pub function: Option<FunctionDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

impl StreamUnit {
    /// A unit carrying a single text fragment.
    pub fn text(content: impl Into<String>) -> Self {
        Self::with_delta(ChunkDelta {
            content: Some(content.into()),
            tool_calls: None,
        })
    }

    /// A unit carrying a single function-argument fragment.
    pub fn function_arguments(arguments: impl Into<String>) -> Self {
        Self::with_delta(ChunkDelta {
            content: None,
            tool_calls: Some(vec![ToolCallDelta {
                function: Some(FunctionDelta {
                    name: None,
                    arguments: Some(arguments.into()),
                }),
            }]),
        })
    }

    fn with_delta(delta: ChunkDelta) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: Some(delta),
                finish_reason: None,
            }],
        }
    }
}
