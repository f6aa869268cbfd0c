use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Name of the tool the CLI uses to hand back schema-validated output.
pub const STRUCTURED_OUTPUT_TOOL: &str = "StructuredOutput";

/// Returned as the response text when no extraction strategy finds anything.
pub const NO_TEXT_SENTINEL: &str = "(no text in response)";

/// Options for a single Claude CLI invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    pub prompt: String,
    pub model: Option<String>,
    /// Resume an earlier conversation instead of starting a new one.
    pub session_id: Option<String>,
    pub system_prompt: Option<String>,
    pub json_schema: Option<Value>,
    pub max_tokens: Option<u32>,
}

impl CallOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.json_schema = Some(schema);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// One element of the JSON array printed by `--output-format json --verbose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseMessage {
    System(SystemMessage),
    Assistant(ConversationMessage),
    User(ConversationMessage),
    Result(ResultMessage),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An `assistant` or `user` entry wrapping an API message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    #[serde(default)]
    pub message: ApiMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<ContentBlock>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiMessage {
    pub fn text_blocks(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One typed unit inside an API message's `content` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ToolUse {
        #[serde(default)]
        id: String,
        #[serde(default)]
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<Value>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ToolResult {
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

/// Accepts either an array of blocks or a bare string (user prompts are
/// sometimes echoed that way). Blocks that fail to decode become `Unknown`.
fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => vec![ContentBlock::text(text)],
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or(ContentBlock::Unknown))
            .collect(),
        _ => Vec::new(),
    })
}

/// What the service hands back after a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub session_id: Option<String>,
    /// Extracted payload. JSON-encoded when the CLI returned structured output.
    pub text: String,
    /// The CLI's message array exactly as printed.
    pub raw: Vec<Value>,
    pub messages: Vec<ResponseMessage>,
}

impl ParsedResponse {
    /// The last `result` message, if the CLI emitted one.
    pub fn result_message(&self) -> Option<&ResultMessage> {
        self.messages.iter().rev().find_map(|message| match message {
            ResponseMessage::Result(result) => Some(result),
            _ => None,
        })
    }

    pub fn total_cost_usd(&self) -> Option<f64> {
        self.result_message().and_then(|r| r.total_cost_usd)
    }

    pub fn num_turns(&self) -> Option<u32> {
        self.result_message().and_then(|r| r.num_turns)
    }

    pub fn is_error(&self) -> bool {
        self.result_message()
            .and_then(|r| r.is_error)
            .unwrap_or(false)
    }
}
