use super::types::*;
use crate::error::ClaudeError;
use serde_json::Value;

type Extractor = fn(&[ResponseMessage]) -> Option<String>;

/// Text extraction strategies, highest priority first.
const TEXT_EXTRACTORS: &[Extractor] = &[structured_output, final_result, assistant_text];

/// Parse the CLI's accumulated stdout into a [`ParsedResponse`].
pub fn parse_response(stdout: &str) -> Result<ParsedResponse, ClaudeError> {
    let value: Value = serde_json::from_str(stdout.trim())
        .map_err(|e| ClaudeError::MalformedOutput(e.to_string()))?;

    let raw = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(ClaudeError::MalformedOutput(format!(
                "expected a JSON array of messages, got {}",
                json_kind(&other)
            )))
        }
    };

    if raw.is_empty() {
        return Err(ClaudeError::EmptyOutput);
    }

    let messages: Vec<ResponseMessage> = raw
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::debug!("[ResponseParser] Skipping unrecognized message: {}", e);
                None
            }
        })
        .collect();

    let session_id = session_id(&messages);
    let text = TEXT_EXTRACTORS
        .iter()
        .find_map(|extract| extract(&messages))
        .unwrap_or_else(|| NO_TEXT_SENTINEL.to_string());

    Ok(ParsedResponse {
        session_id,
        text,
        raw,
        messages,
    })
}

/// First non-empty session id carried by a `system` message.
fn session_id(messages: &[ResponseMessage]) -> Option<String> {
    messages.iter().find_map(|message| match message {
        ResponseMessage::System(system) => system
            .session_id
            .as_ref()
            .filter(|id| !id.is_empty())
            .cloned(),
        _ => None,
    })
}

fn assistant_messages(messages: &[ResponseMessage]) -> impl Iterator<Item = &ApiMessage> {
    messages.iter().filter_map(|message| match message {
        ResponseMessage::Assistant(assistant) => Some(&assistant.message),
        _ => None,
    })
}

/// Input of the structured-output tool call, re-serialized compactly.
fn structured_output(messages: &[ResponseMessage]) -> Option<String> {
    assistant_messages(messages)
        .flat_map(|message| message.content.iter())
        .find_map(|block| match block {
            ContentBlock::ToolUse {
                name,
                input: Some(input),
                ..
            } if name == STRUCTURED_OUTPUT_TOOL && input.is_object() => Some(input.to_string()),
            _ => None,
        })
}

/// The last non-empty `result` string.
fn final_result(messages: &[ResponseMessage]) -> Option<String> {
    messages.iter().rev().find_map(|message| match message {
        ResponseMessage::Result(result) => result
            .result
            .as_ref()
            .filter(|text| !text.is_empty())
            .cloned(),
        _ => None,
    })
}

/// Every assistant text block, in order, joined by newlines.
fn assistant_text(messages: &[ResponseMessage]) -> Option<String> {
    let texts: Vec<&str> = assistant_messages(messages)
        .flat_map(|message| message.text_blocks())
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
