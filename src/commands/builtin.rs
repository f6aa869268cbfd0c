//! Commands shipped with the crate.

use super::schema::{string_field, OutputSchema};
use super::{CommandOutput, EditorCommand};
use crate::error::CommandError;
use crate::host::EditorContext;
use serde_json::{json, Value};
use std::sync::Arc;

pub fn builtin_commands() -> Vec<Arc<dyn EditorCommand>> {
    vec![
        Arc::new(ExpandCommand),
        Arc::new(SummarizeCommand),
        Arc::new(ImproveCommand),
        Arc::new(FixGrammarCommand),
        Arc::new(ContinueCommand),
        Arc::new(OutlineCommand),
    ]
}

/// Render the `text` field of structured output, or plain text unchanged.
fn render_text_field(output: &CommandOutput) -> Result<String, CommandError> {
    match output {
        CommandOutput::Structured(value) => string_field(value, "text").map(str::to_string),
        CommandOutput::Text(text) => Ok(text.clone()),
    }
}

fn with_document(instructions: &str, context: &EditorContext) -> String {
    format!(
        "{}\n\nDocument ({}):\n<document>\n{}\n</document>\n\n\
         Selected text:\n<selection>\n{}\n</selection>",
        instructions, context.document_path, context.document_text, context.selection
    )
}

pub struct ExpandCommand;

impl EditorCommand for ExpandCommand {
    fn id(&self) -> &str {
        "expand"
    }

    fn name(&self) -> &str {
        "Expand selection"
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        with_document(
            "Expand the selected text into fuller prose. Add detail and description \
             that fits the surrounding document. Keep the original meaning and tone.",
            context,
        )
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(OutputSchema::strings(&["text"]))
    }

    fn render(&self, output: &CommandOutput) -> Result<String, CommandError> {
        render_text_field(output)
    }
}

pub struct SummarizeCommand;

impl EditorCommand for SummarizeCommand {
    fn id(&self) -> &str {
        "summarize"
    }

    fn name(&self) -> &str {
        "Summarize selection"
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        format!(
            "Summarize the following text in a few sentences. Reply with the summary only.\n\n{}",
            context.selection
        )
    }
}

pub struct ImproveCommand;

impl EditorCommand for ImproveCommand {
    fn id(&self) -> &str {
        "improve"
    }

    fn name(&self) -> &str {
        "Improve writing"
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        with_document(
            "Rewrite the selected text for clarity and flow. Return the rewritten text \
             and a short list of the changes you made.",
            context,
        )
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(OutputSchema::new(json!({
            "type": "object",
            "properties": {
                "text": {"type": "string"},
                "changes": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["text"],
            "additionalProperties": false
        })))
    }

    fn render(&self, output: &CommandOutput) -> Result<String, CommandError> {
        if let CommandOutput::Structured(value) = output {
            if let Some(changes) = value.get("changes").and_then(Value::as_array) {
                tracing::info!("[Improve] {} change(s): {:?}", changes.len(), changes);
            }
        }
        render_text_field(output)
    }
}

pub struct FixGrammarCommand;

impl EditorCommand for FixGrammarCommand {
    fn id(&self) -> &str {
        "fix-grammar"
    }

    fn name(&self) -> &str {
        "Fix grammar and spelling"
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        format!(
            "Correct grammar, spelling and punctuation in the text below. Change nothing else, \
             keep Markdown formatting intact.\n\n{}",
            context.selection
        )
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(OutputSchema::strings(&["text"]))
    }

    fn render(&self, output: &CommandOutput) -> Result<String, CommandError> {
        render_text_field(output)
    }
}

/// Writes on from the cursor; works without a selection.
pub struct ContinueCommand;

impl EditorCommand for ContinueCommand {
    fn id(&self) -> &str {
        "continue"
    }

    fn name(&self) -> &str {
        "Continue writing"
    }

    fn requires_selection(&self) -> bool {
        false
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        format!(
            "Continue the document from where it stops. Write one or two paragraphs that follow \
             naturally. Reply with the new text only, without repeating what is already there.\n\n\
             <document>\n{}\n</document>",
            context.text_before_cursor()
        )
    }
}

pub struct OutlineCommand;

impl EditorCommand for OutlineCommand {
    fn id(&self) -> &str {
        "outline"
    }

    fn name(&self) -> &str {
        "Generate outline"
    }

    fn build_prompt(&self, context: &EditorContext) -> String {
        format!(
            "Produce an outline of the text below as a list of sections, each with a short \
             heading and its key points.\n\n{}",
            context.selection
        )
    }

    fn output_schema(&self) -> Option<OutputSchema> {
        Some(OutputSchema::new(json!({
            "type": "object",
            "properties": {
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "heading": {"type": "string"},
                            "points": {"type": "array", "items": {"type": "string"}}
                        },
                        "required": ["heading", "points"]
                    }
                }
            },
            "required": ["sections"]
        })))
    }

    fn render(&self, output: &CommandOutput) -> Result<String, CommandError> {
        let CommandOutput::Structured(value) = output else {
            return Ok(output.to_plain_text());
        };

        let sections = value
            .get("sections")
            .and_then(Value::as_array)
            .ok_or_else(|| CommandError::Render("missing 'sections'".to_string()))?;

        let mut markdown = Vec::with_capacity(sections.len());
        for section in sections {
            let heading = string_field(section, "heading")?;
            let points: Vec<String> = section
                .get("points")
                .and_then(Value::as_array)
                .map(|points| {
                    points
                        .iter()
                        .filter_map(Value::as_str)
                        .map(|point| format!("- {}", point))
                        .collect()
                })
                .unwrap_or_default();

            if points.is_empty() {
                markdown.push(format!("## {}", heading));
            } else {
                markdown.push(format!("## {}\n\n{}", heading, points.join("\n")));
            }
        }

        Ok(markdown.join("\n\n"))
    }
}
