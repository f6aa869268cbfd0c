pub mod builtin;
pub mod controller;
pub mod registry;
pub mod schema;

use crate::error::CommandError;
use crate::host::EditorContext;
use serde_json::Value;

pub use controller::{CommandController, CommandOutcome};
pub use registry::{CommandInfo, CommandRegistry};
pub use schema::OutputSchema;

/// What a command got back from Claude, after schema validation.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    Text(String),
    Structured(Value),
}

impl CommandOutput {
    /// Plain text as-is, structured output as pretty-printed JSON.
    pub fn to_plain_text(&self) -> String {
        match self {
            CommandOutput::Text(text) => text.clone(),
            CommandOutput::Structured(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// A user-invokable editor action.
pub trait EditorCommand: Send + Sync {
    /// Stable identifier the host binds to.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    fn requires_selection(&self) -> bool {
        true
    }

    fn build_prompt(&self, context: &EditorContext) -> String;

    /// Ask for schema-constrained output instead of free text.
    fn output_schema(&self) -> Option<OutputSchema> {
        None
    }

    /// Text that replaces the selection.
    fn render(&self, output: &CommandOutput) -> Result<String, CommandError> {
        Ok(output.to_plain_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    impl EditorCommand for Echo {
        fn id(&self) -> &str {
            "echo"
        }

        fn name(&self) -> &str {
            "Echo"
        }

        fn build_prompt(&self, context: &EditorContext) -> String {
            context.selection.clone()
        }
    }

    #[test]
    fn test_default_render_plain_text() {
        let rendered = Echo.render(&CommandOutput::Text("hello".into())).unwrap();

        assert_eq!(rendered, "hello");
    }

    #[test]
    fn test_default_render_pretty_prints_structured() {
        let rendered = Echo
            .render(&CommandOutput::Structured(json!({"text": "hi"})))
            .unwrap();

        assert_eq!(rendered, "{\n  \"text\": \"hi\"\n}");
    }

    #[test]
    fn test_defaults() {
        assert!(Echo.requires_selection());
        assert!(Echo.output_schema().is_none());
    }
}
