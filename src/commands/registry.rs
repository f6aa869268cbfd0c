use super::builtin::builtin_commands;
use super::EditorCommand;
use std::sync::Arc;

/// Identifier and display name of a registered command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandInfo {
    pub id: String,
    pub name: String,
    pub requires_selection: bool,
    pub structured: bool,
}

/// The commands exposed to the host, in registration order.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Arc<dyn EditorCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for command in builtin_commands() {
            // builtin ids are distinct
            let _ = registry.register(command);
        }
        registry
    }

    pub fn register(&mut self, command: Arc<dyn EditorCommand>) -> Result<(), String> {
        if self.get(command.id()).is_some() {
            return Err(format!("Command '{}' is already registered", command.id()));
        }

        tracing::debug!("[CommandRegistry] Registering command: {}", command.id());
        self.commands.push(command);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn EditorCommand>> {
        self.commands.iter().find(|c| c.id() == id).cloned()
    }

    pub fn list(&self) -> Vec<CommandInfo> {
        self.commands
            .iter()
            .map(|c| CommandInfo {
                id: c.id().to_string(),
                name: c.name().to_string(),
                requires_selection: c.requires_selection(),
                structured: c.output_schema().is_some(),
            })
            .collect()
    }
}
