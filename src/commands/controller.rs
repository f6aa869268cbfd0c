use super::{CommandOutput, EditorCommand};
use crate::claude::{resolve_cli_path, CallOptions, ClaudeService};
use crate::error::CommandError;
use crate::host::{DocumentRef, Editor, EditorContext, Notifier};
use crate::session::{FrontmatterStore, SessionStore};
use crate::settings::Settings;
use std::sync::Arc;

/// Result of a command that completed and was written to the document.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    pub output: CommandOutput,
    pub rendered: String,
    pub session_id: Option<String>,
    /// Whether the call continued an earlier conversation.
    pub resumed: bool,
}

/// Runs editor commands: snapshot, prompt, call, validate, persist, render.
///
/// The selection is only replaced after everything else succeeded. If that
/// final write fails, the session field goes back to its previous value.
pub struct CommandController {
    service: ClaudeService,
    sessions: SessionStore,
    settings: Settings,
    notifier: Arc<dyn Notifier>,
}

impl CommandController {
    pub fn new(
        service: ClaudeService,
        sessions: SessionStore,
        settings: Settings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            service,
            sessions,
            settings,
            notifier,
        }
    }

    /// Locate the CLI from `settings` and build a controller around it.
    pub async fn from_settings(
        settings: Settings,
        frontmatter: Arc<dyn FrontmatterStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CommandError> {
        let Some(cli_path) = resolve_cli_path(&settings.cli_path).await else {
            notifier.notify(&CommandError::CliNotFound.to_string());
            return Err(CommandError::CliNotFound);
        };

        let service = ClaudeService::new(cli_path).with_debug(settings.debug_mode);
        Ok(Self::new(
            service,
            SessionStore::new(frontmatter),
            settings,
            notifier,
        ))
    }

    pub fn service(&self) -> &ClaudeService {
        &self.service
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run `command`; any failure is reported to the user and returned.
    pub async fn run(
        &self,
        command: &dyn EditorCommand,
        editor: Option<&mut dyn Editor>,
        document: Option<&DocumentRef>,
    ) -> Result<CommandOutcome, CommandError> {
        tracing::info!("[CommandController] Running command: {}", command.id());

        match self.execute(command, editor, document).await {
            Ok(outcome) => {
                tracing::info!(
                    "[CommandController] {} finished ({} chars written)",
                    command.id(),
                    outcome.rendered.len()
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("[CommandController] {} failed: {}", command.id(), e);
                self.notifier.notify(&format!("{}: {}", command.name(), e));
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        command: &dyn EditorCommand,
        editor: Option<&mut dyn Editor>,
        document: Option<&DocumentRef>,
    ) -> Result<CommandOutcome, CommandError> {
        let (Some(editor), Some(document)) = (editor, document) else {
            return Err(CommandError::NoActiveDocument);
        };

        let context = EditorContext::capture(&*editor, document);
        if command.requires_selection() && !context.has_selection() {
            return Err(CommandError::EmptySelection);
        }

        let previous_session = self.sessions.get(document)?;
        let schema = command.output_schema();

        let options = CallOptions {
            prompt: command.build_prompt(&context),
            model: self.settings.model().map(str::to_string),
            session_id: previous_session.clone(),
            system_prompt: self.settings.system_prompt().map(str::to_string),
            json_schema: schema.as_ref().map(|s| s.json_schema().clone()),
            max_tokens: Some(self.settings.max_budget_tokens),
        };

        let response = self.service.call(&options).await?;

        let output = match &schema {
            Some(schema) => CommandOutput::Structured(schema.validate(&response.text)?),
            None => CommandOutput::Text(response.text.clone()),
        };
        let rendered = command.render(&output)?;

        if let Some(session_id) = &response.session_id {
            self.sessions.set(document, session_id)?;
        }

        if let Err(e) = editor.replace_selection(&rendered) {
            if response.session_id.is_some() {
                let restored = self.sessions.restore(document, previous_session.as_deref());
                if let Err(restore) = restored {
                    tracing::warn!(
                        "[CommandController] Could not restore session for {}: {}",
                        document.display(),
                        restore
                    );
                }
            }
            return Err(CommandError::Editor(e));
        }

        Ok(CommandOutcome {
            output,
            rendered,
            session_id: response.session_id,
            resumed: previous_session.is_some(),
        })
    }

    /// Forget the conversation tied to `document`; the next command starts fresh.
    pub fn clear_session(&self, document: Option<&DocumentRef>) -> Result<(), CommandError> {
        let result = match document {
            Some(document) => self.sessions.clear(document).map_err(CommandError::from),
            None => Err(CommandError::NoActiveDocument),
        };

        match &result {
            Ok(()) => self.notifier.notify("Conversation reset for this document"),
            Err(e) => self.notifier.notify(&format!("Reset conversation: {}", e)),
        }
        result
    }
}
