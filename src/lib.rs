pub mod claude;
pub mod commands;
pub mod error;
pub mod host;
pub mod logging;
pub mod session;
pub mod settings;

pub(crate) mod fs;

#[cfg(test)]
mod test_helpers;

pub use claude::{CallOptions, ClaudeService, ParsedResponse};
pub use commands::{CommandController, CommandOutcome, CommandRegistry, EditorCommand};
pub use error::{ClaudeError, CommandError, FrontmatterError, SettingsError};
pub use host::{DocumentRef, Editor, MarkdownEditor, Notifier};
pub use session::{MarkdownFrontmatter, SessionStore};
pub use settings::{Settings, SettingsManager};
