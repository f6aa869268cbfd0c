use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use scribe_lib::claude::ClaudeService;
use scribe_lib::commands::{CommandController, CommandRegistry};
use scribe_lib::error::CommandError;
use scribe_lib::host::{DocumentRef, Editor, LogNotifier, MarkdownEditor};
use scribe_lib::session::{MarkdownFrontmatter, SessionStore};
use scribe_lib::settings::{default_settings_path, JsonSettingsStore, Settings, SettingsManager};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(about = "Run Claude writing commands against Markdown documents")]
struct Cli {
    /// Settings file to use instead of the per-user default.
    #[arg(long, global = true, env = "SCRIBE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available commands
    Commands,
    /// Run a command against a document
    Run {
        /// Command id, see `scribe commands`
        id: String,
        #[arg(long)]
        file: PathBuf,
        /// Selection start, a byte offset into the body after the frontmatter
        #[arg(long, requires = "end")]
        start: Option<usize>,
        #[arg(long, requires = "start")]
        end: Option<usize>,
        /// Insertion point when there is no selection
        #[arg(long, conflicts_with = "start")]
        cursor: Option<usize>,
    },
    /// Inspect or reset the conversation stored in a document
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    Show {
        #[arg(long)]
        file: PathBuf,
    },
    Clear {
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    /// Set one value, e.g. `settings set model opus`
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let manager = SettingsManager::load(Arc::new(JsonSettingsStore::new(config_path)));
    let settings = manager.get().await;
    scribe_lib::logging::init(settings.debug_mode);

    match dispatch(cli.command, &manager, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("[Main] Exiting with error: {:#}", e);
            if !already_notified(&e) {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Controller failures have been shown through the notifier already.
fn already_notified(error: &anyhow::Error) -> bool {
    error.downcast_ref::<CommandError>().is_some()
}

async fn dispatch(
    command: Commands,
    manager: &SettingsManager,
    settings: Settings,
) -> anyhow::Result<()> {
    match command {
        Commands::Commands => {
            for info in CommandRegistry::with_builtins().list() {
                let marker = if info.requires_selection { "" } else { " (no selection needed)" };
                println!("{:<12} {}{}", info.id, info.name, marker);
            }
            Ok(())
        }
        Commands::Run {
            id,
            file,
            start,
            end,
            cursor,
        } => run_command(&id, file, start.zip(end).map(|(s, e)| s..e), cursor, settings).await,
        Commands::Session { action } => session_action(action, settings),
        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                println!("{}", serde_json::to_string_pretty(&settings)?);
                Ok(())
            }
            SettingsAction::Set { key, value } => {
                let updated = manager.set_field(&key, &value).await?;
                println!("{}", serde_json::to_string_pretty(&updated)?);
                Ok(())
            }
        },
    }
}

async fn run_command(
    id: &str,
    file: PathBuf,
    selection: Option<std::ops::Range<usize>>,
    cursor: Option<usize>,
    settings: Settings,
) -> anyhow::Result<()> {
    let registry = CommandRegistry::with_builtins();
    let command = registry
        .get(id)
        .ok_or_else(|| anyhow!("Unknown command '{}'. Run `scribe commands` to list them", id))?;

    let document = DocumentRef::new(file);
    let mut editor = MarkdownEditor::open(&document, selection, cursor).map_err(|e| anyhow!(e))?;

    let controller = CommandController::from_settings(
        settings,
        Arc::new(MarkdownFrontmatter::new()),
        Arc::new(LogNotifier),
    )
    .await?;

    let editor: &mut dyn Editor = &mut editor;
    let outcome = controller
        .run(command.as_ref(), Some(editor), Some(&document))
        .await
        .with_context(|| format!("{} failed on {}", command.name(), document.display()))?;

    if let Some(session_id) = &outcome.session_id {
        tracing::info!("[Main] Session {} saved to {}", session_id, document.display());
    }
    println!("{}", outcome.rendered);
    Ok(())
}

fn session_action(action: SessionAction, settings: Settings) -> anyhow::Result<()> {
    match action {
        SessionAction::Show { file } => {
            let document = DocumentRef::new(file);
            let sessions = SessionStore::new(Arc::new(MarkdownFrontmatter::new()));
            match sessions.get(&document)? {
                Some(session_id) => println!("{}", session_id),
                None => println!("No conversation stored in {}", document.display()),
            }
            Ok(())
        }
        SessionAction::Clear { file } => {
            let document = DocumentRef::new(file);
            // Clearing never spawns the CLI, so the configured path is enough
            let controller = CommandController::new(
                ClaudeService::new(settings.cli_path.clone()),
                SessionStore::new(Arc::new(MarkdownFrontmatter::new())),
                settings,
                Arc::new(LogNotifier),
            );
            controller.clear_session(Some(&document))?;
            Ok(())
        }
    }
}
