use thiserror::Error;

/// Failures of a single Claude CLI call. None of them are retried.
#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("Failed to spawn Claude CLI: {0}")]
    Spawn(String),

    #[error("Failed to read Claude CLI output: {0}")]
    Io(String),

    #[error("Claude CLI exited with {}: {stderr}", exit_label(.code))]
    AbnormalExit { code: Option<i32>, stderr: String },

    #[error("Malformed Claude CLI output: {0}")]
    MalformedOutput(String),

    #[error("Claude CLI returned an empty response")]
    EmptyOutput,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Failures of a user-triggered editor command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No active document")]
    NoActiveDocument,

    #[error("Select some text first")]
    EmptySelection,

    #[error("Claude CLI not found. Set the CLI path in settings")]
    CliNotFound,

    #[error(transparent)]
    Claude(#[from] ClaudeError),

    #[error("Response did not match the expected schema: {0}")]
    SchemaValidation(String),

    #[error("Failed to render response: {0}")]
    Render(String),

    #[error("Failed to update document: {0}")]
    Editor(String),

    #[error("Failed to save session: {0}")]
    Session(#[from] FrontmatterError),
}

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frontmatter in {path}: {message}")]
    Yaml { path: String, message: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to write settings to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
