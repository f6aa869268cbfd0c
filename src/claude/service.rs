use super::invoker::{build_args, ProcessRunner, SystemProcessRunner};
use super::parser::parse_response;
use super::types::*;
use crate::error::ClaudeError;
use std::sync::Arc;

/// One-shot prompt/response calls against the Claude CLI.
#[derive(Clone)]
pub struct ClaudeService {
    cli_path: String,
    runner: Arc<dyn ProcessRunner>,
    debug: bool,
}

impl ClaudeService {
    pub fn new(cli_path: impl Into<String>) -> Self {
        Self::with_runner(cli_path, Arc::new(SystemProcessRunner))
    }

    pub fn with_runner(cli_path: impl Into<String>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            cli_path: cli_path.into(),
            runner,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn cli_path(&self) -> &str {
        &self.cli_path
    }

    pub async fn call(&self, options: &CallOptions) -> Result<ParsedResponse, ClaudeError> {
        let args = build_args(options);

        tracing::info!(
            "[ClaudeService] Calling {} (model: {:?}, resume: {}, schema: {})",
            self.cli_path,
            options.model,
            options.session_id.is_some(),
            options.json_schema.is_some()
        );
        if self.debug {
            tracing::debug!("[ClaudeService] Args: {:?}", args);
        }

        let output = self.runner.run(&self.cli_path, &args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::warn!(
                "[ClaudeService] CLI exited with {:?}: {}",
                output.status.code(),
                stderr
            );
            return Err(ClaudeError::AbnormalExit {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if self.debug {
            tracing::debug!("[ClaudeService] Raw output: {}", stdout);
        }

        let response = parse_response(&stdout)?;

        if self.debug {
            tracing::debug!(
                "[ClaudeService] Turns: {:?}, cost: {:?} USD",
                response.num_turns(),
                response.total_cost_usd()
            );
        }
        if response.is_error() {
            tracing::warn!("[ClaudeService] CLI flagged its result as an error");
        }

        tracing::info!(
            "[ClaudeService] Received response: {} chars, session: {:?}",
            response.text.len(),
            response.session_id
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::mocks::{mock_failed_output, mock_json_output, ScriptedRunner};
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_call_parses_successful_output() {
        let runner = ScriptedRunner::returning(mock_json_output(json!([
            {"type": "system", "subtype": "init", "session_id": "abc123"},
            {"type": "result", "result": "hi there"}
        ])));
        let service = ClaudeService::with_runner("claude", runner.clone());

        let response = assert_ok!(service.call(&CallOptions::new("hello")).await);

        assert_eq!(response.session_id.as_deref(), Some("abc123"));
        assert_eq!(response.text, "hi there");
        assert_eq!(response.raw.len(), 2);
    }

    #[tokio::test]
    async fn test_call_passes_program_and_args() {
        let runner = ScriptedRunner::returning(mock_json_output(json!([
            {"type": "result", "result": "ok"}
        ])));
        let service = ClaudeService::with_runner("/opt/bin/claude", runner.clone());

        let options = CallOptions::new("prompt").with_session("prev");
        assert_ok!(service.call(&options).await);

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/opt/bin/claude");
        assert_eq!(calls[0].1, build_args(&options));
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_code_and_trimmed_stderr() {
        let runner = ScriptedRunner::returning(mock_failed_output(1, "authentication expired\n"));
        let service = ClaudeService::with_runner("claude", runner);

        let err = assert_err!(service.call(&CallOptions::new("x")).await);

        match err {
            ClaudeError::AbnormalExit { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "authentication expired");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure_is_distinct() {
        let runner =
            ScriptedRunner::failing(ClaudeError::Spawn("No such file or directory".into()));
        let service = ClaudeService::with_runner("claude", runner);

        let err = assert_err!(service.call(&CallOptions::new("x")).await);

        assert!(matches!(err, ClaudeError::Spawn(_)));
    }

    #[tokio::test]
    async fn test_empty_array_output() {
        let runner = ScriptedRunner::returning(mock_json_output(json!([])));
        let service = ClaudeService::with_runner("claude", runner);

        let err = assert_err!(service.call(&CallOptions::new("x")).await);

        assert!(matches!(err, ClaudeError::EmptyOutput));
    }

    #[tokio::test]
    async fn test_malformed_output() {
        let runner = ScriptedRunner::returning(crate::test_helpers::mocks::mock_successful_output(
            "not json at all",
        ));
        let service = ClaudeService::with_runner("claude", runner);

        let err = assert_err!(service.call(&CallOptions::new("x")).await);

        assert!(matches!(err, ClaudeError::MalformedOutput(_)));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_real_process_spawn_failure() {
        let service = ClaudeService::new("/nonexistent/path/to/claude");

        let err = assert_err!(service.call(&CallOptions::new("x")).await);

        assert!(matches!(err, ClaudeError::Spawn(_)));
    }
}
