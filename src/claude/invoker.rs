use super::types::CallOptions;
use crate::error::ClaudeError;
use async_trait::async_trait;
use std::process::{Output, Stdio};

/// Turn budget for a plain call.
pub const SINGLE_TURN: u32 = 1;
/// Turn budget for a schema-constrained call: one turn to invoke the output
/// tool and one to deliver the validated payload.
pub const STRUCTURED_OUTPUT_TURNS: u32 = 2;

/// Build the Claude CLI argument list for one call.
pub fn build_args(options: &CallOptions) -> Vec<String> {
    let mut args = vec![
        "--print".to_string(),
        options.prompt.clone(),
        "--output-format".to_string(),
        "json".to_string(),
        // Without --verbose the CLI prints only the final result object
        "--verbose".to_string(),
    ];

    if let Some(model) = &options.model {
        args.push("--model".to_string());
        args.push(model.clone());
    }

    if let Some(session_id) = &options.session_id {
        args.push("--resume".to_string());
        args.push(session_id.clone());
    }

    if let Some(system_prompt) = &options.system_prompt {
        args.push("--system-prompt".to_string());
        args.push(system_prompt.clone());
    }

    if let Some(schema) = &options.json_schema {
        args.push("--json-schema".to_string());
        args.push(schema.to_string());
    }

    if options.max_tokens.is_some() {
        let turns = if options.json_schema.is_some() {
            STRUCTURED_OUTPUT_TURNS
        } else {
            SINGLE_TURN
        };
        args.push("--max-turns".to_string());
        args.push(turns.to_string());
    }

    args
}

/// Launches the CLI and collects its complete output.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<Output, ClaudeError>;
}

pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<Output, ClaudeError> {
        use tokio::process::Command;

        // The CLI blocks on an open stdin, so it gets none at all
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ClaudeError::Spawn(format!("{}: {}", program, e)))?;

        child
            .wait_with_output()
            .await
            .map_err(|e| ClaudeError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_str())
    }

    #[test]
    fn test_minimal_args() {
        let args = build_args(&CallOptions::new("Say hi"));

        assert_eq!(
            args,
            vec!["--print", "Say hi", "--output-format", "json", "--verbose"]
        );
    }

    #[test]
    fn test_all_options_in_order() {
        let options = CallOptions::new("Expand this")
            .with_model("opus")
            .with_session("abc123")
            .with_system_prompt("Be brief")
            .with_schema(json!({"type": "object"}))
            .with_max_tokens(2048);

        let args = build_args(&options);

        assert_eq!(
            args,
            vec![
                "--print",
                "Expand this",
                "--output-format",
                "json",
                "--verbose",
                "--model",
                "opus",
                "--resume",
                "abc123",
                "--system-prompt",
                "Be brief",
                "--json-schema",
                r#"{"type":"object"}"#,
                "--max-turns",
                "2",
            ]
        );
    }

    #[test]
    fn test_schema_requests_two_turns() {
        let options = CallOptions::new("x")
            .with_schema(json!({"type": "object", "properties": {"text": {"type": "string"}}}))
            .with_max_tokens(1);

        assert_eq!(flag_value(&build_args(&options), "--max-turns"), Some("2"));
    }

    #[test]
    fn test_plain_call_requests_one_turn() {
        let options = CallOptions::new("x").with_max_tokens(4096);

        assert_eq!(flag_value(&build_args(&options), "--max-turns"), Some("1"));
    }

    #[test]
    fn test_no_budget_means_no_turn_flag_even_with_schema() {
        let options = CallOptions::new("x").with_schema(json!({"type": "object"}));
        let args = build_args(&options);

        assert!(!args.iter().any(|a| a == "--max-turns"));
        assert!(args.iter().any(|a| a == "--json-schema"));
    }

    #[test]
    fn test_resume_flag_only_with_session() {
        let fresh = build_args(&CallOptions::new("x"));
        let follow_up = build_args(&CallOptions::new("x").with_session("s-1"));

        assert!(!fresh.iter().any(|a| a == "--resume"));
        assert_eq!(flag_value(&follow_up, "--resume"), Some("s-1"));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_system_runner_closes_stdin() {
        // `cat` exits right away only when stdin is closed
        let output = SystemProcessRunner
            .run("cat", &[])
            .await
            .expect("cat should be available");

        assert!(output.status.success());
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_system_runner_reports_missing_binary() {
        let result = SystemProcessRunner
            .run("nonexistent_claude_binary_xyz_12345", &[])
            .await;

        assert!(matches!(result, Err(ClaudeError::Spawn(_))));
    }
}
