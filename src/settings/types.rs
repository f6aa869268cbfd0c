use crate::error::SettingsError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "sonnet";
pub const DEFAULT_MAX_BUDGET_TOKENS: u32 = 4096;
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a writing assistant working inside a Markdown editor. \
     Keep the author's voice and formatting. Return only the requested text, without preamble.";

/// Process-wide configuration. Missing fields fall back to defaults, so a
/// stored file only needs the values the user changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub debug_mode: bool,
    /// Empty means auto-detect.
    pub cli_path: String,
    pub system_prompt: String,
    pub model: String,
    pub max_budget_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_mode: false,
            cli_path: String::new(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_budget_tokens: DEFAULT_MAX_BUDGET_TOKENS,
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 5] = [
        "debugMode",
        "cliPath",
        "systemPrompt",
        "model",
        "maxBudgetTokens",
    ];

    /// Repair values a hand-edited file may carry.
    pub fn normalized(mut self) -> Self {
        if self.max_budget_tokens == 0 {
            self.max_budget_tokens = DEFAULT_MAX_BUDGET_TOKENS;
        }
        self
    }

    pub fn model(&self) -> Option<&str> {
        Some(self.model.trim()).filter(|m| !m.is_empty())
    }

    pub fn system_prompt(&self) -> Option<&str> {
        Some(self.system_prompt.trim()).filter(|p| !p.is_empty())
    }

    /// Set one field from its textual form, as typed into a settings form.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let invalid = |message: String| SettingsError::InvalidValue {
            key: key.to_string(),
            message,
        };

        match key {
            "debugMode" => {
                self.debug_mode = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("expected true or false, got '{}'", value)))?;
            }
            "cliPath" => self.cli_path = value.trim().to_string(),
            "systemPrompt" => self.system_prompt = value.to_string(),
            "model" => self.model = value.trim().to_string(),
            "maxBudgetTokens" => {
                let tokens: u32 = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid(format!("expected a positive integer, got '{}'", value)))?;
                if tokens == 0 {
                    return Err(invalid("must be greater than zero".to_string()));
                }
                self.max_budget_tokens = tokens;
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
