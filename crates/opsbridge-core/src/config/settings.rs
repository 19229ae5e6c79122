//! Settings for the gateway, the model, and the orchestration loop

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};

pub const DEFAULT_GATEWAY_URL: &str = "https://api.arcade.dev/mcp/allpoints-demo";
pub const DEFAULT_PROVIDER: &str = "anthropic";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an operations assistant for All Points ATL, a 3PL company.";

/// Environment variables that override file settings
pub const ENV_GATEWAY_URL: &str = "ARCADE_GATEWAY_URL";
pub const ENV_MODEL: &str = "ANTHROPIC_MODEL";
pub const ENV_MAX_TOOL_ROUNDS: &str = "OPSBRIDGE_MAX_TOOL_ROUNDS";

/// How the tool-use blocks of one model reply are executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolExecution {
    /// One after another, in the order the model requested them
    #[default]
    Sequential,
    /// All at once; results are still reported in request order
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub url: String,
    /// HTTP timeout for each gateway request
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub provider: String,
    pub name: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            name: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            timeout_secs: 120,
            api_base: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationSettings {
    pub max_tool_rounds: usize,
    pub tool_timeout_secs: u64,
    /// Characters of tool output shown to the user per step
    pub display_limit: usize,
    pub tool_execution: ToolExecution,
}

impl Default for OrchestrationSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: 10,
            tool_timeout_secs: 60,
            display_limit: 2000,
            tool_execution: ToolExecution::Sequential,
        }
    }
}

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub model: ModelSettings,
    pub orchestration: OrchestrationSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<PathBuf>,
}

impl Settings {
    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup(ENV_GATEWAY_URL) {
            self.gateway.url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model.name = model;
        }
        if let Some(rounds) = lookup(ENV_MAX_TOOL_ROUNDS) {
            self.orchestration.max_tool_rounds = rounds
                .trim()
                .parse()
                .ok()
                .filter(|n: &usize| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_MAX_TOOL_ROUNDS.to_string(),
                    value: rounds.clone(),
                })?;
        }
        Ok(self)
    }

    /// System prompt from `system_prompt_path`, or the built-in default
    /// when no path is set or the file does not exist
    pub fn system_prompt(&self) -> ConfigResult<String> {
        match &self.system_prompt_path {
            Some(path) if path.exists() => Ok(fs::read_to_string(path)?.trim().to_string()),
            _ => Ok(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.gateway.url, DEFAULT_GATEWAY_URL);
        assert_eq!(settings.gateway.timeout_secs, 60);
        assert_eq!(settings.model.name, DEFAULT_MODEL);
        assert_eq!(settings.model.max_tokens, 4096);
        assert_eq!(settings.model.timeout_secs, 120);
        assert_eq!(settings.orchestration.max_tool_rounds, 10);
        assert_eq!(settings.orchestration.display_limit, 2000);
        assert_eq!(settings.orchestration.tool_execution, ToolExecution::Sequential);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings: Settings = serde_yaml::from_str(
            "gateway:\n  url: https://gw.example/mcp\norchestration:\n  tool_execution: concurrent\n",
        )
        .unwrap();
        assert_eq!(settings.gateway.url, "https://gw.example/mcp");
        assert_eq!(settings.gateway.timeout_secs, 60);
        assert_eq!(settings.orchestration.tool_execution, ToolExecution::Concurrent);
        assert_eq!(settings.orchestration.max_tool_rounds, 10);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default()
            .with_overrides(env(&[
                (ENV_GATEWAY_URL, "https://gw.example/mcp/other"),
                (ENV_MODEL, "claude-haiku-4-5"),
                (ENV_MAX_TOOL_ROUNDS, "3"),
            ]))
            .unwrap();
        assert_eq!(settings.gateway.url, "https://gw.example/mcp/other");
        assert_eq!(settings.model.name, "claude-haiku-4-5");
        assert_eq!(settings.orchestration.max_tool_rounds, 3);
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let settings = Settings::default().with_overrides(env(&[(ENV_MODEL, "  ")])).unwrap();
        assert_eq!(settings.model.name, DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_round_override() {
        for bad in ["zero", "0", "-1"] {
            let err = Settings::default()
                .with_overrides(env(&[(ENV_MAX_TOOL_ROUNDS, bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
        }
    }

    #[test]
    fn test_system_prompt_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("system_prompt.md");
        fs::write(&path, "You dispatch trucks.\n").unwrap();

        let mut settings = Settings::default();
        settings.system_prompt_path = Some(path);
        assert_eq!(settings.system_prompt().unwrap(), "You dispatch trucks.");

        settings.system_prompt_path = Some(dir.path().join("missing.md"));
        assert_eq!(settings.system_prompt().unwrap(), DEFAULT_SYSTEM_PROMPT);
    }
}
