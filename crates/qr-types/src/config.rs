//! Shell configuration, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Runtime settings for the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShellConfig {
    /// Program name shown in the whole-shell `usage:` line.
    #[serde(default = "default_program_name")]
    pub program_name: String,
    /// Prompt written before every read.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Optional line printed once before the instructions.
    #[serde(default)]
    pub greeting: Option<String>,
    /// Terminate the process with status 1 on the first dispatch error.
    #[serde(default)]
    pub throw_errors: bool,
    /// Highlight errors in red.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_program_name() -> String {
    "PROG".to_string()
}

fn default_prompt() -> String {
    "?>".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program_name: default_program_name(),
            prompt: default_prompt(),
            greeting: None,
            throw_errors: false,
            color: default_color(),
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        if config.program_name.trim().is_empty() {
            return Err(ShellError::Config("program_name must not be empty".into()));
        }
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ShellError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded shell config from {}", path.display());
        Ok(config)
    }

    /// Builder-style greeting override.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Builder-style fatal-error mode override.
    pub fn with_throw_errors(mut self, throw_errors: bool) -> Self {
        self.throw_errors = throw_errors;
        self
    }
}
