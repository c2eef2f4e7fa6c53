//! Error types for the QR console.

use std::io;

/// Errors produced by the console framework.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// A command definition was rejected at registration time.
    #[error("cannot register command '{command}': {reason}")]
    Registration { command: String, reason: String },

    /// The first token of a line did not name a registered command.
    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    /// The argument evaluator rejected the tokens of a command line.
    #[error("{command}: error: {reason}")]
    ArgumentParse { command: String, reason: String },

    /// A command handler failed or panicked.
    #[error("{command}: {message}")]
    Handler { command: String, message: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ShellError {
    /// Shorthand for a registration failure.
    pub fn registration(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Registration {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for an argument evaluation failure.
    pub fn argument_parse(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArgumentParse {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a handler failure.
    pub fn handler(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Whether this is a per-line error the shell loop recovers from.
    pub fn is_runtime(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand(_) | Self::ArgumentParse { .. } | Self::Handler { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ShellError>;
