//! Command registry and dispatch logic.
//!
//! The registry is filled once before the shell starts and is read-only
//! afterwards; [`CommandRegistry::dispatch`] takes `&self`.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use indexmap::IndexMap;
use qr_types::error::{Result, ShellError};

use crate::argument::HELP_FLAGS;
use crate::command::{Command, CommandBuilder};
use crate::evaluator;
use crate::help;
use crate::tokenizer::tokenize;

/// Output produced by a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Text printed by a handler.
    Text(String),
    /// Usage text for a help request.
    Help(String),
    /// Nothing to print.
    None,
}

impl CommandOutput {
    /// Shorthand for handlers producing text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Registry of available commands with dispatch.
#[derive(Debug)]
pub struct CommandRegistry {
    program_name: String,
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// Create an empty registry. `program_name` heads the whole-shell usage.
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            commands: IndexMap::new(),
        }
    }

    /// Validate and register a command.
    ///
    /// Fails when the handler is missing, the name is taken, or an argument
    /// declaration is invalid. A failed call leaves the registry unchanged.
    pub fn add_command(&mut self, builder: CommandBuilder) -> Result<()> {
        if self.commands.contains_key(builder.name()) {
            return Err(ShellError::registration(
                builder.name(),
                "a command with this name is already registered",
            ));
        }
        let command = builder.build()?;
        log::debug!(
            "Registered command '{}' ({} arguments)",
            command.name(),
            command.arguments().len()
        );
        self.commands.insert(command.name().to_string(), command);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// `(name, summary)` of every command in registration order.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        self.commands
            .values()
            .map(|cmd| (cmd.name(), cmd.summary().unwrap_or_default()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn program_name(&self) -> &str {
        &self.program_name
    }

    /// Help listing every registered command.
    pub fn shell_help(&self) -> String {
        help::shell_help(
            &self.program_name,
            self.commands.values().map(|cmd| (cmd.name(), cmd.summary())),
        )
    }

    /// Tokenize and dispatch one input line.
    pub fn execute(&self, line: &str) -> Result<CommandOutput> {
        self.dispatch(&tokenize(line))
    }

    /// Dispatch a tokenized line.
    ///
    /// A help request anywhere on the line short-circuits to help text for
    /// the named command, or for the whole shell when the line does not start
    /// with a known command. No handler runs in that case.
    pub fn dispatch(&self, tokens: &[String]) -> Result<CommandOutput> {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(CommandOutput::None);
        };

        if is_help_request(tokens) {
            let text = match self.commands.get(name.as_str()) {
                Some(cmd) => cmd.help_text().to_string(),
                None => self.shell_help(),
            };
            log::debug!("Help requested for '{name}'");
            return Ok(CommandOutput::Help(text));
        }

        let command = self
            .commands
            .get(name.as_str())
            .ok_or_else(|| ShellError::UnknownCommand(name.clone()))?;
        let args = evaluator::evaluate(command, rest)?;
        log::debug!("Dispatching '{}' with {:?}", command.name(), args);
        invoke(command, &args)
    }
}

/// Whether a line asks for help: `-h` or `--help` before any `--`.
pub fn is_help_request(tokens: &[String]) -> bool {
    tokens
        .iter()
        .take_while(|token| token.as_str() != "--")
        .any(|token| HELP_FLAGS.contains(&token.as_str()))
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Chain a panic hook that stays silent while a handler runs on this thread.
/// Panics elsewhere still reach the previous hook.
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !IN_HANDLER.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// Run a handler, folding its failures (including panics) into
/// [`ShellError::Handler`]. A caught panic is reported once, through the
/// returned error.
fn invoke(command: &Command, args: &evaluator::Arguments) -> Result<CommandOutput> {
    install_quiet_hook();
    let outer = IN_HANDLER.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| command.call(args)));
    IN_HANDLER.with(|flag| flag.set(outer));
    match result {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err @ ShellError::Handler { .. })) => Err(err),
        Ok(Err(err)) => Err(ShellError::handler(command.name(), err.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "handler panicked".to_string());
            log::warn!("Handler for '{}' panicked: {message}", command.name());
            Err(ShellError::handler(command.name(), message))
        },
    }
}
