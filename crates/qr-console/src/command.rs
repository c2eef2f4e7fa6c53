//! Command definitions.
//!
//! Hosts describe a command with a [`CommandBuilder`]; the registry turns it
//! into a validated [`Command`] whose argument table and help text are fixed
//! for the rest of the session.

use std::fmt;

use indexmap::IndexMap;
use qr_types::error::{Result, ShellError};

use crate::argument::{Argument, ArgumentSpec, HELP_FLAGS};
use crate::evaluator::Arguments;
use crate::help;
use crate::interpreter::CommandOutput;

/// Function bound to a command. Receives the resolved values in declaration
/// order.
pub type Handler = Box<dyn Fn(&Arguments) -> Result<CommandOutput>>;

/// Incremental description of a command, consumed by
/// [`CommandRegistry::add_command`](crate::CommandRegistry::add_command).
pub struct CommandBuilder {
    name: String,
    help: Option<String>,
    arguments: Vec<Argument>,
    handler: Option<Handler>,
}

impl CommandBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            arguments: Vec::new(),
            handler: None,
        }
    }

    /// One-line summary shown in the command list and atop command help.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Bind the function to call when the command is entered.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Arguments) -> Result<CommandOutput> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Declare the next argument. Positionals bind in declaration order.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validate every declaration and render the help text.
    pub(crate) fn build(self) -> Result<Command> {
        let name = self.name;
        if name.is_empty() || name.starts_with('-') || name.contains(char::is_whitespace) {
            return Err(ShellError::registration(
                &name,
                "command name must be a single word not starting with '-'",
            ));
        }
        let Some(handler) = self.handler else {
            return Err(ShellError::registration(&name, "no handler set"));
        };

        let mut arguments: IndexMap<String, ArgumentSpec> = IndexMap::new();
        let mut seen_default_positional: Option<String> = None;
        for declaration in self.arguments {
            let spec = declaration.build(&name)?;
            if arguments.contains_key(&spec.name) {
                return Err(ShellError::registration(
                    &name,
                    format!("duplicate argument '{}'", spec.name),
                ));
            }
            for option in &spec.option_strings {
                let taken = HELP_FLAGS.contains(&option.as_str())
                    || arguments
                        .values()
                        .any(|other| other.option_strings.contains(option));
                if taken {
                    return Err(ShellError::registration(
                        &name,
                        format!("conflicting option string: {option}"),
                    ));
                }
            }
            if spec.positional {
                if spec.default.is_some() {
                    seen_default_positional.get_or_insert_with(|| spec.name.clone());
                } else if let Some(earlier) = &seen_default_positional {
                    return Err(ShellError::registration(
                        &name,
                        format!(
                            "required positional '{}' cannot follow '{earlier}', which has a default",
                            spec.name
                        ),
                    ));
                }
            }
            arguments.insert(spec.name.clone(), spec);
        }

        let mut command = Command {
            name,
            help: self.help,
            arguments,
            handler,
            usage: String::new(),
            help_text: String::new(),
        };
        command.usage = help::command_usage(&command);
        command.help_text = help::command_help(&command);
        Ok(command)
    }
}

impl fmt::Debug for CommandBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBuilder")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("arguments", &self.arguments)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// A registered command.
pub struct Command {
    name: String,
    help: Option<String>,
    arguments: IndexMap<String, ArgumentSpec>,
    handler: Handler,
    usage: String,
    help_text: String,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line summary, if any.
    pub fn summary(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Declared arguments in declaration order.
    pub fn arguments(&self) -> &IndexMap<String, ArgumentSpec> {
        &self.arguments
    }

    pub fn positionals(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.values().filter(|spec| spec.positional)
    }

    pub fn optionals(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.values().filter(|spec| !spec.positional)
    }

    /// The `usage:` line.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Full help text shown for `<command> -h`.
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    pub(crate) fn call(&self, args: &Arguments) -> Result<CommandOutput> {
        (self.handler)(args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
