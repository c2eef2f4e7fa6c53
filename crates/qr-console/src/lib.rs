//! Embeddable interactive console.
//!
//! A host registers commands with typed, named arguments; the shell reads a
//! line at a time, tokenizes it, binds the tokens to the matching command's
//! arguments and calls its handler. Errors are reported and the loop keeps
//! going.
//!
//! ```no_run
//! use qr_console::{Argument, CommandBuilder, CommandOutput, CommandRegistry, Shell};
//! use qr_types::config::ShellConfig;
//!
//! let mut registry = CommandRegistry::new("PROG");
//! registry
//!     .add_command(
//!         CommandBuilder::new("add")
//!             .help("sum 2 integers")
//!             .handler(|args| {
//!                 Ok(CommandOutput::text((args.int("a")? + args.int("b")?).to_string()))
//!             })
//!             .argument(Argument::new("a").int().help("1st arg"))
//!             .argument(Argument::new("b").int().help("2nd arg")),
//!     )
//!     .unwrap();
//! Shell::new(registry, ShellConfig::default()).run().unwrap();
//! ```

pub mod argument;
pub mod command;
pub mod evaluator;
pub mod help;
mod interpreter;
pub mod shell;
pub mod tokenizer;

/// Builder-style argument declaration.
pub use argument::Argument;
/// A validated argument of a registered command.
pub use argument::ArgumentSpec;
/// A registered command.
pub use command::Command;
/// Builder for a command definition.
pub use command::CommandBuilder;
/// Resolved values passed to a handler.
pub use evaluator::Arguments;
/// Output produced by a dispatch (text, help, nothing).
pub use interpreter::CommandOutput;
/// Registry of available commands with dispatch.
pub use interpreter::CommandRegistry;
/// Whether a token sequence contains a help request.
pub use interpreter::is_help_request;
/// Why the shell loop stopped.
pub use shell::LoopExit;
/// The interactive read-dispatch-print loop.
pub use shell::Shell;
/// Split a line into tokens, honoring double-quoted spans.
pub use tokenizer::tokenize;
