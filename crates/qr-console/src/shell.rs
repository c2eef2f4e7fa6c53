//! The interactive read-dispatch-print loop.

use std::io::{self, BufRead, Write};

use qr_types::config::ShellConfig;
use qr_types::error::{Result, ShellError};

use crate::interpreter::{CommandOutput, CommandRegistry, is_help_request};
use crate::tokenizer::tokenize;

const INSTRUCTIONS: [&str; 2] = ["Type '-h' or '--help' to get more info", "Enter commands:"];

/// Why the loop stopped.
#[derive(Debug)]
pub enum LoopExit {
    /// The input channel was closed.
    EndOfInput,
    /// A dispatch failed while `throw_errors` was set.
    Fatal(ShellError),
}

/// Interactive shell over a finished [`CommandRegistry`].
#[derive(Debug)]
pub struct Shell {
    registry: CommandRegistry,
    config: ShellConfig,
}

impl Shell {
    pub fn new(registry: CommandRegistry, config: ShellConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Run on stdin/stdout until end of input.
    ///
    /// In `throw_errors` mode the first dispatch error terminates the
    /// process with status 1.
    pub fn run(&self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        match self.run_with(stdin.lock(), stdout.lock())? {
            LoopExit::EndOfInput => Ok(()),
            LoopExit::Fatal(err) => {
                log::error!("Exiting after error: {err}");
                std::process::exit(1);
            },
        }
    }

    /// Run the loop over arbitrary streams.
    ///
    /// Prints the greeting, then reads one line per cycle until end of
    /// input. Only I/O failures on the streams themselves are returned as
    /// errors; dispatch errors are printed and the loop continues.
    pub fn run_with<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<LoopExit> {
        self.print_greeting(&mut output)?;
        log::info!("Console ready with {} commands", self.registry.len());

        let mut buf = Vec::new();
        loop {
            write!(output, "{}", self.config.prompt)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                log::debug!("End of input, leaving the loop");
                return Ok(LoopExit::EndOfInput);
            }

            // Undecodable bytes become U+FFFD and fail in the evaluator like
            // any other bad value.
            let line = String::from_utf8_lossy(&buf);
            let tokens = tokenize(line.trim_end_matches(['\n', '\r']));
            match self.registry.dispatch(&tokens) {
                Ok(CommandOutput::Text(text) | CommandOutput::Help(text)) => {
                    writeln!(output, "{text}")?;
                },
                Ok(CommandOutput::None) => {},
                Err(err) => {
                    if is_help_request(&tokens) {
                        continue;
                    }
                    log::warn!("{err}");
                    self.print_error(&mut output, &err)?;
                    if self.config.throw_errors {
                        return Ok(LoopExit::Fatal(err));
                    }
                },
            }
        }
    }

    fn print_greeting<W: Write>(&self, output: &mut W) -> Result<()> {
        if let Some(greeting) = &self.config.greeting {
            writeln!(output, "{greeting}")?;
        }
        for line in INSTRUCTIONS {
            writeln!(output, "{line}")?;
        }
        Ok(())
    }

    /// Errors are shown in red; the style resets at the end of the line.
    fn print_error<W: Write>(&self, output: &mut W, err: &ShellError) -> Result<()> {
        if self.config.color {
            writeln!(output, "{}", console::style(err).red())?;
        } else {
            writeln!(output, "{err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::command::CommandBuilder;

    fn shell(config: ShellConfig) -> Shell {
        let mut reg = CommandRegistry::new(&config.program_name);
        reg.add_command(
            CommandBuilder::new("add")
                .help("sum 2 integers")
                .handler(|args| {
                    Ok(CommandOutput::text(
                        (args.int("a")? + args.int("b")?).to_string(),
                    ))
                })
                .argument(Argument::new("a").int())
                .argument(Argument::new("b").int()),
        )
        .unwrap();
        Shell::new(reg, config)
    }

    fn plain() -> ShellConfig {
        ShellConfig {
            color: false,
            ..ShellConfig::default()
        }
    }

    fn session(shell: &Shell, input: &str) -> (LoopExit, String) {
        session_bytes(shell, input.as_bytes())
    }

    fn session_bytes(shell: &Shell, input: &[u8]) -> (LoopExit, String) {
        let mut out = Vec::new();
        let exit = shell.run_with(input, &mut out).unwrap();
        (exit, String::from_utf8(out).unwrap())
    }

    #[test]
    fn greeting_then_instructions() {
        let (_, out) = session(&shell(plain().with_greeting("hello")), "");
        assert!(out.starts_with("hello\nType '-h' or '--help' to get more info\nEnter commands:\n?>"));
    }

    #[test]
    fn no_greeting_by_default() {
        let (_, out) = session(&shell(plain()), "");
        assert!(out.starts_with("Type '-h'"));
    }

    #[test]
    fn eof_ends_loop_cleanly() {
        let (exit, _) = session(&shell(plain()), "add 1 2\n");
        assert!(matches!(exit, LoopExit::EndOfInput));
    }

    #[test]
    fn output_printed_after_prompt() {
        let (_, out) = session(&shell(plain()), "add 1 2\n");
        assert!(out.contains("?>3\n?>"));
    }

    #[test]
    fn errors_do_not_stop_the_loop() {
        let (exit, out) = session(&shell(plain()), "frobnicate\nadd\nadd 2 2\n");
        assert!(matches!(exit, LoopExit::EndOfInput));
        assert!(out.contains("unknown command: 'frobnicate'"));
        assert!(out.contains("add: error: the following arguments are required: a, b"));
        assert!(out.contains("?>4\n"));
    }

    #[test]
    fn throw_mode_stops_on_first_error() {
        let (exit, out) = session(&shell(plain().with_throw_errors(true)), "add\nadd 2 2\n");
        match exit {
            LoopExit::Fatal(ShellError::ArgumentParse { command, .. }) => assert_eq!(command, "add"),
            other => panic!("expected fatal parse error, got {other:?}"),
        }
        assert!(!out.contains("?>4"));
    }

    #[test]
    fn help_is_printed_and_never_an_error() {
        let (exit, out) = session(
            &shell(plain().with_throw_errors(true)),
            "-h\nadd -h\nadd x --help\n",
        );
        assert!(matches!(exit, LoopExit::EndOfInput));
        assert!(out.contains("usage: PROG [-h] {add} ..."));
        assert!(out.contains("usage: add [-h] a b"));
        assert!(!out.contains("error"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let (_, out) = session(&shell(plain()), "\n   \nadd 1 1\n");
        assert!(out.contains("?>?>?>2\n"));
    }

    #[test]
    fn crlf_line_endings() {
        let (_, out) = session(&shell(plain()), "add 5 6\r\n");
        assert!(out.contains("?>11\n"));
    }

    #[test]
    fn custom_prompt() {
        let config = ShellConfig {
            prompt: "calc> ".into(),
            ..plain()
        };
        let (_, out) = session(&shell(config), "add 1 2\n");
        assert!(out.contains("calc> 3\n"));
    }

    #[test]
    fn colored_errors_still_carry_the_message() {
        let (_, out) = session(&shell(ShellConfig::default()), "nope\n");
        assert!(out.contains("unknown command: 'nope'"));
    }

    #[test]
    fn invalid_utf8_is_a_line_error() {
        let (exit, out) = session_bytes(&shell(plain()), b"add \xff\xfe 1\nadd 2 2\n");
        assert!(matches!(exit, LoopExit::EndOfInput));
        assert!(out.contains("add: error: argument a: invalid int value: '\u{fffd}\u{fffd}'"));
        assert!(out.contains("?>4\n"));
    }

    #[test]
    fn accessors_expose_parts() {
        let shell = shell(plain().with_greeting("hi"));
        assert_eq!(shell.registry().len(), 1);
        assert_eq!(shell.config().greeting.as_deref(), Some("hi"));
    }
}
