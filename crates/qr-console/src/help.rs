//! Usage and help rendering in the familiar argparse layout.
//!
//! ```text
//! usage: add [-h] a b
//!
//! sum 2 integers
//!
//! positional arguments:
//!   a           1st arg
//!   b           2nd arg
//!
//! optional arguments:
//!   -h, --help  show this help message and exit
//! ```

use crate::argument::ArgumentSpec;
use crate::command::Command;

/// Help text never starts further right than this column.
const MAX_HELP_POSITION: usize = 24;

const HELP_ENTRY: (&str, &str) = ("-h, --help", "show this help message and exit");

/// One line of an argument section.
struct Entry {
    indent: usize,
    invocation: String,
    help: String,
}

impl Entry {
    fn new(indent: usize, invocation: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            indent,
            invocation: invocation.into(),
            help: help.into(),
        }
    }

    fn width(&self) -> usize {
        self.indent + self.invocation.chars().count()
    }
}

/// Lay out entries in two columns, aligned across every section of one
/// help screen.
fn help_position(sections: &[&[Entry]]) -> usize {
    let widest = sections
        .iter()
        .flat_map(|entries| entries.iter())
        .map(Entry::width)
        .max()
        .unwrap_or(0);
    (widest + 2).min(MAX_HELP_POSITION)
}

fn write_section(out: &mut String, title: &str, entries: &[Entry], position: usize) {
    out.push_str("\n\n");
    out.push_str(title);
    out.push(':');
    for entry in entries {
        out.push('\n');
        out.push_str(&" ".repeat(entry.indent));
        out.push_str(&entry.invocation);
        if entry.help.is_empty() {
            continue;
        }
        if entry.width() + 2 <= position {
            out.push_str(&" ".repeat(position - entry.width()));
        } else {
            out.push('\n');
            out.push_str(&" ".repeat(position));
        }
        out.push_str(&entry.help);
    }
}

fn usage_token(spec: &ArgumentSpec) -> String {
    if spec.positional {
        return if spec.is_required() {
            spec.metavar.clone()
        } else {
            format!("[{}]", spec.metavar)
        };
    }
    let first = spec
        .option_strings
        .first()
        .map(String::as_str)
        .unwrap_or_default();
    let part = if spec.is_flag() {
        first.to_string()
    } else {
        format!("{first} {}", spec.metavar)
    };
    if spec.required {
        part
    } else {
        format!("[{part}]")
    }
}

fn invocation(spec: &ArgumentSpec) -> String {
    if spec.positional {
        return spec.metavar.clone();
    }
    spec.option_strings
        .iter()
        .map(|option| {
            if spec.is_flag() {
                option.clone()
            } else {
                format!("{option} {}", spec.metavar)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn entry_help(spec: &ArgumentSpec) -> String {
    let help = spec.help.clone().unwrap_or_default();
    match &spec.default {
        Some(default) if !spec.is_flag() => {
            let suffix = format!("(default: {default})");
            if help.is_empty() {
                suffix
            } else {
                format!("{help} {suffix}")
            }
        },
        _ => help,
    }
}

/// The `usage:` line of a command: options first, then positionals.
pub fn command_usage(command: &Command) -> String {
    let mut parts = vec![format!("usage: {} [-h]", command.name())];
    parts.extend(command.optionals().map(usage_token));
    parts.extend(command.positionals().map(usage_token));
    parts.join(" ")
}

/// Full help for `<command> -h`.
pub fn command_help(command: &Command) -> String {
    let positionals: Vec<Entry> = command
        .positionals()
        .map(|spec| Entry::new(2, invocation(spec), entry_help(spec)))
        .collect();
    let mut optionals = vec![Entry::new(2, HELP_ENTRY.0, HELP_ENTRY.1)];
    optionals.extend(
        command
            .optionals()
            .map(|spec| Entry::new(2, invocation(spec), entry_help(spec))),
    );
    let position = help_position(&[positionals.as_slice(), optionals.as_slice()]);

    let mut out = command_usage(command);
    if let Some(summary) = command.summary() {
        out.push_str("\n\n");
        out.push_str(summary);
    }
    if !positionals.is_empty() {
        write_section(&mut out, "positional arguments", &positionals, position);
    }
    write_section(&mut out, "optional arguments", &optionals, position);
    out
}

/// Whole-shell help: the command list with one-line summaries.
pub fn shell_help<'a, I>(program: &str, commands: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let commands: Vec<(&str, Option<&str>)> = commands.into_iter().collect();
    let names: Vec<&str> = commands.iter().map(|(name, _)| *name).collect();
    let choices = format!("{{{}}}", names.join(","));

    let mut positionals = Vec::new();
    if !commands.is_empty() {
        positionals.push(Entry::new(2, choices.clone(), ""));
        positionals.extend(
            commands
                .iter()
                .map(|(name, summary)| Entry::new(4, *name, summary.unwrap_or_default())),
        );
    }
    let optionals = vec![Entry::new(2, HELP_ENTRY.0, HELP_ENTRY.1)];
    let position = help_position(&[positionals.as_slice(), optionals.as_slice()]);

    let mut out = format!("usage: {program} [-h]");
    if !commands.is_empty() {
        out.push_str(&format!(" {choices} ..."));
        write_section(&mut out, "positional arguments", &positionals, position);
    }
    write_section(&mut out, "optional arguments", &optionals, position);
    out
}
