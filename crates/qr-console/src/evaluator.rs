//! Argument evaluation: binds the tokens that follow a command name to the
//! command's declared arguments and converts them to typed values.
//!
//! Grammar, in argparse style:
//!
//! - tokens after a bare `--` are positional;
//! - `-x`, `--name`, `--name=value`, `-xVALUE` select optional arguments;
//!   a long option may be abbreviated to any unique prefix;
//! - negative numbers (`-5`) are values, never options;
//! - everything else binds to positionals in declaration order.

use std::collections::HashSet;

use indexmap::IndexMap;
use qr_types::error::{Result, ShellError};
use qr_types::value::{Value, ValueType};

use crate::argument::{ArgumentSpec, is_negative_number};
use crate::command::Command;

/// Resolved values of one invocation, in declaration order.
///
/// An optional argument that was neither supplied nor defaulted resolves to
/// no value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    command: String,
    values: IndexMap<String, Option<Value>>,
}

impl Arguments {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            values: IndexMap::new(),
        }
    }

    /// Append a value; used by the evaluator and by tests that call
    /// handlers directly.
    pub fn with(mut self, name: impl Into<String>, value: Option<Value>) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Name of the command these values belong to.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value of `name`, if it was supplied or defaulted.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Values alone, in declaration order, for positional handler calls.
    pub fn values(&self) -> impl Iterator<Item = Option<&Value>> {
        self.values.values().map(Option::as_ref)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.typed(name, ValueType::Int, Value::as_int)
    }

    pub fn float(&self, name: &str) -> Result<f64> {
        self.typed(name, ValueType::Float, Value::as_float)
    }

    pub fn str(&self, name: &str) -> Result<&str> {
        self.typed(name, ValueType::Str, Value::as_str)
    }

    /// Flags always resolve; an undeclared name reads as `false`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_flag).unwrap_or(false)
    }

    fn typed<'a, T>(
        &'a self,
        name: &str,
        expected: ValueType,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.get(name).ok_or_else(|| {
            ShellError::handler(&self.command, format!("argument '{name}' was not supplied"))
        })?;
        extract(value).ok_or_else(|| {
            ShellError::handler(
                &self.command,
                format!("argument '{name}' is {}, not {expected}", value.value_type()),
            )
        })
    }
}

/// Bind `tokens` (the words after the command name) to `command`'s arguments.
pub fn evaluate(command: &Command, tokens: &[String]) -> Result<Arguments> {
    let fail = |reason: String| ShellError::argument_parse(command.name(), reason);

    let mut values: IndexMap<String, Option<Value>> = command
        .arguments()
        .values()
        .map(|spec| (spec.name.clone(), None))
        .collect();
    let mut supplied: HashSet<&str> = HashSet::new();
    let mut positional_tokens: Vec<&String> = Vec::new();
    let mut unrecognized: Vec<String> = Vec::new();
    let mut only_positional = false;

    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        i += 1;

        if only_positional {
            positional_tokens.push(token);
            continue;
        }
        if token == "--" {
            only_positional = true;
            continue;
        }
        if !is_option_token(token) {
            positional_tokens.push(token);
            continue;
        }

        let Some((spec, inline)) = resolve_option(command, token)? else {
            unrecognized.push(token.clone());
            continue;
        };

        let value = if spec.is_flag() {
            if let Some(explicit) = inline {
                return Err(fail(format!(
                    "argument {}: ignored explicit argument '{explicit}'",
                    spec.display_name()
                )));
            }
            Value::Flag(true)
        } else {
            let raw = match inline {
                Some(raw) => raw,
                None => match tokens.get(i) {
                    Some(next) if next != "--" && !is_option_token(next) => {
                        i += 1;
                        next.as_str()
                    },
                    _ => {
                        return Err(fail(format!(
                            "argument {}: expected one argument",
                            spec.display_name()
                        )));
                    },
                },
            };
            convert(spec, raw).map_err(fail)?
        };
        log::trace!("{}: option {} = {value}", command.name(), spec.name);
        values.insert(spec.name.clone(), Some(value));
        supplied.insert(spec.name.as_str());
    }

    let mut remaining = positional_tokens.into_iter();
    for spec in command.positionals() {
        if let Some(raw) = remaining.next() {
            let value = convert(spec, raw).map_err(fail)?;
            values.insert(spec.name.clone(), Some(value));
            supplied.insert(spec.name.as_str());
        }
    }
    unrecognized.extend(remaining.cloned());

    let missing: Vec<String> = command
        .arguments()
        .values()
        .filter(|spec| spec.is_required() && !supplied.contains(spec.name.as_str()))
        .map(ArgumentSpec::display_name)
        .collect();
    if !missing.is_empty() {
        return Err(fail(format!(
            "the following arguments are required: {}",
            missing.join(", ")
        )));
    }
    if !unrecognized.is_empty() {
        return Err(fail(format!(
            "unrecognized arguments: {}",
            unrecognized.join(" ")
        )));
    }

    for spec in command.arguments().values() {
        if !supplied.contains(spec.name.as_str())
            && let Some(default) = &spec.default
        {
            values.insert(spec.name.clone(), Some(default.clone()));
        }
    }

    Ok(Arguments {
        command: command.name().to_string(),
        values,
    })
}

/// Whether a token selects an option rather than carrying a value.
fn is_option_token(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && !is_negative_number(token)
}

/// Find the argument an option token refers to, plus any inline value.
///
/// Returns `Ok(None)` for unknown options and an error for ambiguous
/// abbreviations.
fn resolve_option<'c, 't>(
    command: &'c Command,
    token: &'t str,
) -> Result<Option<(&'c ArgumentSpec, Option<&'t str>)>> {
    let (flag, inline) = match token.split_once('=') {
        Some((flag, value)) => (flag, Some(value)),
        None => (token, None),
    };

    if let Some(spec) = command
        .optionals()
        .find(|spec| spec.option_strings.contains(flag))
    {
        return Ok(Some((spec, inline)));
    }

    if flag.starts_with("--") {
        let mut matches: Vec<(&ArgumentSpec, &str)> = Vec::new();
        for spec in command.optionals() {
            for long in spec.long_options().filter(|long| long.starts_with(flag)) {
                matches.push((spec, long));
            }
        }
        let distinct: HashSet<&str> = matches.iter().map(|(spec, _)| spec.name.as_str()).collect();
        return match distinct.len() {
            0 => Ok(None),
            1 => Ok(Some((matches[0].0, inline))),
            _ => {
                let candidates: Vec<&str> = matches.iter().map(|(_, long)| *long).collect();
                Err(ShellError::argument_parse(
                    command.name(),
                    format!(
                        "ambiguous option: {flag} could match {}",
                        candidates.join(", ")
                    ),
                ))
            },
        };
    }

    // `-a5`: a short option glued to its value.
    if inline.is_none() && token.chars().count() > 2 {
        let split = token.char_indices().nth(2).map_or(token.len(), |(idx, _)| idx);
        let (short, rest) = token.split_at(split);
        if let Some(spec) = command
            .optionals()
            .find(|spec| !spec.is_flag() && spec.option_strings.contains(short))
        {
            return Ok(Some((spec, Some(rest))));
        }
    }

    Ok(None)
}

/// Convert a raw token for `spec`, checking choices.
fn convert(spec: &ArgumentSpec, raw: &str) -> std::result::Result<Value, String> {
    let value = spec.value_type.parse(raw).ok_or_else(|| {
        format!(
            "argument {}: invalid {} value: '{raw}'",
            spec.display_name(),
            spec.value_type
        )
    })?;
    if !spec.choices.is_empty() && !spec.choices.contains(&value) {
        let allowed: Vec<String> = spec.choices.iter().map(|c| format!("'{c}'")).collect();
        return Err(format!(
            "argument {}: invalid choice: '{raw}' (choose from {})",
            spec.display_name(),
            allowed.join(", ")
        ));
    }
    Ok(value)
}
