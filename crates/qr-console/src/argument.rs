//! Argument declarations.
//!
//! [`Argument`] is the unchecked, builder-style declaration a host writes.
//! It is turned into an [`ArgumentSpec`] when its command is registered;
//! that step enforces every declaration rule and derives option strings.

use indexmap::IndexSet;
use qr_types::error::{Result, ShellError};
use qr_types::value::{Value, ValueType};

/// Option strings reserved for the built-in help request.
pub const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// An argument declaration as written by the host.
///
/// A bare name (`"count"`) declares a positional argument. A name with one
/// or two leading dashes (`"-a"`, `"--value"`) declares an optional one.
#[derive(Debug, Clone)]
pub struct Argument {
    name: String,
    aliases: Vec<String>,
    value_type: ValueType,
    default: Option<Value>,
    help: Option<String>,
    required: bool,
    choices: Vec<String>,
    metavar: Option<String>,
}

impl Argument {
    /// Declare an argument. Values are text until a type is set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            value_type: ValueType::Str,
            default: None,
            help: None,
            required: false,
            choices: Vec::new(),
            metavar: None,
        }
    }

    /// Add an extra option string (`-v`, `--verbose`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn value_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Shorthand for `value_type(ValueType::Int)`.
    pub fn int(self) -> Self {
        self.value_type(ValueType::Int)
    }

    /// Shorthand for `value_type(ValueType::Float)`.
    pub fn float(self) -> Self {
        self.value_type(ValueType::Float)
    }

    /// Make this a presence flag: `false` unless given, takes no value.
    pub fn flag(self) -> Self {
        self.value_type(ValueType::Flag)
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Require an optional argument to be supplied.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict accepted values. Each choice is converted with the
    /// argument's type at registration.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Placeholder shown for the value in help output.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    /// Validate the declaration and derive its option strings.
    ///
    /// Option strings are, in order and without duplicates: the declared
    /// name, the other dash form of the same name (`-x` gains `--x` and
    /// `--xy` gains `-xy`), then the extra aliases.
    pub(crate) fn build(self, command: &str) -> Result<ArgumentSpec> {
        let fail = |reason: String| ShellError::registration(command, reason);

        let positional = !self.name.starts_with('-');
        let dest = self.name.trim_start_matches('-').to_string();
        if dest.is_empty() {
            return Err(fail(format!("invalid argument name '{}'", self.name)));
        }
        if dest.contains(|c: char| c.is_whitespace() || c == '=') {
            return Err(fail(format!(
                "argument name '{}' must not contain whitespace or '='",
                self.name
            )));
        }

        let mut option_strings = IndexSet::new();
        if positional {
            if !self.aliases.is_empty() {
                return Err(fail(format!(
                    "positional argument '{dest}' cannot have aliases"
                )));
            }
            if self.value_type == ValueType::Flag {
                return Err(fail(format!("positional argument '{dest}' cannot be a flag")));
            }
        } else {
            if self.name.starts_with("---") {
                return Err(fail(format!("invalid option string '{}'", self.name)));
            }
            option_strings.insert(self.name.clone());
            if self.name.starts_with("--") {
                option_strings.insert(format!("-{dest}"));
            } else {
                option_strings.insert(format!("--{dest}"));
            }
            for alias in &self.aliases {
                if !alias.starts_with('-')
                    || alias.trim_start_matches('-').is_empty()
                    || alias.contains('=')
                {
                    return Err(fail(format!(
                        "invalid option string '{alias}' for argument '{dest}': \
                         must start with '-'"
                    )));
                }
                option_strings.insert(alias.clone());
            }
            if let Some(numeric) = option_strings.iter().find(|s| is_negative_number(s)) {
                return Err(fail(format!(
                    "option string '{numeric}' would shadow negative numbers"
                )));
            }
        }

        let default = match (self.default, self.value_type) {
            (Some(value), expected) if value.value_type() != expected => {
                return Err(fail(format!(
                    "default '{value}' of argument '{dest}' is not of type {expected}"
                )));
            },
            (None, ValueType::Flag) => Some(Value::Flag(false)),
            (default, _) => default,
        };

        if self.value_type == ValueType::Flag && !self.choices.is_empty() {
            return Err(fail(format!("flag argument '{dest}' cannot have choices")));
        }
        let choices = self
            .choices
            .iter()
            .map(|raw| {
                self.value_type.parse(raw).ok_or_else(|| {
                    fail(format!(
                        "choice '{raw}' of argument '{dest}' is not a valid {}",
                        self.value_type
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let metavar = self.metavar.unwrap_or_else(|| {
            if !self.choices.is_empty() {
                format!("{{{}}}", self.choices.join(","))
            } else if positional {
                dest.clone()
            } else {
                dest.to_uppercase()
            }
        });

        Ok(ArgumentSpec {
            name: dest,
            option_strings,
            positional,
            value_type: self.value_type,
            default,
            help: self.help,
            required: self.required,
            choices,
            metavar,
        })
    }
}

/// A validated argument of a registered command.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentSpec {
    /// Name without dashes; unique within the command and the key handlers
    /// use to look the value up.
    pub name: String,
    /// Every dash form that selects this argument. Empty for positionals.
    pub option_strings: IndexSet<String>,
    pub positional: bool,
    pub value_type: ValueType,
    pub default: Option<Value>,
    pub help: Option<String>,
    /// Only meaningful for optional arguments; see [`ArgumentSpec::is_required`].
    pub required: bool,
    pub choices: Vec<Value>,
    pub metavar: String,
}

impl ArgumentSpec {
    /// Positionals are required unless they carry a default.
    pub fn is_required(&self) -> bool {
        if self.positional {
            self.default.is_none()
        } else {
            self.required
        }
    }

    pub fn is_flag(&self) -> bool {
        self.value_type == ValueType::Flag
    }

    /// Name used in error messages: `b` for positionals, `-a/--a` for options.
    pub fn display_name(&self) -> String {
        if self.positional {
            self.metavar.clone()
        } else {
            self.option_strings
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join("/")
        }
    }

    /// Long (`--`) option strings, used for abbreviation matching.
    pub fn long_options(&self) -> impl Iterator<Item = &str> {
        self.option_strings
            .iter()
            .map(String::as_str)
            .filter(|s| s.starts_with("--"))
    }
}

/// Matches `-5`, `-1.5` and `-.5`.
pub fn is_negative_number(token: &str) -> bool {
    let Some(rest) = token.strip_prefix('-') else {
        return false;
    };
    match rest.split_once('.') {
        Some((int, frac)) => {
            int.chars().all(|c| c.is_ascii_digit())
                && !frac.is_empty()
                && frac.chars().all(|c| c.is_ascii_digit())
        },
        None => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()),
    }
}
