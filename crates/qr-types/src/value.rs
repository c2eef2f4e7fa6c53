//! Tagged argument values.
//!
//! Every argument a command declares carries a [`ValueType`]; the evaluator
//! converts raw tokens into the matching [`Value`] variant so handlers never
//! deal with untyped strings.

use std::fmt;

/// The declared type of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Signed 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Free-form text.
    Str,
    /// Presence flag; takes no value on the command line.
    Flag,
}

impl ValueType {
    /// Name used in conversion errors (`invalid int value: 'a'`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Flag => "flag",
        }
    }

    /// Convert a raw token into a value of this type.
    ///
    /// Returns `None` when the token is not a valid literal. Flags accept the
    /// usual boolean spellings so defaults can be written as text.
    pub fn parse(self, raw: &str) -> Option<Value> {
        match self {
            Self::Int => raw.trim().parse().ok().map(Value::Int),
            Self::Float => raw.trim().parse().ok().map(Value::Float),
            Self::Str => Some(Value::Str(raw.to_string())),
            Self::Flag => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "y" => Some(Value::Flag(true)),
                "false" | "0" | "no" | "n" => Some(Value::Flag(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Flag(bool),
}

impl Value {
    /// The type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Int(_) => ValueType::Int,
            Self::Float(_) => ValueType::Float,
            Self::Str(_) => ValueType::Str,
            Self::Flag(_) => ValueType::Flag,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Floats also accept integer values.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
            Self::Flag(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int() {
        assert_eq!(ValueType::Int.parse("42"), Some(Value::Int(42)));
        assert_eq!(ValueType::Int.parse("-7"), Some(Value::Int(-7)));
        assert_eq!(ValueType::Int.parse("a"), None);
        assert_eq!(ValueType::Int.parse("1.5"), None);
    }

    #[test]
    fn parse_float() {
        assert_eq!(ValueType::Float.parse("2.5"), Some(Value::Float(2.5)));
        assert_eq!(ValueType::Float.parse("3"), Some(Value::Float(3.0)));
        assert_eq!(ValueType::Float.parse("x"), None);
    }

    #[test]
    fn parse_str_keeps_spaces() {
        assert_eq!(
            ValueType::Str.parse("hello world"),
            Some(Value::Str("hello world".into()))
        );
    }

    #[test]
    fn parse_flag_spellings() {
        assert_eq!(ValueType::Flag.parse("yes"), Some(Value::Flag(true)));
        assert_eq!(ValueType::Flag.parse("0"), Some(Value::Flag(false)));
        assert_eq!(ValueType::Flag.parse("maybe"), None);
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Int(3).as_int(), Some(3));
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Str("s".into()).as_int(), None);
        assert_eq!(Value::Flag(true).as_flag(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
    }

    #[test]
    fn display_values() {
        assert_eq!(Value::Int(-5).to_string(), "-5");
        assert_eq!(Value::Str("abc".into()).to_string(), "abc");
        assert_eq!(Value::Flag(false).to_string(), "false");
        assert_eq!(ValueType::Int.to_string(), "int");
    }

    #[test]
    fn value_type_of_value() {
        assert_eq!(Value::Float(1.0).value_type(), ValueType::Float);
        assert_eq!(Value::from(true).value_type(), ValueType::Flag);
    }
}
