//! Error types for parsing and executing kates scripts.
//!
//! Errors come in two layers. Per-line and per-command causes
//! ([`SyntaxError`], [`CommandError`]) describe what went wrong; the
//! positional wrappers ([`ParseError`], [`ScriptExecutionError`]) record where
//! it happened and keep the cause reachable through
//! [`std::error::Error::source`].

use std::fmt;

use thiserror::Error;

/// Boxed error type host functions may raise.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Malformed quoting in a single source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} in line {line:?}")]
pub struct TokenizeError {
    /// The offending line, verbatim.
    pub line: String,
    /// What was wrong with it.
    pub kind: TokenizeErrorKind,
}

/// The specific quoting problem found by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeErrorKind {
    /// A quote character was opened and never closed.
    UnterminatedQuote(char),
    /// A backslash was the last character of the line.
    DanglingEscape,
}

impl fmt::Display for TokenizeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeErrorKind::UnterminatedQuote(q) => write!(f, "no closing quotation ({})", q),
            TokenizeErrorKind::DanglingEscape => write!(f, "no escaped character"),
        }
    }
}

/// Why a single line failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The line could not be split into words.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// A command was required but no tokens were left (e.g. `x = `).
    #[error("Command cannot be empty")]
    EmptyCommand,

    /// `else` or `endif` followed by extra tokens.
    #[error("Invalid usage of builtin command: {0}")]
    InvalidBuiltinUsage(String),
}

/// A line of the source failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error (line {line}): {source}")]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    #[source]
    pub source: SyntaxError,
}

/// Why a single command failed to execute.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The call names a function missing from the registry.
    #[error("No such function: {0:?}")]
    NoSuchFunction(String),

    /// A `$name` argument refers to an unbound variable.
    #[error("No such variable: {0:?}")]
    NoSuchVariable(String),

    /// A function was called with the wrong number of arguments.
    #[error("Invalid number of arguments")]
    Arguments,

    /// An `endif` with no open `if`.
    #[error("Stray endif")]
    StrayEndif,

    /// Anything a host function chose to raise.
    #[error(transparent)]
    Host(BoxError),
}

impl CommandError {
    /// Wraps an arbitrary host error.
    pub fn host(err: impl Into<BoxError>) -> Self {
        CommandError::Host(err.into())
    }

    /// The original host error, if this is one.
    pub fn host_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            CommandError::Host(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

// Host errors have no structural equality; their rendered message stands in.
impl PartialEq for CommandError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CommandError::NoSuchFunction(a), CommandError::NoSuchFunction(b)) => a == b,
            (CommandError::NoSuchVariable(a), CommandError::NoSuchVariable(b)) => a == b,
            (CommandError::Arguments, CommandError::Arguments) => true,
            (CommandError::StrayEndif, CommandError::StrayEndif) => true,
            (CommandError::Host(a), CommandError::Host(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// A command failed while the runner was executing a script.
#[derive(Error, Debug, PartialEq)]
#[error("Error raised while executing the script (command {command}): {source}")]
pub struct ScriptExecutionError {
    /// 1-based index of the failing command.
    pub command: usize,
    #[source]
    pub source: CommandError,
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn parse_error_exposes_cause() {
        let err = ParseError {
            line: 3,
            source: SyntaxError::InvalidBuiltinUsage("else".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Parse error (line 3): Invalid usage of builtin command: else"
        );
        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("else"));
    }

    #[test]
    fn tokenize_error_names_line() {
        let err = TokenizeError {
            line: "a 'b".to_string(),
            kind: TokenizeErrorKind::UnterminatedQuote('\''),
        };
        assert!(err.to_string().contains("a 'b"));
        assert!(err.to_string().contains("no closing quotation"));
    }

    #[test]
    fn command_error_equality() {
        assert_eq!(
            CommandError::NoSuchVariable("x".into()),
            CommandError::NoSuchVariable("x".into())
        );
        assert_ne!(
            CommandError::NoSuchVariable("x".into()),
            CommandError::NoSuchFunction("x".into())
        );
        assert_eq!(CommandError::host("boom"), CommandError::host("boom"));
        assert_ne!(CommandError::host("boom"), CommandError::Arguments);
    }

    #[test]
    fn host_error_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = ScriptExecutionError {
            command: 2,
            source: CommandError::host(io),
        };
        let inner = err.source.host_error().unwrap();
        let io = inner.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "Error raised while executing the script (command 2): missing"
        );
    }
}
