//! Parsed representation of a kates script.
//!
//! A [`Script`] is an immutable list of [`Command`]s, one per source line.
//! Commands render back to source through [`fmt::Display`]; parsing the
//! rendered line yields an equal command.

use std::fmt;
use std::ops::Index;
use std::slice;

use serde::Serialize;

use crate::tokenizer::quote;

/// A single argument of a function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Argument {
    /// A fixed string.
    Literal(String),
    /// The current value of a variable, looked up when the call runs.
    Variable(String),
}

impl Argument {
    pub fn literal(value: impl Into<String>) -> Self {
        Argument::Literal(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Argument::Variable(name.into())
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Literal(value) if value.starts_with('$') => {
                write!(f, "{}", quote(&format!("${}", value)))
            }
            Argument::Literal(value) => write!(f, "{}", quote(value)),
            Argument::Variable(name) => write!(f, "{}", quote(&format!("${}", name))),
        }
    }
}

/// One executable line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// `name arg...`
    Call {
        function: String,
        arguments: Vec<Argument>,
    },
    /// `variable = command`
    Assignment {
        variable: String,
        command: Box<Command>,
    },
    /// `if command`
    If { condition: Box<Command> },
    Else,
    Endif,
}

impl Command {
    pub fn call(function: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Command::Call {
            function: function.into(),
            arguments,
        }
    }

    pub fn assignment(variable: impl Into<String>, command: Command) -> Self {
        Command::Assignment {
            variable: variable.into(),
            command: Box::new(command),
        }
    }

    pub fn if_(condition: Command) -> Self {
        Command::If {
            condition: Box::new(condition),
        }
    }

    /// The command a blank line stands for.
    pub fn nop() -> Self {
        Command::call(crate::registry::NOP, Vec::new())
    }

    /// Control-flow markers run even while a block is being skipped.
    pub fn is_special(&self) -> bool {
        matches!(self, Command::If { .. } | Command::Else | Command::Endif)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Call {
                function,
                arguments,
            } => {
                write!(f, "{}", quote(function))?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                Ok(())
            }
            Command::Assignment { variable, command } => {
                write!(f, "{} = {}", quote(variable), command)
            }
            Command::If { condition } => write!(f, "if {}", condition),
            Command::Else => write!(f, "else"),
            Command::Endif => write!(f, "endif"),
        }
    }
}

/// An ordered, immutable sequence of commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl Index<usize> for Script {
    type Output = Command;

    fn index(&self, index: usize) -> &Command {
        &self.commands[index]
    }
}

impl FromIterator<Command> for Script {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Script {
    type Item = &'a Command;
    type IntoIter = slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}
