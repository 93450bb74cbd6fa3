//! Turns source text into a [`Script`].
//!
//! Every line is parsed on its own into exactly one [`Command`]:
//!
//! ```text
//! line       := <blank> | command
//! command    := "if" command
//!             | "else"
//!             | "endif"
//!             | NAME "=" command
//!             | NAME argument*
//! argument   := "$$" REST     (literal "$" REST)
//!             | "$" NAME      (variable)
//!             | WORD          (literal)
//! ```
//!
//! Words are produced by [`tokenize`], so quoting only groups characters; a
//! quoted `"$x"` is still a variable reference.

use tracing::debug;

use crate::ast::{Argument, Command, Script};
use crate::error::{ParseError, SyntaxError};
use crate::tokenizer::tokenize;

const IF: &str = "if";
const ELSE: &str = "else";
const ENDIF: &str = "endif";
const ASSIGN: &str = "=";

/// Parses a whole script, stopping at the first bad line.
pub fn parse(source: &str) -> Result<Script, ParseError> {
    let script = source
        .split('\n')
        .enumerate()
        .map(|(i, line)| parse_line(line).map_err(|source| ParseError { line: i + 1, source }))
        .collect::<Result<Script, _>>()?;
    debug!(commands = script.len(), "parsed script");
    Ok(script)
}

/// Parses one line. Blank lines become `nop`.
pub fn parse_line(line: &str) -> Result<Command, SyntaxError> {
    let tokens = tokenize(line)?;
    if tokens.is_empty() {
        return Ok(Command::nop());
    }
    parse_command(&tokens)
}

/// Builds a command from an already split line.
///
/// Unlike [`parse_line`], an empty token list is an error here: it means a
/// command was required (after `if` or `=`) and none was given.
pub fn parse_command(tokens: &[String]) -> Result<Command, SyntaxError> {
    let (head, rest) = tokens.split_first().ok_or(SyntaxError::EmptyCommand)?;

    match head.as_str() {
        IF => Ok(Command::if_(parse_command(rest)?)),
        ELSE => keyword(ELSE, rest, Command::Else),
        ENDIF => keyword(ENDIF, rest, Command::Endif),
        _ => match rest.split_first() {
            Some((op, inner)) if op == ASSIGN => {
                Ok(Command::assignment(head.clone(), parse_command(inner)?))
            }
            _ => Ok(Command::call(
                head.clone(),
                rest.iter().map(|token| parse_argument(token)).collect(),
            )),
        },
    }
}

fn keyword(name: &str, rest: &[String], command: Command) -> Result<Command, SyntaxError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(SyntaxError::InvalidBuiltinUsage(name.to_string()))
    }
}

/// Classifies one word as a literal or a variable reference.
pub fn parse_argument(token: &str) -> Argument {
    if let Some(escaped) = token.strip_prefix("$$") {
        Argument::Literal(format!("${}", escaped))
    } else if let Some(name) = token.strip_prefix('$') {
        Argument::Variable(name.to_string())
    } else {
        Argument::Literal(token.to_string())
    }
}
