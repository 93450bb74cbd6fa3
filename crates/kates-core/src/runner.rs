//! Execution engine for parsed scripts.
//!
//! A [`Runner`] owns a frozen [`Registry`], an immutable [`Script`] and the
//! mutable [`Context`] (variables, conditional skip stack, program counter and
//! pending stop signal). [`Runner::run`] executes commands one at a time until
//! the script ends or a function asks the runner to pause through
//! [`Context::request_stop`]; the next call picks up at the following command.
//!
//! # Conditionals
//!
//! `if` pushes a frame onto the skip stack, `else` flips the top frame and
//! `endif` pops it. A command is skipped while *any* frame is set, so a false
//! outer `if` keeps every nested block skipped regardless of its own
//! condition. `if`, `else` and `endif` themselves always run, which means the
//! condition of a nested `if` is still evaluated inside a skipped block.
//!
//! # Example
//!
//! ```
//! use kates_core::{parse, Context, Registry, Runner, StopReason};
//!
//! let registry = Registry::new().with("pause", |ctx: &mut Context, args: &[String]| {
//!     ctx.request_stop(args.join(" "));
//!     Ok(String::new())
//! });
//! let script = parse("x = id 1\npause frame\ny = id 2").unwrap();
//!
//! let mut runner = Runner::new(registry, script);
//! assert_eq!(runner.run().unwrap(), StopReason::Requested("frame".into()));
//! assert_eq!(runner.variables().get("y"), None);
//! assert_eq!(runner.run().unwrap(), StopReason::End);
//! assert_eq!(runner.variables()["y"], "2");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, trace};

use crate::ast::{Argument, Command, Script};
use crate::error::{CommandError, ScriptExecutionError};
use crate::registry::Registry;

/// Token returned by [`Runner::run`] when the script is exhausted.
pub const END: &str = "end";

/// Why [`Runner::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Every command has run.
    End,
    /// A function requested a pause with this token.
    Requested(String),
}

impl StopReason {
    pub fn as_str(&self) -> &str {
        match self {
            StopReason::End => END,
            StopReason::Requested(token) => token,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, StopReason::End)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for StopReason {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for StopReason {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Mutable execution state, handed to every function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    variables: HashMap<String, String>,
    skip_stack: Vec<bool>,
    command_index: usize,
    stop: Option<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            variables: HashMap::new(),
            skip_stack: vec![false],
            command_index: 0,
            stop: None,
        }
    }
}

impl Context {
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }

    /// Binds `name`, replacing any previous value.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Index of the next command to run. While a function is being called
    /// this already points past the calling command.
    pub fn command_index(&self) -> usize {
        self.command_index
    }

    /// Asks the runner to return `token` once the current command finishes.
    /// A later request before then replaces an earlier one.
    pub fn request_stop(&mut self, token: impl Into<String>) {
        self.stop = Some(token.into());
    }

    pub fn pending_stop(&self) -> Option<&str> {
        self.stop.as_deref()
    }

    /// True if any enclosing conditional frame suppresses execution.
    pub fn is_skipping(&self) -> bool {
        self.skip_stack.iter().any(|&skip| skip)
    }

    /// Number of frames on the skip stack, including the bottom one.
    pub fn skip_depth(&self) -> usize {
        self.skip_stack.len()
    }

    fn push_skip(&mut self, skip: bool) {
        self.skip_stack.push(skip);
    }

    fn flip_skip(&mut self) {
        if let Some(top) = self.skip_stack.last_mut() {
            *top = !*top;
        }
    }

    fn pop_skip(&mut self) -> Result<(), CommandError> {
        if self.skip_stack.len() <= 1 {
            return Err(CommandError::StrayEndif);
        }
        self.skip_stack.pop();
        Ok(())
    }

    fn evaluate(&self, argument: &Argument) -> Result<String, CommandError> {
        match argument {
            Argument::Literal(value) => Ok(value.clone()),
            Argument::Variable(name) => self
                .variables
                .get(name)
                .cloned()
                .ok_or_else(|| CommandError::NoSuchVariable(name.clone())),
        }
    }

    fn take_stop(&mut self) -> Option<String> {
        self.stop.take()
    }
}

/// Executes a [`Script`] against a [`Registry`].
///
/// Cloning a runner takes a snapshot: the clone shares the registry and
/// script but has its own copy of the execution state. Two runners compare
/// equal when they share the same registry instance and have equal scripts
/// and states.
#[derive(Debug, Clone)]
pub struct Runner {
    registry: Rc<Registry>,
    script: Rc<Script>,
    context: Context,
}

impl Runner {
    pub fn new(registry: impl Into<Rc<Registry>>, script: impl Into<Rc<Script>>) -> Self {
        Self {
            registry: registry.into(),
            script: script.into(),
            context: Context::default(),
        }
    }

    /// Runs until the script ends or a function requests a stop.
    ///
    /// May be called again after a stop to resume with the next command.
    /// Once the script is exhausted every further call returns
    /// [`StopReason::End`] immediately.
    pub fn run(&mut self) -> Result<StopReason, ScriptExecutionError> {
        while self.context.command_index < self.script.len() {
            self.step()?;
            if let Some(token) = self.context.take_stop() {
                info!(token = %token, next = self.context.command_index, "script paused");
                return Ok(StopReason::Requested(token));
            }
        }
        debug!(commands = self.script.len(), "script finished");
        Ok(StopReason::End)
    }

    /// Runs exactly the command at the program counter, then advances it.
    fn step(&mut self) -> Result<(), ScriptExecutionError> {
        let script = Rc::clone(&self.script);
        let index = self.context.command_index;
        let command = &script[index];
        self.context.command_index += 1;

        if command.is_special() || !self.context.is_skipping() {
            debug!(command = index + 1, "executing {}", command);
            // A failed command leaves no trace beyond the advanced counter.
            let saved = self.context.clone();
            if let Err(source) = self.execute(command) {
                self.context = saved;
                return Err(ScriptExecutionError {
                    command: index + 1,
                    source,
                });
            }
        } else {
            trace!(command = index + 1, "skipping {}", command);
        }
        Ok(())
    }

    fn execute(&mut self, command: &Command) -> Result<String, CommandError> {
        match command {
            Command::Call {
                function,
                arguments,
            } => {
                let registry = Rc::clone(&self.registry);
                let target = registry
                    .get(function)
                    .ok_or_else(|| CommandError::NoSuchFunction(function.clone()))?;
                let args = arguments
                    .iter()
                    .map(|argument| self.context.evaluate(argument))
                    .collect::<Result<Vec<_>, _>>()?;
                target.call(&mut self.context, &args)
            }
            Command::Assignment { variable, command } => {
                let value = self.execute(command)?;
                self.context.set_variable(variable.clone(), value.clone());
                Ok(value)
            }
            Command::If { condition } => {
                let result = self.execute(condition)?;
                let holds = !(result.is_empty() || result == "0");
                trace!(holds, depth = self.context.skip_depth(), "if");
                self.context.push_skip(!holds);
                Ok(String::new())
            }
            Command::Else => {
                self.context.flip_skip();
                Ok(String::new())
            }
            Command::Endif => {
                self.context.pop_skip()?;
                Ok(String::new())
            }
        }
    }

    /// Binds a variable before (or between) runs.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.context.set_variable(name, value);
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        self.context.variables()
    }

    /// Index of the next command to run.
    pub fn command_index(&self) -> usize {
        self.context.command_index()
    }

    pub fn is_finished(&self) -> bool {
        self.context.command_index >= self.script.len()
    }

    pub fn is_skipping(&self) -> bool {
        self.context.is_skipping()
    }

    pub fn skip_depth(&self) -> usize {
        self.context.skip_depth()
    }

    pub fn pending_stop(&self) -> Option<&str> {
        self.context.pending_stop()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    pub fn registry(&self) -> &Rc<Registry> {
        &self.registry
    }
}

impl PartialEq for Runner {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
            && self.script == other.script
            && self.context == other.context
    }
}
