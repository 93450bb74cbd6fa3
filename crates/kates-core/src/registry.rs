//! The table of functions a script can call.
//!
//! Built-ins and host functions share one [`Function`] trait and one
//! [`Registry`]. [`Registry::new`] starts with the built-ins (`nop`, `id`,
//! `==`, `!=`); anything the host registers under the same name replaces them.
//!
//! # Example
//!
//! ```
//! use kates_core::{Context, Registry};
//!
//! let registry = Registry::new().with("shout", |_: &mut Context, args: &[String]| {
//!     Ok(args.join(" ").to_uppercase())
//! });
//! assert!(registry.contains("shout"));
//! assert!(registry.contains("id"));
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::CommandError;
use crate::runner::Context;

pub const NOP: &str = "nop";
pub const ID: &str = "id";
pub const EQUALS: &str = "==";
pub const NOT_EQUALS: &str = "!=";

/// Anything a script can call by name.
///
/// Implemented for every closure or `fn` with the matching signature.
pub trait Function {
    fn call(&self, ctx: &mut Context, args: &[String]) -> Result<String, CommandError>;
}

impl<F> Function for F
where
    F: Fn(&mut Context, &[String]) -> Result<String, CommandError>,
{
    fn call(&self, ctx: &mut Context, args: &[String]) -> Result<String, CommandError> {
        self(ctx, args)
    }
}

/// Name-to-function mapping used for call dispatch.
pub struct Registry {
    functions: HashMap<String, Box<dyn Function>>,
}

impl Registry {
    /// A registry holding only the built-in functions.
    pub fn new() -> Self {
        Self::empty()
            .with(NOP, builtins::nop)
            .with(ID, builtins::id)
            .with(EQUALS, builtins::equals)
            .with(NOT_EQUALS, builtins::not_equals)
    }

    /// A registry with no functions at all, not even the built-ins.
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, function: F) -> &mut Self
    where
        F: Fn(&mut Context, &[String]) -> Result<String, CommandError> + 'static,
    {
        self.insert(name, Box::new(function));
        self
    }

    /// Builder form of [`Registry::register`].
    pub fn with<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&mut Context, &[String]) -> Result<String, CommandError> + 'static,
    {
        self.register(name, function);
        self
    }

    /// Inserts an already boxed function, returning the one it shadows.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        function: Box<dyn Function>,
    ) -> Option<Box<dyn Function>> {
        self.functions.insert(name.into(), function)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Function> {
        self.functions.get(name).map(|f| f.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .finish()
    }
}

/// Functions every registry starts with.
pub mod builtins {
    use crate::error::CommandError;
    use crate::runner::Context;

    fn flag(value: bool) -> String {
        if value { "1" } else { "0" }.to_string()
    }

    /// Ignores its arguments and returns `""`.
    pub fn nop(_: &mut Context, _: &[String]) -> Result<String, CommandError> {
        Ok(String::new())
    }

    /// Returns its single argument unchanged.
    pub fn id(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
        match args {
            [value] => Ok(value.clone()),
            _ => Err(CommandError::Arguments),
        }
    }

    /// `"1"` if both arguments are equal, `"0"` otherwise.
    pub fn equals(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
        match args {
            [left, right] => Ok(flag(left == right)),
            _ => Err(CommandError::Arguments),
        }
    }

    /// `"1"` if the arguments differ, `"0"` otherwise.
    pub fn not_equals(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
        match args {
            [left, right] => Ok(flag(left != right)),
            _ => Err(CommandError::Arguments),
        }
    }
}
