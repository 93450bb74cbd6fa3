//! # kates-core
//!
//! An embeddable, line-oriented scripting language.
//!
//! Source text is parsed into a [`Script`], one [`Command`] per line, and run
//! by a [`Runner`] against a [`Registry`] of named functions supplied by the
//! host program. Every value is a string. The language has function calls,
//! variable assignment and `if`/`else`/`endif`; there are no loops or user
//! defined functions.
//!
//! ## Modules
//!
//! - [`tokenizer`] - Shell-style word splitting for one line
//! - [`parser`] - Lines to commands
//! - [`ast`] - [`Argument`], [`Command`] and [`Script`]
//! - [`registry`] - The [`Function`] trait, [`Registry`] and the built-ins
//! - [`runner`] - The execution engine and its stop/resume protocol
//! - [`error`] - Parse and execution errors
//!
//! ## Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kates_core::{parse, Context, Registry, Runner, StopReason};
//!
//! let drawn = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&drawn);
//! let registry = Registry::new().with("draw", move |_: &mut Context, args: &[String]| {
//!     sink.borrow_mut().push(args.join(" "));
//!     Ok(String::new())
//! });
//!
//! let script = parse("shape = id circle\nif != $shape square\n  draw $shape\nendif").unwrap();
//! let mut runner = Runner::new(registry, script);
//! assert_eq!(runner.run().unwrap(), StopReason::End);
//! assert_eq!(*drawn.borrow(), vec!["circle"]);
//! ```

pub mod ast;
pub mod error;
pub mod parser;
pub mod registry;
pub mod runner;
pub mod tokenizer;

pub use ast::{Argument, Command, Script};
pub use error::{
    BoxError, CommandError, ParseError, ScriptExecutionError, SyntaxError, TokenizeError,
    TokenizeErrorKind,
};
pub use parser::parse;
pub use registry::{Function, Registry};
pub use runner::{Context, Runner, StopReason};
