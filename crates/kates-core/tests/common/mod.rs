//! Shared test helpers for kates-core integration tests.
//!
//! Hosts here mimic what an embedding program does: record side effects in a
//! shared log and expose a few condition and control functions.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use kates_core::{parse, CommandError, Context, Registry, Runner};

pub type Log = Rc<RefCell<Vec<String>>>;

/// A registry with the built-ins plus:
///
/// - `append VALUE...` pushes each argument onto the log
/// - `pause TOKEN` requests a stop with `TOKEN`
/// - `yes` / `no` return `"1"` / `"0"`
/// - `count` pushes `"count"` onto the log and returns `"1"`
pub fn host() -> (Registry, Log) {
    let log = Log::default();

    let append_log = Rc::clone(&log);
    let count_log = Rc::clone(&log);
    let registry = Registry::new()
        .with("append", move |_: &mut Context, args: &[String]| {
            append_log.borrow_mut().extend(args.iter().cloned());
            Ok(String::new())
        })
        .with("pause", |ctx: &mut Context, args: &[String]| match args {
            [token] => {
                ctx.request_stop(token.clone());
                Ok(String::new())
            }
            _ => Err(CommandError::Arguments),
        })
        .with("yes", |_: &mut Context, _: &[String]| Ok("1".to_string()))
        .with("no", |_: &mut Context, _: &[String]| Ok("0".to_string()))
        .with("count", move |_: &mut Context, _: &[String]| {
            count_log.borrow_mut().push("count".to_string());
            Ok("1".to_string())
        });

    (registry, log)
}

/// Parses `source` and builds a runner over [`host`].
pub fn runner(source: &str) -> (Runner, Log) {
    let (registry, log) = host();
    let script = parse(source).unwrap_or_else(|e| panic!("cannot parse {source:?}: {e}"));
    (Runner::new(registry, script), log)
}

/// The log joined into one string.
pub fn joined(log: &Log) -> String {
    log.borrow().concat()
}
