//! Host functions the `kates` binary makes available to scripts.
//!
//! | name     | arguments     | result                                   |
//! |----------|---------------|------------------------------------------|
//! | `echo`   | any           | prints the arguments joined by spaces    |
//! | `concat` | any           | the arguments joined with no separator   |
//! | `env`    | `NAME`        | the environment variable, `""` if unset  |
//! | `now`    | none          | current local time, RFC 3339             |
//! | `sleep`  | `MILLIS`      | blocks for that long, returns `""`       |
//! | `pause`  | `TOKEN`       | asks the runner to stop with `TOKEN`     |
//! | `fail`   | any           | raises an error with the joined message  |

use std::num::ParseIntError;
use std::thread;
use std::time::Duration;

use kates_core::{CommandError, Context, Registry};
use thiserror::Error;
use tracing::debug;

/// Errors raised by host functions.
#[derive(Error, Debug)]
pub enum HostError {
    /// Raised on purpose by `fail`.
    #[error("{0}")]
    Failed(String),

    /// `sleep` was given something other than a whole number of milliseconds.
    #[error("invalid duration {value:?}: {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// `pause` needs a non-empty token.
    #[error("pause token cannot be empty")]
    EmptyPauseToken,
}

/// The built-ins plus every host function above.
pub fn registry() -> Registry {
    Registry::new()
        .with("echo", echo)
        .with("concat", concat)
        .with("env", env)
        .with("now", now)
        .with("sleep", sleep)
        .with("pause", pause)
        .with("fail", fail)
}

fn echo(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    let line = args.join(" ");
    println!("{}", line);
    Ok(line)
}

fn concat(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    Ok(args.concat())
}

fn env(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    match args {
        [name] => Ok(std::env::var(name).unwrap_or_default()),
        _ => Err(CommandError::Arguments),
    }
}

fn now(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    if !args.is_empty() {
        return Err(CommandError::Arguments);
    }
    Ok(chrono::Local::now().to_rfc3339())
}

fn sleep(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    let [value] = args else {
        return Err(CommandError::Arguments);
    };
    let ms: u64 = value.parse().map_err(|source| {
        CommandError::host(HostError::InvalidDuration {
            value: value.clone(),
            source,
        })
    })?;
    debug!(ms, "sleeping");
    thread::sleep(Duration::from_millis(ms));
    Ok(String::new())
}

fn pause(ctx: &mut Context, args: &[String]) -> Result<String, CommandError> {
    match args {
        [token] if token.is_empty() => Err(CommandError::host(HostError::EmptyPauseToken)),
        [token] => {
            ctx.request_stop(token.clone());
            Ok(String::new())
        }
        _ => Err(CommandError::Arguments),
    }
}

fn fail(_: &mut Context, args: &[String]) -> Result<String, CommandError> {
    Err(CommandError::host(HostError::Failed(args.join(" "))))
}

#[cfg(test)]
mod tests {
    use kates_core::{parse, Runner, StopReason};

    use super::*;

    fn run(source: &str) -> Runner {
        let mut runner = Runner::new(registry(), parse(source).unwrap());
        runner.run().unwrap();
        runner
    }

    #[test]
    fn test_registry_keeps_builtins() {
        let registry = registry();
        for name in ["nop", "id", "==", "!=", "echo", "pause", "fail"] {
            assert!(registry.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_concat_and_echo_return_values() {
        let runner = run("a = concat x y z\nb = echo hello world");
        assert_eq!(runner.variables()["a"], "xyz");
        assert_eq!(runner.variables()["b"], "hello world");
    }

    #[test]
    fn test_env_unset_is_empty() {
        let runner = run("v = env KATES_TEST_SURELY_UNSET_VARIABLE");
        assert_eq!(runner.variables()["v"], "");
    }

    #[test]
    fn test_now_is_rfc3339() {
        let runner = run("t = now");
        assert!(chrono::DateTime::parse_from_rfc3339(&runner.variables()["t"]).is_ok());
    }

    #[test]
    fn test_sleep_rejects_garbage() {
        let mut runner = Runner::new(registry(), parse("sleep soon").unwrap());
        let err = runner.run().unwrap_err();
        let host = err.source.host_error().unwrap();
        assert!(host.downcast_ref::<HostError>().is_some());
        assert!(err.to_string().contains("invalid duration \"soon\""));
    }

    #[test]
    fn test_sleep_zero() {
        let runner = run("s = sleep 0");
        assert_eq!(runner.variables()["s"], "");
    }

    #[test]
    fn test_pause_requests_stop() {
        let mut runner = Runner::new(registry(), parse("pause frame\nx = id 1").unwrap());
        assert_eq!(runner.run().unwrap(), StopReason::Requested("frame".into()));
        assert!(runner.variables().is_empty());
        assert_eq!(runner.run().unwrap(), StopReason::End);
    }

    #[test]
    fn test_pause_empty_token() {
        let mut runner = Runner::new(registry(), parse("pause ''").unwrap());
        let err = runner.run().unwrap_err();
        assert_eq!(err.source.to_string(), "pause token cannot be empty");
    }

    #[test]
    fn test_fail_message() {
        let mut runner = Runner::new(registry(), parse("nop\nfail out of ink").unwrap());
        let err = runner.run().unwrap_err();
        assert_eq!(err.command, 2);
        assert_eq!(err.source, CommandError::host("out of ink"));
    }
}
