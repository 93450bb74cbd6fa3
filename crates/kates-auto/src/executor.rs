use tracing::{debug, info};

use kates_core::{Registry, Runner, Script, ScriptExecutionError, StopReason};

/// How a drive of the script ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The script ran to the end after resuming `pauses` times.
    Finished { pauses: usize },
    /// Resuming is disabled and the script paused with `token`; `next` is the
    /// 0-based index of the command that would run on resume.
    Paused { token: String, next: usize },
}

/// Drives a [`Runner`] through its stop/resume protocol on behalf of the CLI.
pub struct ScriptExecutor {
    runner: Runner,
    resume: bool,
}

impl ScriptExecutor {
    pub fn new(registry: Registry, script: Script, resume: bool) -> Self {
        Self {
            runner: Runner::new(registry, script),
            resume,
        }
    }

    /// Seeds variables; later bindings overwrite earlier ones.
    pub fn bind<I>(&mut self, bindings: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in bindings {
            debug!(name = %name, value = %value, "binding variable");
            self.runner.set_variable(name, value);
        }
    }

    pub fn execute(&mut self) -> Result<Outcome, ScriptExecutionError> {
        let mut pauses = 0;
        loop {
            match self.runner.run()? {
                StopReason::End => return Ok(Outcome::Finished { pauses }),
                StopReason::Requested(token) if self.resume => {
                    pauses += 1;
                    info!(token = %token, next = self.runner.command_index(), "resuming after pause");
                }
                StopReason::Requested(token) => {
                    return Ok(Outcome::Paused {
                        token,
                        next: self.runner.command_index(),
                    });
                }
            }
        }
    }

    pub fn runner(&self) -> &Runner {
        &self.runner
    }
}
