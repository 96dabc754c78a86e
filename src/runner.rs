use crate::command::{Command, Executor, ExitCode};
use crate::env::Environment;
use crate::error::ReleaseError;
use crate::plan::ReleasePlan;
use anyhow::{Context, Result};
use std::io::Write;

/// Exit code recorded for a step whose program could not be started.
const LAUNCH_FAILURE: ExitCode = 127;

/// What to do when a step does not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing step.
    #[default]
    FailFast,
    /// Run every step, then report whether any failed.
    KeepGoing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: String,
    pub command: Command,
    pub code: ExitCode,
}

/// Steps that were executed, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
}

impl RunReport {
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter().filter(|o| o.code != 0)
    }
}

/// Executes a [`ReleasePlan`] one step at a time.
///
/// Each step blocks until its process exits before the next one starts. Every step
/// sees the same [`Environment`].
///
/// Example
/// ```
/// use release_runner::env::Environment;
/// use release_runner::{DryRun, ReleasePlan, Runner};
///
/// let env = Environment::capture(".").with_release_overlay();
/// let mut runner = Runner::new(DryRun::new(Vec::new()), env);
/// let report = runner.run(&ReleasePlan::release(None)).unwrap();
/// assert_eq!(report.outcomes.len(), 3);
/// ```
pub struct Runner<E> {
    executor: E,
    env: Environment,
    policy: FailurePolicy,
}

impl<E: Executor> Runner<E> {
    pub fn new(executor: E, env: Environment) -> Self {
        Self {
            executor,
            env,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Run every step of `plan` in order.
    ///
    /// Under [`FailurePolicy::FailFast`] the first non-zero exit returns
    /// [`ReleaseError::StepFailed`] and a launch failure is returned as is. Under
    /// [`FailurePolicy::KeepGoing`] all steps run and [`ReleaseError::StepsFailed`]
    /// is returned at the end if any of them failed.
    pub fn run(&mut self, plan: &ReleasePlan) -> Result<RunReport> {
        let total = plan.steps().len();
        let mut report = RunReport::default();

        for (index, step) in plan.steps().iter().enumerate() {
            log::info!("[{}/{}] {}: {}", index + 1, total, step.name, step.command);

            let code = match self.executor.execute(&step.command, &self.env) {
                Ok(code) => code,
                Err(e) if self.policy == FailurePolicy::KeepGoing => {
                    log::warn!("{}: {:#}", step.name, e);
                    LAUNCH_FAILURE
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("step `{}` failed to start", step.name));
                }
            };

            report.outcomes.push(StepOutcome {
                step: step.name.clone(),
                command: step.command.clone(),
                code,
            });

            if code == 0 {
                log::debug!("{} finished", step.name);
                continue;
            }

            match self.policy {
                FailurePolicy::FailFast => {
                    return Err(ReleaseError::StepFailed {
                        step: step.name.clone(),
                        command: step.command.to_string(),
                        code,
                    }
                    .into());
                }
                FailurePolicy::KeepGoing => {
                    log::warn!("{} exited with status {}, continuing", step.name, code);
                }
            }
        }

        let failed = report.failures().count();
        if failed > 0 {
            return Err(ReleaseError::StepsFailed { failed, total }.into());
        }
        Ok(report)
    }
}

/// Prints each command instead of running it.
pub struct DryRun<W> {
    out: W,
}

impl<W: Write> DryRun<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Executor for DryRun<W> {
    fn execute(&mut self, command: &Command, _env: &Environment) -> Result<ExitCode> {
        writeln!(self.out, "+ {}", command)?;
        Ok(0)
    }
}
