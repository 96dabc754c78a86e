use crate::command::ExitCode;

/// Release failures that callers may want to tell apart.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("step `{step}` (`{command}`) exited with status {code}")]
    StepFailed {
        step: String,
        command: String,
        code: ExitCode,
    },
    #[error("{failed} of {total} release steps failed")]
    StepsFailed { failed: usize, total: usize },
}

impl ReleaseError {
    /// Exit status for the runner process itself. Never 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            ReleaseError::StepFailed { code, .. } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(1),
            ReleaseError::StepsFailed { .. } => 1,
        }
    }
}
