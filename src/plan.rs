use crate::command::Command;
use crate::token::{BuildToken, ETAG_VAR};

pub const TAILWIND_STEP: &str = "tailwind";
pub const MINIFY_STEP: &str = "minify";
pub const CARGO_STEP: &str = "cargo";

/// A named command inside a [`ReleasePlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub name: String,
    pub command: Command,
}

impl Step {
    pub fn new(name: impl Into<String>, command: Command) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }
}

/// Ordered list of steps, run front to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    steps: Vec<Step>,
    token: Option<BuildToken>,
}

impl ReleasePlan {
    /// The production pipeline: stylesheets, minification, then the optimized build.
    ///
    /// With a token, the build step gets `--config env.ETAG='<token>'` so the binary
    /// can read it through `option_env!("ETAG")`.
    pub fn release(token: Option<BuildToken>) -> Self {
        let mut build = Command::new("cargo").args(["build", "--release"]);
        if let Some(token) = &token {
            build = build.arg("--config").arg(token.config_override(ETAG_VAR));
        }
        Self {
            steps: vec![
                Step::new(TAILWIND_STEP, Command::new("./run_tailwind.py")),
                Step::new(MINIFY_STEP, Command::new("./run_minify.py")),
                Step::new(CARGO_STEP, build),
            ],
            token,
        }
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps, token: None }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn token(&self) -> Option<&BuildToken> {
        self.token.as_ref()
    }
}
