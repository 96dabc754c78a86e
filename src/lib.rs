//! A small, fail-fast release pipeline runner.
//!
//! This crate runs the fixed sequence of external build steps that produces a
//! production build: the stylesheet build, asset minification and the optimized
//! `cargo` build. Every step runs as a child process in an explicit base
//! directory, with the inherited environment plus `MINIFY=true`. The final step can
//! receive a per-run build token that ends up compiled into the binary as `ETAG`.
//!
//! The main entry point is [`Runner`], which executes a [`ReleasePlan`] through a
//! pluggable [`Executor`](command::Executor). The public modules [`command`] and
//! [`env`] expose the types needed to build custom plans and environments.

pub mod command;
pub mod env;
mod error;
mod external;
mod plan;
mod runner;
mod token;

pub use error::ReleaseError;
pub use external::{ProcessExecutor, find_command_path};
pub use plan::{ReleasePlan, Step};
pub use runner::{DryRun, FailurePolicy, RunReport, Runner, StepOutcome};
pub use token::{BuildToken, ETAG_VAR};
