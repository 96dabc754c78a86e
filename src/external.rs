use crate::command::{Command, Executor, ExitCode};
use crate::env::Environment;
use anyhow::{Context, Result, anyhow};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Runs commands as child processes with inherited standard streams.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, command: &Command, env: &Environment) -> Result<ExitCode> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let executable = find_command_path(
            search_paths,
            env.base_dir(),
            Path::new(command.program()),
        )
        .ok_or_else(|| anyhow!("command not found: {}", command.program()))?;

        log::debug!("resolved `{}` to {}", command.program(), executable.display());

        let mut child = std::process::Command::new(&executable)
            .args(command.get_args())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .env_clear()
            .envs(&env.vars)
            .current_dir(env.base_dir())
            .spawn()
            .with_context(|| format!("failed to spawn {}", executable.display()))?;
        let status = child.wait()?;
        Ok(status.code().unwrap_or_else(|| signal_exit_code(status)))
    }
}

/// Shell-style status for a child that did not exit normally: `128 + signal`.
#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(-1, |signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> ExitCode {
    -1
}

/// Resolve a command path the way a shell started in `base_dir` would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `./run_minify.py` or `bin/tool`): returns
///   `base_dir` joined with it if that exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match. Empty PATH entries stand for `base_dir`. On
///   non-Unix platforms `base_dir` is tried first.
/// - Empty path: returns `None`.
///
/// The current directory of the calling process is never consulted.
pub fn find_command_path(search_paths: &OsStr, base_dir: &Path, path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return find_by_path(path);
    }

    let mut components = path.components();
    let first = components.next();
    let second = components.next();
    match (first, second) {
        (None, None) => {
            // Empty path -> not found
            None
        }
        (Some(x), None) => {
            if cfg!(not(unix)) {
                if let Some(found) = find_by_path(&base_dir.join(path)) {
                    return Some(found);
                }
            }
            find_in_path(search_paths, base_dir, x.as_os_str())
        }
        _ => find_by_path(&base_dir.join(path)),
    }
}

fn find_in_path(search_paths: &OsStr, base_dir: &Path, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths).find_map(|dir| {
        let dir = if dir.as_os_str().is_empty() {
            base_dir.to_path_buf()
        } else {
            dir
        };
        find_by_path(&dir.join(cmd))
    })
}

fn find_by_path(path: &Path) -> Option<PathBuf> {
    if path.exists() {
        Some(path.to_path_buf())
    } else {
        None
    }
}
