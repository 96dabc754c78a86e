use anyhow::{Result, anyhow};
use regex::Regex;
use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Variable that tells the downstream asset tools to emit minified output.
pub const MINIFY_VAR: &str = "MINIFY";

static VAR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid variable name regex"));

/// The environment handed to every release step.
///
/// The environment contains:
/// - `vars`: the variables visible to executed commands.
/// - `base_dir`: the directory every command runs in and resolves `./` paths against.
///
/// It is a copy: changing it never touches the variables of the current process.
/// Names and values are kept as `OsString`, so variables that are not valid
/// Unicode pass through to the steps untouched.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<OsString, OsString>,
    /// The working directory for command execution.
    pub base_dir: PathBuf,
}

impl Environment {
    /// Snapshot the variables of the current process.
    pub fn capture(base_dir: impl Into<PathBuf>) -> Self {
        Self::from_vars(stdenv::vars_os(), base_dir)
    }

    pub fn from_vars<I, K, V>(vars: I, base_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn get_var(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Apply the release overlay. `MINIFY=true` replaces any inherited value.
    pub fn with_release_overlay(mut self) -> Self {
        self.set_var(MINIFY_VAR, "true");
        self
    }
}

/// Parse a `KEY=VALUE` pair. The value may be empty and may contain `=`.
pub fn parse_assignment(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got `{}`", input))?;
    if !VAR_NAME.is_match(key) {
        return Err(anyhow!("invalid variable name `{}`", key));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::from_vars(Vec::<(String, String)>::new(), "/tmp");

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");

        assert_eq!(env.get_var("KEY"), Some(OsStr::new("VALUE")));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::capture(".");
        assert!(env.get_var("PATH").is_some());
        assert_eq!(env.base_dir(), Path::new("."));
    }

    #[test]
    fn release_overlay_overrides_inherited_minify() {
        let env = Environment::from_vars([("MINIFY", "false"), ("HOME", "/home/me")], "/srv")
            .with_release_overlay();
        assert_eq!(env.get_var(MINIFY_VAR), Some(OsStr::new("true")));
        assert_eq!(env.get_var("HOME"), Some(OsStr::new("/home/me")));
    }

    #[test]
    fn release_overlay_adds_minify_when_absent() {
        let env = Environment::from_vars([("PATH", "/bin")], "/srv").with_release_overlay();
        assert_eq!(env.get_var(MINIFY_VAR), Some(OsStr::new("true")));
        assert_eq!(env.vars.len(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn non_unicode_values_are_kept_as_is() {
        use std::os::unix::ffi::OsStrExt;

        let latin1 = OsStr::from_bytes(b"caf\xe9");
        let env = Environment::from_vars([(OsStr::new("LEGACY"), latin1)], "/srv")
            .with_release_overlay();
        assert_eq!(env.get_var("LEGACY"), Some(latin1));
        assert_eq!(env.get_var(MINIFY_VAR), Some(OsStr::new("true")));
    }

    #[test]
    fn parse_assignment_accepts_values_with_equals() {
        let (k, v) = parse_assignment("RUSTFLAGS=-C target-cpu=native").unwrap();
        assert_eq!(k, "RUSTFLAGS");
        assert_eq!(v, "-C target-cpu=native");

        let (k, v) = parse_assignment("EMPTY=").unwrap();
        assert_eq!(k, "EMPTY");
        assert_eq!(v, "");
    }

    #[test]
    fn parse_assignment_rejects_bad_input() {
        assert!(parse_assignment("NOEQUALS").is_err());
        assert!(parse_assignment("=value").is_err());
        assert!(parse_assignment("1ABC=x").is_err());
        assert!(parse_assignment("A-B=x").is_err());
    }
}
