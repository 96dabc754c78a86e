use anyhow::{Error, anyhow};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

/// Name of the compile-time variable the release binary reads its build token from.
pub const ETAG_VAR: &str = "ETAG";

// Anything accepted here can sit between single quotes without escaping.
static PINNED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._:+-]+$").expect("valid token regex"));

/// Unique per-build identifier stamped into the release artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildToken(String);

impl BuildToken {
    /// Fresh random (v4) UUID in canonical hyphenated form.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Cargo `--config` value that exposes the token as `var` during compilation,
    /// e.g. `env.ETAG='<token>'`.
    pub fn config_override(&self, var: &str) -> String {
        format!("env.{}='{}'", var, self.0)
    }
}

impl fmt::Display for BuildToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BuildToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if PINNED_TOKEN.is_match(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(anyhow!(
                "invalid build token `{}`: only letters, digits and `._:+-` are allowed",
                s
            ))
        }
    }
}
