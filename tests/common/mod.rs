#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch release root with stub build tools.
pub struct TestRoot {
    tmp: TempDir,
}

impl TestRoot {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        fs::create_dir_all(tmp.path().join("bin")).expect("create stub bin dir");
        Self { tmp }
    }

    pub fn path(&self) -> &Path {
        self.tmp.path()
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.tmp.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.file(name)).unwrap_or_default()
    }

    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        fs::read(self.file(name)).unwrap_or_default()
    }

    /// Write an executable `#!/bin/sh` script at `relative` under the root.
    #[cfg(unix)]
    pub fn script(&self, relative: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.file(relative);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        let mut perms = fs::metadata(&path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod script");
    }

    /// `PATH` with the stub `bin/` directory first.
    pub fn stub_path(&self) -> String {
        let inherited = std::env::var("PATH").unwrap_or_default();
        format!("{}:{}", self.file("bin").display(), inherited)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("run_release");
        cmd.arg("--root").arg(self.path()).env("RUST_LOG", "info");
        cmd
    }
}
