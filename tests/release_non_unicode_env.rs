#![cfg(unix)]

mod common;

use common::TestRoot;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;

#[test]
fn non_unicode_variables_reach_every_step() {
    let root = TestRoot::new();
    root.script("run_tailwind.py", r#"printf 'tailwind %s\n' "$LEGACY_LATIN1" >> steps.log"#);
    root.script("run_minify.py", r#"printf 'minify %s\n' "$LEGACY_LATIN1" >> steps.log"#);
    root.script("bin/cargo", r#"printf 'cargo %s %s\n' "$LEGACY_LATIN1" "$MINIFY" >> steps.log"#);

    let path_override = format!("PATH={}", root.stub_path());
    root.cmd()
        .env("LEGACY_LATIN1", OsStr::from_bytes(b"caf\xe9"))
        .args(["--no-etag", "--env", &path_override])
        .assert()
        .success();

    assert_eq!(
        root.read_bytes("steps.log"),
        b"tailwind caf\xe9\nminify caf\xe9\ncargo caf\xe9 true\n".to_vec()
    );
}
