//! Shared integration-test harness for running the `dml-config` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Runs `dml-config` with the given arguments and captures its output.
pub fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dml-config"))
        .args(args)
        .env_remove("DML_LOG_LEVEL")
        .env_remove("DML_CONFIG")
        .env_remove("DML_LOG_FORMAT")
        .env_remove("DML_COLOR")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run dml-config")
}

/// Runs `dml-config` with a single path argument appended.
pub fn run_with_path(args: &[&str], path: &Path) -> Output {
    let mut all: Vec<&str> = args.to_vec();
    all.push(path.to_str().expect("non-UTF-8 path"));
    run(&all)
}

/// Path to a file under `tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
