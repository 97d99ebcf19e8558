use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfvm").unwrap();
    cmd.timeout(Duration::from_secs(5))
        .env_remove("BF_MAX_MEMORY_SIZE")
        .env_remove("BF_MAX_MEMORY_VALUE")
        .env("BFVM_CONFIG", "/nonexistent/bfvm.toml");
    cmd
}

#[test]
fn flags_wrap_pointer_and_value() {
    cargo_bin()
        .args(["run", "--max-memory-size", "2", "--max-memory-value", "2", "--dump-tape", ">>>>++++"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tape: [1, 0] (pointer at 0)"));
}

#[test]
fn unbounded_by_default() {
    cargo_bin()
        .args(["run", "--dump-tape", ">>>>++++"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tape: [0, 0, 0, 0, 4] (pointer at 4)"));
}

#[test]
fn env_supplies_bounds() {
    cargo_bin()
        .env("BF_MAX_MEMORY_SIZE", "3")
        .env("BF_MAX_MEMORY_VALUE", "1")
        .args(["run", "--dump-tape", ">>>++"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tape: [0, 0, 0] (pointer at 0)"));
}

#[test]
fn flags_override_env() {
    cargo_bin()
        .env("BF_MAX_MEMORY_SIZE", "1")
        .args(["run", "--max-memory-size", "5", "--dump-tape", ">>"])
        .assert()
        .success()
        .stderr(predicate::str::contains("(pointer at 2)"));
}

#[test]
fn config_file_supplies_bounds() {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "[machine]\nmax_memory_value = 3\n").unwrap();

    cargo_bin()
        .env("BFVM_CONFIG", tf.path())
        .args(["run", "--dump-tape", "+++++"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tape: [1] (pointer at 0)"));
}

#[test]
fn negative_cells_are_allowed() {
    cargo_bin()
        .args(["run", "--dump-tape", "+--"])
        .assert()
        .success()
        .stderr(predicate::str::contains("tape: [-1]"));
}
