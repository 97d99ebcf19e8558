use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

const HELLO_WORLD: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bfvm").unwrap();
    cmd.timeout(Duration::from_secs(5))
        .env_remove("BF_MAX_MEMORY_SIZE")
        .env_remove("BF_MAX_MEMORY_VALUE")
        .env("BFVM_CONFIG", "/nonexistent/bfvm.toml");
    cmd
}

fn read_to_tempfile(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn test_run_positional_hello_world() {
    cargo_bin()
        .arg("run").arg(HELLO_WORLD)
        .assert()
        .success()
        .stdout("Hello World!\n\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_file_with_comments() {
    let tf = read_to_tempfile(&format!("Greeting program\n{HELLO_WORLD}\nthe end\n"));
    cargo_bin()
        .arg("run").arg("--file").arg(tf.path())
        .assert()
        .success()
        .stdout("Hello World!\n\n");
}

#[test]
fn test_positional_parts_are_concatenated() {
    // 65 '+' split over several arguments, then '.'
    let plus = "+".repeat(13);
    cargo_bin()
        .arg("run")
        .args([&plus, &plus, &plus, &plus, &plus])
        .arg(".")
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn test_program_without_instructions_prints_only_newline() {
    cargo_bin()
        .arg("run").arg("nothing to see here")
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_dump_tape_goes_to_stderr() {
    cargo_bin()
        .arg("run").arg("--dump-tape").arg(">+++>++<")
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("tape: [0, 3, 2] (pointer at 1)"));
}

#[test]
fn test_missing_file_fails() {
    cargo_bin()
        .arg("run").arg("--file").arg("/nonexistent/program.bf")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read code file"));
}

#[test]
fn test_code_may_start_with_a_hyphen() {
    cargo_bin()
        .args(["run", "--dump-tape", "-+-"])
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("tape: [-1] (pointer at 0)"));
}

#[test]
fn test_hyphen_code_after_step_flag() {
    cargo_bin()
        .args(["run", "-s", "-"])
        .write_stdin("\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[-1]"));
}
