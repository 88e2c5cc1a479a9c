//! CLI integration tests using assert_cmd.
//!
//! Every test drives the real binary. Race tests use short deadlines except
//! the no-argument run, which keeps the built-in ten seconds.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn trialrace() -> Command {
    let mut cmd = Command::cargo_bin("trialrace").unwrap();
    cmd.env_remove("TRIALRACE_LIMIT")
        .env_remove("TRIALRACE_REPORT_EVERY")
        .env_remove("TRIALRACE_TIMEOUT_SECS")
        .env_remove("TRIALRACE_THREADS")
        .env_remove("TRIALRACE_LABELS");
    cmd
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(String::from)
        .collect()
}

// --- Help ---

#[test]
fn help_shows_both_variants() {
    trialrace()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("single").and(predicate::str::contains("race")));
}

#[test]
fn help_race_shows_args() {
    trialrace()
        .args(["race", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--limit")
                .and(predicate::str::contains("--report-every"))
                .and(predicate::str::contains("--timeout-secs"))
                .and(predicate::str::contains("--threads"))
                .and(predicate::str::contains("--labels")),
        );
}

#[test]
fn help_race_shows_built_in_timeout() {
    trialrace()
        .args(["race", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: 10]"));
}

// --- Single-threaded variant ---

#[test]
fn single_small_range_prints_nothing() {
    trialrace()
        .args(["single", "--limit", "10"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn single_reports_every_step_when_asked() {
    // [1, 10) takes 8 division steps: 4,5,6,8 one each; 7,9 two each.
    let output = trialrace()
        .args(["single", "--limit", "10", "--report-every", "1"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 8, "{:?}", lines);
    assert!(lines[0].ends_with(" Iteration 1, examining 4"), "{}", lines[0]);
    assert!(lines[7].ends_with(" Iteration 8, examining 9"), "{}", lines[7]);
}

#[test]
fn single_reads_limit_from_env() {
    let output = trialrace()
        .arg("single")
        .env("TRIALRACE_LIMIT", "10")
        .env("TRIALRACE_REPORT_EVERY", "4")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 2);
}

#[test]
fn single_rejects_zero_interval() {
    trialrace()
        .args(["single", "--limit", "10", "--report-every", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("report interval"));
}

// --- Race variant ---

#[test]
fn race_ends_with_time_is_up() {
    trialrace()
        .args(["race", "--limit", "100", "--timeout-secs", "1"])
        .assert()
        .success()
        .stdout("Time is up\n");
}

#[test]
fn race_relays_both_labels() {
    let output = trialrace()
        .args([
            "race",
            "--limit",
            "500",
            "--report-every",
            "1000",
            "--timeout-secs",
            "1",
            "--labels",
            "left,right",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.last().map(String::as_str), Some("Time is up"));
    let left = lines.iter().filter(|l| l.contains(" left Iteration ")).count();
    let right = lines.iter().filter(|l| l.contains(" right Iteration ")).count();
    assert!(left > 0 && left == right, "left={} right={}", left, right);
    assert_eq!(left + right + 1, lines.len());
}

#[test]
fn race_rejects_duplicate_labels() {
    trialrace()
        .args(["race", "--labels", "same,same", "--timeout-secs", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}

#[test]
fn race_rejects_single_label() {
    trialrace()
        .args(["race", "--labels", "lonely", "--timeout-secs", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exactly two"));
}

#[test]
fn race_rejects_zero_threads() {
    trialrace()
        .args(["race", "--threads", "0", "--timeout-secs", "1"])
        .assert()
        .failure();
}

#[test]
fn no_subcommand_reads_race_settings_from_env() {
    let started = std::time::Instant::now();
    trialrace()
        .env("TRIALRACE_LIMIT", "100")
        .env("TRIALRACE_TIMEOUT_SECS", "1")
        .assert()
        .success()
        .stdout("Time is up\n");
    assert!(started.elapsed() < std::time::Duration::from_secs(8));
}

#[test]
fn no_subcommand_rejects_bad_env() {
    trialrace()
        .env("TRIALRACE_LABELS", "same,same")
        .env("TRIALRACE_TIMEOUT_SECS", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must differ"));
}

/// No arguments: race over [1, 100000) with a ten second deadline. Each
/// runner takes 227,995,677 steps, so up to two lines per label may appear
/// before the notice, depending on CPU speed.
#[test]
fn default_run_times_out_after_ten_seconds() {
    let started = std::time::Instant::now();
    let output = trialrace().output().unwrap();
    assert!(output.status.success());
    assert!(started.elapsed() >= std::time::Duration::from_secs(10));

    let lines = stdout_lines(&output);
    assert_eq!(lines.last().map(String::as_str), Some("Time is up"));
    assert!(lines.len() <= 5, "{:?}", lines);
    for line in &lines[..lines.len() - 1] {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 7, "{:?}", line);
        assert!(fields[2] == "stuffs" || fields[2] == "niceness", "{:?}", line);
        assert!(fields[4] == "100000000," || fields[4] == "200000000,", "{:?}", line);
    }
}
