use assert_cmd::Command;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let p = dir.join("carctl.toml");
    fs::write(&p, body).unwrap();
    p
}

fn carctl() -> Command {
    let mut cmd = Command::cargo_bin("carctl").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

const SONATA: &str = "[vehicle]\nmodel = \"SONATA\"\n";

#[test]
fn help_lists_subcommands() {
    carctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("replay"))
        .stdout(predicate::str::contains("self-check"));
}

#[test]
fn replay_writes_one_json_object_per_message() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), SONATA);
    let trace = tmp.path().join("trace.jsonl");
    fs::write(
        &trace,
        "# recorded on a bench\n{\"cycle\":10}\n{\"cycle\":11,\"enabled\":true}\n",
    )
    .unwrap();

    let out = carctl()
        .args(["--config", cfg.to_str().unwrap(), "--log-level", "warn"])
        .args(["replay", "--trace", trace.to_str().unwrap()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<serde_json::Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert!(!lines.is_empty());
    assert_eq!(lines[0]["cycle"], 10);
    assert_eq!(lines[0]["name"], "LKAS11");
    assert_eq!(lines[0]["id"], "0x340");
    assert!(lines.iter().any(|l| l["cycle"] == 11));
    let cycles: Vec<u64> = lines.iter().map(|l| l["cycle"].as_u64().unwrap()).collect();
    assert!(cycles.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn replay_reads_stdin_and_writes_out_file() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), SONATA);
    let out = tmp.path().join("msgs.jsonl");

    carctl()
        .args(["--config", cfg.to_str().unwrap(), "--log-level", "error"])
        .args(["replay", "--trace", "-", "--out", out.to_str().unwrap(), "--summary"])
        .write_stdin("{\"cycle\":1}\n{\"cycle\":2}\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Replay Summary"));

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.lines().count() >= 2);
}

#[rstest]
#[case("[vehicle]\nmodel = \"DELOREAN\"\n")]
#[case("[vehicle]\nmodel = \"SONATA\"\n[accel]\nmax = -1.0\n")]
#[case("this is not toml")]
fn bad_config_exits_with_four(#[case] body: &str) {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), body);
    carctl()
        .args(["--config", cfg.to_str().unwrap(), "self-check"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("What happened"));
}

#[test]
fn missing_config_exits_with_four() {
    let tmp = TempDir::new().unwrap();
    carctl()
        .args(["--config", tmp.path().join("nope.toml").to_str().unwrap(), "health"])
        .assert()
        .code(4);
}

#[rstest]
#[case("{\"cycle\":1}\nnot json\n")]
#[case("{\"cycle\":1,\"actuators\":{\"gas\":3.0}}\n")]
#[case("{\"cycle\":5}\n{\"cycle\":5}\n")]
fn bad_trace_exits_with_three(#[case] trace_body: &str) {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), SONATA);
    let trace = tmp.path().join("trace.jsonl");
    fs::write(&trace, trace_body).unwrap();
    carctl()
        .args(["--config", cfg.to_str().unwrap(), "--log-level", "error"])
        .args(["replay", "--trace", trace.to_str().unwrap()])
        .assert()
        .code(3);
}

#[test]
fn json_mode_reports_structured_input_error() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), SONATA);
    let trace = tmp.path().join("trace.jsonl");
    fs::write(&trace, "{\"cycle\":7,\"actuators\":{\"steer\":-2.0}}\n").unwrap();

    let out = carctl()
        .args(["--config", cfg.to_str().unwrap(), "--json", "--log-level", "off"])
        .args(["replay", "--trace", trace.to_str().unwrap()])
        .assert()
        .code(3)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8(out).unwrap();
    let last = stderr.lines().last().unwrap();
    let j: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(j["reason"], "InvalidInput");
    assert_eq!(j["details"]["cycle"], 7);
    assert_eq!(j["details"]["field"], "actuators.steer");
}

#[test]
fn policy_csv_with_wrong_headers_is_a_config_error() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(tmp.path(), SONATA);
    let csv = tmp.path().join("policy.csv");
    fs::write(&csv, "model,fault\nSONATA,true\n").unwrap();
    carctl()
        .args(["--config", cfg.to_str().unwrap(), "--policy", csv.to_str().unwrap()])
        .arg("self-check")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Invalid headers in policy CSV"));
}

#[test]
fn self_check_and_health_succeed() {
    let tmp = TempDir::new().unwrap();
    let cfg = write_config(
        tmp.path(),
        "[vehicle]\nmodel = \"kona_ev\"\n[longitudinal]\nenabled = true\n",
    );
    carctl()
        .args(["--config", cfg.to_str().unwrap(), "self-check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("self-check ok"));

    carctl()
        .args(["--config", cfg.to_str().unwrap(), "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"longitudinal\":true"))
        .stdout(predicate::str::contains("KONA_EV"));
}
