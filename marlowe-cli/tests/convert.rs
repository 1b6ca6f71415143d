use assert_cmd::cargo::cargo_bin_cmd;
use marlowe_log::marlowe::testing;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_input(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("run.log");
    fs::write(&path, text).unwrap();
    path
}

fn out(dir: &TempDir) -> PathBuf {
    dir.path().join("out")
}

fn cascade1(root: &Path) -> PathBuf {
    root.join("casc0001-001-001")
}

#[test]
fn converts_a_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, testing::SAMPLE_REPORT);
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input).arg("--output").arg(out(&dir));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("33 blocks, 2 cascades, 0 skipped"));
    assert!(out(&dir).join("summary.json").exists());
    assert!(cascade1(&out(&dir)).join("lattice_sites.csv").exists());
    assert!(out(&dir).join("lattice_sites_all.csv").exists());
}

#[test]
fn table_mode_flag() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, testing::SAMPLE_REPORT);
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input)
        .arg("--output")
        .arg(out(&dir))
        .arg("--tables")
        .arg("bundled");

    cmd.assert().success();
    assert!(out(&dir).join("detail_all.csv").exists());
    assert!(!cascade1(&out(&dir)).join("detail.csv").exists());
}

#[test]
fn rejects_unknown_table_mode() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, testing::SAMPLE_REPORT);
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input).arg("--tables").arg("sometimes");

    cmd.assert().failure();
}

#[test]
fn grammar_error_names_the_block() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &testing::broken_report());
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input).arg("--output").arg(out(&dir));

    cmd.assert().failure().code(1).stderr(
        predicate::str::contains("summary block in cascade 1 (group 1, number 1)")
            .and(predicate::str::contains("does not match its grammar")),
    );
}

#[test]
fn ignore_errors_flag_skips_the_block() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, &testing::broken_report());
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input)
        .arg("--output")
        .arg(out(&dir))
        .arg("--ignore-errors");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 skipped"));
}

#[test]
fn dump_raw_flag_writes_block_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, testing::SAMPLE_REPORT);
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input)
        .arg("--output")
        .arg(out(&dir))
        .arg("--dump-raw");

    cmd.assert().success();
    assert!(out(&dir).join("01.banner.txt").exists());
    assert!(cascade1(&out(&dir)).join("01.cascade_start.txt").exists());
}

#[test]
fn config_file_sets_the_output_root() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, testing::SAMPLE_REPORT);
    let root = dir.path().join("from-config");
    let config = dir.path().join("marlowe.toml");
    fs::write(
        &config,
        format!("[output]\nroot = {:?}\ntables = \"none\"\n", root.display().to_string()),
    )
    .unwrap();
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(&input).arg("--config").arg(&config);

    cmd.assert().success();
    assert!(root.join("initial.json").exists());
    assert!(!root.join("ranges_all.csv").exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("marlowe");
    cmd.arg(dir.path().join("absent.log"))
        .arg("--output")
        .arg(out(&dir));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input"));
}
