use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::tempdir;

fn make_config(dir: &Path, base: &Path) -> std::path::PathBuf {
    let cfg = dir.join("mdtasks.toml");
    let toml = format!(
        r#"
[vault]
base_dir = "{}"

[logging]
level = "warn"
"#,
        base.display()
    );
    fs::write(&cfg, toml).unwrap();
    cfg
}

fn mdt(cfg: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdt"));
    cmd.env("NO_COLOR", "1");
    cmd.args(["--config", cfg.to_str().unwrap()]);
    cmd
}

#[test]
fn tasks_lists_scheduled_by_default() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(
        vault.join("todo.md"),
        "- [ ] dated \u{1f4c5} 2024-03-01\n- [ ] floating\n- [x] finished \u{1f4c5} 2024-01-01\n",
    )
    .unwrap();
    let cfg = make_config(tmp.path(), &vault);

    let mut cmd = mdt(&cfg);
    cmd.arg("tasks");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("dated"))
        .stdout(predicates::str::contains("floating").not())
        .stdout(predicates::str::contains("finished").not());
}

#[test]
fn tasks_all_includes_everything() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    fs::write(
        vault.join("todo.md"),
        "- [ ] dated \u{1f4c5} 2024-03-01\n- [ ] floating\n",
    )
    .unwrap();
    let cfg = make_config(tmp.path(), &vault);

    let mut cmd = mdt(&cfg);
    cmd.args(["tasks", "--all"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("dated"))
        .stdout(predicates::str::contains("floating"));
}

#[test]
fn empty_vault_prints_placeholder() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    let cfg = make_config(tmp.path(), &vault);

    let mut cmd = mdt(&cfg);
    cmd.arg("tasks");
    cmd.assert().success().stdout(predicates::str::contains("No tasks."));
}

#[test]
fn version_flag_reports_the_library_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdt"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains(mdtasks_core::version()));
}

#[test]
fn missing_config_file_fails() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mdt"));
    cmd.env("NO_COLOR", "1");
    cmd.args(["--config", tmp.path().join("absent.toml").to_str().unwrap(), "tasks"]);
    cmd.assert().failure();
}
