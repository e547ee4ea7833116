use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn plmanagement() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_plmanagement"));
    command.env_remove("PLMANAGEMENT_CONFIG").env("NO_COLOR", "1");
    command
}

#[test]
fn test_help_lists_component_options() {
    let output = plmanagement().arg("--help").output().expect("Failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--cleanup"));
    assert!(stdout.contains("--auto-devices"));
    assert!(stdout.contains("--action"));
    assert!(stdout.contains("--list-plugins"));
}

#[test]
fn test_list_plugins() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("run.toml");
    fs::write(&config_path, "[RUN]\nauto_devices = \"yes\"\n").unwrap();

    let output = plmanagement()
        .args(["--config-file", config_path.to_str().unwrap(), "--list-plugins", "--quiet"])
        .output()
        .expect("Failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    for name in ["action_queue", "auto_devices", "hosts_cleanup", "run_journal"] {
        assert!(stdout.contains(name), "missing {} in:\n{}", name, stdout);
    }
    assert!(stdout.contains("component API 2025-07-27"), "missing API version in:\n{}", stdout);
    let auto_line = stdout.lines().find(|l| l.contains("auto_devices")).unwrap();
    assert!(auto_line.trim_end().ends_with("yes"));
}

#[test]
fn test_export_config_includes_published_sections() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("run.toml");
    let export_path = temp_dir.path().join("exported.toml");
    fs::write(
        &config_path,
        "[RUN]\nauto_devices = \"no\"\n\n[nightly]\nauto_devices = \"yes\"\n\n[PARAMETERS]\nstorages = [\"nfs_a\", \"nfs_b\"]\n",
    )
    .unwrap();

    let output = plmanagement()
        .args([
            "--config-file", config_path.to_str().unwrap(),
            "--config-name", "nightly",
            "--export-config", export_path.to_str().unwrap(),
            "--quiet",
        ])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let exported = fs::read_to_string(&export_path).unwrap();
    assert!(exported.contains("[AUTO_DEVICES]"));
    assert!(exported.contains("nfs_a,nfs_b"));
}

#[test]
fn test_cleanup_without_hosts_exits_nonzero() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").unwrap();

    let output = plmanagement()
        .args(["--config-file", config_path.to_str().unwrap(), "--cleanup", "--quiet"])
        .output()
        .expect("Failed to execute binary");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_conflicting_log_flags_fail() {
    let output = plmanagement()
        .args(["--verbose", "--quiet"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
}
