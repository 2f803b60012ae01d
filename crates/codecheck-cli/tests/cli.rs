use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CONFIG: &str = r#"version: https://codecheck.org.uk/spec/config/1.0/
certificate: 2024-017
report: https://doi.org/10.5281/zenodo.1234567
paper:
  title: Reproducible Results
  authors:
    - name: Jane Doe
      ORCID: 0000-0002-1825-0097
  reference: https://doi.org/10.1000/xyz123
repository: https://github.com/codecheckers/demo
check_time: "2024-03-01 09:00:00"
codechecker:
  name: Reviewer
  ORCID: 0000-0002-0024-5046
manifest:
  - file: figures/figure.png
    comment: Figure 1
"#;

fn codecheck() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("codecheck").expect("codecheck binary");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("codecheck.yml"), config);
    write(&dir.path().join("figures/figure.png"), "png bytes");
    dir
}

fn config_arg(dir: &TempDir) -> String {
    dir.path().join("codecheck.yml").display().to_string()
}

#[test]
fn validate_fails_until_outputs_are_copied() {
    let dir = setup(CONFIG);
    let config = config_arg(&dir);

    codecheck()
        .args(["validate", "--no-register", "--config", &config])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("✖ Validation failed (1 error, 0 warnings)"));

    codecheck()
        .args(["manifest", "--config", &config, "copy"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Copied 1 file, 0 failed"));

    codecheck()
        .args(["validate", "--no-register", "--strict", "--config", &config])
        .assert()
        .success()
        .stderr(predicate::str::contains("✔ Validation OK"));
}

#[test]
fn validate_without_manifest_check_passes() {
    let dir = setup(CONFIG);
    codecheck()
        .args(["validate", "--no-register", "--no-manifest", "--config"])
        .arg(config_arg(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("All validations passed"));
}

#[test]
fn validate_missing_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    codecheck()
        .args(["validate", "--no-register", "--config"])
        .arg(dir.path().join("codecheck.yml"))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Configuration file not found"));
}

#[test]
fn validate_json_reports_issues() {
    let dir = setup("certificate: 2024-017\n");
    let output = codecheck()
        .args(["validate", "--no-register", "--format", "json", "--config"])
        .arg(config_arg(&dir))
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["exit_code"], 1);
    assert_eq!(json["summary"]["errors"], 3);
    let fields: Vec<_> = json["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["level"] == "error")
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["manifest", "codechecker", "report"]);
}

#[test]
fn strict_warnings_fail() {
    let dir = setup(&CONFIG.replace("certificate: 2024-017", "certificate: YYYY-017"));
    let config = config_arg(&dir);

    codecheck()
        .args(["validate", "--no-register", "--no-manifest", "--config", &config])
        .assert()
        .success()
        .stderr(predicate::str::contains("passed with warnings (1 warning)"));

    codecheck()
        .args(["validate", "--no-register", "--no-manifest", "--strict", "--config", &config])
        .assert()
        .code(1);
}

#[test]
fn manifest_check_lists_missing_outputs() {
    let dir = setup(CONFIG);
    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("figures/figure.png"));

    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .args(["check", "--source"])
        .assert()
        .success();
}

#[test]
fn manifest_dry_run_copies_nothing() {
    let dir = setup(CONFIG);
    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .args(["copy", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Would copy 1 file"));
    assert!(!dir.path().join("codecheck/outputs/figures/figure.png").exists());
}

#[test]
fn manifest_flatten_copies_by_name() {
    let dir = setup(CONFIG);
    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .args(["copy", "--flatten"])
        .assert()
        .success();
    assert!(dir.path().join("codecheck/outputs/figure.png").exists());
}

#[test]
fn manifest_compare_flags_declared_size() {
    let config = CONFIG.replace("    comment: Figure 1\n", "    comment: Figure 1\n    size: 1\n");
    let dir = setup(&config);
    let config = config_arg(&dir);

    codecheck()
        .args(["manifest", "--config", &config, "copy"])
        .assert()
        .success();

    codecheck()
        .args(["manifest", "--config", &config, "compare"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("declared 1\tactual 9\t+8"));
}

#[test]
fn manifest_paths_rejects_traversal() {
    let config = CONFIG.replace("figures/figure.png", "../escape.png");
    let dir = setup(&config);
    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .arg("paths")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("../escape.png"));
}

#[test]
fn manifest_summary_json() {
    let dir = setup(CONFIG);
    let output = codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .args(["--format", "json", "summary"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["total_files"], 1);
    assert_eq!(json["file_types"][".png"], 1);
    assert_eq!(json["has_comments"], 1);
}

#[test]
fn manifest_without_manifest_key_is_config_error() {
    let dir = setup("certificate: 2024-017\n");
    codecheck()
        .args(["manifest", "--config"])
        .arg(config_arg(&dir))
        .arg("summary")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No manifest found"));
}

#[test]
fn render_title() {
    let dir = setup(CONFIG);
    codecheck()
        .args(["render", "title", "--config"])
        .arg(config_arg(&dir))
        .assert()
        .success()
        .stdout(predicate::str::contains("# CODECHECK certificate 2024-017"));
}

#[test]
fn render_strict_refuses_invalid_certificate() {
    let dir = setup(&CONFIG.replace("report: https://doi.org/10.5281/zenodo.1234567\n", ""));
    codecheck()
        .args(["render", "title", "--validate", "--strict", "--config"])
        .arg(config_arg(&dir))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn manifest_copy_from_outputs_leaves_files_intact() {
    let dir = setup(CONFIG);
    let config = config_arg(&dir);
    let outputs = dir.path().join("codecheck/outputs");

    codecheck()
        .args(["manifest", "--config", &config, "copy"])
        .assert()
        .success();

    codecheck()
        .args(["manifest", "--config", &config, "copy", "--source-dir"])
        .arg(&outputs)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source and destination are the same file"));

    assert_eq!(
        fs::read_to_string(outputs.join("figures/figure.png")).unwrap(),
        "png bytes"
    );
}
