//! CLI integration tests
//!
//! These drive the built `layercheck` binary over files in a scratch
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const RULES: &str = r#"[
    {"Layer Name": "BLK_n_FLR_n_BLT_UP_AREA", "Color Code": "1, 2", "Type": "Polygon",
     "Requirement": "Mandatory", "Feature": "Built-up area"},
    {"Layer Name": "PLOT_BOUNDARY", "Color Code": 1, "Type": "Polygon"}
]"#;

fn document(bua_color: i32, insunits: i32, width: f64) -> String {
    format!(
        r#"{{
            "layers": [
                {{"name": "BLK_1_FLR_0_BLT_UP_AREA", "color": {{"index": {bua_color}}}}},
                {{"name": "0", "color": {{"index": 7}}}}
            ],
            "entities": [
                {{"kind": "LWPOLYLINE", "layer": "BLK_1_FLR_0_BLT_UP_AREA", "closed": true,
                  "points": [{{"x": 0, "y": 0}}, {{"x": {width}, "y": 0}}, {{"x": {width}, "y": 10}}, {{"x": 0, "y": 10}}]}}
            ],
            "units": {{"insertion_units": {insunits}, "linear_units": 2, "angular_units": 0, "linear_precision": 2}}
        }}"#
    )
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_layercheck"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn path_str(p: &Path) -> &str {
    p.to_str().unwrap()
}

#[test]
fn test_validate_compliant_document_exits_zero() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", &document(2, 6, 10.0));
    let rules = write(&dir, "rules.json", RULES);

    let output = run(&["validate", "--document", path_str(&doc), "--rules", path_str(&rules)]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 layers checked: 1 valid, 0 errors"));
}

#[test]
fn test_validate_reports_errors_with_exit_one() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", &document(9, 4, 10.0));
    let rules = write(&dir, "rules.json", RULES);
    let fixes = dir.path().join("fixes.json");

    let output = run(&[
        "validate",
        "--document",
        path_str(&doc),
        "--rules",
        path_str(&rules),
        "--format",
        "json",
        "--fix-output",
        path_str(&fixes),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let verdict = &report["layer_verdicts"][0];
    assert_eq!(verdict["status"], "invalid");
    assert_eq!(report["unit_checks"][0]["passed"], false);

    let actions: serde_json::Value = serde_json::from_str(&fs::read_to_string(&fixes).unwrap()).unwrap();
    assert_eq!(actions[0]["type"], "fix_color");
    assert_eq!(actions[0]["color"], "1");
}

#[test]
fn test_snapshot_then_compare() {
    let dir = TempDir::new().unwrap();
    let base_doc = write(&dir, "base.json", &document(2, 6, 10.0));
    let new_doc = write(&dir, "new.json", &document(2, 6, 11.5));
    let base_snap = dir.path().join("base.snap.json");
    let new_snap = dir.path().join("new.snap.json");

    for (doc, out) in [(&base_doc, &base_snap), (&new_doc, &new_snap)] {
        let output = run(&["snapshot", "--document", path_str(doc), "--output", path_str(out)]);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    let output = run(&[
        "compare",
        "--base",
        path_str(&base_snap),
        "--new",
        path_str(&new_snap),
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let change = &result["modified"][0];
    assert_eq!(change["layer_name"], "BLK_1_FLR_0_BLT_UP_AREA");
    assert_eq!(change["area_delta"], 15.0);
    assert_eq!(change["significance"], "critical");
}

#[test]
fn test_compare_fractional_geometry_succeeds() {
    let dir = TempDir::new().unwrap();
    let base_doc = write(&dir, "base.json", &document(2, 6, 10.373_491_027));
    let new_doc = write(&dir, "new.json", &document(2, 6, 11.913_770_341));
    let base_snap = dir.path().join("base.snap.json");
    let new_snap = dir.path().join("new.snap.json");

    for (doc, out) in [(&base_doc, &base_snap), (&new_doc, &new_snap)] {
        let output = run(&["snapshot", "--document", path_str(doc), "--output", path_str(out)]);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    }

    for format in ["json", "text"] {
        let output = run(&[
            "compare",
            "--base",
            path_str(&base_snap),
            "--new",
            path_str(&new_snap),
            "--format",
            format,
        ]);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
}

#[test]
fn test_compare_text_output() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", &document(2, 6, 10.0));
    let snap = dir.path().join("snap.json");
    let output = run(&["snapshot", "--document", path_str(&doc), "--output", path_str(&snap)]);
    assert!(output.status.success());

    let output = run(&["compare", "--base", path_str(&snap), "--new", path_str(&snap)]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("## Drawing Comparison"));
    assert!(stdout.contains("No changes detected between versions"));
}

#[test]
fn test_missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    let output = run(&[
        "validate",
        "--document",
        path_str(&dir.path().join("absent.json")),
        "--rules",
        path_str(&rules),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error: cannot read"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", &document(2, 6, 10.0));
    let rules = write(&dir, "rules.json", RULES);
    let config = write(&dir, "layercheck.toml", "[comparison]\ntolerance = -1.0\n");

    let output = run(&[
        "validate",
        "--document",
        path_str(&doc),
        "--rules",
        path_str(&rules),
        "--config",
        path_str(&config),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}

#[test]
fn test_validate_writes_fix_script() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "doc.json", &document(9, 6, 10.0));
    let rules = write(&dir, "rules.json", RULES);
    let script = dir.path().join("fix_layers.lsp");

    let output = run(&[
        "validate",
        "--document",
        path_str(&doc),
        "--rules",
        path_str(&rules),
        "--fix-script",
        path_str(&script),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let lisp = fs::read_to_string(&script).unwrap();
    assert!(lisp.contains("(defun c:FixLayers ()"));
    assert!(lisp.contains("    \"C\" \"1\" \"BLK_1_FLR_0_BLT_UP_AREA\"\n"));
}

#[test]
fn test_failures_are_logged_with_error_code() {
    let dir = TempDir::new().unwrap();
    let rules = write(&dir, "rules.json", RULES);

    let output = Command::new(env!("CARGO_BIN_EXE_layercheck"))
        .env_remove("RUST_LOG")
        .args([
            "--log-json",
            "validate",
            "--document",
            path_str(&dir.path().join("absent.json")),
            "--rules",
            path_str(&rules),
        ])
        .output()
        .expect("Failed to execute CLI");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"err_code\":\"ERR_IO\""), "stderr: {}", stderr);
    assert!(stderr.contains("\"op\":\"cli_validate\""), "stderr: {}", stderr);
}
