//! End-to-end tests for `hyperlayer validate` command.

mod fixtures;
use fixtures::*;

#[test]
fn test_validate_valid_layers() {
    let (layers_path, temp) = create_temp_layers_file(LAYERS_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Valid layers should exit with code 0. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Validation passed"), "stdout: {stdout}");
    assert!(stdout.contains("Manipulators: 4"), "stdout: {stdout}");
}

#[test]
fn test_validate_valid_layers_json() {
    let (layers_path, temp) = create_temp_layers_file(LAYERS_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");

    assert_eq!(result["valid"], true);
    assert!(result["errors"].as_array().unwrap().is_empty());
    assert_eq!(result["summary"]["layers"], 1);
    assert_eq!(result["summary"]["actions"], 3);
    assert_eq!(result["summary"]["manipulators"], 4);
}

#[test]
fn test_validate_built_in_bindings() {
    let temp = tempfile::TempDir::new().unwrap();

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["valid"], true);
    assert_eq!(result["summary"]["source"], "built-in bindings");
}

#[test]
fn test_validate_empty_layer_json() {
    let (layers_path, temp) = create_temp_layers_file(EMPTY_LAYER_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["valid"], false);

    let errors = result["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["severity"], "error");
    assert_eq!(errors[0]["kind"], "structural");
    assert_eq!(errors[0]["path"], serde_json::json!(["o"]));
    assert!(result["summary"].get("manipulators").is_none());
}

#[test]
fn test_validate_reports_name_collision() {
    let (layers_path, temp) = create_temp_layers_file(COLLIDING_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let errors = result["errors"].as_array().unwrap();
    assert!(errors
        .iter()
        .any(|e| e["kind"] == "name_collision"
            && e["message"].as_str().unwrap().contains("layer_o_w_x")));
}

#[test]
fn test_validate_human_readable_failure() {
    let (layers_path, temp) = create_temp_layers_file(EMPTY_LAYER_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✗ Validation failed"));
    assert!(stdout.contains("Layer has no bindings"));
}

#[test]
fn test_validate_warning_passes_without_strict() {
    let (layers_path, temp) = create_temp_layers_file(MODIFIER_KEY_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap(), "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["valid"], true);
    assert_eq!(result["errors"][0]["severity"], "warning");
}

#[test]
fn test_validate_strict_fails_on_warning() {
    let (layers_path, temp) = create_temp_layers_file(MODIFIER_KEY_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap(), "--strict"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_validate_malformed_file() {
    let (layers_path, temp) = create_temp_layers_file("[o\nbroken", "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load layers"), "stderr: {stderr}");
}

#[test]
fn test_validate_missing_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let missing = temp.path().join("nope.yaml");

    let output = hyperlayer_cmd(temp.path())
        .args(["validate", "--layers", missing.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_invalid_config_file() {
    let (layers_path, _layers_temp) = create_temp_layers_file(LAYERS_TOML, "toml");
    let config_dir = create_temp_config_dir("[layers]\nhold_timeout_ms = 0\n");

    let output = hyperlayer_cmd(config_dir.path())
        .args(["validate", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load configuration"), "stderr: {stderr}");
}
