//! End-to-end tests for `hyperlayer generate` command.

use std::fs;

mod fixtures;
use fixtures::*;

#[test]
fn test_generate_from_toml_file() {
    let (layers_path, layers_temp) = create_temp_layers_file(LAYERS_TOML, "toml");
    let out = layers_temp.path().join("karabiner.json");

    let output = hyperlayer_cmd(layers_temp.path())
        .args([
            "generate",
            "--layers",
            layers_path.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Generate should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated"), "stdout: {stdout}");
    assert!(stdout.contains("manipulators: 5"), "stdout: {stdout}");

    let doc = read_json(&out);
    let rules = doc["profiles"][0]["complex_modifications"]["rules"]
        .as_array()
        .expect("rules array");

    // Hyper key rule, then the "o" layer, then the "h" shortcut
    assert_eq!(rules.len(), 3);
    assert!(rules[0]["description"].as_str().unwrap().starts_with("Hyper Key"));
    assert_eq!(rules[1]["description"], "Hyper Key sublayer \"o\"");
    assert_eq!(rules[2]["description"], "Hyper Key + h");
    assert_eq!(rules[1]["manipulators"].as_array().unwrap().len(), 3);
}

#[test]
fn test_generate_json_and_yaml_match_toml() {
    let (toml_path, toml_temp) = create_temp_layers_file(LAYERS_TOML, "toml");
    let (json_path, _json_temp) = create_temp_layers_file(LAYERS_JSON, "json");
    let (yaml_path, _yaml_temp) = create_temp_layers_file(LAYERS_YAML, "yaml");

    let render = |path: &std::path::Path| {
        let output = hyperlayer_cmd(toml_temp.path())
            .args(["generate", "--stdout", "--layers", path.to_str().unwrap()])
            .output()
            .expect("Failed to execute command");
        assert_eq!(
            output.status.code(),
            Some(0),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    };

    let from_toml = render(&toml_path);
    assert_eq!(from_toml, render(&json_path));
    assert_eq!(from_toml, render(&yaml_path));
}

#[test]
fn test_generate_stdout_is_deterministic() {
    let (layers_path, temp) = create_temp_layers_file(LAYERS_TOML, "toml");

    let run = || {
        hyperlayer_cmd(temp.path())
            .args(["generate", "--stdout", "--layers", layers_path.to_str().unwrap()])
            .output()
            .expect("Failed to execute command")
            .stdout
    };

    assert_eq!(run(), run());
}

#[test]
fn test_generate_built_in_bindings() {
    let temp = tempfile::TempDir::new().unwrap();

    let output = hyperlayer_cmd(temp.path())
        .args(["generate", "--stdout"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let rules = doc["profiles"][0]["complex_modifications"]["rules"]
        .as_array()
        .unwrap();
    assert!(rules
        .iter()
        .any(|r| r["description"] == "Hyper Key sublayer \"o\""));
}

#[test]
fn test_generate_no_hyper_key() {
    let (layers_path, temp) = create_temp_layers_file(LAYERS_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args([
            "generate",
            "--stdout",
            "--no-hyper-key",
            "--layers",
            layers_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rules = doc["profiles"][0]["complex_modifications"]["rules"]
        .as_array()
        .unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0]["description"], "Hyper Key sublayer \"o\"");
}

#[test]
fn test_generate_uses_configured_output_and_profile() {
    let (layers_path, layers_temp) = create_temp_layers_file(LAYERS_TOML, "toml");
    let out = layers_temp.path().join("nested").join("out.json");
    let config_dir = create_temp_config_dir(&format!(
        r#"
[paths]
layers_file = "{}"

[output]
path = "{}"
profile_name = "Work"

[layers]
variable_prefix = "hl"
"#,
        layers_path.display(),
        out.display()
    ));

    let output = hyperlayer_cmd(config_dir.path())
        .arg("generate")
        .output()
        .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let doc = read_json(&out);
    assert_eq!(doc["profiles"][0]["name"], "Work");

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("\"hl_o\""));
    assert!(!content.contains("\"layer_o\""));
}

#[test]
fn test_generate_invalid_layers_writes_nothing() {
    let (layers_path, temp) = create_temp_layers_file(EMPTY_LAYER_TOML, "toml");
    let out = temp.path().join("karabiner.json");

    let output = hyperlayer_cmd(temp.path())
        .args([
            "generate",
            "--layers",
            layers_path.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists(), "No output should be written on failure");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Structural error"), "stderr: {stderr}");
}

#[test]
fn test_generate_name_collision_fails() {
    let (layers_path, temp) = create_temp_layers_file(COLLIDING_TOML, "toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["generate", "--stdout", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("layer_o_w_x"), "stderr: {stderr}");
}

#[test]
fn test_generate_missing_layers_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let missing = temp.path().join("missing.toml");

    let output = hyperlayer_cmd(temp.path())
        .args(["generate", "--stdout", "--layers", missing.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_generate_unknown_extension() {
    let (layers_path, temp) = create_temp_layers_file(LAYERS_TOML, "ini");

    let output = hyperlayer_cmd(temp.path())
        .args(["generate", "--stdout", "--layers", layers_path.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_generate_stdout_conflicts_with_out() {
    let temp = tempfile::TempDir::new().unwrap();

    let output = hyperlayer_cmd(temp.path())
        .args(["generate", "--stdout", "--out", "x.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
