//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use hyperlayer::models::{ActionLeaf, LayerKeyMap, ToEvent};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Small two-level tree: a top-level shortcut and one "open" layer.
pub const LAYERS_TOML: &str = r#"
[h]
description = "Left"
to = [{ key_code = "left_arrow" }]

[o.c]
to = [{ shell_command = "open -a 'Google Chrome.app'" }]

[o.v]
to = [{ shell_command = "open -a 'Visual Studio Code.app'" }]
"#;

/// Same tree as [`LAYERS_TOML`] in JSON.
pub const LAYERS_JSON: &str = r#"{
  "h": { "description": "Left", "to": [{ "key_code": "left_arrow" }] },
  "o": {
    "c": { "to": [{ "shell_command": "open -a 'Google Chrome.app'" }] },
    "v": { "to": [{ "shell_command": "open -a 'Visual Studio Code.app'" }] }
  }
}"#;

/// Same tree as [`LAYERS_TOML`] in YAML.
pub const LAYERS_YAML: &str = r#"
h:
  description: Left
  to:
    - key_code: left_arrow
o:
  c:
    to:
      - shell_command: "open -a 'Google Chrome.app'"
  v:
    to:
      - shell_command: "open -a 'Visual Studio Code.app'"
"#;

/// A layer with no bindings.
pub const EMPTY_LAYER_TOML: &str = r#"
[h]
to = [{ key_code = "left_arrow" }]

[o]
"#;

/// Layers `o > w_x` and `o_w > x` both synthesize `layer_o_w_x`.
pub const COLLIDING_TOML: &str = r#"
[o.w_x.z]
to = [{ key_code = "a" }]

[o_w.x.y]
to = [{ key_code = "b" }]
"#;

/// Binds a modifier key, which is legal but suspicious.
pub const MODIFIER_KEY_TOML: &str = r#"
[left_shift]
to = [{ key_code = "a" }]
"#;

/// Path to the hyperlayer binary
pub fn hyperlayer_bin() -> &'static str {
    env!("CARGO_BIN_EXE_hyperlayer")
}

/// Command for the hyperlayer binary with its config directory pointed at `config_dir`.
pub fn hyperlayer_cmd(config_dir: &Path) -> Command {
    let mut cmd = Command::new(hyperlayer_bin());
    cmd.env("HYPERLAYER_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `name` inside a fresh temp directory.
///
/// Returns the file path and the temp directory, which must be kept alive.
pub fn create_temp_file(name: &str, content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(name);
    fs::write(&path, content).expect("Failed to write temp file");
    (path, temp_dir)
}

/// Writes a layer file with the given extension.
pub fn create_temp_layers_file(content: &str, extension: &str) -> (PathBuf, TempDir) {
    create_temp_file(&format!("layers.{extension}"), content)
}

/// Writes `config.toml` into a fresh config directory.
pub fn create_temp_config_dir(content: &str) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), content).expect("Failed to write config");
    temp_dir
}

/// Reads and parses a generated document.
pub fn read_json(path: &Path) -> serde_json::Value {
    let content = fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&content).expect("Output should be valid JSON")
}

/// Leaf emitting a single key press.
pub fn key_leaf(code: &str) -> ActionLeaf {
    ActionLeaf::new(vec![ToEvent::key(code)])
}

/// `{ h: left_arrow, o: { c: ..., v: ... } }` built in code.
pub fn sample_tree() -> LayerKeyMap {
    LayerKeyMap::new().bind("h", key_leaf("left_arrow")).bind(
        "o",
        LayerKeyMap::new()
            .bind("c", key_leaf("c"))
            .bind("v", key_leaf("v")),
    )
}
