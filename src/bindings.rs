//! Built-in bindings and helpers for writing layer trees in code.
//!
//! [`default_layers`] is the stock Hyper layout: vim-style arrows, deletion
//! shortcuts, and the `o` (open app), `3` (digits), `w` (window) and `c`
//! (music) sublayers.

use crate::models::karabiner::{FromEvent, Manipulator, Rule, ToEvent};
use crate::models::layer::{ActionLeaf, LayerKeyMap, ModifierSet};

/// Leaf that presses a single key.
pub fn key(key_code: &str) -> ActionLeaf {
    ActionLeaf::new(vec![ToEvent::key(key_code)])
}

/// Leaf that presses a key with modifiers held.
pub fn key_with(key_code: &str, modifiers: &[&str]) -> ActionLeaf {
    ActionLeaf::new(vec![ToEvent::key_with(key_code, modifiers.iter().copied())])
}

/// Leaf that launches (or focuses) a macOS application.
pub fn app(name: &str) -> ActionLeaf {
    ActionLeaf::new(vec![ToEvent::shell(format!("open -a '{name}.app'"))])
        .with_description(format!("Open {name}"))
}

/// Leaf that opens a URL, file or folder with its default handler.
pub fn open(target: &str) -> ActionLeaf {
    ActionLeaf::new(vec![ToEvent::shell(format!("open {target}"))])
        .with_description(format!("Open {target}"))
}

/// Rule turning `from_key` into the full `modifiers` chord.
///
/// The last modifier becomes the emitted key and the others are held with
/// it, so the chord registers as a single key press.
pub fn hyper_key_rule(from_key: &str, modifiers: &ModifierSet) -> Rule {
    let (emitted, held) = match modifiers.as_slice().split_last() {
        Some((last, rest)) => (last.clone(), rest.to_vec()),
        None => (from_key.to_string(), Vec::new()),
    };

    let to = if held.is_empty() {
        ToEvent::key(emitted)
    } else {
        ToEvent::key_with(emitted, held)
    };

    let manipulator = Manipulator::basic(FromEvent::any(from_key), vec![to])
        .with_description(format!("{} -> Hyper Key", key_label(from_key)));

    Rule {
        description: "Hyper Key (⌃⌥⇧⌘)".to_string(),
        manipulators: vec![manipulator],
    }
}

/// Title-cases an engine key name (`caps_lock` → `Caps Lock`).
fn key_label(key_code: &str) -> String {
    key_code
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn window(description: &str, key_code: &str, modifiers: &[&str]) -> ActionLeaf {
    key_with(key_code, modifiers).with_description(format!("Window: {description}"))
}

/// The stock Hyper layer tree.
#[must_use]
pub fn default_layers() -> LayerKeyMap {
    let hyper_all = ["left_shift", "left_control", "left_option", "left_command"];

    LayerKeyMap::new()
        // Navigation: hjkl work like they do in vim
        .bind("h", key("left_arrow"))
        .bind("j", key("down_arrow"))
        .bind("k", key("up_arrow"))
        .bind("l", key("right_arrow"))
        // Selection
        .bind("s", key_with("left_shift", &hyper_all))
        // Deletion
        .bind("n", key_with("delete_or_backspace", &["left_option"]))
        .bind("m", key("delete_or_backspace"))
        .bind("comma", key_with("delete_or_backspace", &["fn"]))
        .bind("period", key_with("delete_forward", &["left_option"]))
        // o = "Open" applications
        .bind(
            "o",
            LayerKeyMap::new()
                .bind("c", app("Google Chrome 2"))
                .bind("v", app("Visual Studio Code"))
                .bind("n", app("Notion"))
                .bind("b", app("Obsidian"))
                .bind("t", app("iTerm"))
                .bind("p", app("Spotify"))
                .bind("a", app("Alfred 4")),
        )
        // 3 = digit pad on the right hand
        .bind(
            "3",
            LayerKeyMap::new()
                .bind("n", key("0"))
                .bind("m", key("1"))
                .bind("comma", key("2"))
                .bind("period", key("3"))
                .bind("j", key("4"))
                .bind("k", key("5"))
                .bind("l", key("6"))
                .bind("u", key("7"))
                .bind("i", key("8"))
                .bind("o", key("9")),
        )
        // w = "Window" management
        .bind(
            "w",
            LayerKeyMap::new()
                .bind("g", window("Hide", "h", &["right_command"]))
                .bind("u", window("Left", "left_arrow", &["right_option", "right_control"]))
                .bind("p", window("Right", "right_arrow", &["right_option", "right_control"]))
                .bind("j", window("Previous Window", "left_arrow", &["right_option", "right_command"]))
                .bind("k", window("Next Window", "right_arrow", &["right_option", "right_command"]))
                .bind("h", window("Previous Tab", "h", &["left_command"]))
                .bind("l", window("Next Tab", "l", &["left_command"]))
                .bind("f", window("Full Screen", "backslash", &["right_option", "right_control"]))
                .bind("i", window("Full Screen", "backslash", &["right_option", "right_control"]))
                .bind(
                    "o",
                    window("Next Screen", "right_arrow", &["left_control", "left_option", "left_command"]),
                )
                // No literal connection: both f and n are already taken
                .bind("m", window("Forward", "close_bracket", &["right_control"])),
        )
        // Misc
        .bind("d", key_with("left_option", &hyper_all))
        .bind("q", key("left_control"))
        .bind("a", key_with("left_shift", &["left_option", "left_command"]))
        .bind("open_bracket", key("escape"))
        // c = musi*c*, on the left hand
        .bind(
            "c",
            LayerKeyMap::new()
                .bind("p", key("play_or_pause"))
                .bind("n", key("fastforward"))
                .bind("b", key("rewind")),
        )
}
