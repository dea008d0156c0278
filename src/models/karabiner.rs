//! Karabiner-Elements configuration data structures.
//!
//! These types mirror the subset of `karabiner.json` this tool produces:
//! the top-level document, complex modification rules and their `basic`
//! manipulators. Optional fields are skipped when empty so the serialized
//! output only contains what the engine needs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parameter key controlling how long a `to_delayed_action` waits.
pub const DELAYED_ACTION_DELAY_PARAM: &str = "basic.to_delayed_action_delay_milliseconds";

/// Modifier wildcard accepted by `from.modifiers.optional`.
pub const ANY_MODIFIER: &str = "any";

/// A variable assignment tracked by the engine at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetVariable {
    /// Variable name
    pub name: String,
    /// New value
    pub value: i64,
}

/// One event emitted by a manipulator.
///
/// Exactly one of `key_code`, `shell_command` or `set_variable` should be set;
/// `modifiers` only accompanies a `key_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToEvent {
    /// Key to press (e.g., "left_arrow")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_code: Option<String>,
    /// Modifiers held while `key_code` is pressed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Vec<String>>,
    /// Shell command to run (e.g., "open -a 'Notion.app'")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_command: Option<String>,
    /// Variable assignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_variable: Option<SetVariable>,
}

impl ToEvent {
    /// Creates a plain key press.
    pub fn key(key_code: impl Into<String>) -> Self {
        Self {
            key_code: Some(key_code.into()),
            ..Self::default()
        }
    }

    /// Creates a key press with modifiers held.
    pub fn key_with<I, S>(key_code: impl Into<String>, modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_code: Some(key_code.into()),
            modifiers: Some(modifiers.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Creates a shell command event.
    pub fn shell(command: impl Into<String>) -> Self {
        Self {
            shell_command: Some(command.into()),
            ..Self::default()
        }
    }

    /// Creates a variable assignment event.
    pub fn set_variable(name: impl Into<String>, value: i64) -> Self {
        Self {
            set_variable: Some(SetVariable {
                name: name.into(),
                value,
            }),
            ..Self::default()
        }
    }

    /// Number of actions this event carries. Valid events carry exactly one.
    #[must_use]
    pub fn action_count(&self) -> usize {
        usize::from(self.key_code.is_some())
            + usize::from(self.shell_command.is_some())
            + usize::from(self.set_variable.is_some())
    }

    /// Returns the variable assignment if this event is one.
    #[must_use]
    pub const fn as_set_variable(&self) -> Option<&SetVariable> {
        self.set_variable.as_ref()
    }
}

/// Modifier constraints on a `from` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromModifiers {
    /// Modifiers that must be held
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mandatory: Vec<String>,
    /// Modifiers that may be held
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
}

/// The key press that triggers a manipulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromEvent {
    /// Triggering key
    pub key_code: String,
    /// Modifier constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<FromModifiers>,
}

impl FromEvent {
    /// Triggers on `key_code` only while all `mandatory` modifiers are held.
    pub fn with_mandatory(key_code: impl Into<String>, mandatory: &[String]) -> Self {
        Self {
            key_code: key_code.into(),
            modifiers: Some(FromModifiers {
                mandatory: mandatory.to_vec(),
                optional: Vec::new(),
            }),
        }
    }

    /// Triggers on `key_code` regardless of held modifiers.
    pub fn any(key_code: impl Into<String>) -> Self {
        Self {
            key_code: key_code.into(),
            modifiers: Some(FromModifiers {
                mandatory: Vec::new(),
                optional: vec![ANY_MODIFIER.to_string()],
            }),
        }
    }
}

/// Condition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    /// Matches when the variable equals the value
    VariableIf,
    /// Matches when the variable does not equal the value
    VariableUnless,
}

/// Gate on a runtime variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Condition type
    #[serde(rename = "type")]
    pub kind: ConditionKind,
    /// Variable name
    pub name: String,
    /// Compared value
    pub value: i64,
}

impl Condition {
    /// `variable_if name == value`
    pub fn variable_if(name: impl Into<String>, value: i64) -> Self {
        Self {
            kind: ConditionKind::VariableIf,
            name: name.into(),
            value,
        }
    }

    /// `variable_unless name == value`
    pub fn variable_unless(name: impl Into<String>, value: i64) -> Self {
        Self {
            kind: ConditionKind::VariableUnless,
            name: name.into(),
            value,
        }
    }

    /// True if this condition requires `name` to be set to 1.
    #[must_use]
    pub fn requires_active(&self) -> bool {
        self.kind == ConditionKind::VariableIf && self.value == 1
    }
}

/// Events fired after a delay unless another key interrupts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayedAction {
    /// Fired when the delay expires without interruption
    #[serde(default)]
    pub to_if_invoked: Vec<ToEvent>,
    /// Fired when another key is pressed before the delay expires
    #[serde(default)]
    pub to_if_canceled: Vec<ToEvent>,
}

/// Manipulator type. This tool only emits `basic` manipulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManipulatorKind {
    /// Key-to-events mapping
    #[default]
    Basic,
}

/// A single compiled trigger → effect mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manipulator {
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Manipulator type (always `basic`)
    #[serde(rename = "type", default)]
    pub kind: ManipulatorKind,
    /// Trigger key
    pub from: FromEvent,
    /// Events emitted on key down
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<ToEvent>,
    /// Events emitted on key up
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_after_key_up: Vec<ToEvent>,
    /// Timeout handling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_delayed_action: Option<DelayedAction>,
    /// Variable gates; all must match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    /// Per-manipulator engine parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, u64>,
}

impl Manipulator {
    /// Creates a `basic` manipulator with only a trigger and key-down events.
    #[must_use]
    pub fn basic(from: FromEvent, to: Vec<ToEvent>) -> Self {
        Self {
            description: None,
            kind: ManipulatorKind::Basic,
            from,
            to,
            to_after_key_up: Vec::new(),
            to_delayed_action: None,
            conditions: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the conditions.
    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions = conditions;
        self
    }

    /// Names of the variables this manipulator requires to be active, in order.
    #[must_use]
    pub fn required_variables(&self) -> Vec<&str> {
        self.conditions
            .iter()
            .filter(|c| c.requires_active())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Variables this manipulator sets to 1 on key down.
    #[must_use]
    pub fn activated_variables(&self) -> Vec<&str> {
        self.to
            .iter()
            .filter_map(ToEvent::as_set_variable)
            .filter(|v| v.value == 1)
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Variables this manipulator resets to 0 on key down.
    #[must_use]
    pub fn cleared_variables(&self) -> Vec<&str> {
        self.to
            .iter()
            .filter_map(ToEvent::as_set_variable)
            .filter(|v| v.value == 0)
            .map(|v| v.name.as_str())
            .collect()
    }
}

/// A named group of manipulators, shown as one entry in the Karabiner UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule description
    pub description: String,
    /// Manipulators, evaluated in order
    pub manipulators: Vec<Manipulator>,
}

/// Global Karabiner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Whether the Karabiner icon appears in the menu bar
    pub show_in_menu_bar: bool,
}

/// Complex modifications section of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexModifications {
    /// Rules, evaluated in order
    pub rules: Vec<Rule>,
}

/// A Karabiner profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name
    pub name: String,
    /// Complex modifications
    pub complex_modifications: ComplexModifications,
}

/// Top-level `karabiner.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarabinerDocument {
    /// Global settings
    pub global: GlobalSettings,
    /// Profiles
    pub profiles: Vec<Profile>,
}

impl KarabinerDocument {
    /// Creates a document with a single profile holding `rules`.
    pub fn new(profile_name: impl Into<String>, show_in_menu_bar: bool, rules: Vec<Rule>) -> Self {
        Self {
            global: GlobalSettings { show_in_menu_bar },
            profiles: vec![Profile {
                name: profile_name.into(),
                complex_modifications: ComplexModifications { rules },
            }],
        }
    }

    /// Total number of manipulators across every profile.
    #[must_use]
    pub fn manipulator_count(&self) -> usize {
        self.profiles
            .iter()
            .flat_map(|p| &p.complex_modifications.rules)
            .map(|r| r.manipulators.len())
            .sum()
    }
}
