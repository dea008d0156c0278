//! Layer tree validation before compilation.
//!
//! This module performs the single upfront pass that guarantees the tree
//! can be compiled into manipulators the engine accepts. Every problem is
//! collected into a [`ValidationReport`]; compilation refuses to emit
//! anything if the report holds an error.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use crate::compiler::{display_path, state_variable_name, LayerOptions};
use crate::models::karabiner::ToEvent;
use crate::models::layer::{ActionLeaf, LayerKeyMap, LayerNode, MODIFIER_KEYS};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Key identifiers and variable prefixes share the engine's key code syntax.
fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| Regex::new(r"^[a-z0-9_]+$").expect("identifier regex is valid"))
}

/// Errors that abort compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The tree (or the options it is compiled with) is malformed.
    Structural {
        /// Key path to the offending node; empty for the root
        path: Vec<String>,
        /// What is wrong
        message: String,
    },
    /// Two different layers would share a state variable.
    NameCollision {
        /// The synthesized variable name
        variable: String,
        /// Path of the layer that claimed the name first
        first: Vec<String>,
        /// Path of the layer that collided with it
        second: Vec<String>,
    },
}

impl CompileError {
    /// Creates a structural error at `path`.
    pub fn structural(path: &[&str], message: impl Into<String>) -> Self {
        Self::Structural {
            path: path.iter().map(|k| (*k).to_string()).collect(),
            message: message.into(),
        }
    }

    /// Returns true for structural errors.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. })
    }

    /// Returns true for name collisions.
    #[must_use]
    pub const fn is_name_collision(&self) -> bool {
        matches!(self, Self::NameCollision { .. })
    }

    /// Key path the error is reported at.
    #[must_use]
    pub fn path(&self) -> &[String] {
        match self {
            Self::Structural { path, .. } => path,
            Self::NameCollision { second, .. } => second,
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structural { path, message } => {
                write!(f, "Structural error at {}: {message}", display_path(path))
            }
            Self::NameCollision {
                variable,
                first,
                second,
            } => write!(
                f,
                "Name collision: state variable '{variable}' is synthesized by both {} and {}",
                display_path(first),
                display_path(second)
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Validation warning (non-blocking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Key path the warning refers to
    pub path: Vec<String>,
    /// Warning message
    pub message: String,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(path: &[&str], message: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|k| (*k).to_string()).collect(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", display_path(&self.path), self.message)
    }
}

/// Validation result with errors and warnings.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Errors that prevent compilation
    pub errors: Vec<CompileError>,
    /// Non-critical warnings
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if there are no errors (warnings are allowed).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the report.
    pub fn add_error(&mut self, error: CompileError) {
        self.errors.push(error);
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Converts the report into the first error it holds, if any.
    pub fn into_result(self) -> Result<(), CompileError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.errors.is_empty() {
            message.push_str(&format!("❌ {} validation errors:\n", self.errors.len()));
            for (idx, error) in self.errors.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, error));
            }
        }

        if !self.warnings.is_empty() {
            message.push_str(&format!("\n⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Layer tree validator.
pub struct LayerValidator<'a> {
    root: &'a LayerKeyMap,
    options: &'a LayerOptions,
}

impl<'a> LayerValidator<'a> {
    /// Creates a validator for `root` compiled with `options`.
    #[must_use]
    pub const fn new(root: &'a LayerKeyMap, options: &'a LayerOptions) -> Self {
        Self { root, options }
    }

    /// Validates the tree and the options it will be compiled with.
    ///
    /// Checks:
    /// - The root map and every nested layer have at least one binding
    /// - Key identifiers use the engine's key code syntax
    /// - Every leaf emits at least one event, each carrying exactly one action
    /// - The modifier trigger is non-empty and the variable prefix is usable
    /// - No two layers synthesize the same state variable
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.validate_options(&mut report);

        if self.root.is_empty() {
            report.add_error(CompileError::structural(&[], "Layer map is empty"));
            return report;
        }

        let mut claimed: HashMap<String, Vec<String>> = HashMap::new();
        self.validate_map(&mut report, &mut claimed, &[], self.root);

        report
    }

    fn validate_options(&self, report: &mut ValidationReport) {
        if self.options.trigger.is_empty() {
            report.add_error(CompileError::structural(
                &[],
                "Modifier trigger is empty; layers would capture plain key presses",
            ));
        }

        if !identifier_regex().is_match(&self.options.variable_prefix) {
            report.add_error(CompileError::structural(
                &[],
                format!(
                    "Variable prefix '{}' must be non-empty and use only a-z, 0-9 and '_'",
                    self.options.variable_prefix
                ),
            ));
        }

        if self.options.hold_timeout_ms == 0 {
            report.add_error(CompileError::structural(
                &[],
                "Hold timeout must be greater than zero",
            ));
        }
    }

    fn validate_map(
        &self,
        report: &mut ValidationReport,
        claimed: &mut HashMap<String, Vec<String>>,
        parent: &[&str],
        map: &LayerKeyMap,
    ) {
        for (key, node) in map {
            let mut path = parent.to_vec();
            path.push(key.as_str());

            self.validate_key(report, &path, key);

            match node {
                LayerNode::Leaf(leaf) => Self::validate_leaf(report, &path, leaf),
                LayerNode::Layer(children) => {
                    if children.is_empty() {
                        report.add_error(CompileError::structural(
                            &path,
                            "Layer has no bindings",
                        ));
                    }

                    let variable = state_variable_name(&self.options.variable_prefix, &path);
                    let owned_path: Vec<String> = path.iter().map(|k| (*k).to_string()).collect();
                    if let Some(first) = claimed.get(&variable) {
                        report.add_error(CompileError::NameCollision {
                            variable,
                            first: first.clone(),
                            second: owned_path,
                        });
                    } else {
                        claimed.insert(variable, owned_path);
                    }

                    self.validate_map(report, claimed, &path, children);
                }
            }
        }
    }

    fn validate_key(&self, report: &mut ValidationReport, path: &[&str], key: &str) {
        if !identifier_regex().is_match(key) {
            report.add_error(CompileError::structural(
                path,
                format!("Key identifier '{key}' must be non-empty and use only a-z, 0-9 and '_'"),
            ));
            return;
        }

        if MODIFIER_KEYS.contains(&key) {
            report.add_warning(ValidationWarning::new(
                path,
                format!("Key '{key}' is a modifier key and may be folded into the modifier state"),
            ));
        }
    }

    fn validate_leaf(report: &mut ValidationReport, path: &[&str], leaf: &ActionLeaf) {
        if leaf.to.is_empty() {
            report.add_error(CompileError::structural(path, "Action emits no events"));
            return;
        }

        for (idx, event) in leaf.to.iter().enumerate() {
            if let Some(message) = Self::event_problem(event) {
                report.add_error(CompileError::structural(
                    path,
                    format!("Event {}: {message}", idx + 1),
                ));
            }
        }
    }

    fn event_problem(event: &ToEvent) -> Option<&'static str> {
        match event.action_count() {
            0 => Some("no key_code, shell_command or set_variable"),
            1 if event.modifiers.is_some() && event.key_code.is_none() => {
                Some("modifiers given without a key_code")
            }
            1 if event.key_code.as_deref() == Some("") => Some("key_code is empty"),
            1 => None,
            _ => Some("more than one of key_code, shell_command and set_variable"),
        }
    }
}
