//! Layer compilation.
//!
//! This module turns a nested [`LayerKeyMap`] into the flat manipulator list
//! Karabiner-Elements evaluates. Each layer gets a state variable named after
//! its key path; entering a layer sets it, and dispatching a leaf (or timing
//! out) clears it again.
//!
//! Compilation is a pure function of the tree and [`LayerOptions`]: the tree
//! is validated in one pass first, and nothing is emitted unless the whole
//! tree is valid.

pub mod expand;
pub mod validator;

use crate::models::karabiner::{Manipulator, Rule};
use crate::models::layer::{LayerKeyMap, ModifierSet};
use tracing::debug;

// Re-export compiler types
pub use expand::Expander;
pub use validator::{CompileError, LayerValidator, ValidationReport, ValidationWarning};

/// Default state variable prefix (`layer_o`, `layer_o_w`, ...).
pub const DEFAULT_VARIABLE_PREFIX: &str = "layer";

/// Default window before an entered layer resets on its own.
pub const DEFAULT_HOLD_TIMEOUT_MS: u64 = 1000;

/// Default label used in generated descriptions.
pub const DEFAULT_TRIGGER_LABEL: &str = "Hyper";

/// Options shared by every manipulator of one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerOptions {
    /// Modifiers that must be held to reach the top level
    pub trigger: ModifierSet,
    /// Prefix of synthesized state variables
    pub variable_prefix: String,
    /// Delay after which an entered layer resets without a dispatch
    pub hold_timeout_ms: u64,
    /// Name of the trigger used in descriptions
    pub trigger_label: String,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            trigger: ModifierSet::hyper(),
            variable_prefix: DEFAULT_VARIABLE_PREFIX.to_string(),
            hold_timeout_ms: DEFAULT_HOLD_TIMEOUT_MS,
            trigger_label: DEFAULT_TRIGGER_LABEL.to_string(),
        }
    }
}

impl LayerOptions {
    /// Options with a custom modifier trigger and defaults otherwise.
    #[must_use]
    pub fn with_trigger(trigger: ModifierSet) -> Self {
        Self {
            trigger,
            ..Self::default()
        }
    }
}

/// Synthesizes the state variable of the layer at `path`.
///
/// Names are namespaced by the full path, so the same key reused under two
/// parents yields two variables.
#[must_use]
pub fn state_variable_name<S: AsRef<str>>(prefix: &str, path: &[S]) -> String {
    let mut name = prefix.to_string();
    for key in path {
        name.push('_');
        name.push_str(key.as_ref());
    }
    name
}

/// Renders a key path for messages (`o > w`, or `root`).
pub(crate) fn display_path<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "root".to_string();
    }
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" > ")
}

/// Compiles layer trees into Karabiner manipulators.
#[derive(Debug, Clone, Default)]
pub struct LayerCompiler {
    options: LayerOptions,
}

impl LayerCompiler {
    /// Creates a compiler with the given options.
    #[must_use]
    pub const fn new(options: LayerOptions) -> Self {
        Self { options }
    }

    /// Options this compiler was built with.
    #[must_use]
    pub const fn options(&self) -> &LayerOptions {
        &self.options
    }

    /// Runs the validation pass without compiling.
    #[must_use]
    pub fn validate(&self, root: &LayerKeyMap) -> ValidationReport {
        LayerValidator::new(root, &self.options).validate()
    }

    /// Compiles `root` into one rule per top-level key.
    ///
    /// Layer rules come first, direct shortcuts last. Fails with the first
    /// validation error without producing any output.
    pub fn compile_rules(&self, root: &LayerKeyMap) -> Result<Vec<Rule>, CompileError> {
        self.validate(root).into_result()?;

        let rules = Expander::new(&self.options).expand(root);

        debug!(
            rules = rules.len(),
            manipulators = rules.iter().map(|r| r.manipulators.len()).sum::<usize>(),
            "compiled layer tree"
        );

        Ok(rules)
    }

    /// Compiles `root` into the flat, ordered manipulator sequence.
    pub fn compile(&self, root: &LayerKeyMap) -> Result<Vec<Manipulator>, CompileError> {
        Ok(self
            .compile_rules(root)?
            .into_iter()
            .flat_map(|rule| rule.manipulators)
            .collect())
    }
}

/// Compiles `root` with `trigger` as the top-level modifier set.
pub fn compile(root: &LayerKeyMap, trigger: ModifierSet) -> Result<Vec<Manipulator>, CompileError> {
    LayerCompiler::new(LayerOptions::with_trigger(trigger)).compile(root)
}
