//! Depth-first expansion of a validated layer tree.
//!
//! The walk carries an immutable [`LayerPath`] down the tree: the keys that
//! lead to the current layer, the state variables of every ancestor, and the
//! reset set of the top-level layer the walk started from. Nothing is
//! accumulated in shared state; each layer returns its own manipulators.

use crate::compiler::{display_path, state_variable_name, LayerOptions};
use crate::models::karabiner::{
    Condition, DelayedAction, FromEvent, Manipulator, Rule, ToEvent, DELAYED_ACTION_DELAY_PARAM,
};
use crate::models::layer::{ActionLeaf, LayerKeyMap};

/// Position of a layer in the tree.
#[derive(Debug, Clone, Default)]
struct LayerPath<'a> {
    /// Keys from the root to this layer
    keys: Vec<&'a str>,
    /// State variables of this layer and its ancestors, outermost first
    variables: Vec<String>,
    /// Variables cleared to return to the idle state
    reset: Vec<String>,
}

impl<'a> LayerPath<'a> {
    fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    fn variable(&self) -> Option<&str> {
        self.variables.last().map(String::as_str)
    }
}

/// A layer that competes with others under the same parent.
#[derive(Debug, Clone)]
struct Sibling {
    variable: String,
    clearing: Vec<String>,
}

/// Expands a validated tree into rules.
pub struct Expander<'o> {
    options: &'o LayerOptions,
}

impl<'o> Expander<'o> {
    /// Creates an expander using `options`.
    #[must_use]
    pub const fn new(options: &'o LayerOptions) -> Self {
        Self { options }
    }

    /// Expands `root` into one rule per top-level key.
    ///
    /// The tree must already have passed validation.
    #[must_use]
    pub fn expand(&self, root: &LayerKeyMap) -> Vec<Rule> {
        let top = LayerPath::default();
        let siblings = self.siblings(&top, root);
        let mut rules = Vec::with_capacity(root.len());

        for (key, children) in root.layers() {
            rules.push(Rule {
                description: format!("{} Key sublayer \"{key}\"", self.options.trigger_label),
                manipulators: self.expand_layer(&top, key, children, &siblings),
            });
        }

        for (key, leaf) in root.leaves() {
            rules.push(Rule {
                description: format!("{} Key + {key}", self.options.trigger_label),
                manipulators: vec![self.shortcut(key, leaf, &siblings)],
            });
        }

        rules
    }

    fn descend<'a>(&self, parent: &LayerPath<'a>, key: &'a str, children: &LayerKeyMap) -> LayerPath<'a> {
        let mut keys = parent.keys.clone();
        keys.push(key);

        let mut variables = parent.variables.clone();
        variables.push(state_variable_name(&self.options.variable_prefix, &keys));

        let reset = if parent.is_root() {
            self.clearing_set(&keys, children)
        } else {
            parent.reset.clone()
        };

        LayerPath {
            keys,
            variables,
            reset,
        }
    }

    /// Variable of the layer at `keys` followed by every variable nested below it.
    fn clearing_set(&self, keys: &[&str], children: &LayerKeyMap) -> Vec<String> {
        let mut set = vec![state_variable_name(&self.options.variable_prefix, keys)];
        for (key, grandchildren) in children.layers() {
            let mut child_keys = keys.to_vec();
            child_keys.push(key.as_str());
            set.extend(self.clearing_set(&child_keys, grandchildren));
        }
        set
    }

    fn siblings(&self, parent: &LayerPath<'_>, map: &LayerKeyMap) -> Vec<Sibling> {
        map.layers()
            .map(|(key, children)| {
                let mut keys = parent.keys.clone();
                keys.push(key.as_str());
                Sibling {
                    variable: state_variable_name(&self.options.variable_prefix, &keys),
                    clearing: self.clearing_set(&keys, children),
                }
            })
            .collect()
    }

    /// Entry manipulator, then nested layers, then this layer's leaves.
    fn expand_layer<'a>(
        &self,
        parent: &LayerPath<'a>,
        key: &'a str,
        children: &'a LayerKeyMap,
        siblings: &[Sibling],
    ) -> Vec<Manipulator> {
        let path = self.descend(parent, key, children);
        let child_siblings = self.siblings(&path, children);

        let mut manipulators = vec![self.entry(parent, &path, key, siblings)];

        for (child_key, grandchildren) in children.layers() {
            manipulators.extend(self.expand_layer(&path, child_key, grandchildren, &child_siblings));
        }

        for (child_key, leaf) in children.leaves() {
            manipulators.push(self.dispatch(&path, child_key, leaf, &child_siblings));
        }

        manipulators
    }

    fn entry(&self, parent: &LayerPath<'_>, path: &LayerPath<'_>, key: &str, siblings: &[Sibling]) -> Manipulator {
        let variable = path.variable().unwrap_or_default();
        let others: Vec<&Sibling> = siblings.iter().filter(|s| s.variable != variable).collect();

        let mut conditions: Vec<Condition> = parent
            .variables
            .iter()
            .map(|v| Condition::variable_if(v, 1))
            .collect();
        // Once active, the layer's own key falls through to its children
        conditions.push(Condition::variable_if(variable, 0));
        conditions.extend(others.iter().map(|s| Condition::variable_if(&s.variable, 0)));

        let mut to = vec![ToEvent::set_variable(variable, 1)];
        to.extend(
            others
                .iter()
                .flat_map(|s| &s.clearing)
                .map(|v| ToEvent::set_variable(v, 0)),
        );

        let reset = clear_events(&path.reset);

        let from = if parent.is_root() {
            FromEvent::with_mandatory(key, self.options.trigger.as_slice())
        } else {
            FromEvent::any(key)
        };

        let mut manipulator = Manipulator::basic(from, to)
            .with_description(format!(
                "Toggle {} sublayer {}",
                self.options.trigger_label,
                display_path(&path.keys)
            ))
            .with_conditions(conditions);

        if parent.is_root() {
            manipulator.to_after_key_up = reset.clone();
        }
        manipulator.to_delayed_action = Some(DelayedAction {
            to_if_invoked: reset,
            to_if_canceled: Vec::new(),
        });
        manipulator
            .parameters
            .insert(DELAYED_ACTION_DELAY_PARAM.to_string(), self.options.hold_timeout_ms);

        manipulator
    }

    fn dispatch(&self, path: &LayerPath<'_>, key: &str, leaf: &ActionLeaf, siblings: &[Sibling]) -> Manipulator {
        let mut conditions: Vec<Condition> = path
            .variables
            .iter()
            .map(|v| Condition::variable_if(v, 1))
            .collect();
        conditions.extend(siblings.iter().map(|s| Condition::variable_if(&s.variable, 0)));

        let mut to = leaf.to.clone();
        to.extend(clear_events(&path.reset));

        let description = leaf.description.clone().unwrap_or_else(|| {
            let mut keys = path.keys.clone();
            keys.push(key);
            format!("{} {}", self.options.trigger_label, display_path(&keys))
        });

        Manipulator::basic(FromEvent::any(key), to)
            .with_description(description)
            .with_conditions(conditions)
    }

    fn shortcut(&self, key: &str, leaf: &ActionLeaf, layers: &[Sibling]) -> Manipulator {
        let conditions = layers
            .iter()
            .map(|s| Condition::variable_if(&s.variable, 0))
            .collect();

        let description = leaf
            .description
            .clone()
            .unwrap_or_else(|| format!("{} + {key}", self.options.trigger_label));

        Manipulator::basic(
            FromEvent::with_mandatory(key, self.options.trigger.as_slice()),
            leaf.to.clone(),
        )
        .with_description(description)
        .with_conditions(conditions)
    }
}

fn clear_events(variables: &[String]) -> Vec<ToEvent> {
    variables
        .iter()
        .map(|v| ToEvent::set_variable(v, 0))
        .collect()
}
