//! Layer tree data structures.
//!
//! A [`LayerKeyMap`] maps key identifiers to [`LayerNode`]s. A node is either
//! an [`ActionLeaf`] (events to emit) or another key map (a nested layer).
//! Maps are ordered by key so compiling the same tree always yields the same
//! output.

use crate::models::karabiner::ToEvent;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Engine names of the modifier keys.
pub const MODIFIER_KEYS: &[&str] = &[
    "caps_lock",
    "left_command",
    "left_control",
    "left_option",
    "left_shift",
    "right_command",
    "right_control",
    "right_option",
    "right_shift",
    "fn",
];

/// An ordered set of modifier names that must be held together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModifierSet(Vec<String>);

impl ModifierSet {
    /// Creates a modifier set from engine modifier names.
    pub fn new<I, S>(modifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(modifiers.into_iter().map(Into::into).collect())
    }

    /// The Hyper combination: ⌘⌃⌥⇧ on the left-hand side.
    #[must_use]
    pub fn hyper() -> Self {
        Self::new(["left_command", "left_control", "left_option", "left_shift"])
    }

    /// Modifier names in declaration order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True if no modifier is part of the set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ModifierSet {
    fn default() -> Self {
        Self::hyper()
    }
}

/// A terminal binding: the events emitted when its key is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionLeaf {
    /// Optional human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Events to emit, in order
    pub to: Vec<ToEvent>,
}

impl ActionLeaf {
    /// Creates a leaf emitting `to`.
    #[must_use]
    pub const fn new(to: Vec<ToEvent>) -> Self {
        Self {
            description: None,
            to,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Either a leaf action or a nested layer.
///
/// Deserialization tries the leaf shape first: a table with a `to` key (and
/// optionally `description`) is a leaf, any other table is a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerNode {
    /// Terminal binding
    Leaf(ActionLeaf),
    /// Nested layer
    Layer(LayerKeyMap),
}

impl LayerNode {
    /// Returns true if this node is a leaf.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Number of leaves reachable from this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Layer(map) => map.leaf_count(),
        }
    }

    /// Number of layers reachable from this node, itself included.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Layer(map) => 1 + map.layer_count(),
        }
    }
}

impl From<ActionLeaf> for LayerNode {
    fn from(leaf: ActionLeaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<LayerKeyMap> for LayerNode {
    fn from(map: LayerKeyMap) -> Self {
        Self::Layer(map)
    }
}

/// Mapping from key identifiers to layer nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerKeyMap(BTreeMap<String, LayerNode>);

impl LayerKeyMap {
    /// Creates an empty key map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a binding, replacing any existing node under `key`.
    #[must_use]
    pub fn bind(mut self, key: impl Into<String>, node: impl Into<LayerNode>) -> Self {
        self.0.insert(key.into(), node.into());
        self
    }

    /// Inserts a node, returning the previous one under `key`.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<LayerNode>) -> Option<LayerNode> {
        self.0.insert(key.into(), node.into())
    }

    /// Looks up the node bound to `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LayerNode> {
        self.0.get(key)
    }

    /// Iterates over bindings in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, LayerNode> {
        self.0.iter()
    }

    /// Iterates over the nested layers only.
    pub fn layers(&self) -> impl Iterator<Item = (&String, &LayerKeyMap)> {
        self.0.iter().filter_map(|(key, node)| match node {
            LayerNode::Layer(map) => Some((key, map)),
            LayerNode::Leaf(_) => None,
        })
    }

    /// Iterates over the leaves only.
    pub fn leaves(&self) -> impl Iterator<Item = (&String, &ActionLeaf)> {
        self.0.iter().filter_map(|(key, node)| match node {
            LayerNode::Leaf(leaf) => Some((key, leaf)),
            LayerNode::Layer(_) => None,
        })
    }

    /// Number of direct bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leaves reachable from this map.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.0.values().map(LayerNode::leaf_count).sum()
    }

    /// Number of layers nested anywhere below this map.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.0.values().map(LayerNode::layer_count).sum()
    }
}

impl<'a> IntoIterator for &'a LayerKeyMap {
    type Item = (&'a String, &'a LayerNode);
    type IntoIter = btree_map::Iter<'a, String, LayerNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, N: Into<LayerNode>> FromIterator<(K, N)> for LayerKeyMap {
    fn from_iter<T: IntoIterator<Item = (K, N)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, node)| (key.into(), node.into()))
                .collect(),
        )
    }
}
