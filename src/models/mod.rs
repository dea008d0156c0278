//! Data models for layer trees and the Karabiner configuration they compile to.
//!
//! This module contains the core data structures used throughout the application.
//! Models are independent of file formats, the CLI and the compiler.

pub mod karabiner;
pub mod layer;

// Re-export all model types
pub use karabiner::{
    Condition, ConditionKind, DelayedAction, FromEvent, FromModifiers, KarabinerDocument,
    Manipulator, ManipulatorKind, Rule, SetVariable, ToEvent,
};
pub use layer::{ActionLeaf, LayerKeyMap, LayerNode, ModifierSet, MODIFIER_KEYS};
