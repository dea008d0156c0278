//! hyperlayer library
//!
//! This library compiles nested Hyper key layers into Karabiner-Elements
//! complex modifications: layer tree models, the layer compiler, file
//! parsing, configuration and the CLI commands built on top of them.

// Module declarations
pub mod bindings;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod constants;
pub mod models;
pub mod parser;
pub mod services;

pub use compiler::{compile, CompileError, LayerCompiler, LayerOptions};
