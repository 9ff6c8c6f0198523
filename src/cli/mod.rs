//! Command-line interface.
//!
//! Provides argument parsing and command dispatch for the `luaflow` binary.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RenderArgs};
