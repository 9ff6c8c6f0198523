//! CLI command implementations.

pub mod audit;
pub mod init;
pub mod parse;
pub mod render;
