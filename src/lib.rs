//! luaflow: turn Lua source into control-flow flowcharts.
//!
//! Pipeline: [`parsing`] lowers source text into the statement tree of
//! [`ast`], [`flowchart`] walks that tree into nodes and edges and renders
//! them as Mermaid or JSON.

pub mod ast;
pub mod cli;
pub mod config;
pub mod error;
pub mod flowchart;
pub mod logging;
pub mod parsing;

pub use ast::{AstNode, Chunk};
pub use config::Settings;
pub use error::{FlowError, FlowResult};
pub use flowchart::{BuildOptions, Flowchart, build_flowchart, render};
pub use parsing::LuaParser;
