//! Error types for parsing, flowchart construction and output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("No input file given. Usage: luaflow <INPUT>")]
    MissingArgument,

    #[error("Failed to set up Lua parser: {0}")]
    ParserSetup(String),

    #[error("Syntax error at line {line}, column {column}: {snippet}")]
    ParseFailure {
        line: usize,
        column: usize,
        snippet: String,
    },

    #[error("Malformed AST: {kind} has no source text for '{field}'")]
    MalformedAst { kind: &'static str, field: &'static str },

    #[error("Nesting deeper than {limit} levels at line {line}")]
    NestingTooDeep { limit: usize, line: usize },

    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("{0}")]
    InvalidSettings(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FlowError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlowError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(kind: &'static str, field: &'static str) -> Self {
        FlowError::MalformedAst { kind, field }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            FlowError::MissingArgument => 2,
            FlowError::ParseFailure { .. } => 3,
            FlowError::MalformedAst { .. } | FlowError::NestingTooDeep { .. } => 4,
            FlowError::ParserSetup(_)
            | FlowError::Io { .. }
            | FlowError::Config(_)
            | FlowError::InvalidSettings(_)
            | FlowError::Serialization(_) => 1,
        }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;
