//! Parse command - output the lowered statement tree as JSON.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::FlowError;
use crate::parsing::{AstSource, LuaParser};

/// Parse `file_path` and print its statement tree, or write it to `output`.
pub fn run(file_path: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mut parser = LuaParser::new()?;
    let source: &mut dyn AstSource = &mut parser;
    let chunk = source
        .parse_file(file_path)
        .with_context(|| format!("Cannot parse {}", file_path.display()))?;
    let json = serde_json::to_string_pretty(&chunk)?;

    match output {
        Some(path) => {
            std::fs::write(&path, format!("{json}\n")).map_err(|e| FlowError::io(&path, e))?;
            crate::log_event!("parse", "written", "{}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
