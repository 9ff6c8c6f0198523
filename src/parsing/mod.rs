//! Source parsing: turns source text into the statement tree of [`crate::ast`].

pub mod lua;

use std::path::Path;

use crate::ast::Chunk;
use crate::error::{FlowError, FlowResult};

pub use lua::LuaParser;

/// Common interface for parsers that produce a statement tree
pub trait AstSource {
    /// Parse source code into a chunk. Syntax errors fail the whole parse.
    fn parse(&mut self, code: &str) -> FlowResult<Chunk>;

    /// Name of the language this parser handles
    fn language(&self) -> &'static str;

    /// Read `path` and parse its contents.
    fn parse_file(&mut self, path: &Path) -> FlowResult<Chunk> {
        let code = std::fs::read_to_string(path).map_err(|e| FlowError::io(path, e))?;
        crate::debug_event!(
            self.language(),
            "read",
            "{} bytes from {}",
            code.len(),
            path.display()
        );
        self.parse(&code)
    }
}
