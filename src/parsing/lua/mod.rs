//! Lua language support
//!
//! ## Overview
//!
//! The Lua parser uses tree-sitter-lua and lowers its concrete syntax tree into
//! the statement tree consumed by the flowchart builder.
//!
//! ### Modelled statements
//! - `if` / `elseif` / `else`
//! - `while`, `repeat ... until`, numeric and generic `for`
//! - function declarations (global, local, dotted and colon names)
//! - `return`, call statements, assignments, `local` declarations
//!
//! Everything else (`do`, `break`, `goto`, labels) is kept as a placeholder
//! tagged with its kind.
//!
//! ## Module Components
//!
//! - [`parser`]: tree-sitter integration and lowering
//! - [`audit`]: coverage report of modelled vs placeholder statements
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use luaflow::parsing::lua::LuaParser;
//!
//! let mut parser = LuaParser::new().unwrap();
//! let chunk = parser.parse("local a = 1").unwrap();
//! assert_eq!(chunk.body.len(), 1);
//! ```

pub mod audit;
pub mod parser;

pub use audit::LuaFlowAudit;
pub use parser::{LuaParser, MAX_NESTING_DEPTH};
