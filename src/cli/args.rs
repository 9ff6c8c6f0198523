//! CLI argument parsing using clap.
//!
//! Contains the Cli struct, the Commands enum and the flattened render arguments.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::flowchart::{Direction, OutputFormat};

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

const AFTER_HELP: &str = "Examples:
  luaflow script.lua                       # writes flowchart.md
  luaflow script.lua -o docs/flow.md --direction LR
  luaflow script.lua --format json -o flow.json
  luaflow parse script.lua                 # statement tree as JSON
  luaflow audit script.lua                 # modelled vs placeholder statements";

/// Turn a Lua source file into a control-flow flowchart.
#[derive(Parser, Debug)]
#[command(
    name = "luaflow",
    version,
    about = "Turn a Lua source file into a control-flow flowchart",
    styles = clap_cargo_style(),
    args_conflicts_with_subcommands = true,
    after_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to a settings file (defaults to .luaflow/settings.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub render: RenderArgs,
}

/// Arguments of the default render action.
#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    /// Lua source file to draw
    pub input: Option<PathBuf>,

    /// Output file (overrides config, default flowchart.md)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Mermaid graph direction
    #[arg(short, long, value_enum)]
    pub direction: Option<Direction>,

    /// Write bare Mermaid text without the ```mermaid fence
    #[arg(long)]
    pub no_fence: bool,

    /// Draw a condition node for every elseif clause
    #[arg(long)]
    pub label_elseif: bool,

    /// Prefix for generated node ids
    #[arg(long, value_name = "PREFIX")]
    pub id_prefix: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create .luaflow/settings.toml with default values
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Print the lowered statement tree of a Lua file as JSON
    Parse {
        /// File to parse
        file: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report which statements get a dedicated flowchart node
    Audit {
        /// File to audit
        file: PathBuf,
    },
}
