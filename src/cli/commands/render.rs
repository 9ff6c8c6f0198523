//! Render command - Lua source to flowchart file.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::ast::AstNode;
use crate::cli::args::RenderArgs;
use crate::config::Settings;
use crate::error::{FlowError, FlowResult};
use crate::flowchart::{build_flowchart, render};
use crate::parsing::{AstSource, LuaParser};

/// Apply command-line flags on top of the loaded settings and validate the result.
pub fn apply_overrides(settings: &mut Settings, args: &RenderArgs) -> FlowResult<()> {
    if let Some(output) = &args.output {
        settings.output.path = output.clone();
    }
    if let Some(format) = args.format {
        settings.output.format = format;
    }
    if args.no_fence {
        settings.output.fenced = false;
    }
    if let Some(direction) = args.direction {
        settings.flowchart.direction = direction;
    }
    if args.label_elseif {
        settings.flowchart.label_elseif_conditions = true;
    }
    if let Some(prefix) = &args.id_prefix {
        settings.flowchart.id_prefix = prefix.clone();
    }
    settings.validate()
}

/// Parse `input` with `source`, build its flowchart and return the rendered text.
pub fn render_file(
    source: &mut dyn AstSource,
    input: &Path,
    settings: &Settings,
) -> FlowResult<String> {
    let chunk = source.parse_file(input)?;
    let chart = build_flowchart(&AstNode::from(chunk), settings.build_options())?;
    render(&chart, &settings.render_options())
}

/// Run the default action: write the flowchart of `args.input` to the output file.
pub fn run(args: &RenderArgs, mut settings: Settings) -> anyhow::Result<PathBuf> {
    let input = args.input.as_deref().ok_or(FlowError::MissingArgument)?;
    apply_overrides(&mut settings, args)?;

    let mut parser = LuaParser::new()?;
    let text = render_file(&mut parser, input, &settings)
        .with_context(|| format!("Cannot draw {}", input.display()))?;

    let output = settings.output.path;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| FlowError::io(parent, e))?;
    }
    std::fs::write(&output, text).map_err(|e| FlowError::io(&output, e))?;

    crate::log_event!("render", "written", "{}", output.display());
    println!("Flowchart written to {}", output.display());
    Ok(output)
}
