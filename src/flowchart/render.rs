//! Serialize a [`Flowchart`] as Mermaid markup or JSON.
//!
//! Output is deterministic: nodes in creation order, then edges in creation order.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::model::Flowchart;
use crate::error::FlowResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mermaid,
    Json,
}

/// Mermaid flowchart orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Direction {
    #[default]
    #[serde(rename = "TD")]
    #[value(name = "TD")]
    TopDown,
    #[serde(rename = "TB")]
    #[value(name = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    #[value(name = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    #[value(name = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    #[value(name = "RL")]
    RightLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopDown => "TD",
            Direction::TopBottom => "TB",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub direction: Direction,
    /// Wrap Mermaid output in a ```` ```mermaid ```` code fence.
    pub fenced: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Mermaid,
            direction: Direction::TopDown,
            fenced: true,
        }
    }
}

pub fn render(chart: &Flowchart, options: &RenderOptions) -> FlowResult<String> {
    match options.format {
        OutputFormat::Mermaid => Ok(render_mermaid(chart, options.direction, options.fenced)),
        OutputFormat::Json => render_json(chart),
    }
}

pub fn render_mermaid(chart: &Flowchart, direction: Direction, fenced: bool) -> String {
    let mut out = String::new();
    if fenced {
        out.push_str("```mermaid\n");
    }
    out.push_str(&format!("graph {}\n", direction.as_str()));
    for node in &chart.nodes {
        out.push_str(&format!("{}[{}];\n", node.id, node.label));
    }
    for edge in &chart.edges {
        match edge.branch {
            Some(branch) => out.push_str(&format!("{}-->|{branch}|{};\n", edge.from, edge.to)),
            None => out.push_str(&format!("{}-->{};\n", edge.from, edge.to)),
        }
    }
    if fenced {
        out.push_str("```\n");
    }
    out
}

pub fn render_json(chart: &Flowchart) -> FlowResult<String> {
    let mut json = serde_json::to_string_pretty(chart)?;
    json.push('\n');
    Ok(json)
}
