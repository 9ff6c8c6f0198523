//! Control-flow flowchart construction and rendering.
//!
//! - [`builder`]: statement tree to node/edge graph
//! - [`labels`]: label text per statement kind
//! - [`sanitize`]: markup-safe labels
//! - [`model`]: graph types
//! - [`render`]: Mermaid / JSON output

pub mod builder;
pub mod labels;
pub mod model;
pub mod render;
pub mod sanitize;

pub use builder::{BuildOptions, FlowchartBuilder, build_flowchart};
pub use model::{BranchLabel, DiagramEdge, DiagramNode, Flowchart, NodeId};
pub use render::{Direction, OutputFormat, RenderOptions, render, render_json, render_mermaid};
pub use sanitize::sanitize_label;
