//! Flowchart graph model: nodes and edges in creation order.

use serde::Serialize;
use std::fmt;

/// Identifier of a diagram node, unique within one build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(prefix: &str, index: usize) -> Self {
        Self(format!("{prefix}{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Annotation on an edge into a later branch of an `if`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BranchLabel {
    No,
    Else,
}

impl BranchLabel {
    /// Label for the edge into clause `index` (1-based among non-first clauses).
    pub fn for_clause(index: usize) -> Option<Self> {
        match index {
            0 => None,
            1 => Some(BranchLabel::No),
            _ => Some(BranchLabel::Else),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BranchLabel::No => "No",
            BranchLabel::Else => "Else",
        }
    }
}

impl fmt::Display for BranchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    pub id: NodeId,
    /// Label restricted to `[A-Za-z0-9_ ]`, safe to embed in markup.
    pub label: String,
    /// Label before sanitization.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    pub from: NodeId,
    pub to: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<BranchLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Flowchart {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Flowchart {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// First node whose unsanitized text equals `text`.
    pub fn find_by_text(&self, text: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.text == text)
    }

    pub fn outgoing<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a DiagramEdge> + 'a {
        self.edges.iter().filter(move |e| &e.from == id)
    }

    pub fn incoming<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a DiagramEdge> + 'a {
        self.edges.iter().filter(move |e| &e.to == id)
    }

    /// Edges whose endpoints are not both in the node list.
    pub fn dangling_edges(&self) -> Vec<&DiagramEdge> {
        self.edges
            .iter()
            .filter(|e| self.node(&e.from).is_none() || self.node(&e.to).is_none())
            .collect()
    }
}
