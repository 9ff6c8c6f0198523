//! Depth-first traversal from a Lua statement tree to a [`Flowchart`].
//!
//! All state of one build (node list, edge list, id counter) lives in a
//! [`FlowchartBuilder`]. Builders are not shared: each file gets its own.
//!
//! Linking rules:
//! - every created node gets one incoming edge from the parent it was
//!   traversed under, if there is a parent;
//! - statements at the top level of the second and later `if` clauses are
//!   linked from the `if` node with a [`BranchLabel`] instead of a plain edge;
//! - `Chunk` and `Sequence` create nothing and pass their parent through.

use crate::ast::{AstNode, ClauseKind, IfStatement, RepeatStatement};
use crate::error::FlowResult;

use super::labels;
use super::model::{BranchLabel, DiagramEdge, DiagramNode, Flowchart, NodeId};
use super::sanitize::sanitize_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Prefix of generated node ids (`n0`, `n1`, ...).
    pub id_prefix: String,
    /// Give each `elseif` clause its own condition node.
    pub label_elseif_conditions: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            id_prefix: "n".to_string(),
            label_elseif_conditions: false,
        }
    }
}

pub struct FlowchartBuilder {
    options: BuildOptions,
    chart: Flowchart,
    next_id: usize,
}

impl FlowchartBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            chart: Flowchart::default(),
            next_id: 0,
        }
    }

    /// Traverse `root` with no parent and return the finished chart.
    pub fn build(mut self, root: &AstNode) -> FlowResult<Flowchart> {
        self.traverse(root, None)?;
        crate::debug_event!(
            "flowchart",
            "built",
            "{} nodes, {} edges",
            self.chart.nodes.len(),
            self.chart.edges.len()
        );
        Ok(self.chart)
    }

    /// Nodes and edges produced so far.
    pub fn chart(&self) -> &Flowchart {
        &self.chart
    }

    pub fn into_chart(self) -> Flowchart {
        self.chart
    }

    /// Allocate the next id and append a node labeled with the sanitized `text`.
    pub fn create_node(&mut self, text: impl Into<String>) -> NodeId {
        let text = text.into();
        let id = NodeId::new(&self.options.id_prefix, self.next_id);
        self.next_id += 1;
        tracing::trace!("[flowchart] node {id}: {text}");
        self.chart.nodes.push(DiagramNode {
            id: id.clone(),
            label: sanitize_label(&text),
            text,
        });
        id
    }

    fn link(&mut self, parent: Option<&NodeId>, child: &NodeId, branch: Option<BranchLabel>) {
        if let Some(parent) = parent {
            self.chart.edges.push(DiagramEdge {
                from: parent.clone(),
                to: child.clone(),
                branch,
            });
        }
    }

    fn attach(
        &mut self,
        text: String,
        parent: Option<&NodeId>,
        branch: Option<BranchLabel>,
    ) -> NodeId {
        let id = self.create_node(text);
        self.link(parent, &id, branch);
        id
    }

    /// Traverse `node` under `parent`.
    ///
    /// Returns the id of the node created for `node`, or `None` for kinds that
    /// create nothing themselves (`Chunk`, `Sequence`).
    pub fn traverse(
        &mut self,
        node: &AstNode,
        parent: Option<&NodeId>,
    ) -> FlowResult<Option<NodeId>> {
        self.visit(node, parent, None)
    }

    fn visit(
        &mut self,
        node: &AstNode,
        parent: Option<&NodeId>,
        branch: Option<BranchLabel>,
    ) -> FlowResult<Option<NodeId>> {
        let id = match node {
            AstNode::Chunk(chunk) => {
                self.visit_block(&chunk.body, parent, branch)?;
                return Ok(None);
            }
            AstNode::Sequence { items } => {
                self.visit_block(items, parent, branch)?;
                return Ok(None);
            }
            AstNode::If(stmt) => self.visit_if(stmt, parent, branch)?,
            AstNode::While(stmt) => {
                let id = self.attach(labels::while_label(stmt)?, parent, branch);
                self.visit_block(&stmt.body, Some(&id), None)?;
                id
            }
            AstNode::Repeat(stmt) => self.visit_repeat(stmt, parent, branch)?,
            AstNode::ForNumeric(stmt) => {
                let id = self.attach(labels::for_numeric_label(stmt)?, parent, branch);
                self.visit_block(&stmt.body, Some(&id), None)?;
                id
            }
            AstNode::ForGeneric(stmt) => {
                let id = self.attach(labels::for_generic_label(stmt)?, parent, branch);
                self.visit_block(&stmt.body, Some(&id), None)?;
                id
            }
            AstNode::Function(stmt) => {
                let id = self.attach(labels::function_label(stmt)?, parent, branch);
                self.visit_block(&stmt.body, Some(&id), None)?;
                id
            }
            AstNode::Return(stmt) => self.attach(labels::return_label(stmt)?, parent, branch),
            AstNode::Call(stmt) => self.attach(labels::call_label(stmt)?, parent, branch),
            AstNode::Assignment(stmt) => {
                self.attach(labels::assignment_label(stmt)?, parent, branch)
            }
            AstNode::Local(stmt) => self.attach(labels::local_label(stmt)?, parent, branch),
            AstNode::TableConstructor(expr) => {
                self.attach(labels::table_label(expr)?, parent, branch)
            }
            // Unknown kinds are a single placeholder; their children are opaque.
            AstNode::Other(other) => self.attach(other.kind.clone(), parent, branch),
        };
        Ok(Some(id))
    }

    fn visit_block(
        &mut self,
        body: &[AstNode],
        parent: Option<&NodeId>,
        branch: Option<BranchLabel>,
    ) -> FlowResult<()> {
        for statement in body {
            self.visit(statement, parent, branch)?;
        }
        Ok(())
    }

    fn visit_if(
        &mut self,
        stmt: &IfStatement,
        parent: Option<&NodeId>,
        branch: Option<BranchLabel>,
    ) -> FlowResult<NodeId> {
        let id = self.attach(labels::if_label(stmt)?, parent, branch);

        for (index, clause) in stmt.clauses.iter().enumerate() {
            let clause_branch = BranchLabel::for_clause(index);
            match &clause.condition {
                Some(condition)
                    if index > 0
                        && clause.kind == ClauseKind::ElseIf
                        && self.options.label_elseif_conditions =>
                {
                    let clause_id =
                        self.attach(labels::elseif_label(condition)?, Some(&id), clause_branch);
                    self.visit_block(&clause.body, Some(&clause_id), None)?;
                }
                _ => self.visit_block(&clause.body, Some(&id), clause_branch)?,
            }
        }

        Ok(id)
    }

    /// `repeat` node, then its body, then an `until` node after the body.
    fn visit_repeat(
        &mut self,
        stmt: &RepeatStatement,
        parent: Option<&NodeId>,
        branch: Option<BranchLabel>,
    ) -> FlowResult<NodeId> {
        // Validate before creating anything so a bad condition leaves no partial loop.
        let until = labels::until_label(stmt)?;
        let id = self.attach(labels::repeat_label(stmt), parent, branch);
        self.visit_block(&stmt.body, Some(&id), None)?;
        self.attach(until, Some(&id), None);
        Ok(id)
    }
}

/// Build a chart for `root` with the given options.
pub fn build_flowchart(root: &AstNode, options: BuildOptions) -> FlowResult<Flowchart> {
    FlowchartBuilder::new(options).build(root)
}
