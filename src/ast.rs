//! Lua statement tree consumed by the flowchart builder.
//!
//! The tree is a closed set of statement kinds, one variant per construct the
//! flowchart understands, plus [`AstNode::Other`] for everything else. Every
//! expression or identifier that ends up in a label is an [`Expression`]
//! holding its original source text.

use serde::Serialize;

/// Source text of an expression, identifier or parameter.
///
/// `source` is `None` when the producer could not recover the text (for
/// example a zero-width node inserted by error recovery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expression {
    pub source: Option<String>,
}

impl Expression {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
        }
    }

    pub fn missing() -> Self {
        Self { source: None }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl From<&str> for Expression {
    fn from(source: &str) -> Self {
        Expression::new(source)
    }
}

/// Root of a parsed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Chunk {
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseKind {
    If,
    ElseIf,
    Else,
}

/// One branch of an `if` statement. `condition` is `None` for `else`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfClause {
    pub kind: ClauseKind,
    pub condition: Option<Expression>,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStatement {
    pub clauses: Vec<IfClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepeatStatement {
    pub body: Vec<AstNode>,
    pub condition: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForNumericStatement {
    pub variable: Expression,
    pub start: Expression,
    pub end: Expression,
    pub step: Option<Expression>,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForGenericStatement {
    pub variables: Vec<Expression>,
    pub iterators: Vec<Expression>,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub name: Expression,
    pub parameters: Vec<Expression>,
    pub is_local: bool,
    pub body: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStatement {
    pub callee: Expression,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentStatement {
    pub variables: Vec<Expression>,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalStatement {
    pub variables: Vec<Expression>,
    pub values: Vec<Expression>,
}

/// A table field. Positional fields (`{ 1, 2 }`) have no key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableField {
    pub key: Option<Expression>,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableConstructorExpression {
    pub fields: Vec<TableField>,
}

/// A node of a kind the flowchart does not model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtherNode {
    pub kind: String,
    pub children: Vec<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AstNode {
    Chunk(Chunk),
    #[serde(rename = "IfStatement")]
    If(IfStatement),
    #[serde(rename = "WhileStatement")]
    While(WhileStatement),
    #[serde(rename = "RepeatStatement")]
    Repeat(RepeatStatement),
    #[serde(rename = "ForNumericStatement")]
    ForNumeric(ForNumericStatement),
    #[serde(rename = "ForGenericStatement")]
    ForGeneric(ForGenericStatement),
    #[serde(rename = "FunctionDeclaration")]
    Function(FunctionDeclaration),
    #[serde(rename = "ReturnStatement")]
    Return(ReturnStatement),
    #[serde(rename = "CallStatement")]
    Call(CallStatement),
    #[serde(rename = "AssignmentStatement")]
    Assignment(AssignmentStatement),
    #[serde(rename = "LocalStatement")]
    Local(LocalStatement),
    #[serde(rename = "TableConstructorExpression")]
    TableConstructor(TableConstructorExpression),
    Sequence { items: Vec<AstNode> },
    Other(OtherNode),
}

impl AstNode {
    /// Tag name of this node, as used in labels and reports.
    pub fn kind_name(&self) -> &str {
        match self {
            AstNode::Chunk(_) => "Chunk",
            AstNode::If(_) => "IfStatement",
            AstNode::While(_) => "WhileStatement",
            AstNode::Repeat(_) => "RepeatStatement",
            AstNode::ForNumeric(_) => "ForNumericStatement",
            AstNode::ForGeneric(_) => "ForGenericStatement",
            AstNode::Function(_) => "FunctionDeclaration",
            AstNode::Return(_) => "ReturnStatement",
            AstNode::Call(_) => "CallStatement",
            AstNode::Assignment(_) => "AssignmentStatement",
            AstNode::Local(_) => "LocalStatement",
            AstNode::TableConstructor(_) => "TableConstructorExpression",
            AstNode::Sequence { .. } => "Sequence",
            AstNode::Other(other) => &other.kind,
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        AstNode::Other(OtherNode {
            kind: kind.into(),
            children: Vec::new(),
        })
    }

    /// Direct statement children, in source order.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            AstNode::Chunk(chunk) => chunk.body.iter().collect(),
            AstNode::If(stmt) => stmt.clauses.iter().flat_map(|c| c.body.iter()).collect(),
            AstNode::While(stmt) => stmt.body.iter().collect(),
            AstNode::Repeat(stmt) => stmt.body.iter().collect(),
            AstNode::ForNumeric(stmt) => stmt.body.iter().collect(),
            AstNode::ForGeneric(stmt) => stmt.body.iter().collect(),
            AstNode::Function(stmt) => stmt.body.iter().collect(),
            AstNode::Sequence { items } => items.iter().collect(),
            AstNode::Other(other) => other.children.iter().collect(),
            AstNode::Return(_)
            | AstNode::Call(_)
            | AstNode::Assignment(_)
            | AstNode::Local(_)
            | AstNode::TableConstructor(_) => Vec::new(),
        }
    }
}

impl From<Chunk> for AstNode {
    fn from(chunk: Chunk) -> Self {
        AstNode::Chunk(chunk)
    }
}
