//! Lua parser implementation
//!
//! Uses tree-sitter-lua to parse source code, then lowers the concrete syntax
//! tree into the statement tree of [`crate::ast`]. Statement kinds without a
//! dedicated variant become [`AstNode::Other`] tagged with the PascalCase
//! form of the grammar kind (`break_statement` -> `BreakStatement`).

use tree_sitter::{Node, Parser};

use crate::ast::{
    AssignmentStatement, AstNode, CallStatement, Chunk, ClauseKind, Expression,
    ForGenericStatement, ForNumericStatement, FunctionDeclaration, IfClause, IfStatement,
    LocalStatement, OtherNode, RepeatStatement, ReturnStatement, WhileStatement,
};
use crate::error::{FlowError, FlowResult};
use crate::parsing::AstSource;

/// Deepest block nesting accepted before lowering gives up.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Lua language parser
pub struct LuaParser {
    parser: Parser,
    max_depth: usize,
}

impl LuaParser {
    /// Create a new Lua parser
    pub fn new() -> FlowResult<Self> {
        let mut parser = Parser::new();
        let lang = tree_sitter_lua::LANGUAGE;
        parser
            .set_language(&lang.into())
            .map_err(|e| FlowError::ParserSetup(format!("Failed to set Lua language: {e}")))?;

        Ok(Self {
            parser,
            max_depth: MAX_NESTING_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parse Lua source and lower it into a [`Chunk`].
    ///
    /// Any syntax error reported by tree-sitter fails the whole parse; no
    /// partial tree is returned.
    pub fn parse(&mut self, code: &str) -> FlowResult<Chunk> {
        let tree = self
            .parser
            .parse(code, None)
            .ok_or_else(|| FlowError::ParseFailure {
                line: 1,
                column: 1,
                snippet: "parser produced no tree".to_string(),
            })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, code));
        }

        let lowering = Lowering {
            code,
            max_depth: self.max_depth,
        };
        let body = lowering.statements(root, 0)?;
        crate::debug_event!("lua", "lowered", "{} top-level statements", body.len());
        Ok(Chunk { body })
    }
}

impl AstSource for LuaParser {
    fn parse(&mut self, code: &str) -> FlowResult<Chunk> {
        LuaParser::parse(self, code)
    }

    fn language(&self) -> &'static str {
        "lua"
    }
}

/// Locate the first ERROR or MISSING node and describe it.
fn syntax_error(root: Node, code: &str) -> FlowError {
    let Some(node) = first_error(root) else {
        return FlowError::ParseFailure {
            line: 1,
            column: 1,
            snippet: String::new(),
        };
    };

    let position = node.start_position();
    let snippet = if node.is_missing() {
        format!("missing '{}'", node.kind())
    } else {
        let text = code[node.byte_range()].lines().next().unwrap_or_default();
        let mut snippet: String = text.chars().take(40).collect();
        if snippet.len() < text.len() {
            snippet.push_str("...");
        }
        format!("unexpected '{snippet}'")
    };

    FlowError::ParseFailure {
        line: position.row + 1,
        column: position.column + 1,
        snippet,
    }
}

/// Pre-order search that only descends into subtrees containing an error.
fn first_error(root: Node) -> Option<Node> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

/// `do_statement` -> `DoStatement`
fn pascal_case(kind: &str) -> String {
    kind.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn named_children<'tree>(node: Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn child_of_kind<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|child| child.kind() == kind)
}

fn has_token(node: Node, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| child.kind() == token)
}

struct Lowering<'a> {
    code: &'a str,
    max_depth: usize,
}

impl Lowering<'_> {
    fn text(&self, node: Node) -> Expression {
        let range = node.byte_range();
        if node.is_missing() || range.is_empty() {
            return Expression::missing();
        }
        Expression::new(&self.code[range])
    }

    fn texts(&self, nodes: &[Node]) -> Vec<Expression> {
        nodes.iter().map(|node| self.text(*node)).collect()
    }

    /// Items of a `variable_list` / `expression_list` child of `node`.
    fn list(&self, node: Node, list_kind: &str) -> Vec<Expression> {
        match child_of_kind(node, list_kind) {
            Some(list) => {
                let items: Vec<_> = named_children(list)
                    .into_iter()
                    .filter(|item| item.kind() != "attribute")
                    .collect();
                self.texts(&items)
            }
            None => Vec::new(),
        }
    }

    fn field<'tree>(
        &self,
        node: Node<'tree>,
        name: &'static str,
        kind: &'static str,
    ) -> FlowResult<Node<'tree>> {
        node.child_by_field_name(name)
            .ok_or_else(|| FlowError::malformed(kind, name))
    }

    /// Body block of `node`: the named field if present, else the first `block` child.
    fn body(&self, node: Node, field: &str, depth: usize) -> FlowResult<Vec<AstNode>> {
        match node
            .child_by_field_name(field)
            .or_else(|| child_of_kind(node, "block"))
        {
            Some(block) => self.statements(block, depth + 1),
            None => Ok(Vec::new()),
        }
    }

    fn statements(&self, block: Node, depth: usize) -> FlowResult<Vec<AstNode>> {
        if depth > self.max_depth {
            return Err(FlowError::NestingTooDeep {
                limit: self.max_depth,
                line: block.start_position().row + 1,
            });
        }

        let mut statements = Vec::new();
        for child in named_children(block) {
            match child.kind() {
                "hash_bang_line" | "empty_statement" => {}
                _ => statements.push(self.statement(child, depth)?),
            }
        }
        Ok(statements)
    }

    fn statement(&self, node: Node, depth: usize) -> FlowResult<AstNode> {
        let lowered = match node.kind() {
            "if_statement" => self.if_statement(node, depth)?,
            "while_statement" => AstNode::While(WhileStatement {
                condition: self.text(self.field(node, "condition", "WhileStatement")?),
                body: self.body(node, "body", depth)?,
            }),
            "repeat_statement" => AstNode::Repeat(RepeatStatement {
                body: self.body(node, "body", depth)?,
                condition: self.text(self.field(node, "condition", "RepeatStatement")?),
            }),
            "for_statement" => self.for_statement(node, depth)?,
            "function_declaration" | "local_function_declaration" => {
                self.function_declaration(node, depth)?
            }
            "return_statement" => AstNode::Return(ReturnStatement {
                arguments: match child_of_kind(node, "expression_list") {
                    Some(_) => self.list(node, "expression_list"),
                    None => self.texts(&named_children(node)),
                },
            }),
            "function_call" => self.call(node)?,
            "assignment_statement" => AstNode::Assignment(AssignmentStatement {
                variables: self.list(node, "variable_list"),
                values: self.list(node, "expression_list"),
            }),
            "variable_declaration" => self.local(node),
            // Hidden supertypes show up as wrappers in some grammar versions.
            "declaration" | "statement" => match named_children(node).as_slice() {
                [inner] => self.statement(*inner, depth)?,
                _ => AstNode::other(pascal_case(node.kind())),
            },
            "do_statement" => AstNode::Other(OtherNode {
                kind: "DoStatement".to_string(),
                children: self.body(node, "body", depth)?,
            }),
            kind => AstNode::other(pascal_case(kind)),
        };
        Ok(lowered)
    }

    fn if_statement(&self, node: Node, depth: usize) -> FlowResult<AstNode> {
        let mut clauses = vec![IfClause {
            kind: ClauseKind::If,
            condition: Some(self.text(self.field(node, "condition", "IfStatement")?)),
            body: self.body(node, "consequence", depth)?,
        }];

        for child in named_children(node) {
            match child.kind() {
                "elseif_statement" => clauses.push(IfClause {
                    kind: ClauseKind::ElseIf,
                    condition: Some(self.text(self.field(child, "condition", "IfStatement")?)),
                    body: self.body(child, "consequence", depth)?,
                }),
                "else_statement" => clauses.push(IfClause {
                    kind: ClauseKind::Else,
                    condition: None,
                    body: self.body(child, "body", depth)?,
                }),
                _ => {}
            }
        }

        Ok(AstNode::If(IfStatement { clauses }))
    }

    fn for_statement(&self, node: Node, depth: usize) -> FlowResult<AstNode> {
        let clause = node
            .child_by_field_name("clause")
            .or_else(|| {
                named_children(node)
                    .into_iter()
                    .find(|child| child.kind().starts_with("for_"))
            })
            .ok_or_else(|| FlowError::malformed("ForStatement", "clause"))?;
        let body = self.body(node, "body", depth)?;

        match clause.kind() {
            "for_numeric_clause" => {
                const KIND: &str = "ForNumericStatement";
                Ok(AstNode::ForNumeric(ForNumericStatement {
                    variable: self.text(self.field(clause, "name", KIND)?),
                    start: self.text(self.field(clause, "start", KIND)?),
                    end: self.text(self.field(clause, "end", KIND)?),
                    step: clause.child_by_field_name("step").map(|n| self.text(n)),
                    body,
                }))
            }
            _ => Ok(AstNode::ForGeneric(ForGenericStatement {
                variables: self.list(clause, "variable_list"),
                iterators: self.list(clause, "expression_list"),
                body,
            })),
        }
    }

    fn function_declaration(&self, node: Node, depth: usize) -> FlowResult<AstNode> {
        let name = self.field(node, "name", "FunctionDeclaration")?;
        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| self.texts(&named_children(params)))
            .unwrap_or_default();

        Ok(AstNode::Function(FunctionDeclaration {
            name: self.text(name),
            parameters,
            is_local: node.kind() == "local_function_declaration" || has_token(node, "local"),
            body: self.body(node, "body", depth)?,
        }))
    }

    fn call(&self, node: Node) -> FlowResult<AstNode> {
        let callee = self.field(node, "name", "CallStatement")?;
        let arguments = match node.child_by_field_name("arguments") {
            // `f "str"` and `f { ... }` pass a single argument without parentheses.
            Some(args) if args.kind() == "arguments" => self.texts(&named_children(args)),
            Some(args) => vec![self.text(args)],
            None => Vec::new(),
        };

        Ok(AstNode::Call(CallStatement {
            callee: self.text(callee),
            arguments,
        }))
    }

    fn local(&self, node: Node) -> AstNode {
        let statement = match child_of_kind(node, "assignment_statement") {
            Some(assignment) => LocalStatement {
                variables: self.list(assignment, "variable_list"),
                values: self.list(assignment, "expression_list"),
            },
            None => LocalStatement {
                variables: self.list(node, "variable_list"),
                values: Vec::new(),
            },
        };
        AstNode::Local(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str) -> Chunk {
        let mut parser = LuaParser::new().unwrap();
        parser.parse(code).unwrap()
    }

    fn source(expr: &Expression) -> &str {
        expr.source().unwrap()
    }

    #[test]
    fn test_parse_empty_source() {
        assert!(parse("").body.is_empty());
        assert!(parse("-- only a comment\n").body.is_empty());
    }

    #[test]
    fn test_parse_local_variable() {
        let chunk = parse("local a, b = 1, \"two\"\nlocal c\n");
        assert_eq!(chunk.body.len(), 2);

        let AstNode::Local(first) = &chunk.body[0] else {
            panic!("expected LocalStatement, got {:?}", chunk.body[0]);
        };
        let names: Vec<_> = first.variables.iter().map(source).collect();
        let values: Vec<_> = first.values.iter().map(source).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(values, ["1", "\"two\""]);

        let AstNode::Local(second) = &chunk.body[1] else {
            panic!("expected LocalStatement");
        };
        assert_eq!(second.variables.len(), 1);
        assert!(second.values.is_empty());
    }

    #[test]
    fn test_parse_if_with_elseif_and_else() {
        let chunk = parse(
            r#"
if x > 1 then
    print("big")
elseif x < 0 then
    print("negative")
else
    return 0
end
"#,
        );
        let AstNode::If(stmt) = &chunk.body[0] else {
            panic!("expected IfStatement");
        };
        let kinds: Vec<_> = stmt.clauses.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [ClauseKind::If, ClauseKind::ElseIf, ClauseKind::Else]);
        assert_eq!(source(stmt.clauses[0].condition.as_ref().unwrap()), "x > 1");
        assert_eq!(source(stmt.clauses[1].condition.as_ref().unwrap()), "x < 0");
        assert!(stmt.clauses[2].condition.is_none());
        assert!(matches!(stmt.clauses[2].body[0], AstNode::Return(_)));
    }

    #[test]
    fn test_parse_loops() {
        let chunk = parse(
            r#"
for i = 1, 10, 2 do end
for k, v in pairs(t) do print(k) end
while running do step() end
repeat n = n - 1 until n == 0
"#,
        );
        assert_eq!(chunk.body.len(), 4);

        let AstNode::ForNumeric(numeric) = &chunk.body[0] else {
            panic!("expected ForNumericStatement");
        };
        assert_eq!(source(&numeric.variable), "i");
        assert_eq!(source(&numeric.start), "1");
        assert_eq!(source(&numeric.end), "10");
        assert_eq!(numeric.step.as_ref().map(source), Some("2"));
        assert!(numeric.body.is_empty());

        let AstNode::ForGeneric(generic) = &chunk.body[1] else {
            panic!("expected ForGenericStatement");
        };
        let vars: Vec<_> = generic.variables.iter().map(source).collect();
        assert_eq!(vars, ["k", "v"]);
        assert_eq!(source(&generic.iterators[0]), "pairs(t)");
        assert_eq!(generic.body.len(), 1);

        let AstNode::While(while_stmt) = &chunk.body[2] else {
            panic!("expected WhileStatement");
        };
        assert_eq!(source(&while_stmt.condition), "running");

        let AstNode::Repeat(repeat) = &chunk.body[3] else {
            panic!("expected RepeatStatement");
        };
        assert_eq!(source(&repeat.condition), "n == 0");
        assert!(matches!(repeat.body[0], AstNode::Assignment(_)));
    }

    #[test]
    fn test_parse_functions() {
        let chunk = parse(
            r#"
function M.greet(name, ...)
    return "hi " .. name
end

local function helper()
end

function Class:method() end
"#,
        );
        let AstNode::Function(greet) = &chunk.body[0] else {
            panic!("expected FunctionDeclaration");
        };
        assert_eq!(source(&greet.name), "M.greet");
        let params: Vec<_> = greet.parameters.iter().map(source).collect();
        assert_eq!(params, ["name", "..."]);
        assert!(!greet.is_local);
        assert_eq!(greet.body.len(), 1);

        let AstNode::Function(helper) = &chunk.body[1] else {
            panic!("expected FunctionDeclaration");
        };
        assert_eq!(source(&helper.name), "helper");
        assert!(helper.is_local);
        assert!(helper.parameters.is_empty());

        let AstNode::Function(method) = &chunk.body[2] else {
            panic!("expected FunctionDeclaration");
        };
        assert_eq!(source(&method.name), "Class:method");
    }

    #[test]
    fn test_parse_calls() {
        let chunk = parse("print(a, b)\nobj:update(dt)\nrequire \"mod\"\n");
        let calls: Vec<_> = chunk
            .body
            .iter()
            .map(|node| match node {
                AstNode::Call(call) => (
                    source(&call.callee).to_string(),
                    call.arguments.iter().map(|a| source(a).to_string()).collect::<Vec<_>>(),
                ),
                other => panic!("expected CallStatement, got {other:?}"),
            })
            .collect();
        assert_eq!(calls[0], ("print".to_string(), vec!["a".to_string(), "b".to_string()]));
        assert_eq!(calls[1], ("obj:update".to_string(), vec!["dt".to_string()]));
        assert_eq!(calls[2], ("require".to_string(), vec!["\"mod\"".to_string()]));
    }

    #[test]
    fn test_unmodelled_statements_become_other() {
        let chunk = parse("while true do break end\ndo local x = 1 end\ngoto done\n::done::\n");
        let AstNode::While(while_stmt) = &chunk.body[0] else {
            panic!("expected WhileStatement");
        };
        assert_eq!(while_stmt.body[0].kind_name(), "BreakStatement");

        let AstNode::Other(do_block) = &chunk.body[1] else {
            panic!("expected DoStatement placeholder");
        };
        assert_eq!(do_block.kind, "DoStatement");
        assert_eq!(do_block.children.len(), 1);

        assert_eq!(chunk.body[2].kind_name(), "GotoStatement");
        assert_eq!(chunk.body[3].kind_name(), "LabelStatement");
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let mut parser = LuaParser::new().unwrap();
        let err = parser.parse("local x = 1\nif then\n").unwrap_err();
        match err {
            FlowError::ParseFailure { line, .. } => assert!(line >= 2, "line was {line}"),
            other => panic!("expected ParseFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_syntax_error_inside_deep_expression() {
        let depth = 50_000;
        // One closing parenthesis short.
        let code = format!("x = {}1{}\n", "(".repeat(depth), ")".repeat(depth - 1));

        let mut parser = LuaParser::new().unwrap();
        assert!(matches!(
            parser.parse(&code),
            Err(FlowError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let mut code = String::new();
        for _ in 0..5 {
            code.push_str("while x do\n");
        }
        for _ in 0..5 {
            code.push_str("end\n");
        }

        let mut shallow = LuaParser::new().unwrap().with_max_depth(3);
        assert!(matches!(
            shallow.parse(&code),
            Err(FlowError::NestingTooDeep { limit: 3, .. })
        ));

        let mut deep_enough = LuaParser::new().unwrap();
        assert!(deep_enough.parse(&code).is_ok());
    }

    #[test]
    fn test_parse_file_through_ast_source() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("m.lua");
        std::fs::write(&path, "return 1\n").unwrap();

        let mut parser = LuaParser::new().unwrap();
        let source: &mut dyn AstSource = &mut parser;
        assert_eq!(source.language(), "lua");

        let chunk = source.parse_file(&path).unwrap();
        assert!(matches!(chunk.body[0], AstNode::Return(_)));

        let missing = source.parse_file(&temp_dir.path().join("absent.lua"));
        assert!(matches!(missing, Err(FlowError::Io { .. })));
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("break_statement"), "BreakStatement");
        assert_eq!(pascal_case("do_statement"), "DoStatement");
        assert_eq!(pascal_case("chunk"), "Chunk");
    }
}
