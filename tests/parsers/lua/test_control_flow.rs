use luaflow::flowchart::{BranchLabel, BuildOptions, Flowchart, build_flowchart};
use luaflow::{AstNode, LuaParser};

fn chart_with(code: &str, options: BuildOptions) -> Flowchart {
    let mut parser = LuaParser::new().expect("Failed to create parser");
    let chunk = parser.parse(code).expect("Failed to parse");
    build_flowchart(&AstNode::from(chunk), options).expect("Failed to build flowchart")
}

fn build(code: &str) -> Flowchart {
    chart_with(code, BuildOptions::default())
}

fn texts(chart: &Flowchart) -> Vec<&str> {
    chart.nodes.iter().map(|n| n.text.as_str()).collect()
}

fn edges(chart: &Flowchart) -> Vec<(String, String, Option<BranchLabel>)> {
    chart
        .edges
        .iter()
        .map(|e| (e.from.to_string(), e.to.to_string(), e.branch))
        .collect()
}

#[test]
fn test_if_else_branches() {
    let chart = build("if x then return 1 else return 2 end");

    assert_eq!(texts(&chart), ["if x", "return 1", "return 2"]);
    assert_eq!(
        edges(&chart),
        [
            ("n0".to_string(), "n1".to_string(), None),
            ("n0".to_string(), "n2".to_string(), Some(BranchLabel::No)),
        ]
    );
}

#[test]
fn test_elseif_chain_labels_later_clauses_else() {
    let code = r#"
if a then
    print(1)
elseif b then
    print(2)
elseif c then
    print(3)
else
    print(4)
end
"#;
    let chart = build(code);

    // Only the first condition is drawn; later clauses hang off the same node.
    assert_eq!(
        texts(&chart),
        ["if a", "call print(1)", "call print(2)", "call print(3)", "call print(4)"]
    );
    let branches: Vec<_> = chart.edges.iter().map(|e| e.branch).collect();
    assert_eq!(
        branches,
        [
            None,
            Some(BranchLabel::No),
            Some(BranchLabel::Else),
            Some(BranchLabel::Else)
        ]
    );
    assert!(chart.edges.iter().all(|e| e.from.as_str() == "n0"));
}

#[test]
fn test_elseif_conditions_drawn_when_enabled() {
    let options = BuildOptions {
        label_elseif_conditions: true,
        ..Default::default()
    };
    let chart = chart_with("if a then f() elseif b then g() else h() end", options);

    assert_eq!(
        texts(&chart),
        ["if a", "call f()", "elseif b", "call g()", "call h()"]
    );
    assert_eq!(
        edges(&chart),
        [
            ("n0".to_string(), "n1".to_string(), None),
            ("n0".to_string(), "n2".to_string(), Some(BranchLabel::No)),
            ("n2".to_string(), "n3".to_string(), None),
            ("n0".to_string(), "n4".to_string(), Some(BranchLabel::Else)),
        ]
    );
}

#[test]
fn test_numeric_for_with_body() {
    let chart = build("for i = 1, 10 do local x = i end");

    assert_eq!(texts(&chart), ["for i = 1, 10", "local x = i"]);
    assert_eq!(edges(&chart), [("n0".to_string(), "n1".to_string(), None)]);
}

#[test]
fn test_numeric_for_with_step() {
    let chart = build("for i = 10, 1, -1 do end");
    assert_eq!(texts(&chart), ["for i = 10, 1, -1"]);
    assert!(chart.edges.is_empty());
}

#[test]
fn test_generic_for() {
    let chart = build("for k, v in pairs(t) do total = total + v end");
    assert_eq!(texts(&chart), ["for k, v in pairs(t)", "total = total + v"]);
    assert_eq!(chart.edges.len(), 1);
}

#[test]
fn test_while_loop_nests_body() {
    let chart = build("while n > 0 do n = n - 1 print(n) end");
    assert_eq!(texts(&chart), ["while n > 0", "n = n - 1", "call print(n)"]);
    assert_eq!(
        edges(&chart),
        [
            ("n0".to_string(), "n1".to_string(), None),
            ("n0".to_string(), "n2".to_string(), None),
        ]
    );
}

#[test]
fn test_repeat_until_follows_body() {
    let chart = build("repeat n = n - 1 until n == 0");

    assert_eq!(texts(&chart), ["repeat", "n = n - 1", "until n == 0"]);
    assert_eq!(
        edges(&chart),
        [
            ("n0".to_string(), "n1".to_string(), None),
            ("n0".to_string(), "n2".to_string(), None),
        ]
    );
}

#[test]
fn test_function_declaration_contains_body() {
    let code = r#"
local function clamp(v, lo, hi)
    if v < lo then
        return lo
    end
    return v
end
"#;
    let chart = build(code);

    assert_eq!(
        texts(&chart),
        ["function clamp(v, lo, hi)", "if v < lo", "return lo", "return v"]
    );
    assert_eq!(
        edges(&chart),
        [
            ("n0".to_string(), "n1".to_string(), None),
            ("n1".to_string(), "n2".to_string(), None),
            ("n0".to_string(), "n3".to_string(), None),
        ]
    );

    let function = &chart.nodes[0];
    assert_eq!(chart.outgoing(&function.id).count(), 2);
    assert_eq!(chart.incoming(&function.id).count(), 0);
}

#[test]
fn test_top_level_statements_have_no_edges() {
    let chart = build("local a = 1");
    assert_eq!(texts(&chart), ["local a = 1"]);
    assert!(chart.edges.is_empty());

    let chart = build("local a = 1\nb = 2\nprint(a, b)\n");
    assert_eq!(chart.nodes.len(), 3);
    assert!(chart.edges.is_empty());
}

#[test]
fn test_unmodelled_statement_is_single_node() {
    let chart = build("while true do break end");
    assert_eq!(texts(&chart), ["while true", "BreakStatement"]);
    assert_eq!(chart.edges.len(), 1);

    // `do` blocks are opaque: their contents are not drawn.
    let chart = build("do local hidden = 1 end");
    assert_eq!(texts(&chart), ["DoStatement"]);
}

#[test]
fn test_empty_source_yields_empty_chart() {
    assert!(build("").is_empty());
    assert!(build("-- nothing here\n;;\n").is_empty());
}
