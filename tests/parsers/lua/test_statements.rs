use luaflow::flowchart::{BuildOptions, Flowchart, build_flowchart, sanitize_label};
use luaflow::{AstNode, FlowError, LuaParser};

const SAMPLE: &str = r#"
local M = {}
local count

function M.run(items, limit)
    local total = 0
    for i, item in ipairs(items) do
        if item.skip then
            goto continue
        elseif item.value > limit then
            return nil, "too big"
        else
            total = total + item.value
        end
        ::continue::
    end
    while total > 100 do
        total = total / 2
    end
    repeat
        total = total - 1
        log("step", total)
    until total <= 0
    return total
end

M.run({}, 10)
return M
"#;

fn build(code: &str) -> Flowchart {
    let mut parser = LuaParser::new().expect("Failed to create parser");
    let chunk = parser.parse(code).expect("Failed to parse");
    build_flowchart(&AstNode::from(chunk), BuildOptions::default()).expect("Failed to build")
}

#[test]
fn test_statement_labels() {
    let chart = build(SAMPLE);

    for expected in [
        "local M = {}",
        "local count",
        "function M.run(items, limit)",
        "local total = 0",
        "for i, item in ipairs(items)",
        "if item.skip",
        "GotoStatement",
        "return nil, \"too big\"",
        "total = total + item.value",
        "LabelStatement",
        "while total > 100",
        "repeat",
        "call log(\"step\", total)",
        "until total <= 0",
        "return total",
        "call M.run({}, 10)",
        "return M",
    ] {
        assert!(
            chart.find_by_text(expected).is_some(),
            "missing node {expected:?} in {:?}",
            chart.nodes.iter().map(|n| &n.text).collect::<Vec<_>>()
        );
    }
}

#[test]
fn test_no_dangling_edges() {
    let chart = build(SAMPLE);
    assert!(chart.dangling_edges().is_empty());
}

#[test]
fn test_every_node_has_at_most_one_incoming_edge() {
    let chart = build(SAMPLE);
    for node in &chart.nodes {
        let incoming = chart.incoming(&node.id).count();
        assert!(incoming <= 1, "{} has {incoming} incoming edges", node.id);
    }
}

#[test]
fn test_ids_are_unique_and_sequential() {
    let chart = build(SAMPLE);
    for (index, node) in chart.nodes.iter().enumerate() {
        assert_eq!(node.id.as_str(), format!("n{index}"));
    }
}

#[test]
fn test_labels_are_sanitized_text() {
    let chart = build(SAMPLE);
    for node in &chart.nodes {
        assert_eq!(node.label, sanitize_label(&node.text));
        assert_eq!(sanitize_label(&node.label), node.label);
        assert!(
            node.label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        );
    }
}

#[test]
fn test_builds_are_deterministic() {
    assert_eq!(build(SAMPLE), build(SAMPLE));
}

#[test]
fn test_syntax_error_is_parse_failure() {
    let mut parser = LuaParser::new().unwrap();
    let err = parser.parse("for i = 1 do\n").unwrap_err();
    assert!(matches!(err, FlowError::ParseFailure { .. }));
    assert_eq!(err.exit_code(), 3);
}
