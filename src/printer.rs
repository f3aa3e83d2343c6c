//! Indented multi-line AST rendering for debugging and logging.

use crate::{ast::Node, query::Query};

/// Renders a query header plus its full AST.
///
/// ```text
/// Query: java AND spring
/// AST:
/// └─ And (2 children)
///   └─ Token[Keyword]: "java"
///   └─ Token[Keyword]: "spring"
/// ```
pub fn to_pretty_string(query: &Query) -> String {
    let mut out = format!("Query: {}\nAST:\n", query.original_query());
    print_node(query.root(), &mut out, 0);
    out
}

/// Renders a bare subtree without the query header.
pub fn node_to_pretty_string(node: &Node) -> String {
    let mut out = String::new();
    print_node(node, &mut out, 0);
    out
}

fn print_node(node: &Node, out: &mut String, level: usize) {
    let indent = "  ".repeat(level);
    match node {
        Node::Token { kind, value } => {
            out.push_str(&format!("{indent}└─ Token[{kind:?}]: \"{value}\"\n"));
        }
        Node::Field { name, value } => {
            out.push_str(&format!("{indent}└─ Field: {name}=\"{value}\"\n"));
        }
        Node::Fuzzy { term, max_edits } => {
            out.push_str(&format!("{indent}└─ Fuzzy: \"{term}\" ~{max_edits}\n"));
        }
        Node::Range { .. } => {
            out.push_str(&format!("{indent}└─ Range: {}\n", node.value()));
        }
        group if group.is_group() => {
            out.push_str(&format!(
                "{indent}└─ {:?} ({} children)\n",
                node.kind(),
                node.children().len()
            ));
            for child in node.children() {
                print_node(child, out, level + 1);
            }
        }
        leaf => {
            out.push_str(&format!("{indent}└─ {:?}: \"{}\"\n", leaf.kind(), leaf.value()));
        }
    }
}
