//! Canonical re-serialization of an AST to query text.
//!
//! Fixed-rule rendering, not a byte-exact round trip: explicit operators,
//! parens around non-root boolean groups, quoted phrases, and bracket
//! choice recovered from range inclusivity.

use crate::ast::{DEFAULT_MAX_EDITS, Node, NodeVisitor, TokenKind};

/// Renders a node tree back to canonical surface syntax.
pub fn serialize(node: &Node) -> String {
    let mut serializer = Serializer { at_root: true };
    serializer.visit(node)
}

struct Serializer {
    /// True only while visiting the serialization root; boolean groups
    /// below it get parenthesized.
    at_root: bool,
}

impl NodeVisitor for Serializer {
    type Output = String;

    fn default_output(&mut self) -> String {
        String::new()
    }

    fn visit_root(&mut self, children: &[Node]) -> String {
        self.at_root = false;
        let parts: Vec<String> = children.iter().map(|child| self.visit(child)).collect();
        parts.join(" ")
    }

    fn visit_and(&mut self, children: &[Node]) -> String {
        let at_root = std::mem::replace(&mut self.at_root, false);
        let parts: Vec<String> = children.iter().map(|child| self.visit(child)).collect();
        let content = parts.join(" AND ");
        if at_root { content } else { format!("({content})") }
    }

    fn visit_or(&mut self, children: &[Node]) -> String {
        let at_root = std::mem::replace(&mut self.at_root, false);
        let parts: Vec<String> = children.iter().map(|child| self.visit(child)).collect();
        let content = parts.join(" OR ");
        if at_root { content } else { format!("({content})") }
    }

    fn visit_not(&mut self, child: &Node) -> String {
        self.at_root = false;
        let rendered = self.visit(child);
        if matches!(child, Node::Token { .. }) {
            format!("-{rendered}")
        } else {
            format!("NOT {rendered}")
        }
    }

    fn visit_token(&mut self, kind: TokenKind, value: &str) -> String {
        match kind {
            TokenKind::Exclude => format!("-{value}"),
            TokenKind::Required => format!("+{value}"),
            _ => value.to_string(),
        }
    }

    fn visit_phrase(&mut self, phrase: &str) -> String {
        format!("\"{phrase}\"")
    }

    fn visit_field(&mut self, name: &str, value: &str) -> String {
        if value.contains(' ') {
            format!("{name}:\"{value}\"")
        } else {
            format!("{name}:{value}")
        }
    }

    fn visit_wildcard(&mut self, pattern: &str) -> String {
        pattern.to_string()
    }

    fn visit_fuzzy(&mut self, term: &str, max_edits: u8) -> String {
        if max_edits == DEFAULT_MAX_EDITS {
            format!("{term}~")
        } else {
            format!("{term}~{max_edits}")
        }
    }

    fn visit_range(
        &mut self,
        start: &str,
        end: &str,
        include_start: bool,
        include_end: bool,
        field: Option<&str>,
    ) -> String {
        let open = if include_start { "[" } else { "{" };
        let close = if include_end { "]" } else { "}" };
        let range = format!("{open}{start} TO {end}{close}");
        match field {
            Some(name) => format!("{name}:{range}"),
            None => range,
        }
    }
}
