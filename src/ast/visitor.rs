use crate::ast::{Node, TokenKind};

/// Generic dispatch over the node family.
///
/// `visit` matches once on the variant and delegates to one method per
/// variant. Group methods default to recursing through children and leaf
/// methods to [`default_output`](NodeVisitor::default_output), so an
/// implementation overrides only the variants it cares about.
pub trait NodeVisitor {
    type Output;

    /// Value produced by the unoverridden per-variant methods.
    fn default_output(&mut self) -> Self::Output;

    fn visit(&mut self, node: &Node) -> Self::Output {
        match node {
            Node::Root(children) => self.visit_root(children),
            Node::And(children) => self.visit_and(children),
            Node::Or(children) => self.visit_or(children),
            Node::Not(child) => self.visit_not(child),
            Node::Token { kind, value } => self.visit_token(*kind, value),
            Node::Phrase(phrase) => self.visit_phrase(phrase),
            Node::Field { name, value } => self.visit_field(name, value),
            Node::Wildcard(pattern) => self.visit_wildcard(pattern),
            Node::Fuzzy { term, max_edits } => self.visit_fuzzy(term, *max_edits),
            Node::Range { start, end, include_start, include_end, field } => self
                .visit_range(start, end, *include_start, *include_end, field.as_deref()),
        }
    }

    fn visit_root(&mut self, children: &[Node]) -> Self::Output {
        for child in children {
            self.visit(child);
        }
        self.default_output()
    }

    fn visit_and(&mut self, children: &[Node]) -> Self::Output {
        for child in children {
            self.visit(child);
        }
        self.default_output()
    }

    fn visit_or(&mut self, children: &[Node]) -> Self::Output {
        for child in children {
            self.visit(child);
        }
        self.default_output()
    }

    fn visit_not(&mut self, child: &Node) -> Self::Output {
        self.visit(child);
        self.default_output()
    }

    fn visit_token(&mut self, _kind: TokenKind, _value: &str) -> Self::Output {
        self.default_output()
    }

    fn visit_phrase(&mut self, _phrase: &str) -> Self::Output {
        self.default_output()
    }

    fn visit_field(&mut self, _name: &str, _value: &str) -> Self::Output {
        self.default_output()
    }

    fn visit_wildcard(&mut self, _pattern: &str) -> Self::Output {
        self.default_output()
    }

    fn visit_fuzzy(&mut self, _term: &str, _max_edits: u8) -> Self::Output {
        self.default_output()
    }

    fn visit_range(
        &mut self,
        _start: &str,
        _end: &str,
        _include_start: bool,
        _include_end: bool,
        _field: Option<&str>,
    ) -> Self::Output {
        self.default_output()
    }
}
