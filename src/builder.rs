//! Fluent programmatic query construction.

use crate::{
    ast::{DEFAULT_MAX_EDITS, Node, TokenKind},
    query::Query,
    serializer::serialize,
};

enum OpenGroup {
    And,
    Or,
    Not,
}

/// Builds a [`Query`] without going through the parser.
///
/// Terms added between a group opener ([`and`](QueryBuilder::and),
/// [`or`](QueryBuilder::or), [`not`](QueryBuilder::not)) and
/// [`end_group`](QueryBuilder::end_group) land in that group; groups nest.
/// The built query's original text is the canonical serialization of the
/// tree.
///
/// # Examples
/// ```
/// use search_query::QueryBuilder;
///
/// let query = QueryBuilder::new()
///     .or()
///     .keyword("java")
///     .keyword("kotlin")
///     .end_group()
///     .phrase("web framework")
///     .exclude("legacy")
///     .build();
/// assert_eq!(query.to_string(), "(java OR kotlin) AND \"web framework\" AND -legacy");
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    terms: Vec<Node>,
    open: Vec<(OpenGroup, Vec<Node>)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        QueryBuilder::default()
    }

    pub fn keyword(self, value: impl Into<String>) -> Self {
        self.push(Node::Token {
            kind: TokenKind::Keyword,
            value: value.into(),
        })
    }

    pub fn keywords<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for term in terms {
            self = self.keyword(term);
        }
        self
    }

    pub fn phrase(self, phrase: impl Into<String>) -> Self {
        self.push(Node::Phrase(phrase.into()))
    }

    pub fn field(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(Node::Field {
            name: name.into(),
            value: value.into(),
        })
    }

    pub fn wildcard(self, pattern: impl Into<String>) -> Self {
        self.push(Node::Wildcard(pattern.into()))
    }

    /// Fuzzy term with the default edit distance.
    pub fn fuzzy(self, term: impl Into<String>) -> Self {
        self.fuzzy_with_edits(term, DEFAULT_MAX_EDITS)
    }

    /// Fuzzy term with an explicit edit distance, clamped to the maximum
    /// of 2.
    pub fn fuzzy_with_edits(self, term: impl Into<String>, max_edits: u8) -> Self {
        self.push(Node::Fuzzy {
            term: term.into(),
            max_edits: max_edits.min(DEFAULT_MAX_EDITS),
        })
    }

    /// Range with both boundaries inclusive.
    pub fn range(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.push(Node::Range {
            start: start.into(),
            end: end.into(),
            include_start: true,
            include_end: true,
            field: None,
        })
    }

    /// Range with both boundaries exclusive.
    pub fn range_exclusive(self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.push(Node::Range {
            start: start.into(),
            end: end.into(),
            include_start: false,
            include_end: false,
            field: None,
        })
    }

    /// Field-scoped inclusive range.
    pub fn field_range(
        self,
        field: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.push(Node::Range {
            start: start.into(),
            end: end.into(),
            include_start: true,
            include_end: true,
            field: Some(field.into()),
        })
    }

    pub fn exclude(self, term: impl Into<String>) -> Self {
        self.push(Node::Not(Box::new(Node::Token {
            kind: TokenKind::Keyword,
            value: term.into(),
        })))
    }

    pub fn and(mut self) -> Self {
        self.open.push((OpenGroup::And, Vec::new()));
        self
    }

    pub fn or(mut self) -> Self {
        self.open.push((OpenGroup::Or, Vec::new()));
        self
    }

    pub fn not(mut self) -> Self {
        self.open.push((OpenGroup::Not, Vec::new()));
        self
    }

    /// Closes the innermost open group.
    ///
    /// An empty group adds nothing. A `not` group over several terms wraps
    /// them in an `And` first, since negation takes exactly one child.
    pub fn end_group(mut self) -> Self {
        let Some((kind, mut children)) = self.open.pop() else {
            return self;
        };
        if children.is_empty() {
            return self;
        }
        let node = match kind {
            OpenGroup::And => Node::And(children),
            OpenGroup::Or => Node::Or(children),
            OpenGroup::Not => {
                let inner = if children.len() == 1 {
                    children.swap_remove(0)
                } else {
                    Node::And(children)
                };
                Node::Not(Box::new(inner))
            }
        };
        self.push(node)
    }

    /// Builds the query. Unclosed groups are closed implicitly; multiple
    /// top-level terms combine under `And`, mirroring the parser's default.
    pub fn build(mut self) -> Query {
        while !self.open.is_empty() {
            self = self.end_group();
        }
        let mut terms = self.terms;
        let root = match terms.len() {
            0 => Node::Root(Vec::new()),
            1 => terms.swap_remove(0),
            _ => Node::And(terms),
        };
        let original = serialize(&root);
        Query::new(original, root)
    }

    fn push(mut self, node: Node) -> Self {
        match self.open.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.terms.push(node),
        }
        self
    }
}
