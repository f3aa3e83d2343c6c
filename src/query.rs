use crate::{
    ast::{Node, NodeKind, NodeVisitor, Token, TokenKind},
    serializer::serialize,
    transform,
};
use std::collections::HashMap;
use std::fmt;

/// Counts captured at parse time, carried unchanged through transforms.
///
/// `original_tokens` is the full lexer output (whitespace and EOF
/// included); the validator's allow-list pass reads it to catch tokens the
/// parser consumed without leaving an AST trace. Queries built
/// programmatically carry an empty stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryMetadata {
    pub token_count: usize,
    pub node_count: usize,
    pub max_depth: usize,
    pub original_tokens: Vec<Token>,
}

/// A parsed search query: original text, AST root, and parse metadata.
///
/// Immutable after construction. Rewrites go through
/// [`transform`](Query::transform), which pairs the same original text and
/// metadata with a new root.
///
/// # Examples
/// ```
/// use search_query::Parser;
///
/// let query = Parser::new().parse("hello -world").unwrap();
/// assert_eq!(query.extract_keywords(), vec!["hello"]);
/// assert_eq!(query.extract_exclusions(), vec!["world"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    original: String,
    root: Node,
    metadata: QueryMetadata,
}

impl Query {
    /// Wraps an already-built tree, deriving counts from it. The token
    /// stream stays empty since no lexing took place.
    pub fn new(original: impl Into<String>, root: Node) -> Self {
        let metadata = QueryMetadata {
            token_count: 0,
            node_count: root.count(),
            max_depth: root.max_depth(),
            original_tokens: Vec::new(),
        };
        Query {
            original: original.into(),
            root,
            metadata,
        }
    }

    pub(crate) fn from_parts(original: String, root: Node, metadata: QueryMetadata) -> Self {
        Query { original, root, metadata }
    }

    pub fn original_query(&self) -> &str {
        &self.original
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn metadata(&self) -> &QueryMetadata {
        &self.metadata
    }

    /// Dispatches a visitor over the root node.
    pub fn accept<V: NodeVisitor>(&self, visitor: &mut V) -> V::Output {
        visitor.visit(&self.root)
    }

    /// Pre-order depth-first traversal over every node.
    pub fn walk<F: FnMut(&Node)>(&self, f: F) {
        self.root.walk(f);
    }

    /// Applies a pure tree rewrite, keeping the original text and metadata
    /// with the new root.
    pub fn transform(&self, f: impl Fn(&Node) -> Node) -> Query {
        Query {
            original: self.original.clone(),
            root: f(&self.root),
            metadata: self.metadata.clone(),
        }
    }

    /// Applies the default normalizer pipeline.
    pub fn normalize(&self) -> Query {
        self.transform(transform::normalize)
    }

    /// Applies the default optimizer pipeline.
    pub fn optimize(&self) -> Query {
        self.transform(transform::optimize)
    }

    /// Extracts leaf terms matching a token kind, honoring polarity: most
    /// kinds only match outside a `NOT`, while `Exclude` collects the
    /// keyword and phrase values found inside one.
    pub fn extract_tokens(&self, kind: TokenKind) -> Vec<Token> {
        let mut tokens = Vec::new();
        collect_tokens(&self.root, kind, false, &mut tokens);
        tokens
    }

    pub fn extract_keywords(&self) -> Vec<String> {
        values(self.extract_tokens(TokenKind::Keyword))
    }

    pub fn extract_phrases(&self) -> Vec<String> {
        values(self.extract_tokens(TokenKind::Phrase))
    }

    pub fn extract_exclusions(&self) -> Vec<String> {
        values(self.extract_tokens(TokenKind::Exclude))
    }

    pub fn extract_wildcards(&self) -> Vec<String> {
        values(self.extract_tokens(TokenKind::Wildcard))
    }

    /// Field name to values, in tree order per field.
    pub fn extract_fields(&self) -> HashMap<String, Vec<String>> {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        self.root.walk(|node| {
            if let Node::Field { name, value } = node {
                fields.entry(name.clone()).or_default().push(value.clone());
            }
        });
        fields
    }

    pub fn has_exclusions(&self) -> bool {
        !self.extract_exclusions().is_empty()
    }

    /// True when the tree carries no searchable content at all.
    pub fn is_empty(&self) -> bool {
        let mut has_content = false;
        self.root.walk(|node| match node {
            Node::Token { kind, .. } => {
                if kind.is_content() || *kind == TokenKind::Exclude {
                    has_content = true;
                }
            }
            Node::Phrase(_)
            | Node::Field { .. }
            | Node::Wildcard(_)
            | Node::Fuzzy { .. }
            | Node::Range { .. }
            | Node::Not(_) => has_content = true,
            _ => {}
        });
        !has_content
    }

    pub fn count_nodes(&self, kind: NodeKind) -> usize {
        let mut count = 0;
        self.root.walk(|node| {
            if node.kind() == kind {
                count += 1;
            }
        });
        count
    }

    pub fn find_nodes(&self, kind: NodeKind) -> Vec<&Node> {
        let mut nodes = Vec::new();
        find(&self.root, kind, &mut nodes);
        nodes
    }
}

impl fmt::Display for Query {
    /// Canonical serialization, not the original input text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", serialize(&self.root))
    }
}

fn values(tokens: Vec<Token>) -> Vec<String> {
    tokens.into_iter().map(|token| token.value).collect()
}

fn find<'a>(node: &'a Node, kind: NodeKind, out: &mut Vec<&'a Node>) {
    if node.kind() == kind {
        out.push(node);
    }
    for child in node.children() {
        find(child, kind, out);
    }
}

fn collect_tokens(node: &Node, kind: TokenKind, inside_not: bool, out: &mut Vec<Token>) {
    match node {
        Node::Not(child) => collect_tokens(child, kind, true, out),
        leaf if leaf.is_leaf() => match kind {
            TokenKind::Keyword => {
                if !inside_not {
                    if let Node::Token { kind: TokenKind::Keyword, value } = leaf {
                        out.push(Token::new(TokenKind::Keyword, value.clone()));
                    }
                }
            }
            TokenKind::Phrase => {
                if !inside_not {
                    if let Node::Phrase(phrase) = leaf {
                        out.push(Token::new(TokenKind::Phrase, phrase.clone()));
                    }
                }
            }
            TokenKind::Exclude => {
                if inside_not {
                    match leaf {
                        Node::Token { value, .. } => {
                            out.push(Token::new(TokenKind::Exclude, value.clone()));
                        }
                        Node::Phrase(phrase) => {
                            out.push(Token::new(TokenKind::Exclude, phrase.clone()));
                        }
                        _ => {}
                    }
                }
            }
            TokenKind::Wildcard => {
                if !inside_not {
                    if let Node::Wildcard(pattern) = leaf {
                        out.push(Token::new(TokenKind::Wildcard, pattern.clone()));
                    }
                }
            }
            other => {
                if !inside_not {
                    if let Node::Token { kind, value } = leaf {
                        if *kind == other {
                            out.push(Token::new(*kind, value.clone()));
                        }
                    }
                }
            }
        },
        group => {
            for child in group.children() {
                collect_tokens(child, kind, inside_not, out);
            }
        }
    }
}
