use crate::ast::TokenKind;

/// Default fuzzy edit distance when `term~` carries no digit.
pub const DEFAULT_MAX_EDITS: u8 = 2;

/// Abstract Syntax Tree node representing a parsed search query.
///
/// The tree is a closed family: group variants own their children, so the
/// structure is acyclic by construction and a `Not` always has exactly one
/// child. Nodes are immutable once built; rewrites produce new trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    // Groups
    /// Top-level container, used when a parse produces zero or the builder
    /// produces several top-level terms
    ///
    /// # Example
    /// ```text
    /// ""  →  Root[]
    /// ```
    Root(Vec<Node>),

    /// N-ary conjunction; child order is preserved for display but carries
    /// no boolean meaning
    ///
    /// # Example
    /// ```text
    /// java AND spring  →  And[java, spring]
    /// ```
    And(Vec<Node>),

    /// N-ary disjunction
    ///
    /// # Example
    /// ```text
    /// java OR kotlin  →  Or[java, kotlin]
    /// ```
    Or(Vec<Node>),

    /// Negation of exactly one child
    ///
    /// # Example
    /// ```text
    /// NOT draft  →  Not(draft)
    /// -draft     →  Not(draft)
    /// ```
    Not(Box<Node>),

    // Leaves
    /// Plain term leaf retaining its originating lexical kind
    Token { kind: TokenKind, value: String },

    /// Exact-match phrase, quotes already stripped
    ///
    /// # Example
    /// ```text
    /// "hello world"  →  Phrase(hello world)
    /// ```
    Phrase(String),

    /// Field-scoped term
    ///
    /// # Example
    /// ```text
    /// title:rust  →  Field { name: title, value: rust }
    /// ```
    Field { name: String, value: String },

    /// Pattern containing `*` or `?`
    Wildcard(String),

    /// Fuzzy term; `max_edits` is always within `0..=2`
    ///
    /// # Example
    /// ```text
    /// roam~1  →  Fuzzy { term: roam, max_edits: 1 }
    /// ```
    Fuzzy { term: String, max_edits: u8 },

    /// Range with per-boundary inclusivity and an optional field scope
    ///
    /// # Example
    /// ```text
    /// [1 TO 10]  →  Range { start: 1, end: 10, include_start: true, include_end: true }
    /// {1 TO 10}  →  both boundaries exclusive
    /// ```
    Range {
        start: String,
        end: String,
        include_start: bool,
        include_end: bool,
        field: Option<String>,
    },
}

/// Variant discriminant, used for counting, lookup, and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    And,
    Or,
    Not,
    Token,
    Phrase,
    Field,
    Wildcard,
    Fuzzy,
    Range,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root(_) => NodeKind::Root,
            Node::And(_) => NodeKind::And,
            Node::Or(_) => NodeKind::Or,
            Node::Not(_) => NodeKind::Not,
            Node::Token { .. } => NodeKind::Token,
            Node::Phrase(_) => NodeKind::Phrase,
            Node::Field { .. } => NodeKind::Field,
            Node::Wildcard(_) => NodeKind::Wildcard,
            Node::Fuzzy { .. } => NodeKind::Fuzzy,
            Node::Range { .. } => NodeKind::Range,
        }
    }

    /// Rendered value of this node alone, ignoring children of groups.
    ///
    /// This string is the sort key for term sorting and half of the
    /// duplicate-detection key, so equal-looking leaves compare equal here
    /// even when their variants differ in other fields.
    pub fn value(&self) -> String {
        match self {
            Node::Root(_) => "root".to_string(),
            Node::And(_) => "AND".to_string(),
            Node::Or(_) => "OR".to_string(),
            Node::Not(_) => "NOT".to_string(),
            Node::Token { value, .. } => value.clone(),
            Node::Phrase(phrase) => phrase.clone(),
            Node::Field { name, value } => format!("{}:{}", name, value),
            Node::Wildcard(pattern) => pattern.clone(),
            Node::Fuzzy { term, max_edits } => format!("{}~{}", term, max_edits),
            Node::Range { start, end, include_start, include_end, field } => {
                let open = if *include_start { "[" } else { "{" };
                let close = if *include_end { "]" } else { "}" };
                match field {
                    Some(name) => format!("{}:{}{} TO {}{}", name, open, start, end, close),
                    None => format!("{}{} TO {}{}", open, start, end, close),
                }
            }
        }
    }

    /// Children of a group node; empty for leaves, one element for `Not`.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Root(children) | Node::And(children) | Node::Or(children) => children,
            Node::Not(child) => std::slice::from_ref(child),
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Root(_) | Node::And(_) | Node::Or(_) | Node::Not(_))
    }

    pub fn is_leaf(&self) -> bool {
        !self.is_group()
    }

    /// Pre-order depth-first traversal: the node itself, then its children.
    pub fn walk<F: FnMut(&Node)>(&self, mut f: F) {
        self.walk_inner(&mut f);
    }

    fn walk_inner<F: FnMut(&Node)>(&self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk_inner(f);
        }
    }

    /// Height of the subtree rooted here; a leaf (or empty group) counts 1.
    pub fn max_depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Node::max_depth)
            .max()
            .unwrap_or(0)
    }

    /// Total number of nodes in the subtree, this node included.
    pub fn count(&self) -> usize {
        let mut total = 0;
        self.walk(|_| total += 1);
        total
    }
}
