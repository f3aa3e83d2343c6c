use crate::{
    ast::{DEFAULT_MAX_EDITS, Node, Token, TokenKind},
    lexer::{Lexer, Tokenizer},
    query::{Query, QueryMetadata},
    validator::{self, QueryValidationError},
};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Custom handler for a field's raw value, registered per field name.
pub type FieldParser = dyn Fn(&str) -> Node + Send + Sync;

/// Boolean operator applied between adjacent terms that carry no explicit
/// AND/OR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolOp {
    #[default]
    And,
    Or,
}

/// Plain-data parser configuration.
///
/// Immutable once the parser is built; every parse call reads the same
/// options, so one configured parser can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub default_operator: BoolOp,
    pub validate_after_parse: bool,
    pub fail_on_validation_error: bool,
    pub allowed_kinds: HashSet<TokenKind>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            default_operator: BoolOp::And,
            validate_after_parse: false,
            fail_on_validation_error: false,
            allowed_kinds: TokenKind::ALL.into_iter().collect(),
        }
    }
}

/// Error raised by [`Parser::parse`] for structurally unparseable input.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{}", syntax_message(.message, .position, .found))]
    Syntax {
        message: String,
        /// Index into the token stream where parsing stopped.
        position: usize,
        /// The offending token, when one was present.
        found: Option<Token>,
    },

    #[error(transparent)]
    Validation(#[from] QueryValidationError),
}

fn syntax_message(message: &str, position: &usize, found: &Option<Token>) -> String {
    match found {
        Some(token) => format!(
            "{message} at position {position}, found {:?}({})",
            token.kind, token.value
        ),
        None => format!("{message} at position {position}"),
    }
}

/// Recursive-descent parser turning query text into a [`Query`].
///
/// Precedence, loosest to tightest: `OR > AND > NOT > term`. Runs of the
/// same explicit operator flatten into one N-ary node, and adjacent terms
/// without an operator combine under the configured default operator.
///
/// The parser holds only immutable configuration; the scan cursor lives in
/// a per-call structure, so a configured parser is freely shareable.
///
/// # Examples
/// ```
/// use search_query::Parser;
///
/// let parser = Parser::new();
/// let query = parser.parse("(java OR kotlin) AND spring").unwrap();
/// assert_eq!(query.extract_keywords(), vec!["java", "kotlin", "spring"]);
/// ```
pub struct Parser {
    lexer: Box<dyn Tokenizer>,
    options: ParserOptions,
    field_parsers: HashMap<String, Box<FieldParser>>,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    /// A parser with default options: AND as the default operator, no
    /// validation after parse, all token kinds allowed.
    pub fn new() -> Self {
        Parser::builder().build()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn parse(&self, input: &str) -> Result<Query, ParseError> {
        let tokens = self.lexer.tokenize(input);

        let mut cursor = Cursor {
            tokens: &tokens,
            position: 0,
            options: &self.options,
            field_parsers: &self.field_parsers,
        };
        let root = cursor.parse_query()?;

        let metadata = QueryMetadata {
            token_count: tokens.len(),
            node_count: root.count(),
            max_depth: root.max_depth(),
            original_tokens: tokens,
        };
        let query = Query::from_parts(input.to_string(), root, metadata);

        if self.options.validate_after_parse {
            let result = validator::validate_with(&query, &self.options.allowed_kinds);
            if self.options.fail_on_validation_error {
                result.into_result()?;
            }
        }

        Ok(query)
    }
}

/// Builder for [`Parser`].
pub struct ParserBuilder {
    lexer: Box<dyn Tokenizer>,
    options: ParserOptions,
    field_parsers: HashMap<String, Box<FieldParser>>,
}

impl Default for ParserBuilder {
    fn default() -> Self {
        ParserBuilder {
            lexer: Box::new(Lexer),
            options: ParserOptions::default(),
            field_parsers: HashMap::new(),
        }
    }
}

impl ParserBuilder {
    fn new() -> Self {
        ParserBuilder::default()
    }

    /// Replaces the default [`Lexer`] with another [`Tokenizer`].
    pub fn lexer(mut self, lexer: impl Tokenizer + 'static) -> Self {
        self.lexer = Box::new(lexer);
        self
    }

    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    pub fn default_operator(mut self, operator: BoolOp) -> Self {
        self.options.default_operator = operator;
        self
    }

    pub fn validate_after_parse(mut self, validate: bool) -> Self {
        self.options.validate_after_parse = validate;
        self
    }

    /// Only takes effect together with
    /// [`validate_after_parse`](Self::validate_after_parse).
    pub fn fail_on_validation_error(mut self, fail: bool) -> Self {
        self.options.fail_on_validation_error = fail;
        self
    }

    pub fn allowed_kinds(mut self, kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        self.options.allowed_kinds = kinds.into_iter().collect();
        self
    }

    /// Registers a custom parser for a field name. The raw value token is
    /// handed to the closure verbatim and its node is used as-is.
    pub fn field_parser(
        mut self,
        name: impl Into<String>,
        parser: impl Fn(&str) -> Node + Send + Sync + 'static,
    ) -> Self {
        self.field_parsers.insert(name.into(), Box::new(parser));
        self
    }

    pub fn build(self) -> Parser {
        Parser {
            lexer: self.lexer,
            options: self.options,
            field_parsers: self.field_parsers,
        }
    }
}

/// Per-call parse state over a borrowed token stream.
struct Cursor<'a> {
    tokens: &'a [Token],
    position: usize,
    options: &'a ParserOptions,
    field_parsers: &'a HashMap<String, Box<FieldParser>>,
}

impl<'a> Cursor<'a> {
    fn parse_query(&mut self) -> Result<Node, ParseError> {
        let mut nodes = Vec::new();

        while !self.is_at_end() {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            if let Some(node) = self.parse_or()? {
                nodes.push(node);
            }
        }

        // Multiple top-level expressions combine under the default operator
        // as one flat N-ary node, never pairwise.
        Ok(collapse(self.options.default_operator, nodes).unwrap_or(Node::Root(Vec::new())))
    }

    fn parse_or(&mut self) -> Result<Option<Node>, ParseError> {
        let mut left = self.parse_and()?;
        self.skip_whitespace();

        while self.matches(TokenKind::Or) {
            let mut nodes = Vec::new();
            if let Some(node) = left.take() {
                nodes.push(node);
            }
            loop {
                self.skip_whitespace();
                if let Some(right) = self.parse_and()? {
                    nodes.push(right);
                }
                self.skip_whitespace();
                if !self.matches(TokenKind::Or) {
                    break;
                }
            }
            left = collapse(BoolOp::Or, nodes);
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Option<Node>, ParseError> {
        let mut left = match self.parse_not()? {
            Some(node) => node,
            None => return Ok(None),
        };
        self.skip_whitespace();

        while self.matches(TokenKind::And) {
            let mut nodes = vec![left];
            loop {
                self.skip_whitespace();
                if self.is_at_end() || self.check(TokenKind::RParen) {
                    break;
                }
                if let Some(right) = self.parse_not()? {
                    nodes.push(right);
                }
                self.skip_whitespace();
                if !self.matches(TokenKind::And) {
                    break;
                }
            }
            left = match collapse(BoolOp::And, nodes) {
                Some(node) => node,
                None => return Ok(None),
            };
        }

        Ok(Some(left))
    }

    fn parse_not(&mut self) -> Result<Option<Node>, ParseError> {
        if self.matches(TokenKind::Not) {
            self.skip_whitespace();
            // Recurse on NOT itself so `NOT NOT x` nests; the optimizer
            // collapses the double negation, not the parser.
            return match self.parse_not()? {
                Some(node) => Ok(Some(Node::Not(Box::new(node)))),
                None => Err(self.error("Expected term after NOT operator")),
            };
        }
        self.parse_term()
    }

    fn parse_term(&mut self) -> Result<Option<Node>, ParseError> {
        self.skip_whitespace();

        if self.matches(TokenKind::LParen) {
            let node = self.parse_or()?;
            self.expect(TokenKind::RParen, "Expected ')' after expression")?;
            return Ok(node);
        }

        // `+` is lexed but carries no semantics in the core
        if self.matches(TokenKind::Required) {
            return self.parse_term();
        }

        if self.check(TokenKind::Keyword) && self.check_next(TokenKind::Colon) {
            return self.parse_field().map(Some);
        }

        if self.matches(TokenKind::Phrase) {
            let phrase = strip_quotes(&self.previous().value);
            return Ok(Some(Node::Phrase(phrase)));
        }

        if self.matches(TokenKind::Wildcard) {
            return Ok(Some(Node::Wildcard(self.previous().value.clone())));
        }

        // Exclusion desugars at parse time
        if self.matches(TokenKind::Exclude) {
            let value = self.previous().value.clone();
            return Ok(Some(Node::Not(Box::new(Node::Token {
                kind: TokenKind::Keyword,
                value,
            }))));
        }

        if self.matches(TokenKind::Keyword) {
            let value = self.previous().value.clone();

            if self.matches(TokenKind::Fuzzy) {
                let mut max_edits = DEFAULT_MAX_EDITS;
                if self.check(TokenKind::Keyword) {
                    if let Some(digit) = single_digit(&self.peek().value) {
                        self.advance();
                        max_edits = digit;
                    }
                }
                if max_edits > DEFAULT_MAX_EDITS {
                    return Err(self.error("max edits must be between 0 and 2"));
                }
                return Ok(Some(Node::Fuzzy { term: value, max_edits }));
            }

            if value.contains('*') || value.contains('?') {
                return Ok(Some(Node::Wildcard(value)));
            }

            return Ok(Some(Node::Token { kind: TokenKind::Keyword, value }));
        }

        if self.matches(TokenKind::RangeStart) {
            return self.parse_range().map(Some);
        }

        // Unrecognized leading tokens are skipped, not errors
        if !self.is_at_end() {
            self.advance();
        }
        Ok(None)
    }

    fn parse_field(&mut self) -> Result<Node, ParseError> {
        let name = self.advance().value.clone();
        self.expect(TokenKind::Colon, "Expected ':' after field name")?;
        self.skip_whitespace();

        let field_parsers = self.field_parsers;
        if let Some(parser) = field_parsers.get(&name) {
            let raw = self.advance().value.clone();
            return Ok(parser(&raw));
        }

        match self.parse_term()? {
            Some(Node::Token { value, .. }) => Ok(Node::Field { name, value }),
            Some(Node::Phrase(phrase)) => Ok(Node::Field { name, value: phrase }),
            _ => Err(self.error("Invalid field value")),
        }
    }

    fn parse_range(&mut self) -> Result<Node, ParseError> {
        let include_start = self.previous().value == "[";
        self.skip_whitespace();

        let start = self.advance().value.clone();
        self.skip_whitespace();

        if self.check(TokenKind::RangeTo) || self.peek().value.eq_ignore_ascii_case("TO") {
            self.advance();
        } else {
            return Err(self.error("Expected 'TO' in range query"));
        }
        self.skip_whitespace();

        let end = self.advance().value.clone();
        self.skip_whitespace();

        let closing = self.expect(TokenKind::RangeEnd, "Expected ']' or '}' to close range")?;
        let include_end = closing.value == "]";

        Ok(Node::Range {
            start,
            end,
            include_start,
            include_end,
            field: None,
        })
    }

    fn skip_whitespace(&mut self) {
        while self.matches(TokenKind::Whitespace) {}
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.position + 1)
            .is_some_and(|token| token.kind == kind)
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    fn peek(&self) -> &'a Token {
        // The stream is always EOF-terminated and the cursor never moves
        // past the EOF token.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &'a Token {
        &self.tokens[self.position - 1]
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len() || self.tokens[self.position].kind == TokenKind::Eof
    }

    fn error(&self, message: &str) -> ParseError {
        let found = if self.is_at_end() {
            None
        } else {
            Some(self.peek().clone())
        };
        ParseError::Syntax {
            message: message.to_string(),
            position: self.position,
            found,
        }
    }
}

/// Zero operands vanish, a single operand stands alone, several become one
/// flat N-ary group.
fn collapse(operator: BoolOp, mut nodes: Vec<Node>) -> Option<Node> {
    match nodes.len() {
        0 => None,
        1 => nodes.pop(),
        _ => Some(match operator {
            BoolOp::And => Node::And(nodes),
            BoolOp::Or => Node::Or(nodes),
        }),
    }
}

fn single_digit(value: &str) -> Option<u8> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_digit(10).map(|d| d as u8),
        _ => None,
    }
}

/// The default lexer already strips phrase quotes; this guards values
/// produced by custom lexers.
fn strip_quotes(value: &str) -> String {
    if value.len() > 1 && value.starts_with('"') && value.ends_with('"') {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}
