/// Lexical category of a scanned token.
///
/// Every character sequence lexes to some stream of these kinds; scanning
/// never fails. Kinds the parser consumes without an AST trace (such as
/// `Boost`) remain visible to validation through the retained token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Content
    /// Bare search term
    ///
    /// # Examples
    /// ```text
    /// hello
    /// user@example.com
    /// foo="bar"
    /// ```
    Keyword,

    /// Quoted exact-match phrase, quotes stripped
    ///
    /// # Examples
    /// ```text
    /// "hello world"
    /// ```
    Phrase,

    /// Field-scoped term, produced for `name:value` pairs
    ///
    /// Never emitted by the lexer itself; exists so field nodes have an
    /// originating kind for the validation allow-list.
    Field,

    // Boolean operators
    /// Conjunction, case-insensitive
    ///
    /// # Examples
    /// ```text
    /// java AND spring
    /// java and spring
    /// ```
    And,

    /// Disjunction, case-insensitive
    Or,

    /// Negation, case-insensitive
    Not,

    // Modifiers
    /// Leading-minus exclusion, minus stripped from the value
    ///
    /// # Examples
    /// ```text
    /// -draft
    /// ```
    Exclude,

    /// Leading plus, recognized but semantically inert
    Required,

    /// Pattern containing `*` or `?`
    ///
    /// # Examples
    /// ```text
    /// spring*
    /// wor?d
    /// ```
    Wildcard,

    /// Tilde fuzzy marker
    ///
    /// # Examples
    /// ```text
    /// roam~
    /// roam~1
    /// ```
    Fuzzy,

    /// Caret boost marker, recognized but semantically inert
    Boost,

    // Range markers
    /// `[` or `{`, literal retained to recover inclusivity
    RangeStart,

    /// `]` or `}`, literal retained to recover inclusivity
    RangeEnd,

    /// The `TO` separator inside a range, case-insensitive
    RangeTo,

    // Structural
    /// Left parenthesis
    LParen,

    /// Right parenthesis
    RParen,

    /// Colon separating a field name from its value
    Colon,

    /// Run of whitespace, preserved so term adjacency survives lexing
    Whitespace,

    /// End of input, always the final token
    Eof,
}

impl TokenKind {
    /// Every kind, in declaration order. The parser's default allow-list.
    pub const ALL: [TokenKind; 19] = [
        TokenKind::Keyword,
        TokenKind::Phrase,
        TokenKind::Field,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Exclude,
        TokenKind::Required,
        TokenKind::Wildcard,
        TokenKind::Fuzzy,
        TokenKind::Boost,
        TokenKind::RangeStart,
        TokenKind::RangeEnd,
        TokenKind::RangeTo,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Colon,
        TokenKind::Whitespace,
        TokenKind::Eof,
    ];

    /// True for `And`, `Or`, `Not`.
    pub fn is_boolean_operator(self) -> bool {
        matches!(self, TokenKind::And | TokenKind::Or | TokenKind::Not)
    }

    /// True for the term modifiers `Exclude`, `Required`, `Wildcard`,
    /// `Fuzzy`, `Boost`.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            TokenKind::Exclude
                | TokenKind::Required
                | TokenKind::Wildcard
                | TokenKind::Fuzzy
                | TokenKind::Boost
        )
    }

    /// True for the content-bearing kinds `Keyword`, `Phrase`, `Field`.
    pub fn is_content(self) -> bool {
        matches!(self, TokenKind::Keyword | TokenKind::Phrase | TokenKind::Field)
    }

    /// True for kinds that shape the stream without carrying search terms:
    /// parens, colon, whitespace, end of input.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Colon
                | TokenKind::Whitespace
                | TokenKind::Eof
        )
    }
}

/// A scanned token: lexical kind plus the literal text it covers.
///
/// Exclusion and phrase tokens carry their value with the marker characters
/// already stripped; bracket tokens keep the literal char so the parser can
/// recover range inclusivity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token { kind, value: value.into() }
    }
}
