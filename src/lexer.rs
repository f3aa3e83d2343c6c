use crate::ast::{Token, TokenKind};

/// Turns raw query text into a token stream.
///
/// Implementations never fail and always terminate the stream with an
/// `Eof` token; the parser's cursor relies on that terminator. [`Lexer`]
/// is the default implementation, and a parser can be built over any
/// other through [`ParserBuilder::lexer`](crate::parser::ParserBuilder::lexer).
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, input: &str) -> Vec<Token>;
}

/// The default [`Tokenizer`].
///
/// Holds no scan state of its own; the cursor lives in a per-call scanner,
/// so one `Lexer` can serve concurrent parses.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }
}

impl Tokenizer for Lexer {
    fn tokenize(&self, input: &str) -> Vec<Token> {
        Scanner::new(input).run()
    }
}

struct Scanner {
    input: Vec<char>,
    position: usize,
    start: usize,
    tokens: Vec<Token>,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Scanner {
            input: input.chars().collect(),
            position: 0,
            start: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.position;
            self.scan_token();
        }
        self.tokens.push(Token::new(TokenKind::Eof, ""));
        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.input[self.position];
        self.advance();

        match c {
            ' ' | '\t' | '\r' | '\n' => self.whitespace(),
            '"' => self.phrase(),
            '(' => self.add_token(TokenKind::LParen, "("),
            ')' => self.add_token(TokenKind::RParen, ")"),
            '[' => self.add_token(TokenKind::RangeStart, "["),
            ']' => self.add_token(TokenKind::RangeEnd, "]"),
            '{' => self.add_token(TokenKind::RangeStart, "{"),
            '}' => self.add_token(TokenKind::RangeEnd, "}"),
            ':' => self.add_token(TokenKind::Colon, ":"),
            '+' => self.add_token(TokenKind::Required, "+"),
            '~' => self.add_token(TokenKind::Fuzzy, "~"),
            '^' => self.add_token(TokenKind::Boost, "^"),
            '-' => self.minus(),
            '*' | '?' => {
                if self.current_char().is_some_and(is_word_char) {
                    self.keyword();
                } else {
                    self.add_token(TokenKind::Wildcard, c.to_string());
                }
            }
            c if is_word_start(c) => self.keyword(),
            _ => {} // unknown characters are skipped, not errors
        }
    }

    fn whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
        let run = self.text();
        self.add_token(TokenKind::Whitespace, run);
    }

    fn phrase(&mut self) {
        while self.current_char().is_some_and(|c| c != '"') {
            self.advance();
        }

        if self.is_at_end() {
            // Unterminated phrase: everything after the opening quote
            let value = self.text_from(self.start + 1);
            self.add_token(TokenKind::Phrase, value);
        } else {
            self.advance();
            let value: String = self.input[self.start + 1..self.position - 1]
                .iter()
                .collect();
            self.add_token(TokenKind::Phrase, value);
        }
    }

    /// A consumed `-` is a hyphenated-word interior when flanked by word
    /// chars, an exclusion prefix when a word follows, and a bare exclusion
    /// otherwise (`-"phrase"` lands here and stays rejected downstream).
    fn minus(&mut self) {
        let before = self
            .position
            .checked_sub(2)
            .and_then(|i| self.input.get(i).copied());

        if before.is_some_and(is_word_char) && self.current_char().is_some_and(is_word_char) {
            self.keyword();
        } else if self.current_char().is_some_and(is_word_char) {
            while self
                .current_char()
                .is_some_and(|c| is_word_char(c) || c == '*' || c == '?')
            {
                self.advance();
            }
            let value = self.text_from(self.start + 1);
            self.add_token(TokenKind::Exclude, value);
        } else {
            self.add_token(TokenKind::Exclude, "-");
        }
    }

    fn keyword(&mut self) {
        loop {
            let Some(c) = self.current_char() else { break };
            if is_word_char(c)
                || c == '*'
                || c == '?'
                || (c == '-' && self.peek_char(1).is_some_and(is_word_char))
            {
                self.advance();
            } else if c == '"' {
                // Embedded quoted run stays part of the token, quotes included
                self.advance();
                while self.current_char().is_some_and(|q| q != '"') {
                    self.advance();
                }
                if !self.is_at_end() {
                    self.advance();
                }
            } else {
                break;
            }
        }

        let text = self.text();

        // Before a fuzzy marker the run is always a plain keyword, so
        // `and~` means a fuzzy search for the word itself.
        if self.current_char() == Some('~') {
            self.add_token(TokenKind::Keyword, text);
            return;
        }

        match text.to_uppercase().as_str() {
            "AND" => self.add_token(TokenKind::And, text),
            "OR" => self.add_token(TokenKind::Or, text),
            "NOT" => self.add_token(TokenKind::Not, text),
            "TO" => self.add_token(TokenKind::RangeTo, text),
            _ if text.contains('*') || text.contains('?') => {
                self.add_token(TokenKind::Wildcard, text)
            }
            _ => self.add_token(TokenKind::Keyword, text),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn text(&self) -> String {
        self.input[self.start..self.position].iter().collect()
    }

    fn text_from(&self, from: usize) -> String {
        self.input[from..self.position].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind, value: impl Into<String>) {
        self.tokens.push(Token::new(kind, value));
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '@' || c == '=' || c == '\\'
}

#[test]
fn test_empty_input_is_just_eof() {
    let tokens = Lexer::new().tokenize("");
    assert_eq!(tokens, vec![Token::new(TokenKind::Eof, "")]);
}

#[test]
fn test_hyphen_disambiguation() {
    let tokens = Lexer::new().tokenize("well-known -draft");
    assert_eq!(tokens[0], Token::new(TokenKind::Keyword, "well-known"));
    assert_eq!(tokens[1], Token::new(TokenKind::Whitespace, " "));
    assert_eq!(tokens[2], Token::new(TokenKind::Exclude, "draft"));
    assert_eq!(tokens[3], Token::new(TokenKind::Eof, ""));
}

#[test]
fn test_unterminated_phrase_consumes_to_end() {
    let tokens = Lexer::new().tokenize("\"lost cause");
    assert_eq!(tokens[0], Token::new(TokenKind::Phrase, "lost cause"));
}

#[test]
fn test_embedded_quotes_stay_in_keyword() {
    let tokens = Lexer::new().tokenize("foo=\"bar baz\"");
    assert_eq!(tokens[0], Token::new(TokenKind::Keyword, "foo=\"bar baz\""));
}

#[test]
fn test_tilde_stops_operator_classification() {
    let tokens = Lexer::new().tokenize("and~");
    assert_eq!(tokens[0], Token::new(TokenKind::Keyword, "and"));
    assert_eq!(tokens[1], Token::new(TokenKind::Fuzzy, "~"));
}
