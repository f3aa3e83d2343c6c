//! Parses textual search-query syntax into an abstract syntax tree,
//! validates it, rewrites it, and serializes it back to canonical text.
//!
//! The pipeline is lexer → recursive-descent parser → AST with a visitor
//! framework → validation and transform passes → serializer. Lexing never
//! fails; structurally broken input raises a [`ParseError`], while
//! semantically unsound input surfaces as a collected
//! [`ValidationResult`].
//!
//! ```
//! use search_query::Parser;
//!
//! let parser = Parser::new();
//! let query = parser.parse("(java OR kotlin) AND \"web framework\" -legacy").unwrap();
//!
//! assert_eq!(query.extract_keywords(), vec!["java", "kotlin"]);
//! assert_eq!(query.extract_phrases(), vec!["web framework"]);
//! assert_eq!(query.extract_exclusions(), vec!["legacy"]);
//! ```

pub mod ast;
pub mod builder;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod query;
pub mod serializer;
pub mod transform;
pub mod validator;

pub use ast::{DEFAULT_MAX_EDITS, Node, NodeKind, NodeVisitor, Token, TokenKind};
pub use builder::QueryBuilder;
pub use lexer::{Lexer, Tokenizer};
pub use parser::{BoolOp, FieldParser, ParseError, Parser, ParserBuilder, ParserOptions};
pub use printer::{node_to_pretty_string, to_pretty_string};
pub use query::{Query, QueryMetadata};
pub use serializer::serialize;
pub use validator::{
    QueryValidationError, ValidationError, ValidationResult, validate, validate_with,
};
