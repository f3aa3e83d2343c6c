//! # Search Query - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for textual search
//! queries: boolean combinations of keywords, phrases, fields, wildcards,
//! fuzzy terms, ranges, and exclusions.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - The closed node family (groups and leaves)
//! - **[visitor]** - Generic dispatch for tree consumers
//!
//! ## Quick Start
//!
//! ```text
//! (java OR kotlin) AND "web framework" -legacy
//! ```
//!
//! parses to
//!
//! ```text
//! And[Or[java, kotlin], Phrase(web framework), Not(legacy)]
//! ```
//!
//! ## Core Concepts
//!
//! ### Groups and Leaves
//!
//! Group nodes (`Root`, `And`, `Or`, `Not`) own ordered children; leaf nodes
//! (`Token`, `Phrase`, `Field`, `Wildcard`, `Fuzzy`, `Range`) carry the
//! searchable text. A `Not` holds exactly one child by construction.
//!
//! ### Precedence
//!
//! Loosest to tightest: `OR > AND > NOT > term`. Runs of the same explicit
//! operator flatten into one N-ary group, and unmarked adjacency combines
//! terms with the parser's configured default operator:
//!
//! ```text
//! a b c        →  And[a, b, c]
//! a AND b AND c →  And[a, b, c]
//! NOT NOT a    →  Not(Not(a))     (collapsed by the optimizer)
//! ```
//!
//! ### Term Forms
//!
//! ```text
//! hello            keyword
//! "hello world"    phrase
//! title:rust       field
//! spring*  wor?d   wildcards
//! roam~  roam~1    fuzzy (edit distance defaults to 2)
//! [1 TO 10]        range, { } for exclusive boundaries
//! -draft           exclusion (sugar for NOT draft)
//! ```
//!
//! ### Immutability
//!
//! Nodes never change after construction. Normalization and optimization
//! build new trees, so parsed queries can be shared freely across threads.
pub mod node;
pub mod tokens;
pub mod visitor;

pub use node::{DEFAULT_MAX_EDITS, Node, NodeKind};
pub use tokens::{Token, TokenKind};
pub use visitor::NodeVisitor;
