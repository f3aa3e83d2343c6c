//! Structural, semantic, and token-kind validation.
//!
//! Validation is read-only and never raises by itself: every pass appends
//! to an ordered error list and the caller decides whether a non-empty
//! list is fatal. The parser's validate-after-parse mode is the one place
//! where a failed result is converted into an error.

use crate::{
    ast::{Node, NodeVisitor, TokenKind},
    query::Query,
};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Nesting deeper than this is rejected by the structural pass.
const MAX_DEPTH: usize = 10;

/// Minimum sensible length for a fuzzy term.
const MIN_FUZZY_TERM_LEN: usize = 3;

/// A single validation finding, optionally tied to a field or token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
    pub field: Option<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError { message: message.into(), field: None }
    }

    pub fn with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Ordered outcome of a validation run; empty error list means valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        ValidationResult { errors: Vec::new() }
    }

    pub fn invalid(errors: Vec<ValidationError>) -> Self {
        ValidationResult { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn combine(mut self, other: ValidationResult) -> ValidationResult {
        self.errors.extend(other.errors);
        self
    }

    pub fn into_result(self) -> Result<(), QueryValidationError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(QueryValidationError { errors: self.errors })
        }
    }
}

/// A failed validation promoted to an error value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_errors(.errors))]
pub struct QueryValidationError {
    pub errors: Vec<ValidationError>,
}

fn format_errors(errors: &[ValidationError]) -> String {
    if errors.len() == 1 {
        return errors[0].to_string();
    }
    let mut out = format!("Query validation failed with {} errors:", errors.len());
    for (index, error) in errors.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", index + 1, error));
    }
    out
}

/// Validates a query with every token kind allowed.
pub fn validate(query: &Query) -> ValidationResult {
    validate_with(query, &TokenKind::ALL.into_iter().collect())
}

/// Validates a query against an explicit token-kind allow-list.
///
/// Runs the empty-query check plus three passes (structural, semantic,
/// token-kind) and concatenates their findings in that order.
pub fn validate_with(query: &Query, allowed_kinds: &HashSet<TokenKind>) -> ValidationResult {
    let mut errors = Vec::new();

    if query.is_empty() {
        errors.push(ValidationError::new("Query is empty"));
    }

    structure_errors(query.root(), 1, &mut errors);

    let mut semantics = SemanticsVisitor { errors: Vec::new() };
    semantics.visit(query.root());
    errors.extend(semantics.errors);

    errors.extend(token_kind_errors(query, allowed_kinds));

    if errors.is_empty() {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(errors)
    }
}

/// Structural pass: empty groups and excessive nesting.
///
/// The other structural hazards of this data model are impossible by
/// construction: children are owned (no cycles) and `Not` holds exactly
/// one child.
fn structure_errors(node: &Node, depth: usize, errors: &mut Vec<ValidationError>) {
    if node.is_group() && node.children().is_empty() {
        errors.push(ValidationError::new(format!(
            "Empty group node: {:?}",
            node.kind()
        )));
    }

    if depth > MAX_DEPTH {
        errors.push(ValidationError::new(format!(
            "Query is too deeply nested (max depth: {MAX_DEPTH})"
        )));
    }

    for child in node.children() {
        structure_errors(child, depth + 1, errors);
    }
}

/// Semantic pass: blank values, contradictions, and degenerate constructs.
struct SemanticsVisitor {
    errors: Vec<ValidationError>,
}

impl NodeVisitor for SemanticsVisitor {
    type Output = ();

    fn default_output(&mut self) -> Self::Output {}

    fn visit_token(&mut self, kind: TokenKind, value: &str) -> Self::Output {
        if value.trim().is_empty() {
            self.errors
                .push(ValidationError::with_field("Empty token value", format!("{kind:?}")));
        }
    }

    fn visit_and(&mut self, children: &[Node]) -> Self::Output {
        self.check_conflicting_terms(children, "AND");
        for child in children {
            self.visit(child);
        }
    }

    fn visit_or(&mut self, children: &[Node]) -> Self::Output {
        let all_negative = !children.is_empty() && children.iter().all(is_negative);
        if all_negative {
            self.errors
                .push(ValidationError::new("OR expression contains only negative terms"));
        }
        for child in children {
            self.visit(child);
        }
    }

    fn visit_field(&mut self, name: &str, value: &str) -> Self::Output {
        if name.trim().is_empty() {
            self.errors.push(ValidationError::new("Empty field name"));
        }
        if value.trim().is_empty() {
            self.errors
                .push(ValidationError::new(format!("Empty field value for field: {name}")));
        }
    }

    fn visit_fuzzy(&mut self, term: &str, _max_edits: u8) -> Self::Output {
        if term.chars().count() < MIN_FUZZY_TERM_LEN {
            self.errors.push(ValidationError::new(format!(
                "Fuzzy term '{term}' is too short (minimum {MIN_FUZZY_TERM_LEN} characters recommended)"
            )));
        }
    }

    fn visit_phrase(&mut self, phrase: &str) -> Self::Output {
        if phrase.trim().is_empty() {
            self.errors.push(ValidationError::new("Empty phrase"));
        }
    }

    fn visit_wildcard(&mut self, pattern: &str) -> Self::Output {
        if pattern.trim().is_empty() {
            self.errors.push(ValidationError::new("Empty wildcard pattern"));
        }
    }

    fn visit_range(
        &mut self,
        start: &str,
        end: &str,
        _include_start: bool,
        _include_end: bool,
        _field: Option<&str>,
    ) -> Self::Output {
        if start == end {
            self.errors
                .push(ValidationError::new(format!("Range start and end values are the same: {start}")));
        }
        if start == "*" && end == "*" {
            self.errors.push(ValidationError::new(
                "Range with both boundaries as wildcards matches everything",
            ));
        }
    }
}

impl SemanticsVisitor {
    /// A positive keyword co-occurring with its negation makes the group
    /// unsatisfiable.
    fn check_conflicting_terms(&mut self, children: &[Node], operator: &str) {
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for child in children {
            match child {
                Node::Token { kind: TokenKind::Exclude, value } => negative.push(value.as_str()),
                Node::Token { value, .. } => positive.push(value.as_str()),
                Node::Not(inner) => {
                    if let Node::Token { value, .. } = inner.as_ref() {
                        negative.push(value.as_str());
                    }
                }
                _ => {}
            }
        }

        for value in negative {
            if positive.contains(&value) {
                self.errors.push(ValidationError::new(format!(
                    "{operator} expression contains conflicting terms: {value} and -{value}"
                )));
            }
        }
    }
}

fn is_negative(node: &Node) -> bool {
    matches!(node, Node::Not(_)) || matches!(node, Node::Token { kind: TokenKind::Exclude, .. })
}

/// Token-kind pass: every leaf's originating kind, plus every
/// non-structural token in the retained original stream, must be allowed.
///
/// The raw-stream check catches modifiers the parser consumes without an
/// AST trace (boost, required) and operators that dissolve into groups.
fn token_kind_errors(query: &Query, allowed_kinds: &HashSet<TokenKind>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    query.root().walk(|node| match node {
        Node::Token { kind, .. } => {
            if !allowed_kinds.contains(kind) {
                errors.push(not_allowed(&format!("{kind:?}")));
            }
        }
        Node::Phrase(_) => {
            if !allowed_kinds.contains(&TokenKind::Phrase) {
                errors.push(not_allowed("Phrase"));
            }
        }
        Node::Field { .. } => {
            if !allowed_kinds.contains(&TokenKind::Field) {
                errors.push(not_allowed("Field"));
            }
        }
        Node::Wildcard(_) => {
            if !allowed_kinds.contains(&TokenKind::Wildcard) {
                errors.push(not_allowed("Wildcard"));
            }
        }
        Node::Fuzzy { .. } => {
            if !allowed_kinds.contains(&TokenKind::Fuzzy) {
                errors.push(not_allowed("Fuzzy"));
            }
        }
        Node::Range { .. } => {
            if !allowed_kinds.contains(&TokenKind::RangeStart)
                || !allowed_kinds.contains(&TokenKind::RangeEnd)
                || !allowed_kinds.contains(&TokenKind::RangeTo)
            {
                errors.push(not_allowed("Range"));
            }
        }
        _ => {}
    });

    for token in &query.metadata().original_tokens {
        if !token.kind.is_structural() && !allowed_kinds.contains(&token.kind) {
            errors.push(not_allowed(&format!("{:?}", token.kind)));
        }
    }

    errors
}

fn not_allowed(kind: &str) -> ValidationError {
    ValidationError::new(format!("Token type not allowed: {kind}"))
}
