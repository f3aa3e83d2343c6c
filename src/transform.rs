//! Pure tree rewrites: normalization and optimization.
//!
//! Every function here is `&Node -> Node`, rebuilding the nodes it changes
//! and cloning the rest, so transforms compose by plain sequencing.
//! [`normalize`] and [`optimize`] are the fixed default pipelines; both are
//! idempotent over parsed queries.

use crate::ast::Node;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Default normalizer pipeline: lowercase, sort, collapse whitespace.
pub fn normalize(node: &Node) -> Node {
    normalize_whitespace(&sort_terms(&lowercase_terms(node)))
}

/// Default optimizer pipeline: dedupe, flatten, simplify, drop empties.
///
/// The order is fixed; flattening can surface duplicates and empty groups
/// that the later steps clean up.
pub fn optimize(node: &Node) -> Node {
    remove_empty_groups(&simplify_booleans(&flatten_booleans(&remove_duplicates(node))))
}

/// Case-folds all literal text except field names and range bounds.
pub fn lowercase_terms(node: &Node) -> Node {
    map_text(node, &|text| text.to_lowercase())
}

/// Trims and collapses interior whitespace runs to a single space.
pub fn normalize_whitespace(node: &Node) -> Node {
    map_text(node, &|text| {
        WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
    })
}

/// Strips combining marks after NFD decomposition, so `café` matches
/// `cafe`. Opt-in; not part of the default pipeline.
pub fn remove_diacritics(node: &Node) -> Node {
    map_text(node, &|text| {
        text.nfd().filter(|c| !is_combining_mark(*c)).collect()
    })
}

/// Sorts children of `Root`/`And`/`Or` alphabetically by rendered value.
///
/// Sorting never crosses a group boundary and never touches the inside of
/// a `Not` or `Range`.
pub fn sort_terms(node: &Node) -> Node {
    match node {
        Node::Root(children) => Node::Root(sorted(children)),
        Node::And(children) => Node::And(sorted(children)),
        Node::Or(children) => Node::Or(sorted(children)),
        Node::Not(child) => Node::Not(Box::new(sort_terms(child))),
        leaf => leaf.clone(),
    }
}

fn sorted(children: &[Node]) -> Vec<Node> {
    let mut result: Vec<Node> = children.iter().map(sort_terms).collect();
    result.sort_by(|a, b| a.value().cmp(&b.value()));
    result
}

/// Drops repeated children within one `Root`/`And`/`Or` group.
///
/// The dedupe key is variant name plus rendered value, so two fields with
/// different names never merge. The first occurrence wins.
pub fn remove_duplicates(node: &Node) -> Node {
    match node {
        Node::Root(children) => Node::Root(deduplicated(children)),
        Node::And(children) => Node::And(deduplicated(children)),
        Node::Or(children) => Node::Or(deduplicated(children)),
        Node::Not(child) => Node::Not(Box::new(remove_duplicates(child))),
        leaf => leaf.clone(),
    }
}

fn deduplicated(children: &[Node]) -> Vec<Node> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for child in children {
        let child = remove_duplicates(child);
        let key = format!("{:?}:{}", child.kind(), child.value());
        if seen.insert(key) {
            result.push(child);
        }
    }
    result
}

/// Merges nested same-operator groups bottom-up: `And[a, And[b, c]]`
/// becomes `And[a, b, c]`. `Root` absorbs nothing.
pub fn flatten_booleans(node: &Node) -> Node {
    match node {
        Node::Root(children) => Node::Root(children.iter().map(flatten_booleans).collect()),
        Node::And(children) => {
            let mut flattened = Vec::new();
            for child in children {
                match flatten_booleans(child) {
                    Node::And(grandchildren) => flattened.extend(grandchildren),
                    other => flattened.push(other),
                }
            }
            Node::And(flattened)
        }
        Node::Or(children) => {
            let mut flattened = Vec::new();
            for child in children {
                match flatten_booleans(child) {
                    Node::Or(grandchildren) => flattened.extend(grandchildren),
                    other => flattened.push(other),
                }
            }
            Node::Or(flattened)
        }
        Node::Not(child) => Node::Not(Box::new(flatten_booleans(child))),
        leaf => leaf.clone(),
    }
}

/// Collapses singleton `And`/`Or` groups to their sole child and
/// `Not(Not(x))` to `x`, bottom-up. `Root` is never simplified away.
pub fn simplify_booleans(node: &Node) -> Node {
    match node {
        Node::Root(children) => Node::Root(children.iter().map(simplify_booleans).collect()),
        Node::And(children) => singleton_or(Node::And, children),
        Node::Or(children) => singleton_or(Node::Or, children),
        Node::Not(child) => match simplify_booleans(child) {
            Node::Not(inner) => *inner,
            simplified => Node::Not(Box::new(simplified)),
        },
        leaf => leaf.clone(),
    }
}

fn singleton_or(make: fn(Vec<Node>) -> Node, children: &[Node]) -> Node {
    let mut simplified: Vec<Node> = children.iter().map(simplify_booleans).collect();
    if simplified.len() == 1 {
        match simplified.pop() {
            Some(child) => child,
            None => make(simplified),
        }
    } else {
        make(simplified)
    }
}

/// Removes emptied `And`/`Or` groups bottom-up, cascading upward when a
/// removal empties the parent. `Root` keeps whatever survives.
pub fn remove_empty_groups(node: &Node) -> Node {
    match node {
        Node::Root(children) => Node::Root(pruned(children)),
        Node::And(children) => Node::And(pruned(children)),
        Node::Or(children) => Node::Or(pruned(children)),
        Node::Not(child) => Node::Not(Box::new(remove_empty_groups(child))),
        leaf => leaf.clone(),
    }
}

fn pruned(children: &[Node]) -> Vec<Node> {
    children
        .iter()
        .map(remove_empty_groups)
        .filter(|child| {
            !matches!(child, Node::And(grandchildren) | Node::Or(grandchildren) if grandchildren.is_empty())
        })
        .collect()
}

/// Text rewrite applied to token values, phrases, field values (names kept
/// verbatim), wildcard patterns, and fuzzy terms. Range bounds stay as-is.
fn map_text(node: &Node, f: &dyn Fn(&str) -> String) -> Node {
    match node {
        Node::Root(children) => Node::Root(children.iter().map(|c| map_text(c, f)).collect()),
        Node::And(children) => Node::And(children.iter().map(|c| map_text(c, f)).collect()),
        Node::Or(children) => Node::Or(children.iter().map(|c| map_text(c, f)).collect()),
        Node::Not(child) => Node::Not(Box::new(map_text(child, f))),
        Node::Token { kind, value } => Node::Token { kind: *kind, value: f(value) },
        Node::Phrase(phrase) => Node::Phrase(f(phrase)),
        Node::Field { name, value } => Node::Field {
            name: name.clone(),
            value: f(value),
        },
        Node::Wildcard(pattern) => Node::Wildcard(f(pattern)),
        Node::Fuzzy { term, max_edits } => Node::Fuzzy {
            term: f(term),
            max_edits: *max_edits,
        },
        range @ Node::Range { .. } => range.clone(),
    }
}
