// tests/integration_tests.rs

use search_query::ast::{Node, NodeKind, NodeVisitor, TokenKind};
use search_query::builder::QueryBuilder;
use search_query::parser::Parser;
use search_query::printer::{node_to_pretty_string, to_pretty_string};
use search_query::query::Query;
use search_query::serializer::serialize;
use search_query::validator::validate;

fn parse(input: &str) -> Query {
    Parser::new().parse(input).unwrap()
}

// ============================================================================
// End To End
// ============================================================================

#[test]
fn test_parse_validate_optimize_serialize() {
    let query = parse("java AND java AND (spring OR spring)");
    assert!(validate(&query).is_valid());

    let optimized = query.optimize();
    assert_eq!(serialize(optimized.root()), "java AND spring");
    assert_eq!(optimized.original_query(), "java AND java AND (spring OR spring)");
}

#[test]
fn test_messy_input_normalizes_to_canonical_form() {
    let query = parse("Banana   APPLE  Cherry");
    let cleaned = query.normalize();
    assert_eq!(cleaned.to_string(), "apple AND banana AND cherry");
}

#[test]
fn test_display_is_the_canonical_serialization() {
    let query = parse("a OR b AND c");
    assert_eq!(query.to_string(), "a OR (b AND c)");
    assert_eq!(query.to_string(), serialize(query.root()));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn test_canonical_round_trips() {
    let test_cases = vec![
        "java AND spring",
        "java OR kotlin",
        "(a OR b) AND c",
        "-draft",
        "NOT (a AND b)",
        "NOT \"foo bar\"",
        "\"hello world\"",
        "title:rust",
        "title:\"hello world\"",
        "spring*",
        "roam~",
        "roam~1",
        "[1 TO 10]",
        "{1 TO 10}",
        "[1 TO 10}",
    ];

    for input in test_cases {
        let query = parse(input);
        assert_eq!(serialize(query.root()), input, "Failed for input: {}", input);
    }
}

#[test]
fn test_default_fuzzy_distance_renders_bare_tilde() {
    assert_eq!(serialize(parse("roam~2").root()), "roam~");
}

#[test]
fn test_implicit_operator_becomes_explicit() {
    assert_eq!(serialize(parse("hello world").root()), "hello AND world");
}

#[test]
fn test_nested_groups_keep_parens_below_the_root() {
    let query = parse("a AND (b OR (c AND d))");
    assert_eq!(serialize(query.root()), "a AND (b OR (c AND d))");
}

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_keyword_and_exclusion_polarity() {
    let query = parse("hello -world");
    assert_eq!(query.extract_keywords(), vec!["hello"]);
    assert_eq!(query.extract_exclusions(), vec!["world"]);
    assert!(query.has_exclusions());
}

#[test]
fn test_keywords_come_out_in_source_order() {
    let query = parse("(java OR kotlin) AND spring");
    assert_eq!(query.extract_keywords(), vec!["java", "kotlin", "spring"]);
}

#[test]
fn test_phrase_wildcard_and_field_extraction() {
    let query = parse("\"web framework\" spri* author:alice author:bob");

    assert_eq!(query.extract_phrases(), vec!["web framework"]);
    assert_eq!(query.extract_wildcards(), vec!["spri*"]);

    let fields = query.extract_fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["author"], vec!["alice", "bob"]);
}

#[test]
fn test_negated_phrase_counts_as_exclusion() {
    let query = parse("greeting NOT \"hello world\"");
    assert_eq!(query.extract_phrases(), Vec::<String>::new());
    assert_eq!(query.extract_exclusions(), vec!["hello world"]);
}

#[test]
fn test_find_and_count_nodes() {
    let query = parse("(a OR b) AND (c OR d) AND e");

    assert_eq!(query.count_nodes(NodeKind::Or), 2);
    assert_eq!(query.count_nodes(NodeKind::Token), 5);

    let groups = query.find_nodes(NodeKind::Or);
    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|node| node.children().len() == 2));
}

#[test]
fn test_is_empty() {
    assert!(parse("").is_empty());
    assert!(!parse("hello").is_empty());
    assert!(!parse("-draft").is_empty());
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_single_term() {
    let query = QueryBuilder::new().keyword("hello").build();
    assert_eq!(
        *query.root(),
        Node::Token {
            kind: TokenKind::Keyword,
            value: "hello".to_string(),
        }
    );
    assert_eq!(query.original_query(), "hello");
}

#[test]
fn test_builder_multiple_terms_combine_under_and() {
    let query = QueryBuilder::new().keywords(["java", "spring"]).build();
    assert_eq!(query.to_string(), "java AND spring");
}

#[test]
fn test_builder_complex_query() {
    let query = QueryBuilder::new()
        .or()
        .keyword("java")
        .keyword("kotlin")
        .end_group()
        .phrase("web framework")
        .exclude("legacy")
        .build();

    assert_eq!(
        query.to_string(),
        "(java OR kotlin) AND \"web framework\" AND -legacy"
    );
    assert!(query.has_exclusions());
    assert_eq!(query.extract_exclusions(), vec!["legacy"]);
}

#[test]
fn test_builder_not_group_with_several_terms_wraps_in_and() {
    let query = QueryBuilder::new()
        .keyword("rust")
        .not()
        .keyword("draft")
        .keyword("archived")
        .end_group()
        .build();

    assert_eq!(query.to_string(), "rust AND NOT (draft AND archived)");
}

#[test]
fn test_builder_ranges_and_fuzzy() {
    let query = QueryBuilder::new()
        .field_range("price", "10", "100")
        .range_exclusive("1", "5")
        .fuzzy("roam")
        .fuzzy_with_edits("color", 1)
        .build();

    assert_eq!(
        query.to_string(),
        "price:[10 TO 100] AND {1 TO 5} AND roam~ AND color~1"
    );
}

#[test]
fn test_builder_clamps_fuzzy_edits() {
    let query = QueryBuilder::new().fuzzy_with_edits("roam", 9).build();
    assert_eq!(
        *query.root(),
        Node::Fuzzy {
            term: "roam".to_string(),
            max_edits: 2,
        }
    );
}

#[test]
fn test_builder_empty_group_adds_nothing() {
    let query = QueryBuilder::new().keyword("a").or().end_group().build();
    assert_eq!(query.to_string(), "a");
}

#[test]
fn test_builder_with_no_terms_is_empty() {
    let query = QueryBuilder::new().build();
    assert!(query.is_empty());
    assert_eq!(*query.root(), Node::Root(vec![]));
}

#[test]
fn test_builder_closes_unclosed_groups_on_build() {
    let query = QueryBuilder::new().or().keyword("a").keyword("b").build();
    assert_eq!(query.to_string(), "a OR b");
}

#[test]
fn test_builder_output_parses_back_to_the_same_tree() {
    let built = QueryBuilder::new()
        .or()
        .keyword("java")
        .keyword("kotlin")
        .end_group()
        .phrase("web framework")
        .build();

    let reparsed = parse(built.original_query());
    assert_eq!(reparsed.root(), built.root());
}

// ============================================================================
// Printer
// ============================================================================

#[test]
fn test_pretty_printer_output() {
    let query = parse("java AND spring");
    assert_eq!(
        to_pretty_string(&query),
        "Query: java AND spring\n\
         AST:\n\
         └─ And (2 children)\n\
         \x20 └─ Token[Keyword]: \"java\"\n\
         \x20 └─ Token[Keyword]: \"spring\"\n"
    );
}

#[test]
fn test_pretty_printer_leaf_shapes() {
    assert_eq!(
        node_to_pretty_string(&Node::Field {
            name: "title".to_string(),
            value: "rust".to_string(),
        }),
        "└─ Field: title=\"rust\"\n"
    );
    assert_eq!(
        node_to_pretty_string(&Node::Fuzzy {
            term: "roam".to_string(),
            max_edits: 1,
        }),
        "└─ Fuzzy: \"roam\" ~1\n"
    );
    assert_eq!(
        node_to_pretty_string(parse("[1 TO 10]").root()),
        "└─ Range: [1 TO 10]\n"
    );
}

// ============================================================================
// Visitors
// ============================================================================

struct LeafCollector {
    leaves: Vec<String>,
}

impl NodeVisitor for LeafCollector {
    type Output = ();

    fn default_output(&mut self) -> Self::Output {}

    fn visit_token(&mut self, _kind: TokenKind, value: &str) -> Self::Output {
        self.leaves.push(value.to_string());
    }

    fn visit_phrase(&mut self, phrase: &str) -> Self::Output {
        self.leaves.push(format!("\"{phrase}\""));
    }
}

#[test]
fn test_custom_visitor_recurses_through_groups_by_default() {
    let query = parse("(a OR b) AND \"c d\"");
    let mut collector = LeafCollector { leaves: Vec::new() };
    query.accept(&mut collector);

    assert_eq!(collector.leaves, vec!["a", "b", "\"c d\""]);
}
