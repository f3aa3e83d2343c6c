// tests/transform_tests.rs

#[cfg(test)]
mod tests {
    use search_query::ast::{Node, TokenKind};
    use search_query::parser::Parser;
    use search_query::serializer::serialize;
    use search_query::transform::{
        flatten_booleans, lowercase_terms, normalize, normalize_whitespace, optimize,
        remove_diacritics, remove_duplicates, remove_empty_groups, simplify_booleans, sort_terms,
    };

    fn root_of(input: &str) -> Node {
        Parser::new().parse(input).unwrap().root().clone()
    }

    fn keyword(value: &str) -> Node {
        Node::Token {
            kind: TokenKind::Keyword,
            value: value.to_string(),
        }
    }

    // ========================================================================
    // Text Rewrites
    // ========================================================================

    #[test]
    fn test_lowercase_terms_rewrites_all_literal_text() {
        let root = root_of("Java \"Web Framework\" Spri* roAm~1");
        let lowered = lowercase_terms(&root);

        assert_eq!(lowered, root_of("java \"web framework\" spri* roam~1"));
    }

    #[test]
    fn test_lowercase_terms_keeps_field_names_verbatim() {
        let root = Node::Field {
            name: "Title".to_string(),
            value: "RUST".to_string(),
        };
        assert_eq!(
            lowercase_terms(&root),
            Node::Field {
                name: "Title".to_string(),
                value: "rust".to_string(),
            }
        );
    }

    #[test]
    fn test_lowercase_terms_leaves_range_bounds_alone() {
        let root = root_of("[A TO Z]");
        assert_eq!(lowercase_terms(&root), root);
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs_and_trims() {
        let root = Node::Phrase("  hello   world ".to_string());
        assert_eq!(
            normalize_whitespace(&root),
            Node::Phrase("hello world".to_string())
        );
    }

    #[test]
    fn test_remove_diacritics() {
        let test_cases = vec![
            ("café", "cafe"),
            ("naïve", "naive"),
            ("résumé", "resume"),
            ("plain", "plain"),
        ];

        for (input, expected) in test_cases {
            let stripped = remove_diacritics(&keyword(input));
            assert_eq!(stripped, keyword(expected), "Failed for input: {}", input);
        }
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    #[test]
    fn test_sort_terms_orders_group_children_alphabetically() {
        let root = root_of("charlie alpha bravo");
        assert_eq!(sort_terms(&root), root_of("alpha bravo charlie"));
    }

    #[test]
    fn test_sort_terms_never_crosses_group_boundaries() {
        // The Or stays where it sorts as a whole; its children sort among
        // themselves.
        let root = root_of("zulu (delta OR charlie)");
        let sorted = sort_terms(&root);
        assert_eq!(sorted, root_of("(charlie OR delta) zulu"));
    }

    // ========================================================================
    // Deduplication
    // ========================================================================

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let root = root_of("java spring java");
        assert_eq!(remove_duplicates(&root), root_of("java spring"));
    }

    #[test]
    fn test_remove_duplicates_group_key_ignores_group_contents() {
        // The dedupe key is variant plus rendered value, and a group's own
        // value is just its operator name, so sibling groups with the same
        // operator merge down to the first one.
        let root = root_of("(java OR kotlin) (java OR scala)");
        assert_eq!(
            remove_duplicates(&root),
            Node::And(vec![root_of("java OR kotlin")])
        );
    }

    #[test]
    fn test_fields_with_different_names_never_merge() {
        let root = root_of("author:alice title:alice");
        assert_eq!(remove_duplicates(&root), root);
    }

    #[test]
    fn test_duplicate_run_collapses_to_single_term() {
        let deduped = remove_duplicates(&root_of("a a a"));
        // A single survivor still sits in the And group until simplification.
        assert_eq!(deduped, Node::And(vec![keyword("a")]));
        assert_eq!(simplify_booleans(&deduped), keyword("a"));
    }

    // ========================================================================
    // Boolean Structure
    // ========================================================================

    #[test]
    fn test_flatten_booleans_merges_same_operator_groups() {
        let root = Node::And(vec![
            keyword("a"),
            Node::And(vec![keyword("b"), keyword("c")]),
        ]);
        assert_eq!(
            flatten_booleans(&root),
            Node::And(vec![keyword("a"), keyword("b"), keyword("c")])
        );
    }

    #[test]
    fn test_flatten_booleans_keeps_mixed_operators_nested() {
        let root = root_of("a AND (b OR c)");
        assert_eq!(flatten_booleans(&root), root);
    }

    #[test]
    fn test_flatten_booleans_is_bottom_up() {
        let root = Node::Or(vec![
            keyword("a"),
            Node::Or(vec![keyword("b"), Node::Or(vec![keyword("c")])]),
        ]);
        assert_eq!(
            flatten_booleans(&root),
            Node::Or(vec![keyword("a"), keyword("b"), keyword("c")])
        );
    }

    #[test]
    fn test_simplify_booleans_unwraps_singleton_groups() {
        let root = Node::And(vec![Node::Or(vec![keyword("a")])]);
        assert_eq!(simplify_booleans(&root), keyword("a"));
    }

    #[test]
    fn test_simplify_booleans_cancels_double_negation() {
        let root = root_of("NOT NOT x");
        assert_eq!(simplify_booleans(&root), keyword("x"));

        let root = root_of("NOT NOT NOT x");
        assert_eq!(simplify_booleans(&root), Node::Not(Box::new(keyword("x"))));
    }

    #[test]
    fn test_simplify_booleans_never_unwraps_root() {
        let root = Node::Root(vec![keyword("a")]);
        assert_eq!(simplify_booleans(&root), root);
    }

    #[test]
    fn test_remove_empty_groups_cascades_upward() {
        let root = Node::And(vec![
            keyword("a"),
            Node::Or(vec![Node::And(vec![])]),
        ]);
        assert_eq!(remove_empty_groups(&root), Node::And(vec![keyword("a")]));
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    #[test]
    fn test_normalize_pipeline() {
        let root = root_of("Banana Apple CHERRY");
        assert_eq!(normalize(&root), root_of("apple banana cherry"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let test_cases = vec![
            "Banana Apple",
            "java AND Spring",
            "(Kotlin OR Java) web",
            "title:Rust \"Hello  World\"",
        ];

        for input in test_cases {
            let once = normalize(&root_of(input));
            let twice = normalize(&once);
            assert_eq!(once, twice, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_optimize_pipeline() {
        // Dedupe leaves a singleton Or, flattening and simplification then
        // erase it.
        let root = root_of("a AND (b OR b) AND a");
        assert_eq!(
            optimize(&root),
            Node::And(vec![keyword("a"), keyword("b")])
        );
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let test_cases = vec![
            "a AND a AND b",
            "(a OR b) OR c",
            "NOT NOT x",
            "java spring java spring",
        ];

        for input in test_cases {
            let once = optimize(&root_of(input));
            let twice = optimize(&once);
            assert_eq!(once, twice, "Failed for input: {}", input);
        }
    }

    #[test]
    fn test_transforms_leave_the_input_tree_unchanged() {
        let root = root_of("Charlie Alpha Charlie");
        let before = root.clone();

        normalize(&root);
        optimize(&root);
        remove_diacritics(&root);

        assert_eq!(root, before);
    }

    // ========================================================================
    // Query Integration
    // ========================================================================

    #[test]
    fn test_query_normalize_keeps_original_text() {
        let query = Parser::new().parse("Banana Apple").unwrap();
        let normalized = query.normalize();

        assert_eq!(normalized.original_query(), "Banana Apple");
        assert_eq!(serialize(normalized.root()), "apple AND banana");
    }

    #[test]
    fn test_query_optimize_rewrites_the_tree_only() {
        let query = Parser::new().parse("java java spring").unwrap();
        let optimized = query.optimize();

        assert_eq!(optimized.extract_keywords(), vec!["java", "spring"]);
        assert_eq!(query.extract_keywords(), vec!["java", "java", "spring"]);
    }
}
