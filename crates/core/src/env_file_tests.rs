// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_simple_pairs() {
    let parsed = parse("A=1\nB=2");
    assert_eq!(parsed.get("A").map(String::as_str), Some("1"));
    assert_eq!(parsed.get("B").map(String::as_str), Some("2"));
    assert_eq!(parsed.len(), 2);
}

#[test]
fn ignores_blank_lines_and_comments() {
    let parsed = parse("# a comment\n\nA=1\n  # indented comment\nB=2\n");
    assert_eq!(parsed.len(), 2);
}

#[test]
fn unwraps_quoted_values() {
    let parsed = parse("A=\"hello world\"\nB='single quoted'");
    assert_eq!(parsed.get("A").map(String::as_str), Some("hello world"));
    assert_eq!(parsed.get("B").map(String::as_str), Some("single quoted"));
}

#[test]
fn skips_lines_without_equals() {
    let parsed = parse("not-a-pair\nA=1");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get("A").map(String::as_str), Some("1"));
}

#[test]
fn values_may_contain_equals_signs() {
    let parsed = parse("URL=https://example.com?a=1&b=2");
    assert_eq!(
        parsed.get("URL").map(String::as_str),
        Some("https://example.com?a=1&b=2")
    );
}

proptest::proptest! {
    #[test]
    fn round_trips_arbitrary_key_value_lines(
        pairs in proptest::collection::vec(
            ("[A-Z][A-Z0-9_]{0,10}", "[a-zA-Z0-9 ]{0,20}"),
            0..8,
        )
    ) {
        let content: String = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();
        let parsed = parse(&content);
        let mut expected = std::collections::BTreeMap::new();
        for (k, v) in &pairs {
            expected.insert(k.clone(), v.clone());
        }
        proptest::prop_assert_eq!(parsed, expected);
    }
}
