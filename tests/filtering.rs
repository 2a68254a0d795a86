use std::collections::BTreeSet;

use fpl_leagues::filter::{TextMatcher, filter_managers, is_visible};
use fpl_leagues::model::{Manager, Scores};

fn manager(id: u32, name: &str, leagues: &[u32]) -> Manager {
    Manager {
        id,
        player_name: name.to_string(),
        leagues: leagues.iter().copied().collect(),
        scores: Scores::default(),
    }
}

fn set(ids: &[u32]) -> BTreeSet<u32> {
    ids.iter().copied().collect()
}

fn sample() -> Vec<Manager> {
    vec![
        manager(1, "A", &[1, 2]),
        manager(2, "B", &[2]),
        manager(3, "C", &[1]),
    ]
}

#[test]
fn keeps_input_order_for_active_league() {
    let rows = filter_managers(&sample(), &set(&[2]), &TextMatcher::match_all());
    let ids: Vec<u32> = rows.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn no_active_leagues_shows_nothing() {
    for raw in ["", "a", "zzz"] {
        let matcher = TextMatcher::compile(raw);
        assert!(filter_managers(&sample(), &BTreeSet::new(), &matcher).is_empty());
    }
}

#[test]
fn all_leagues_and_empty_query_is_identity() {
    let rows = sample();
    let matcher = TextMatcher::compile("");
    assert!(matcher.is_match_all());
    assert_eq!(filter_managers(&rows, &set(&[1, 2]), &matcher), rows);
}

#[test]
fn unicode_names_match_case_insensitively() {
    let lower = TextMatcher::compile("é");
    assert!(lower.matches("José"));
    assert!(lower.matches("JOSÉ"));

    let upper = TextMatcher::compile("JOSÉ");
    assert!(upper.matches("josé álvarez"));
    assert!(!upper.matches("Jose"));
}

#[test]
fn metacharacters_are_literal() {
    for raw in ["(", "[a-z]+", "a.b", "\\", "$^|#", "{2}", "*"] {
        let matcher = TextMatcher::compile(raw);
        assert!(matcher.matches(&format!("x{raw}y")), "{raw} should match itself");
    }
    let dot = TextMatcher::compile("a.b");
    assert!(!dot.matches("axb"));
}

#[test]
fn both_predicates_must_hold() {
    let m = manager(7, "Liam Hughes", &[3]);
    let hughes = TextMatcher::compile("hughes");
    assert!(is_visible(&m, &set(&[3]), &hughes));
    assert!(!is_visible(&m, &set(&[4]), &hughes));
    let other = TextMatcher::compile("berg");
    assert!(!is_visible(&m, &set(&[3]), &other));
}

#[test]
fn oversized_query_still_matches_literally() {
    let query = "é".repeat(200_000);
    let matcher = TextMatcher::compile(&query);
    assert!(!matcher.is_match_all());
    assert_eq!(matcher.raw(), query);
    assert!(!matcher.matches("José"));
    assert!(matcher.matches(&format!("x{}y", "É".repeat(200_000))));

    let rows = filter_managers(&sample(), &set(&[1, 2]), &matcher);
    assert!(rows.is_empty());
}
