#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use time::{Date, Month};
use tweet_topk::{DailyTopAuthor, SecondaryPasses, Strategy};

fn row(day: &str, day_count: u64, author: &str, author_count: u64) -> DailyTopAuthor {
    DailyTopAuthor { day: day.into(), day_count, author: author.into(), author_count }
}

/// Three records on 2021-02-01 by alice, alice, bob and one on 2021-02-02 by carol.
/// Records without a usable author or a string date never count.
/// Outcome: 2021-02-01 (3, alice 2) ranks before 2021-02-02 (1, carol 1) under both strategies.
#[test]
fn top_dates_basic_scenario() {
    let (_dir, path) = make_corpus_basic();
    let expected = vec![row("2021-02-01", 3, "alice", 2), row("2021-02-02", 1, "carol", 1)];

    for strategy in [Strategy::Time, Strategy::Memory] {
        let got = etl(&path, strategy).top_dates().unwrap();
        assert_eq!(got, expected, "strategy {:?}", strategy);
    }
}

/// The fused secondary pass must agree with one pass per selected day.
#[test]
fn fused_secondary_pass_matches_per_date_passes() {
    let (_dir, path) = make_corpus_synthetic(600, 7);
    let per_date = etl(&path, Strategy::Memory).top_dates().unwrap();
    let fused = etl(&path, Strategy::Memory)
        .secondary_passes(SecondaryPasses::Fused)
        .top_dates()
        .unwrap();
    assert_eq!(per_date, fused);
    assert!(!per_date.is_empty());
}

/// Equal day counts resolve by the day string ascending; equal author counts by username.
#[test]
fn top_dates_ties_break_lexicographically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ties.json");
    write_lines(&path, &[
        tweet(Some("2021-02-03T01:00:00"), Some("zed"), json!(null), None),
        tweet(Some("2021-02-03T02:00:00"), Some("amy"), json!(null), None),
        tweet(Some("2021-02-02T01:00:00"), Some("bob"), json!(null), None),
        tweet(Some("2021-02-02T02:00:00"), Some("bob"), json!(null), None),
    ]);

    for strategy in [Strategy::Time, Strategy::Memory] {
        let got = etl(&path, strategy).top_dates().unwrap();
        assert_eq!(
            got,
            vec![row("2021-02-02", 2, "bob", 2), row("2021-02-03", 2, "amy", 1)],
            "strategy {:?}",
            strategy
        );
    }
}

/// Only `k` days are reported, and the memory strategy's secondary work shrinks with them.
#[test]
fn top_dates_respects_k_and_parses_dates() {
    let (_dir, path) = make_corpus_basic();
    let got = etl(&path, Strategy::Memory).top(1).top_dates().unwrap();
    assert_eq!(got.len(), 1);
    assert_eq!(got[0].key(), ("2021-02-01", "alice"));
    assert_eq!(got[0].date(), Some(Date::from_calendar_date(2021, Month::February, 1).unwrap()));
}

/// A day key that is not a calendar date still groups; it just has no parsed date.
#[test]
fn short_and_odd_dates_are_truncated_not_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.json");
    write_lines(&path, &[
        tweet(Some("yesterday"), Some("amy"), json!(null), None),
        tweet(Some("yesterday"), Some("amy"), json!(null), None),
        tweet(Some("2021-02-01T00:00:00"), Some("bob"), json!(null), None),
    ]);
    let got = etl(&path, Strategy::Time).top_dates().unwrap();
    assert_eq!(got[0], row("yesterday", 2, "amy", 2));
    assert_eq!(got[0].date(), None);
    assert_eq!(got[1], row("2021-02-01", 1, "bob", 1));
}

/// No record with both a date and an author: empty result, not an error.
#[test]
fn top_dates_empty_when_nothing_qualifies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("none.json");
    write_lines(&path, &[
        tweet(None, Some("amy"), json!("🙏"), None),
        tweet(Some("2021-02-01T00:00:00"), None, json!("🙏"), None),
        "not json".to_string(),
    ]);
    for strategy in [Strategy::Time, Strategy::Memory] {
        for mode in [SecondaryPasses::PerDate, SecondaryPasses::Fused] {
            let got = etl(&path, strategy).secondary_passes(mode).top_dates().unwrap();
            assert!(got.is_empty());
        }
    }
}
