#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use tweet_topk::{KeyExtractor, Strategy};

/// Mention lists [X, Y], [X], null and [].
/// Outcome: ("X", 2) above ("Y", 1); null and empty lists add nothing.
#[test]
fn top_mentions_counts_every_listed_handle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mentions.json");
    write_lines(&path, &[
        tweet(None, None, json!(null), Some(mentions(&["X", "Y"]))),
        tweet(None, None, json!(null), Some(mentions(&["X"]))),
        tweet(None, None, json!(null), Some(json!(null))),
        tweet(None, None, json!(null), Some(json!([]))),
    ]);

    for strategy in [Strategy::Time, Strategy::Memory] {
        let got = etl(&path, strategy).top_mentions().unwrap();
        assert_eq!(got, vec![("X".to_string(), 2), ("Y".to_string(), 1)], "strategy {:?}", strategy);
    }
}

#[test]
fn top_mentions_basic_corpus() {
    let (_dir, path) = make_corpus_basic();
    let got = etl(&path, Strategy::Time).top_mentions().unwrap();
    assert_eq!(got, vec![("narendramodi".to_string(), 2), ("rahulgandhi".to_string(), 1)]);
}

/// Entries that are not objects, or whose username is null/missing, are skipped one by one;
/// the rest of the list still counts. A mention repeated in one record counts twice.
#[test]
fn malformed_mention_entries_are_skipped_individually() {
    let ex = KeyExtractor::mentions();
    let rec = json!({
        "mentionedUsers": [
            { "username": "rihanna" },
            { "username": null },
            { "displayname": "no handle" },
            "junk",
            42,
            { "username": "rihanna" }
        ]
    });
    assert_eq!(ex.keys(&rec), vec!["rihanna", "rihanna"]);
    assert!(ex.keys(&json!({ "mentionedUsers": "rihanna" })).is_empty());
    assert!(ex.keys(&json!({ "mentionedUsers": { "username": "rihanna" } })).is_empty());
}
