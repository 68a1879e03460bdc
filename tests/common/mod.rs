#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tweet_topk::{Strategy, TweetETL};

/// Write raw lines (JSON or not) to a plain NDJSON file.
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write the same lines as a zstd-compressed file.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// A tweet-shaped record. `None` leaves the field out entirely.
pub fn tweet(date: Option<&str>, username: Option<&str>, content: Value, mentions: Option<Value>) -> String {
    let mut obj = json!({ "content": content, "url": "https://twitter.com/x/status/1", "id": 1 });
    if let Some(d) = date {
        obj["date"] = json!(d);
    }
    if let Some(u) = username {
        obj["user"] = json!({ "username": u, "displayname": u.to_uppercase(), "followersCount": 10 });
    }
    if let Some(m) = mentions {
        obj["mentionedUsers"] = m;
    }
    obj.to_string()
}

pub fn mentions(handles: &[&str]) -> Value {
    Value::Array(
        handles
            .iter()
            .map(|h| json!({ "username": h, "displayname": h, "id": 7 }))
            .collect(),
    )
}

/// Small corpus with known answers:
/// - 2021-02-01: alice x2, bob x1; 2021-02-02: carol x1
/// - emojis: 🙏 x3, 😀 x1
/// - mentions: narendramodi x2, rahulgandhi x1
/// plus noise that must not count: a broken line, a non-object line, a blank line,
/// a record without `user`, a record with a null username, a numeric `date`.
pub fn basic_lines() -> Vec<String> {
    vec![
        tweet(Some("2021-02-01T10:00:00+00:00"), Some("alice"), json!("🙏🙏 support farmers"), Some(mentions(&["narendramodi", "rahulgandhi"]))),
        tweet(Some("2021-02-01T11:30:00+00:00"), Some("alice"), json!("🙏😀"), Some(mentions(&["narendramodi"]))),
        "{\"date\": \"2021-02-01T12:00:00+00:00\", \"content\": ".to_string(),
        tweet(Some("2021-02-01T12:00:00+00:00"), Some("bob"), Value::Null, Some(Value::Null)),
        "42".to_string(),
        String::new(),
        tweet(Some("2021-02-02T09:00:00+00:00"), Some("carol"), json!("no emoji here 123 #tag *"), Some(json!([]))),
        tweet(Some("2021-02-02T10:00:00+00:00"), None, json!("plain"), None),
        json!({ "date": "2021-02-02T11:00:00+00:00", "user": { "username": null }, "content": "x" }).to_string(),
        json!({ "date": 20210203, "user": { "username": "dave" }, "content": "y" }).to_string(),
    ]
}

pub fn make_corpus_basic() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tweets.json");
    write_lines(&path, &basic_lines());
    (dir, path)
}

/// Deterministic pseudo-random corpus with heavy ties and every kind of noise.
pub fn synthetic_lines(n: usize, seed: u64) -> Vec<String> {
    let days = ["2021-02-01", "2021-02-02", "2021-02-03", "2021-02-04", "2021-02-05", "2021-02-06", "2021-02-07"];
    let users = ["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];
    let texts = [
        "🙏", "🙏🙏🙏", "😀 hi 😀", "🇮🇳 jai kisan", "👍🏽👍🏽", "👨‍👩‍👧 family", "❤️🙏", "1️⃣ first", "no emoji", "#farmers 2021",
    ];
    let handles = ["narendramodi", "rahulgandhi", "diljitdosanjh", "rihanna", "gretathunberg"];

    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move |m: usize| -> usize {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % m
    };

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        if i % 41 == 40 {
            out.push("{broken".to_string());
            continue;
        }
        if i % 53 == 52 {
            out.push("[1,2,3]".to_string());
            continue;
        }
        // Skew towards the first days/users so ties and clear winners both occur.
        let day = days[next(days.len()).min(next(days.len()))];
        let hour = next(24);
        let date = format!("{day}T{hour:02}:00:00+00:00");
        let user = users[next(users.len()).min(next(users.len()))];

        let content = match next(12) {
            0 => Value::Null,
            1 => json!(["not", "a", "string"]),
            k => json!(texts[k % texts.len()]),
        };
        let mentions_v = match next(8) {
            0 => None,
            1 => Some(Value::Null),
            2 => Some(json!([])),
            3 => Some(json!([{ "username": null }, "junk", { "username": handles[next(handles.len())] }])),
            _ => {
                let take = 1 + next(3);
                let picked: Vec<&str> = (0..take).map(|_| handles[next(handles.len())]).collect();
                Some(mentions(&picked))
            }
        };
        let (date_opt, user_opt) = match next(20) {
            0 => (None, Some(user)),
            1 => (Some(date.as_str()), None),
            _ => (Some(date.as_str()), Some(user)),
        };
        out.push(tweet(date_opt, user_opt, content, mentions_v));
    }
    out
}

pub fn make_corpus_synthetic(n: usize, seed: u64) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.json");
    write_lines(&path, &synthetic_lines(n, seed));
    (dir, path)
}

pub fn etl(path: &Path, strategy: Strategy) -> TweetETL {
    TweetETL::new().source(path).strategy(strategy).progress(false)
}
