use crate::date::day_key;
use crate::emoji::emoji_glyphs;
use crate::record::{list_field, nested_str, str_field, Record};
use serde_json::Value;
use std::sync::Arc;

pub const DATE_FIELD: &str = "date";
pub const USER_FIELD: &str = "user";
pub const USERNAME_FIELD: &str = "username";
pub const CONTENT_FIELD: &str = "content";
pub const MENTIONS_FIELD: &str = "mentionedUsers";

/// Derives zero, one or many grouping keys from a record.
///
/// Extraction is total: absent, null or wrong-typed fields simply yield no key.
///
///  - `Day`: calendar day of `date`, only when `user.username` is present too.
///  - `AuthorOn(day)`: `user.username` of records on `day`, same presence rule.
///  - `Emoji`: every emoji glyph in `content`, repeats included.
///  - `Mentions`: `username` of every entry in `mentionedUsers`.
///  - `JsonPointer` / `ByValue`: single string key from arbitrary JSON.
#[derive(Clone)]
pub enum KeyExtractor {
    Day,
    AuthorOn(String),
    Emoji,
    Mentions,
    JsonPointer(String),
    ByValue(Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>),
}

impl KeyExtractor {
    pub fn day() -> Self { Self::Day }
    pub fn author_on(day: impl Into<String>) -> Self { Self::AuthorOn(day.into()) }
    pub fn emoji() -> Self { Self::Emoji }
    pub fn mentions() -> Self { Self::Mentions }
    pub fn json_pointer(ptr: impl Into<String>) -> Self { Self::JsonPointer(ptr.into()) }
    pub fn by_value(f: impl Fn(&Value) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::ByValue(Arc::new(f))
    }

    /// Call `emit` once per key in `rec`.
    pub fn for_each_key(&self, rec: &Record, mut emit: impl FnMut(String)) {
        match self {
            KeyExtractor::Day => {
                if let Some((day, _)) = day_and_author(rec) {
                    emit(day.to_string());
                }
            }
            KeyExtractor::AuthorOn(want) => {
                if let Some((day, author)) = day_and_author(rec) {
                    if day == want { emit(author.to_string()); }
                }
            }
            KeyExtractor::Emoji => {
                if let Some(text) = str_field(rec, CONTENT_FIELD) {
                    for g in emoji_glyphs(text) { emit(g.to_string()); }
                }
            }
            KeyExtractor::Mentions => {
                for handle in mentioned_handles(rec) { emit(handle.to_string()); }
            }
            KeyExtractor::JsonPointer(ptr) => {
                if let Some(s) = rec.pointer(ptr).and_then(|x| x.as_str()) {
                    emit(s.to_string());
                }
            }
            KeyExtractor::ByValue(f) => {
                if let Some(k) = f(rec) { emit(k); }
            }
        }
    }

    /// Collected form of `for_each_key`.
    pub fn keys(&self, rec: &Record) -> Vec<String> {
        let mut out = Vec::new();
        self.for_each_key(rec, |k| out.push(k));
        out
    }

    /// Top-level fields this extractor reads, or `None` when it may read anything.
    /// The time strategy projects materialized records down to these.
    pub fn fields(&self) -> Option<&'static [&'static str]> {
        match self {
            KeyExtractor::Day | KeyExtractor::AuthorOn(_) => Some(&[DATE_FIELD, USER_FIELD]),
            KeyExtractor::Emoji => Some(&[CONTENT_FIELD]),
            KeyExtractor::Mentions => Some(&[MENTIONS_FIELD]),
            KeyExtractor::JsonPointer(_) | KeyExtractor::ByValue(_) => None,
        }
    }
}

/// `(day, author)` when both `date` and `user.username` are usable strings.
pub fn day_and_author(rec: &Record) -> Option<(&str, &str)> {
    let date = str_field(rec, DATE_FIELD)?;
    let author = nested_str(rec, USER_FIELD, USERNAME_FIELD)?;
    Some((day_key(date), author))
}

/// Handles in `mentionedUsers`, skipping entries without a string `username`.
pub fn mentioned_handles(rec: &Record) -> impl Iterator<Item = &str> {
    list_field(rec, MENTIONS_FIELD)
        .unwrap_or(&[])
        .iter()
        .filter_map(|m| m.get(USERNAME_FIELD).and_then(|x| x.as_str()))
}
