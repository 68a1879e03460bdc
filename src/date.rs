use time::macros::format_description;
use time::Date;

/// Number of leading characters that form the calendar-day key ("YYYY-MM-DD").
pub const DAY_KEY_CHARS: usize = 10;

/// Truncate a timestamp string to its day key.
/// Character-based, so a short or non-ASCII value never splits a code point.
pub fn day_key(date: &str) -> &str {
    match date.char_indices().nth(DAY_KEY_CHARS) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Parse a "YYYY-MM-DD" day key. Anything else yields `None`.
pub fn parse_day(day: &str) -> Option<Date> {
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

/// Coarse shape of a raw `date` value, used by the dataset profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateShape {
    /// "YYYY-MM-DDTHH:MM:SS..." (the dump's native form)
    IsoDateTime,
    /// Exactly "YYYY-MM-DD"
    DateOnly,
    Other,
}

pub fn date_shape(raw: &str) -> DateShape {
    if parse_day(day_key(raw)).is_none() {
        return DateShape::Other;
    }
    match raw.chars().nth(DAY_KEY_CHARS) {
        None => DateShape::DateOnly,
        Some('T') | Some(' ') => DateShape::IsoDateTime,
        Some(_) => DateShape::Other,
    }
}
