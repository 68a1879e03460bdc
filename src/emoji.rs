//! Emoji glyph scanning over free text.
//!
//! A glyph is one full emoji sequence, so a ZWJ family, a flag or a skin-toned hand
//! counts once rather than once per code point. Plain digits, `#` and `*` only count
//! inside a keycap sequence.
//!
//! Pictographs must be assigned code points in the Unicode tables `regex` ships:
//! `Extended_Pictographic` also covers reserved blocks, which are not emoji yet.
//! Emoji added after that Unicode version are therefore not counted.

use regex::Regex;
use std::sync::OnceLock;

const EMOJI_SEQUENCE: &str = r"(?x)
      \x{1F3F4} [\x{E0020}-\x{E007E}]+ \x{E007F}
    | [\x{1F1E6}-\x{1F1FF}]{2}
    | [0-9\#\*] \x{FE0F}? \x{20E3}
    | (?: [\p{Extended_Pictographic}&&\p{Assigned}] | \p{Emoji_Modifier} ) \p{Emoji_Modifier}? \x{FE0F}?
      (?: \x{200D} [\p{Extended_Pictographic}&&\p{Assigned}] \p{Emoji_Modifier}? \x{FE0F}? )*
";

static EMOJI_RE: OnceLock<Regex> = OnceLock::new();

fn emoji_regex() -> &'static Regex {
    EMOJI_RE.get_or_init(|| Regex::new(EMOJI_SEQUENCE).expect("valid emoji pattern"))
}

/// Every emoji glyph occurrence in `text`, left to right. Repeats are kept.
pub fn emoji_glyphs(text: &str) -> impl Iterator<Item = &str> + '_ {
    emoji_regex().find_iter(text).map(|m| m.as_str())
}
