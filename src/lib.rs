mod config;
mod date;
mod error;
mod record;
mod source;
mod util;

mod emoji;
mod key_extractor;
mod counting;
mod topk;
mod progress;
mod streaming;
mod query;
mod pipeline;

mod profile;

pub use crate::config::{QueryOptions, SecondaryPasses, Strategy, DEFAULT_K, DEFAULT_SOURCE};
pub use crate::date::{day_key, parse_day};
pub use crate::error::{DecodeError, SourceError};
pub use crate::pipeline::TweetETL;

// Record model and total field accessors.
pub use crate::record::{list_field, nested_str, str_field, Record};

// Restartable source: open / scan / rescan.
pub use crate::source::{RecordSource, Scan, ScanStats};

// Extraction, counting and selection building blocks.
pub use crate::emoji::emoji_glyphs;
pub use crate::key_extractor::{day_and_author, mentioned_handles, KeyExtractor};
pub use crate::counting::CountAccumulator;
pub use crate::topk::{is_ranked, rank_order, top_k, TopK};

// Query drivers, usable without the builder.
pub use crate::query::{count_keys, top_dates, top_emojis, top_keys, top_mentions, DailyTopAuthor};

// Profiling and progress helpers for binaries.
pub use crate::profile::{ContentLengths, DatasetProfile, DateFormats, DecodeSample, FieldProfile, MentionProfile, CRITICAL_FIELDS};
pub use crate::progress::set_global_multiprogress;
pub use crate::util::init_tracing_once;
