//! Single-pass dataset profile: line quality, field presence/types, mention categories,
//! date shapes and content lengths. Reporting only; nothing here feeds the queries.

use crate::config::QueryOptions;
use crate::date::{date_shape, DateShape};
use crate::error::DecodeError;
use crate::key_extractor::{CONTENT_FIELD, DATE_FIELD, MENTIONS_FIELD, USERNAME_FIELD, USER_FIELD};
use crate::record::{json_type_name, Record};
use crate::source::RecordSource;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Instant;

/// Fields every query depends on.
pub const CRITICAL_FIELDS: [&str; 4] = [DATE_FIELD, CONTENT_FIELD, USER_FIELD, MENTIONS_FIELD];

const MAX_DECODE_SAMPLES: usize = 5;
const SAMPLE_TEXT_CHARS: usize = 100;

#[derive(Clone, Debug, Default, Serialize)]
pub struct FieldProfile {
    pub missing: u64,
    pub null: u64,
    /// JSON type name -> occurrences, over records where the field is present.
    pub types: BTreeMap<String, u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MentionProfile {
    pub with_mentions: u64,
    pub empty_list: u64,
    pub null_mentions: u64,
    pub missing_mentions: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DateFormats {
    pub iso_datetime: u64,
    pub date_only: u64,
    pub other: u64,
}

/// Content length in characters, over records whose `content` is a string.
/// Percentiles use the nearest-rank index `floor(n * q)` of the sorted lengths.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ContentLengths {
    pub count: u64,
    pub min_chars: Option<u64>,
    pub max_chars: Option<u64>,
    pub total_chars: u64,
    pub p50_chars: Option<u64>,
    pub p95_chars: Option<u64>,
    pub p99_chars: Option<u64>,
    /// length -> records; bounded by the number of distinct lengths.
    #[serde(skip)]
    histogram: BTreeMap<u64, u64>,
}

impl ContentLengths {
    fn observe(&mut self, chars: u64) {
        self.count += 1;
        self.total_chars += chars;
        self.min_chars = Some(self.min_chars.map_or(chars, |m| m.min(chars)));
        self.max_chars = Some(self.max_chars.map_or(chars, |m| m.max(chars)));
        *self.histogram.entry(chars).or_insert(0) += 1;
    }

    pub fn mean_chars(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_chars as f64 / self.count as f64)
    }

    /// Length at sorted position `floor(count * q)`, clamped to the last one.
    pub fn percentile(&self, q: f64) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        let rank = ((self.count as f64 * q) as u64).min(self.count - 1);
        let mut seen = 0u64;
        for (&len, &n) in &self.histogram {
            seen += n;
            if seen > rank {
                return Some(len);
            }
        }
        self.max_chars
    }

    fn fill_percentiles(&mut self) {
        self.p50_chars = self.percentile(0.50);
        self.p95_chars = self.percentile(0.95);
        self.p99_chars = self.percentile(0.99);
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DecodeSample {
    pub line: u64,
    pub error: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct DatasetProfile {
    pub total_lines: u64,
    pub valid_records: u64,
    pub decode_errors: u64,
    pub non_object_lines: u64,
    pub blank_lines: u64,
    pub fields: BTreeMap<String, FieldProfile>,
    pub mentions: MentionProfile,
    pub date_formats: DateFormats,
    pub content_lengths: ContentLengths,
    /// Records whose `user` object has no `username`, or a null one.
    pub missing_username: u64,
    pub decode_samples: Vec<DecodeSample>,
    /// True when `profile_sample` cut the pass short.
    pub sampled: bool,
    pub elapsed_secs: f64,
    pub lines_per_sec: f64,
}

impl DatasetProfile {
    /// Share of non-blank lines that decoded to a record.
    pub fn valid_fraction(&self) -> f64 {
        let seen = self.valid_records + self.decode_errors;
        if seen == 0 { 1.0 } else { self.valid_records as f64 / seen as f64 }
    }

    fn observe(&mut self, rec: &Record) {
        self.valid_records += 1;

        for field in CRITICAL_FIELDS {
            let fp = self.fields.entry(field.to_string()).or_default();
            match rec.get(field) {
                None => fp.missing += 1,
                Some(v) => {
                    if v.is_null() { fp.null += 1; }
                    *fp.types.entry(json_type_name(v).to_string()).or_insert(0) += 1;
                }
            }
        }

        match rec.get(MENTIONS_FIELD) {
            None => self.mentions.missing_mentions += 1,
            Some(Value::Null) => self.mentions.null_mentions += 1,
            Some(Value::Array(a)) if a.is_empty() => self.mentions.empty_list += 1,
            Some(Value::Array(_)) => self.mentions.with_mentions += 1,
            Some(_) => {}
        }

        if let Some(raw) = rec.get(DATE_FIELD).and_then(|v| v.as_str()) {
            match date_shape(raw) {
                DateShape::IsoDateTime => self.date_formats.iso_datetime += 1,
                DateShape::DateOnly => self.date_formats.date_only += 1,
                DateShape::Other => self.date_formats.other += 1,
            }
        }

        if let Some(Value::Object(user)) = rec.get(USER_FIELD) {
            if user.get(USERNAME_FIELD).map_or(true, Value::is_null) {
                self.missing_username += 1;
            }
        }

        if let Some(text) = rec.get(CONTENT_FIELD).and_then(|v| v.as_str()) {
            self.content_lengths.observe(text.chars().count() as u64);
        }
    }

    fn observe_error(&mut self, e: &DecodeError) {
        if matches!(e, DecodeError::NotAnObject { .. }) {
            self.non_object_lines += 1;
        }
        if self.decode_samples.len() < MAX_DECODE_SAMPLES {
            self.decode_samples.push(DecodeSample {
                line: e.line(),
                error: e.to_string().chars().take(SAMPLE_TEXT_CHARS).collect(),
            });
        }
    }
}

/// Profile `source` in one pass (or its first `opts.profile_sample` lines).
pub fn profile_source(source: &RecordSource, opts: &QueryOptions) -> Result<DatasetProfile> {
    let started = Instant::now();
    let mut profile = DatasetProfile::default();
    let mut scan = source
        .rescan()
        .with_context(|| format!("profile: open {}", source.path().display()))?;
    if let Some(limit) = opts.profile_sample {
        scan = scan.limit_lines(limit);
    }

    for item in scan.by_ref() {
        match item {
            Ok(rec) => profile.observe(&rec),
            Err(e) => profile.observe_error(&e),
        }
    }
    profile.sampled = scan.hit_line_limit();

    let stats = scan
        .finish()
        .with_context(|| format!("profile: read {}", source.path().display()))?;
    profile.total_lines = stats.lines;
    profile.decode_errors = stats.decode_errors;
    profile.blank_lines = stats.blank_lines;
    profile.elapsed_secs = started.elapsed().as_secs_f64();
    if profile.elapsed_secs > 0.0 {
        profile.lines_per_sec = profile.total_lines as f64 / profile.elapsed_secs;
    }
    profile.content_lengths.fill_percentiles();

    tracing::info!(
        lines = profile.total_lines,
        valid = profile.valid_records,
        invalid = profile.decode_errors,
        sampled = profile.sampled,
        lines_per_sec = profile.lines_per_sec as u64,
        "profile complete"
    );
    Ok(profile)
}
