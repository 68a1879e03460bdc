//! The three top-K queries and their time/memory strategy drivers.
//!
//! Both strategies of a query produce the same sequence for the same input:
//! they share the extractors, the counting engine and the selector, and differ
//! only in how many passes they make and what they keep between them.

use crate::config::{QueryOptions, SecondaryPasses, Strategy};
use crate::counting::CountAccumulator;
use crate::date::parse_day;
use crate::key_extractor::KeyExtractor;
use crate::source::RecordSource;
use crate::streaming::{authors_by_day_pass, count_pass, count_records, extraction_pool, materialize};
use crate::topk::TopK;
use anyhow::Result;
use serde::Serialize;
use time::Date;

/// One row of the top-dates query: a busy day and its most active author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DailyTopAuthor {
    pub day: String,
    /// Records on `day`; the row's rank.
    pub day_count: u64,
    pub author: String,
    /// Records by `author` on `day`.
    pub author_count: u64,
}

impl DailyTopAuthor {
    /// The grouping key of the row.
    pub fn key(&self) -> (&str, &str) {
        (&self.day, &self.author)
    }

    /// `day` as a calendar date, when it is a valid "YYYY-MM-DD".
    pub fn date(&self) -> Option<Date> {
        parse_day(&self.day)
    }
}

/// Full accumulator for `ex` under the configured strategy.
pub fn count_keys(source: &RecordSource, opts: &QueryOptions, ex: &KeyExtractor, what: &str) -> Result<CountAccumulator> {
    let acc = match opts.strategy {
        Strategy::Time => {
            let records = materialize(source, opts, &opts.pass_label(&format!("{what}: materialize")), ex.fields())?;
            let pool = extraction_pool(opts)?;
            count_records(&records, ex, pool.as_ref())
        }
        Strategy::Memory => count_pass(source, opts, &opts.pass_label(&format!("{what}: pass 1/1")), ex)?,
    };
    tracing::info!(
        query = what,
        strategy = ?opts.strategy,
        distinct = acc.len(),
        contributions = acc.total(),
        "aggregated"
    );
    Ok(acc)
}

/// Top `opts.k` keys produced by `ex`.
pub fn top_keys(source: &RecordSource, opts: &QueryOptions, ex: &KeyExtractor, what: &str) -> Result<TopK> {
    let top = count_keys(source, opts, ex, what)?.top_k(opts.k);
    if top.is_empty() {
        tracing::warn!(query = what, "no contributions found; result is empty");
    }
    Ok(top)
}

/// Most frequent emoji glyphs in `content`.
pub fn top_emojis(source: &RecordSource, opts: &QueryOptions) -> Result<TopK> {
    top_keys(source, opts, &KeyExtractor::emoji(), "top emojis")
}

/// Most mentioned handles in `mentionedUsers`.
pub fn top_mentions(source: &RecordSource, opts: &QueryOptions) -> Result<TopK> {
    top_keys(source, opts, &KeyExtractor::mentions(), "top mentions")
}

/// Busiest days and, for each, the author with the most records that day.
pub fn top_dates(source: &RecordSource, opts: &QueryOptions) -> Result<Vec<DailyTopAuthor>> {
    let rows = match opts.strategy {
        Strategy::Time => top_dates_time(source, opts)?,
        Strategy::Memory => top_dates_memory(source, opts)?,
    };
    if rows.is_empty() {
        tracing::warn!(query = "top dates", "no dated records with an author; result is empty");
    }
    Ok(rows)
}

fn top_dates_time(source: &RecordSource, opts: &QueryOptions) -> Result<Vec<DailyTopAuthor>> {
    let day = KeyExtractor::day();
    let records = materialize(source, opts, &opts.pass_label("top dates: materialize"), day.fields())?;
    let pool = extraction_pool(opts)?;

    let days = count_records(&records, &day, pool.as_ref()).top_k(opts.k);
    let mut rows = Vec::with_capacity(days.len());
    for (d, day_count) in days {
        let authors = count_records(&records, &KeyExtractor::author_on(d.as_str()), pool.as_ref());
        push_row(&mut rows, d, day_count, &authors);
    }
    Ok(rows)
}

fn top_dates_memory(source: &RecordSource, opts: &QueryOptions) -> Result<Vec<DailyTopAuthor>> {
    let days = {
        let label = opts.pass_label("top dates: pass 1 (days)");
        count_pass(source, opts, &label, &KeyExtractor::day())?.top_k(opts.k)
    };
    let mut rows = Vec::with_capacity(days.len());

    match opts.secondary_passes {
        SecondaryPasses::PerDate => {
            let passes = days.len() + 1;
            for (i, (d, day_count)) in days.into_iter().enumerate() {
                let label = opts.pass_label(&format!("top dates: pass {}/{} ({d})", i + 2, passes));
                let authors = count_pass(source, opts, &label, &KeyExtractor::author_on(d.as_str()))?;
                push_row(&mut rows, d, day_count, &authors);
            }
        }
        SecondaryPasses::Fused => {
            if days.is_empty() {
                return Ok(rows);
            }
            let wanted: Vec<String> = days.iter().map(|(d, _)| d.clone()).collect();
            let mut per_day = authors_by_day_pass(source, opts, &opts.pass_label("top dates: pass 2/2 (authors)"), &wanted)?;
            for (d, day_count) in days {
                let authors = per_day.remove(&d).unwrap_or_default();
                push_row(&mut rows, d, day_count, &authors);
            }
        }
    }
    Ok(rows)
}

fn push_row(rows: &mut Vec<DailyTopAuthor>, day: String, day_count: u64, authors: &CountAccumulator) {
    match authors.top_k(1).into_iter().next() {
        Some((author, author_count)) => rows.push(DailyTopAuthor { day, day_count, author, author_count }),
        // Only possible when the source changed between passes.
        None => tracing::warn!(day = %day, "selected day has no authors in its secondary pass; row dropped"),
    }
}
