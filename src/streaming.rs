//! Pass primitives: drive one scan with progress and decode-error accounting, plus the
//! counting and materializing passes built on top of it.

use crate::config::QueryOptions;
use crate::counting::CountAccumulator;
use crate::key_extractor::{day_and_author, KeyExtractor};
use crate::progress::PassProgress;
use crate::record::{project, Record};
use crate::source::{RecordSource, ScanStats};
use ahash::AHashMap;
use anyhow::{Context, Result};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Run one full pass, handing every decoded record to `on_record`.
/// Undecodable lines are logged (the first few at warn) and skipped.
pub(crate) fn run_pass(
    source: &RecordSource,
    opts: &QueryOptions,
    label: &str,
    mut on_record: impl FnMut(Record),
) -> Result<ScanStats> {
    let mut scan = source
        .rescan()
        .with_context(|| format!("{label}: open {}", source.path().display()))?;

    let mut progress = PassProgress::start(opts.progress, source.len_bytes(), label);
    let mut logged = 0usize;

    while let Some(item) = scan.next() {
        match item {
            Ok(rec) => on_record(rec),
            Err(e) if logged < opts.max_logged_decode_errors => {
                logged += 1;
                tracing::warn!(pass = label, line = e.line(), error = %e, "skipping undecodable line");
            }
            Err(e) => tracing::debug!(pass = label, line = e.line(), error = %e, "skipping undecodable line"),
        }
        progress.advance_to(scan.bytes_read());
    }

    let stats = scan
        .finish()
        .with_context(|| format!("{label}: read {}", source.path().display()))?;
    progress.finish(stats.records);

    if stats.decode_errors > 0 {
        tracing::warn!(pass = label, skipped = stats.decode_errors, lines = stats.lines, "undecodable lines were skipped");
    }
    tracing::debug!(pass = label, lines = stats.lines, records = stats.records, blank = stats.blank_lines, "pass complete");
    Ok(stats)
}

/// Streaming pass: count the keys of every record, dropping each record right after.
pub(crate) fn count_pass(
    source: &RecordSource,
    opts: &QueryOptions,
    label: &str,
    ex: &KeyExtractor,
) -> Result<CountAccumulator> {
    let mut acc = CountAccumulator::new();
    run_pass(source, opts, label, |rec| ex.for_each_key(&rec, |k| acc.add(k)))?;
    Ok(acc)
}

/// Streaming pass: author counts for each of `days` at once. Records on other days are ignored.
pub(crate) fn authors_by_day_pass(
    source: &RecordSource,
    opts: &QueryOptions,
    label: &str,
    days: &[String],
) -> Result<AHashMap<String, CountAccumulator>> {
    let mut per_day: AHashMap<String, CountAccumulator> =
        days.iter().map(|d| (d.clone(), CountAccumulator::new())).collect();
    run_pass(source, opts, label, |rec| {
        if let Some((day, author)) = day_and_author(&rec) {
            if let Some(acc) = per_day.get_mut(day) {
                acc.add(author.to_string());
            }
        }
    })?;
    Ok(per_day)
}

/// Load the whole source into memory, keeping only `fields` of each record when given.
pub(crate) fn materialize(
    source: &RecordSource,
    opts: &QueryOptions,
    label: &str,
    fields: Option<&[&str]>,
) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    let stats = run_pass(source, opts, label, |rec| {
        records.push(match fields {
            Some(f) => project(rec, f),
            None => rec,
        })
    })?;
    tracing::debug!(pass = label, records = records.len(), lines = stats.lines, "materialized");
    Ok(records)
}

/// Dedicated pool for the parallel time strategy, when `parallelism > 1`.
pub(crate) fn extraction_pool(opts: &QueryOptions) -> Result<Option<ThreadPool>> {
    match opts.worker_threads() {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("build extraction thread pool")?;
            Ok(Some(pool))
        }
        None => Ok(None),
    }
}

/// Count the keys of an in-memory record set.
/// With a pool, each worker folds into its own accumulator and the partials are merged.
pub(crate) fn count_records(records: &[Record], ex: &KeyExtractor, pool: Option<&ThreadPool>) -> CountAccumulator {
    match pool {
        None => {
            let mut acc = CountAccumulator::new();
            for rec in records {
                ex.for_each_key(rec, |k| acc.add(k));
            }
            acc
        }
        Some(pool) => pool.install(|| {
            records
                .par_iter()
                .fold(CountAccumulator::new, |mut acc, rec| {
                    ex.for_each_key(rec, |k| acc.add(k));
                    acc
                })
                .reduce(CountAccumulator::new, CountAccumulator::merged)
        }),
    }
}
