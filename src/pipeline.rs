use crate::config::{QueryOptions, SecondaryPasses, Strategy};
use crate::counting::CountAccumulator;
use crate::key_extractor::KeyExtractor;
use crate::profile::{profile_source, DatasetProfile};
use crate::query::{self, DailyTopAuthor};
use crate::source::RecordSource;
use crate::topk::TopK;
use crate::util::init_tracing_once;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

/// Entry point: configure with the builder methods, then run a query.
///
/// ```no_run
/// use tweet_topk::{Strategy, TweetETL};
///
/// let etl = TweetETL::new()
///     .source("data/raw/tweets.json")
///     .strategy(Strategy::Memory)
///     .progress(false);
/// for (emoji, n) in etl.top_emojis()? {
///     println!("{emoji} {n}");
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct TweetETL {
    pub(crate) opts: QueryOptions,
}

impl TweetETL {
    pub fn new() -> Self {
        Self { opts: QueryOptions::default() }
    }

    pub fn with_options(opts: QueryOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &QueryOptions { &self.opts }

    // -------- Builder methods --------
    pub fn source(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_source(path); self }
    pub fn strategy(mut self, strategy: Strategy) -> Self { self.opts = self.opts.with_strategy(strategy); self }
    pub fn time_optimized(self) -> Self { self.strategy(Strategy::Time) }
    pub fn memory_optimized(self) -> Self { self.strategy(Strategy::Memory) }
    pub fn top(mut self, k: usize) -> Self { self.opts = self.opts.with_k(k); self }
    pub fn secondary_passes(mut self, mode: SecondaryPasses) -> Self { self.opts = self.opts.with_secondary_passes(mode); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn max_logged_decode_errors(mut self, n: usize) -> Self { self.opts = self.opts.with_max_logged_decode_errors(n); self }
    pub fn profile_sample(mut self, lines: u64) -> Self { self.opts = self.opts.with_profile_sample(lines); self }

    // -------- Operations --------

    /// Open the configured source. A missing or unreadable path surfaces as a
    /// `SourceError` inside the returned error (see `anyhow::Error::downcast_ref`).
    pub fn open_source(&self) -> Result<RecordSource> {
        RecordSource::open_with(&self.opts.source_path, self.opts.read_buffer_bytes)
            .with_context(|| format!("open source {}", self.opts.source_path.display()))
    }

    /// Top days by record count, each with its most active author.
    pub fn top_dates(&self) -> Result<Vec<DailyTopAuthor>> {
        self.timed("top dates", |src, opts| query::top_dates(src, opts))
    }

    /// Top emoji glyphs in tweet text.
    pub fn top_emojis(&self) -> Result<TopK> {
        self.timed("top emojis", |src, opts| query::top_emojis(src, opts))
    }

    /// Top mentioned handles.
    pub fn top_mentions(&self) -> Result<TopK> {
        self.timed("top mentions", |src, opts| query::top_mentions(src, opts))
    }

    /// Top keys of a custom extractor.
    pub fn top_keys(&self, ex: &KeyExtractor) -> Result<TopK> {
        self.timed("top keys", |src, opts| query::top_keys(src, opts, ex, "top keys"))
    }

    /// The complete (unselected) accumulator of an extractor.
    pub fn count_keys(&self, ex: &KeyExtractor) -> Result<CountAccumulator> {
        self.timed("count keys", |src, opts| query::count_keys(src, opts, ex, "count keys"))
    }

    /// One-pass dataset profile.
    pub fn profile(&self) -> Result<DatasetProfile> {
        init_tracing_once();
        let source = self.open_source()?;
        profile_source(&source, &self.opts)
    }

    fn timed<T>(&self, what: &str, run: impl FnOnce(&RecordSource, &QueryOptions) -> Result<T>) -> Result<T> {
        init_tracing_once();
        let source = self.open_source()?;
        tracing::info!(
            query = what,
            strategy = ?self.opts.strategy,
            k = self.opts.k,
            path = %source.path().display(),
            compressed = source.is_compressed(),
            "starting"
        );
        let started = Instant::now();
        let out = run(&source, &self.opts).with_context(|| format!("{what} ({:?} strategy)", self.opts.strategy))?;
        tracing::info!(query = what, elapsed_ms = started.elapsed().as_millis() as u64, "finished");
        Ok(out)
    }
}
