use crate::source::DEFAULT_READ_BUFFER;
use std::path::{Path, PathBuf};

/// Execution strategy toggle. Both produce identical results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Materialize the working set once, aggregate in memory.
    #[default]
    Time,
    /// Stream every pass; retain only accumulators and results.
    Memory,
}

/// How the memory strategy finds the top author of each selected day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SecondaryPasses {
    /// One full pass per selected day (1 + n passes in total).
    #[default]
    PerDate,
    /// A single extra pass counting authors of all selected days at once.
    Fused,
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct QueryOptions {
    pub source_path: PathBuf,
    pub strategy: Strategy,
    pub k: usize,                           // entries kept per result
    pub secondary_passes: SecondaryPasses,
    pub parallelism: Option<usize>,         // Some(N > 1) to extract on N rayon threads (time strategy)
    pub progress: bool,                     // show a byte progress bar per pass
    pub progress_label: Option<String>,     // optional prefix for bar labels

    // IO tuning
    pub read_buffer_bytes: usize,           // BufReader capacity

    // diagnostics
    pub max_logged_decode_errors: usize,    // first N decode errors per pass are logged at warn
    pub profile_sample: Option<u64>,        // profile only the first N lines
}

pub const DEFAULT_SOURCE: &str = "data/raw/farmers-protest-tweets-2021-2-4.json";
pub const DEFAULT_K: usize = 10;

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            strategy: Strategy::Time,
            k: DEFAULT_K,
            secondary_passes: SecondaryPasses::PerDate,
            parallelism: None,
            progress: true,
            progress_label: None,

            read_buffer_bytes: DEFAULT_READ_BUFFER,

            max_logged_decode_errors: 5,
            profile_sample: None,
        }
    }
}

impl QueryOptions {
    pub fn with_source(mut self, path: impl AsRef<Path>) -> Self {
        self.source_path = path.as_ref().to_path_buf();
        self
    }
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
    pub fn with_secondary_passes(mut self, mode: SecondaryPasses) -> Self {
        self.secondary_passes = mode;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
    pub fn with_max_logged_decode_errors(mut self, n: usize) -> Self {
        self.max_logged_decode_errors = n;
        self
    }
    pub fn with_profile_sample(mut self, lines: u64) -> Self {
        self.profile_sample = Some(lines);
        self
    }

    /// Worker count for the parallel time strategy, if enabled.
    pub(crate) fn worker_threads(&self) -> Option<usize> {
        self.parallelism.filter(|n| *n > 1)
    }

    pub(crate) fn pass_label(&self, what: &str) -> String {
        match &self.progress_label {
            Some(prefix) => format!("{prefix}: {what}"),
            None => what.to_string(),
        }
    }
}
