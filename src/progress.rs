//! Progress reporting: one byte-scaled bar per pass over the source.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

const PASS_TEMPLATE: &str = "{spinner:.green} {msg:<36} [{bar:32.cyan/blue}] {bytes:>9}/{total_bytes:<9} \
                             {bytes_per_sec:>11}  eta {eta}";

/// Shared `MultiProgress`, so the bars of consecutive passes stack instead of
/// overwriting each other. Without it, bars draw straight to the terminal.
static GLOBAL_MP: OnceLock<Arc<MultiProgress>> = OnceLock::new();

/// Install the `MultiProgress` every later pass bar attaches to. First call wins.
pub fn set_global_multiprogress(mp: Arc<MultiProgress>) {
    let _ = GLOBAL_MP.set(mp);
}

/// Byte progress of one pass. A disabled tracker is a no-op.
pub(crate) struct PassProgress {
    bar: Option<ProgressBar>,
    reported: u64,
}

impl PassProgress {
    pub(crate) fn start(enabled: bool, total_bytes: u64, label: &str) -> Self {
        let bar = enabled.then(|| {
            let pb = match GLOBAL_MP.get() {
                Some(mp) => mp.add(ProgressBar::new(total_bytes)),
                None => ProgressBar::new(total_bytes),
            };
            let style = ProgressStyle::with_template(PASS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            pb.set_style(style);
            pb.set_message(label.to_string());
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        Self { bar, reported: 0 }
    }

    /// Move the bar to `bytes` consumed so far; never moves backwards.
    pub(crate) fn advance_to(&mut self, bytes: u64) {
        if let Some(pb) = &self.bar {
            if bytes > self.reported {
                pb.inc(bytes - self.reported);
                self.reported = bytes;
            }
        }
    }

    pub(crate) fn finish(self, records: u64) {
        if let Some(pb) = self.bar {
            pb.finish_with_message(format!("{} ({records} records)", pb.message()));
        }
    }
}
