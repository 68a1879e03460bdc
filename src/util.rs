use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Once;
use std::thread::sleep;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default `info`).
/// Only the first call does anything; a subscriber the host already installed is kept.
pub fn init_tracing_once() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}

/// Transient open failures seen on Windows when AV/backup filter drivers or
/// network volumes hold the file briefly (access denied, device not ready,
/// sharing/lock violation, I/O device error).
#[cfg(windows)]
fn is_retriable_io_error(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(5) | Some(21) | Some(32) | Some(33) | Some(1117))
}

/// Elsewhere those codes mean EIO, EISDIR, EPIPE, EDOM; only an interrupted open is retried.
#[cfg(not(windows))]
fn is_retriable_io_error(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::Interrupted
}

/// Open a file, retrying transient errors with linear backoff.
pub fn open_with_backoff(path: &Path, tries: usize, delay_ms: u64) -> io::Result<File> {
    let tries = tries.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match File::open(path) {
            Ok(f) => return Ok(f),
            Err(e) if attempt < tries && is_retriable_io_error(&e) => {
                tracing::debug!(path = %path.display(), attempt, error = %e, "retrying open");
                sleep(Duration::from_millis(delay_ms.saturating_mul(attempt as u64)));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn unix_errno_values_are_not_retried() {
        for code in [5, 21, 32, 33] {
            assert!(!is_retriable_io_error(&io::Error::from_raw_os_error(code)), "errno {code}");
        }
        assert!(is_retriable_io_error(&io::Error::from(io::ErrorKind::Interrupted)));
    }

    #[cfg(windows)]
    #[test]
    fn windows_sharing_violation_is_retried() {
        assert!(is_retriable_io_error(&io::Error::from_raw_os_error(32)));
        assert!(!is_retriable_io_error(&io::Error::from_raw_os_error(2)));
    }

    #[test]
    fn missing_file_fails_without_retrying() {
        let dir = tempfile::tempdir().unwrap();
        let started = std::time::Instant::now();
        let err = open_with_backoff(&dir.path().join("absent.json"), 16, 200).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(started.elapsed() < Duration::from_millis(200));
    }
}
