//! Restartable NDJSON record source (plain or zstd-compressed).
//!
//! `RecordSource` only remembers where the data lives; every `scan()` re-opens the
//! file and yields decoded records from the first line, independent of any earlier
//! scan. Bad lines come out as `DecodeError` items and never stop the scan. A read
//! failure ends the scan and is reported by `Scan::finish`.

use crate::error::{DecodeError, SourceError};
use crate::record::{json_type_name, Record};
use crate::util::open_with_backoff;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
pub const DEFAULT_READ_BUFFER: usize = 256 * 1024;

#[derive(Clone, Debug)]
pub struct RecordSource {
    path: PathBuf,
    compressed: bool,
    len_bytes: u64,
    read_buf_bytes: usize,
}

/// Per-scan line accounting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines: u64,
    pub records: u64,
    pub blank_lines: u64,
    pub decode_errors: u64,
}

impl RecordSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::open_with(path, DEFAULT_READ_BUFFER)
    }

    /// Open with a custom `BufReader` capacity (min 8 KiB).
    /// Fails with `NotFound` for a missing path and `Unreadable` for anything that
    /// cannot be opened and read as a file.
    pub fn open_with(path: impl AsRef<Path>, read_buf_bytes: usize) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let meta = fs::metadata(&path).map_err(|e| SourceError::from_io(&path, e))?;
        if meta.is_dir() {
            return Err(SourceError::Unreadable {
                path,
                source: io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            });
        }
        let file = open_with_backoff(&path, 16, 50).map_err(|e| SourceError::from_io(&path, e))?;
        let compressed = has_zstd_extension(&path) || starts_with_zstd_magic(file).map_err(|e| SourceError::from_io(&path, e))?;
        Ok(Self {
            path,
            compressed,
            len_bytes: meta.len(),
            read_buf_bytes: read_buf_bytes.max(8 * 1024),
        })
    }

    pub fn path(&self) -> &Path { &self.path }
    pub fn is_compressed(&self) -> bool { self.compressed }
    /// On-disk size; progress bars are scaled against it.
    pub fn len_bytes(&self) -> u64 { self.len_bytes }

    /// Start a pass from the first line.
    pub fn scan(&self) -> Result<Scan, SourceError> {
        let file = open_with_backoff(&self.path, 16, 50).map_err(|e| SourceError::from_io(&self.path, e))?;
        let counter = Arc::new(AtomicU64::new(0));
        let counted = CountingReader { inner: file, counter: counter.clone() };

        let reader: Box<dyn BufRead> = if self.compressed {
            let mut decoder = Decoder::new(counted).map_err(|e| SourceError::from_io(&self.path, e))?;
            decoder.window_log_max(31).map_err(|e| SourceError::from_io(&self.path, e))?;
            Box::new(BufReader::with_capacity(self.read_buf_bytes, decoder))
        } else {
            Box::new(BufReader::with_capacity(self.read_buf_bytes, counted))
        };

        Ok(Scan {
            path: self.path.clone(),
            reader,
            bytes_read: counter,
            buf: Vec::with_capacity(16 * 1024),
            line: 0,
            stats: ScanStats::default(),
            failure: None,
            line_limit: None,
            limited: false,
            done: false,
        })
    }

    /// A fresh pass, logically independent of every earlier scan's cursor.
    pub fn rescan(&self) -> Result<Scan, SourceError> {
        self.scan()
    }
}

fn has_zstd_extension(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("zst") | Some("zstd"))
}

fn starts_with_zstd_magic(file: fs::File) -> io::Result<bool> {
    let mut head = Vec::with_capacity(4);
    file.take(4).read_to_end(&mut head)?;
    Ok(head == ZSTD_MAGIC)
}

/// A `Read` wrapper that counts on-disk bytes consumed.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// One pass over a `RecordSource`.
pub struct Scan {
    path: PathBuf,
    reader: Box<dyn BufRead>,
    bytes_read: Arc<AtomicU64>,
    buf: Vec<u8>,
    line: u64,
    stats: ScanStats,
    failure: Option<SourceError>,
    line_limit: Option<u64>,
    limited: bool,
    done: bool,
}

impl Scan {
    pub fn stats(&self) -> &ScanStats { &self.stats }

    /// Stop after `lines` physical lines, blank and undecodable ones included.
    pub fn limit_lines(mut self, lines: u64) -> Self {
        self.line_limit = Some(lines);
        self
    }

    /// True when `limit_lines` ended the pass.
    pub fn hit_line_limit(&self) -> bool { self.limited }

    /// On-disk bytes consumed so far (compressed bytes for `.zst`).
    pub fn bytes_read(&self) -> u64 { self.bytes_read.load(Ordering::Relaxed) }

    /// End the pass: the final stats, or the read failure that cut it short.
    pub fn finish(self) -> Result<ScanStats, SourceError> {
        match self.failure {
            Some(e) => Err(e),
            None => Ok(self.stats),
        }
    }

    fn decode(&mut self) -> Option<Result<Record, DecodeError>> {
        let bytes = self.buf.trim_ascii();
        if bytes.is_empty() {
            self.stats.blank_lines += 1;
            return None;
        }
        let line = self.line;
        let item = match serde_json::from_slice::<Value>(bytes) {
            Ok(v @ Value::Object(_)) => Ok(v),
            Ok(other) => Err(DecodeError::NotAnObject { line, found: json_type_name(&other) }),
            Err(source) => Err(DecodeError::Json { line, source }),
        };
        match item {
            Ok(_) => self.stats.records += 1,
            Err(_) => self.stats.decode_errors += 1,
        }
        Some(item)
    }
}

impl Iterator for Scan {
    type Item = Result<Record, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.line_limit.is_some_and(|n| self.stats.lines >= n) {
                self.limited = true;
                self.done = true;
                break;
            }
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.line += 1;
                    self.stats.lines += 1;
                    if let Some(item) = self.decode() {
                        return Some(item);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.failure = Some(SourceError::Unreadable { path: self.path.clone(), source: e });
                    self.done = true;
                }
            }
        }
        None
    }
}
