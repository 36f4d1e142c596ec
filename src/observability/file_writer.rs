//! Rotating log file writer with size-based rotation and backup retention.
//!
//! This module provides a thread-safe writer that automatically rotates the
//! log file when it would exceed a size threshold, keeping a fixed number of
//! backups. This prevents unbounded disk usage for long-running sessions.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer, usable as a `tracing-subscriber` writer.
///
/// # Rotation Strategy
///
/// 1. Track the current file size in memory (seeded from disk on open)
/// 2. If the next write would push it past the limit, rotate:
///    - Rename the current file to `<name>.<timestamp>`
///    - Start a new empty file
///    - Remove the oldest backups beyond the retention limit
///
/// A single write larger than the limit still lands in one file.
///
/// # Example
///
/// ```rust
/// use bankflow::observability::RotatingFileWriter;
/// use std::io::Write;
///
/// let dir = tempfile::tempdir()?;
/// let writer = RotatingFileWriter::new(dir.path().join("bankflow.log"));
/// writer.handle().write_all(b"session started\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<WriterState>>,
}

struct WriterState {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily opened on first write.
    file: Option<File>,
    size: u64,
}

/// Handle returned by [`RotatingFileWriter::handle`] and `make_writer`.
pub struct LogHandle {
    inner: Arc<Mutex<WriterState>>,
}

impl RotatingFileWriter {
    /// Creates a writer with the default limits. The file is not opened
    /// until the first write.
    #[must_use]
    pub fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WriterState {
                file_path,
                max_bytes,
                max_backups,
                file: None,
                size: 0,
            })),
        }
    }

    /// A writer handle sharing this file.
    #[must_use]
    pub fn handle(&self) -> LogHandle {
        LogHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = LogHandle;

    fn make_writer(&'a self) -> Self::Writer {
        self.handle()
    }
}

impl Write for LogHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        state.ensure_open()?;
        if state.size > 0 && state.size + buf.len() as u64 > state.max_bytes {
            state.rotate()?;
            state.ensure_open()?;
        }

        let file = state
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "No file available"))?;
        file.write_all(buf)?;
        state.size += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl WriterState {
    fn ensure_open(&mut self) -> io::Result<()> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            self.size = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }
        Ok(())
    }

    /// Moves the current file aside and prunes old backups.
    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        self.size = 0;

        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S%6f");
        let mut backup = self.file_path.clone().into_os_string();
        backup.push(format!(".{stamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup))?;
        }
        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention limit, oldest first.
    ///
    /// Individual deletion errors are ignored so cleanup continues.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = self
            .file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "Invalid file name"))?;
        let prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // timestamps sort lexically; newest first
        backups.sort_by(|a, b| b.cmp(a));
        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("RotatingFileWriter");
        if let Ok(state) = self.inner.lock() {
            debug.field("file_path", &state.file_path);
        }
        debug.finish_non_exhaustive()
    }
}
