//! Per-run log redirection.
//!
//! The destination is an explicit [`LogSink`] passed into the orchestrator
//! rather than a global appender, which keeps the dependency visible and
//! testable between sequential runs. [`FileLogSink`] doubles
//! as a `tracing_subscriber` writer so a fmt layer can follow the
//! redirection without reinstalling the subscriber.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::error::Result;

/// Mutable logging destination, retargeted between sequential runs.
pub trait LogSink {
    /// Point the sink at `path`, creating parent directories as needed.
    /// Takes effect for all writes after it returns.
    fn redirect(&mut self, path: &Path) -> Result<()>;
}

/// Sink that discards redirection requests. Used when output is suppressed.
#[derive(Debug, Default)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn redirect(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}

/// File-backed sink whose target can be swapped while a `tracing` fmt layer
/// keeps writing through it. Writes made before the first redirect are
/// discarded.
#[derive(Clone, Default)]
pub struct FileLogSink {
    target: Arc<Mutex<Option<File>>>,
}

impl FileLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        // A poisoned lock only means a writer panicked mid-line; the file
        // handle itself is still usable.
        self.target.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl LogSink for FileLogSink {
    fn redirect(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        *self.lock() = Some(file);
        Ok(())
    }
}

/// Writer handle cloned out to the tracing fmt layer.
pub struct SinkWriter {
    target: Arc<Mutex<Option<File>>>,
}

impl Write for SinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.target.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self.target.lock().unwrap_or_else(|e| e.into_inner());
        match guard.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileLogSink {
    type Writer = SinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SinkWriter {
            target: Arc::clone(&self.target),
        }
    }
}
