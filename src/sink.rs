//! Output sinks
//!
//! A sink receives already formatted lines and appends a newline to each.
//! Every sink serializes its own writes, so two threads logging through the
//! same sink never interleave within a line.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;

/// Which kind of destination a sink writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Console,
    File,
}

/// Destination for formatted log lines
pub trait Sink: Send + Sync {
    /// Write one line; the sink adds the trailing newline
    fn emit(&self, line: &str) -> io::Result<()>;

    fn kind(&self) -> SinkKind;

    /// Path of the backing file, if any
    fn path(&self) -> Option<&Path> {
        None
    }
}

fn terminated(line: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(line.len() + 1);
    buf.extend_from_slice(line.as_bytes());
    buf.push(b'\n');
    buf
}

/// Writes lines to the console (standard error unless replaced)
pub struct ConsoleSink {
    writer: BoxMakeWriter,
    lock: Mutex<()>,
}

impl ConsoleSink {
    /// Console sink writing to standard error
    pub fn stderr() -> Self {
        Self::with_writer(io::stderr)
    }

    /// Console sink writing through any `MakeWriter`
    pub fn with_writer<M>(make_writer: M) -> Self
    where
        M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        Self {
            writer: BoxMakeWriter::new(make_writer),
            lock: Mutex::new(()),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink").finish_non_exhaustive()
    }
}

impl Sink for ConsoleSink {
    fn emit(&self, line: &str) -> io::Result<()> {
        let buf = terminated(line);
        // A poisoned lock only means another writer panicked mid-line
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut writer = self.writer.make_writer();
        writer.write_all(&buf)?;
        writer.flush()
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }
}

/// Appends lines to a file
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Open `path` for appending, creating the file if needed
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl Sink for FileSink {
    fn emit(&self, line: &str) -> io::Result<()> {
        let buf = terminated(line);
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        file.write_all(&buf)?;
        file.flush()
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-memory `MakeWriter` for asserting on console output in tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct MemoryWriter {
    buf: std::sync::Arc<Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl MemoryWriter {
    pub(crate) fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

#[cfg(test)]
impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
