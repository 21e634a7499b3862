//! The append-only run log.
//!
//! Every organize event is written as one line:
//!
//! ```text
//! 2024/01/02 03:04:05 [SUCCESS] moved: /tmp/in/a.jpg -> Images
//! 2024/01/02 03:04:05 [ERROR] /tmp/in/c.xyz: extension .xyz not supported
//! ```
//!
//! The log owns its sink, so separate runs never share writer state. A
//! file-backed log is buffered and flushed when the `RunLog` is dropped.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Timestamp format used at the start of every log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Default file name of the run log, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "organizer.log";

/// Severity tag of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Success => "SUCCESS",
            Level::Error => "ERROR",
        }
    }
}

/// Line-oriented writer for run events.
pub struct RunLog<W: Write> {
    sink: W,
}

impl RunLog<BufWriter<File>> {
    /// Opens (or creates) `path` in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RunLog<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        self.write(Level::Success, message)
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        self.write(Level::Error, message)
    }

    /// Writes a single record stamped with the current local time.
    pub fn write(&mut self, level: Level, message: &str) -> io::Result<()> {
        writeln!(
            self.sink,
            "{} [{}] {}",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            level.tag(),
            message
        )
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Flushes and hands back the sink.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
