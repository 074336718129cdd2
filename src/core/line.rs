use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::BindError;

/// A source of raw text lines.
///
/// The core never opens or closes storage itself; it pulls lines from a
/// `LineSource` and leaves handle lifetime to the implementation (the
/// provided ones release on drop).
pub trait LineSource {
    /// Returns the next line without its terminator, or `None` at end of
    /// input.
    fn read_line(&mut self) -> Result<Option<String>, BindError>;
}

/// A sink for raw text lines.
pub trait LineSink {
    /// Writes one line, appending a line terminator.
    fn write_line(&mut self, line: &str) -> Result<(), BindError>;

    /// Drains any buffered output to the underlying storage.
    fn flush(&mut self) -> Result<(), BindError> {
        Ok(())
    }
}

/// How a sink opens its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create the target; fail if it already exists.
    CreateOnly,
    /// Append to the target, creating it first when absent.
    AppendOrCreate,
}

/// [`LineSource`] over any buffered reader.
#[derive(Debug)]
pub struct BufLineSource<R> {
    inner: R,
}

impl<R: BufRead> BufLineSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl BufLineSource<BufReader<File>> {
    /// Opens a file for line reading. A missing file is reported as
    /// [`BindError::SourceMissing`]; other open failures pass through as io
    /// errors.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BindError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                BindError::SourceMissing {
                    path: path.to_path_buf(),
                    source,
                }
            } else {
                BindError::Io(source)
            }
        })?;

        debug!("opened line source {}", path.display());

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource for BufLineSource<R> {
    fn read_line(&mut self) -> Result<Option<String>, BindError> {
        let mut line = String::new();

        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }
}

/// [`LineSink`] over any writer.
#[derive(Debug)]
pub struct BufLineSink<W: Write> {
    inner: W,
}

impl<W: Write> BufLineSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl BufLineSink<BufWriter<File>> {
    /// Opens a file for line writing under the given [`WriteMode`].
    pub fn open<P: AsRef<Path>>(path: P, mode: WriteMode) -> Result<Self, BindError> {
        let path = path.as_ref();

        let file = match mode {
            WriteMode::CreateOnly => OpenOptions::new().write(true).create_new(true).open(path)?,
            WriteMode::AppendOrCreate => OpenOptions::new().append(true).create(true).open(path)?,
        };

        debug!("opened line sink {} ({mode:?})", path.display());

        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> LineSink for BufLineSink<W> {
    fn write_line(&mut self, line: &str) -> Result<(), BindError> {
        self.inner.write_all(line.as_bytes())?;
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BindError> {
        self.inner.flush()?;
        Ok(())
    }
}
