use std::cell::{Cell, RefCell};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use log::debug;

use crate::BindError;
use crate::core::encoder::RecordEncoder;
use crate::core::line::{BufLineSink, LineSink, WriteMode};
use crate::core::schema::Record;

/// A CSV record writer.
///
/// Encodes records of type `T` through their schema and pushes one line per
/// record into a [`LineSink`]. When headers are enabled, the header line is
/// emitted before the first record and never again, so append sessions on
/// an existing file keep headers off (the default) and never rewrite the
/// header row.
pub struct CsvWriter<T: Record, S: LineSink> {
    sink: RefCell<S>,
    delimiter: char,
    has_headers: bool,
    header_written: Cell<bool>,
    pd: PhantomData<T>,
}

impl<T: Record, S: LineSink> CsvWriter<T, S> {
    /// Encodes and writes one record.
    pub fn write(&self, record: &T) -> Result<(), BindError> {
        let separator = self.delimiter.to_string();
        let mut sink = self.sink.borrow_mut();

        if self.has_headers && !self.header_written.get() {
            let header = RecordEncoder::header_of::<T>().join(&separator);
            sink.write_line(&header)?;
            self.header_written.set(true);
        }

        let row = RecordEncoder::encode(record)?;
        sink.write_line(&row.join(&separator))
    }

    /// Writes every record in order.
    pub fn write_all<'a, I>(&self, records: I) -> Result<(), BindError>
    where
        T: 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Drains buffered output to the underlying sink.
    pub fn flush(&self) -> Result<(), BindError> {
        self.sink.borrow_mut().flush()
    }

    /// Hands the sink back, for reading what was written to a buffer.
    pub fn into_inner(self) -> S {
        self.sink.into_inner()
    }
}

/// A builder for configuring CSV record writing.
///
/// Defaults: comma delimiter, no header line, append-or-create open mode.
/// A fresh write session is `has_headers(true)` plus
/// [`WriteMode::CreateOnly`]; the defaults give an append session.
pub struct CsvWriterBuilder {
    delimiter: u8,
    has_headers: bool,
    mode: WriteMode,
}

impl Default for CsvWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvWriterBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_headers: false,
            mode: WriteMode::AppendOrCreate,
        }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether a header line is emitted before the first record.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Sets how [`CsvWriterBuilder::from_path`] opens its target.
    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Creates a `CsvWriter` over any [`LineSink`].
    pub fn from_sink<T: Record, S: LineSink>(self, sink: S) -> CsvWriter<T, S> {
        CsvWriter {
            sink: RefCell::new(sink),
            delimiter: self.delimiter as char,
            has_headers: self.has_headers,
            header_written: Cell::new(false),
            pd: PhantomData,
        }
    }

    /// Creates a `CsvWriter` over anything implementing `Write`.
    pub fn from_writer<T: Record, W: Write>(self, wtr: W) -> CsvWriter<T, BufLineSink<W>> {
        self.from_sink(BufLineSink::new(wtr))
    }

    /// Creates a `CsvWriter` over a file, opened per the builder's
    /// [`WriteMode`].
    pub fn from_path<T: Record, P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<CsvWriter<T, BufLineSink<BufWriter<File>>>, BindError> {
        let path = path.as_ref();
        debug!("opening csv target {}", path.display());

        let sink = BufLineSink::open(path, self.mode)?;
        Ok(self.from_sink(sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixture::Data;
    use crate::item::csv::csv_reader::CsvReaderBuilder;

    fn joined() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn writes_header_then_rows() {
        let writer = CsvWriterBuilder::new()
            .has_headers(true)
            .from_writer::<Data, _>(Vec::new());

        writer.write(&Data::new("N", 1, joined())).unwrap();
        writer.write(&Data::new("NN", 2, joined())).unwrap();

        let bytes = writer.into_inner().into_inner();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "name,id,joined\n\
             N,1,2024-03-01 08:30:00\n\
             NN,2,2024-03-01 08:30:00\n"
        );
    }

    #[test]
    fn header_line_is_emitted_at_most_once() {
        let writer = CsvWriterBuilder::new()
            .has_headers(true)
            .from_writer::<Data, _>(Vec::new());

        writer
            .write_all(&[Data::new("N", 1, joined()), Data::new("NN", 2, joined())])
            .unwrap();

        let text = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(text.lines().filter(|l| *l == "name,id,joined").count(), 1);
    }

    #[test]
    fn append_session_never_writes_a_header() {
        let writer = CsvWriterBuilder::new().from_writer::<Data, _>(Vec::new());

        writer.write(&Data::new("N", 1, joined())).unwrap();

        let text = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(text, "N,1,2024-03-01 08:30:00\n");
    }

    #[test]
    fn custom_delimiter_applies_to_header_and_rows() {
        let writer = CsvWriterBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .from_writer::<Data, _>(Vec::new());

        writer.write(&Data::new("N", 1, joined())).unwrap();

        let text = String::from_utf8(writer.into_inner().into_inner()).unwrap();
        assert_eq!(text, "name;id;joined\nN;1;2024-03-01 08:30:00\n");
    }

    #[test]
    fn write_then_append_grows_the_file_by_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let writer = CsvWriterBuilder::new()
            .has_headers(true)
            .mode(WriteMode::CreateOnly)
            .from_path::<Data, _>(&path)
            .unwrap();
        writer.write(&Data::new("N", 1, joined())).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let appender = CsvWriterBuilder::new().from_path::<Data, _>(&path).unwrap();
        appender.write(&Data::new("NN", 2, joined())).unwrap();
        appender.flush().unwrap();
        drop(appender);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert_eq!(content.lines().next(), Some("name,id,joined"));
        assert_eq!(
            content.lines().filter(|l| *l == "name,id,joined").count(),
            1
        );
    }

    #[test]
    fn create_only_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "already here\n").unwrap();

        let result = CsvWriterBuilder::new()
            .mode(WriteMode::CreateOnly)
            .from_path::<Data, _>(&path);

        assert!(matches!(result, Err(BindError::Io(_))));
    }

    #[test]
    fn written_files_read_back_to_equal_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let originals = vec![Data::new("N", 1, joined()), Data::new("NN", 2, joined())];

        let writer = CsvWriterBuilder::new()
            .has_headers(true)
            .mode(WriteMode::CreateOnly)
            .from_path::<Data, _>(&path)
            .unwrap();
        writer.write_all(&originals).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let reader = CsvReaderBuilder::new().from_path::<Data, _>(&path).unwrap();
        assert_eq!(reader.read_all().unwrap(), originals);
    }
}
