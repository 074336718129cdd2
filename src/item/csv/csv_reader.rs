use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::BindError;
use crate::core::decoder::{HeaderRow, RecordDecoder};
use crate::core::line::{BufLineSource, LineSource};
use crate::core::schema::Record;

/// A CSV record reader.
///
/// The reader pulls raw lines from a [`LineSource`], binds a decoding
/// session to the header line on first use, and decodes every following
/// line into a record of type `T`. Rows are plain delimiter-split tokens;
/// quoting and escaping are not interpreted.
///
/// Reading is streaming and uses interior mutability, so all operations
/// take `&self` and consume rows from the current position.
///
/// # Examples
///
/// ```
/// # use std::sync::LazyLock;
/// # use csvbind::BindError;
/// # use csvbind::core::schema::{FieldSpec, Record, RecordSchema};
/// # use csvbind::core::value::{Value, ValueKind};
/// use csvbind::item::csv::csv_reader::CsvReaderBuilder;
///
/// # struct Data { name: String, id: i32 }
/// # impl Record for Data {
/// #     fn schema() -> &'static RecordSchema<Self> {
/// #         static SCHEMA: LazyLock<RecordSchema<Data>> = LazyLock::new(|| {
/// #             RecordSchema::builder()
/// #                 .field(FieldSpec::new("name", ValueKind::Text))
/// #                 .field(FieldSpec::new("id", ValueKind::Int))
/// #                 .constructor(2, |values| {
/// #                     Ok(Data {
/// #                         name: values[0].as_text()?.to_string(),
/// #                         id: values[1].as_int()?,
/// #                     })
/// #                 })
/// #                 .build()
/// #         });
/// #         &SCHEMA
/// #     }
/// #     fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError> {
/// #         match field.name() {
/// #             "name" => Ok(Value::Text(self.name.clone())),
/// #             "id" => Ok(Value::Int(self.id)),
/// #             other => Err(BindError::FieldAccess(other.to_string())),
/// #         }
/// #     }
/// # }
/// # fn main() -> Result<(), BindError> {
/// let data = "name,id\nN,1\nNN,2";
///
/// let reader = CsvReaderBuilder::new().from_reader::<Data, _>(data.as_bytes());
///
/// let first = reader.read()?.unwrap();
/// assert_eq!(first.name, "N");
/// assert_eq!(first.id, 1);
///
/// let rest = reader.read_all()?;
/// assert_eq!(rest.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct CsvReader<T: Record, S: LineSource> {
    source: RefCell<S>,
    session: RefCell<Option<RecordDecoder<T>>>,
    delimiter: char,
}

impl<T: Record, S: LineSource> CsvReader<T, S> {
    /// Reads the next record, or `None` once the source is exhausted.
    pub fn read(&self) -> Result<Option<T>, BindError> {
        self.ensure_bound()?;

        let Some(line) = self.source.borrow_mut().read_line()? else {
            return Ok(None);
        };

        let tokens: Vec<&str> = line.split(self.delimiter).collect();

        let session = self.session.borrow();
        let decoder = session.as_ref().ok_or(BindError::HeaderNotFound)?;
        decoder.decode(&tokens).map(Some)
    }

    /// Reads every remaining record.
    pub fn read_all(&self) -> Result<Vec<T>, BindError> {
        let mut records = Vec::new();
        while let Some(record) = self.read()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Reads the record on 1-indexed data line `line`, or `None` when the
    /// source has fewer data lines.
    ///
    /// Fails with [`BindError::InvalidRange`] when `line` is zero.
    pub fn read_at(&self, line: u64) -> Result<Option<T>, BindError> {
        Ok(self.read_range(line, line + 1)?.into_iter().next())
    }

    /// Reads the records on data lines `[from, to)`, 1-indexed
    /// inclusive-from/exclusive-to — exactly `to - from` records when the
    /// source holds that many.
    ///
    /// Fails with [`BindError::InvalidRange`] when `from` is zero or the
    /// range is empty. Rows before `from` are skipped without being decoded.
    pub fn read_range(&self, from: u64, to: u64) -> Result<Vec<T>, BindError> {
        if from == 0 || from >= to {
            return Err(BindError::InvalidRange { from, to });
        }

        self.ensure_bound()?;

        let mut skipped = 0;
        while skipped < from - 1 {
            if self.source.borrow_mut().read_line()?.is_none() {
                return Ok(Vec::new());
            }
            skipped += 1;
        }

        let mut records = Vec::new();
        while (records.len() as u64) < to - from {
            match self.read()? {
                Some(record) => records.push(record),
                None => break,
            }
        }

        Ok(records)
    }

    /// Reads the header line and binds the decoding session, once.
    fn ensure_bound(&self) -> Result<(), BindError> {
        if self.session.borrow().is_some() {
            return Ok(());
        }

        let line = self
            .source
            .borrow_mut()
            .read_line()?
            .ok_or(BindError::HeaderNotFound)?;

        let header = HeaderRow::parse(&line, self.delimiter)?;
        let decoder = RecordDecoder::bind(&header)?;

        debug!("bound read session to {} columns", decoder.width());

        *self.session.borrow_mut() = Some(decoder);
        Ok(())
    }
}

/// A builder for configuring CSV record reading.
///
/// Defaults to a comma delimiter. The header row is always expected: it is
/// what binds file columns to record fields.
pub struct CsvReaderBuilder {
    delimiter: u8,
}

impl Default for CsvReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvReaderBuilder {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Creates a `CsvReader` over any [`LineSource`].
    pub fn from_source<T: Record, S: LineSource>(self, source: S) -> CsvReader<T, S> {
        CsvReader {
            source: RefCell::new(source),
            session: RefCell::new(None),
            delimiter: self.delimiter as char,
        }
    }

    /// Creates a `CsvReader` over anything implementing `Read`.
    pub fn from_reader<T: Record, R: Read>(
        self,
        rdr: R,
    ) -> CsvReader<T, BufLineSource<BufReader<R>>> {
        self.from_source(BufLineSource::new(BufReader::new(rdr)))
    }

    /// Creates a `CsvReader` over a file.
    ///
    /// Fails with [`BindError::SourceMissing`] when the file does not exist.
    pub fn from_path<T: Record, P: AsRef<Path>>(
        self,
        path: P,
    ) -> Result<CsvReader<T, BufLineSource<BufReader<File>>>, BindError> {
        Ok(self.from_source(BufLineSource::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::core::fixture::Data;

    const DATA: &str = "name,id\nN,1\nNN,2\nNNN,3\nNNNN,4";

    fn reader(data: &str) -> CsvReader<Data, BufLineSource<BufReader<&[u8]>>> {
        CsvReaderBuilder::new().from_reader(data.as_bytes())
    }

    #[test]
    fn read_all_returns_every_data_row() {
        let records = reader(DATA).read_all().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].name, "N");
        assert_eq!(records[0].id, 1);
        assert_eq!(records[3].name, "NNNN");
        assert_eq!(records[3].id, 4);
    }

    #[test]
    fn read_streams_one_record_at_a_time() {
        let reader = reader("name,id\nN,1\nNN,2");

        assert_eq!(reader.read().unwrap().unwrap().id, 1);
        assert_eq!(reader.read().unwrap().unwrap().id, 2);
        assert!(reader.read().unwrap().is_none());
    }

    #[test]
    fn read_at_is_one_indexed() {
        let first = reader(DATA).read_at(1).unwrap().unwrap();
        assert_eq!(first.id, 1);

        let last = reader(DATA).read_at(4).unwrap().unwrap();
        assert_eq!(last.id, 4);
    }

    #[test]
    fn read_at_past_the_end_is_none() {
        assert!(reader(DATA).read_at(10).unwrap().is_none());
    }

    #[test]
    fn read_at_zero_is_rejected() {
        let err = reader(DATA).read_at(0).unwrap_err();
        assert!(matches!(err, BindError::InvalidRange { from: 0, .. }));
    }

    #[test]
    fn read_range_returns_exactly_to_minus_from_rows() {
        let records = reader(DATA).read_range(1, 3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);

        let records = reader(DATA).read_range(2, 4).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2);
        assert_eq!(records[1].id, 3);
    }

    #[test]
    fn read_range_validates_its_bounds() {
        assert!(matches!(
            reader(DATA).read_range(0, 2).unwrap_err(),
            BindError::InvalidRange { from: 0, to: 2 }
        ));
        assert!(matches!(
            reader(DATA).read_range(3, 3).unwrap_err(),
            BindError::InvalidRange { from: 3, to: 3 }
        ));
        assert!(matches!(
            reader(DATA).read_range(3, 2).unwrap_err(),
            BindError::InvalidRange { from: 3, to: 2 }
        ));
    }

    #[test]
    fn empty_source_fails_with_header_not_found() {
        let err = reader("").read().unwrap_err();
        assert!(matches!(err, BindError::HeaderNotFound));
    }

    #[test]
    fn custom_delimiter_applies_to_header_and_rows() {
        let reader: CsvReader<Data, _> = CsvReaderBuilder::new()
            .delimiter(b';')
            .from_reader("name;id\nN;1".as_bytes());

        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "N");
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn reads_datetime_columns_from_a_file() {
        let _ = env_logger::builder().is_test(true).try_init();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "name,id,joined").unwrap();
        writeln!(file, "N,1,2024-03-01 08:30:00").unwrap();
        drop(file);

        let reader: CsvReader<Data, _> = CsvReaderBuilder::new().from_path(&path).unwrap();
        let records = reader.read_all().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].joined,
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn missing_file_fails_with_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvReaderBuilder::new().from_path::<Data, _>(dir.path().join("absent.csv"));

        assert!(matches!(result, Err(BindError::SourceMissing { .. })));
    }
}
