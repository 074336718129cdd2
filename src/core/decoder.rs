use log::debug;

use crate::BindError;
use crate::core::schema::{Constructor, FieldSpec, Record};
use crate::core::value::Value;

/// The ordered column names read from the first line of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    names: Vec<String>,
}

impl HeaderRow {
    /// Wraps an already-split name list. An empty list fails with
    /// [`BindError::HeaderNotFound`].
    pub fn new(names: Vec<String>) -> Result<Self, BindError> {
        if names.is_empty() {
            return Err(BindError::HeaderNotFound);
        }
        Ok(Self { names })
    }

    /// Splits the first line of a source into column names. A blank line
    /// fails with [`BindError::HeaderNotFound`].
    pub fn parse(line: &str, delimiter: char) -> Result<Self, BindError> {
        if line.trim().is_empty() {
            return Err(BindError::HeaderNotFound);
        }

        Self::new(line.split(delimiter).map(str::to_string).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Decodes raw row tokens into records of one type, for one header.
///
/// Binding resolves everything that is fixed for a read session up front:
/// each column name is looked up in the schema once, and the constructor is
/// selected once by header width. Per-row work is then parse-and-invoke
/// only.
///
/// Parsed values are handed to the constructor positionally **in header
/// column order**, never re-mapped to the constructor's own parameter
/// order. A source whose column order does not match the selected
/// constructor therefore fails with [`BindError::ValueMismatch`] on the
/// first decoded row.
#[derive(Debug)]
pub struct RecordDecoder<T: Record> {
    columns: Vec<&'static FieldSpec>,
    constructor: &'static Constructor<T>,
}

impl<T: Record> RecordDecoder<T> {
    /// Binds a decoding session to `header`.
    ///
    /// Fails with [`BindError::FieldNotFound`] when a header name maps to no
    /// field of the schema, and with [`BindError::ConstructorNotFound`] when
    /// no constructor takes exactly as many values as the header has
    /// columns. Constructors sharing an arity are disambiguated by
    /// declaration order, first one wins.
    pub fn bind(header: &HeaderRow) -> Result<Self, BindError> {
        let schema = T::schema();

        let mut columns = Vec::with_capacity(header.len());
        for name in header.names() {
            let spec = schema
                .field(name)
                .ok_or_else(|| BindError::FieldNotFound(name.clone()))?;
            columns.push(spec);
        }

        let constructor = schema
            .constructor_for(columns.len())
            .ok_or(BindError::ConstructorNotFound(columns.len()))?;

        debug!("bound decoder for {} columns", columns.len());

        Ok(Self {
            columns,
            constructor,
        })
    }

    /// The number of columns this session was bound to.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Decodes one row of raw tokens into a record.
    ///
    /// A row with more or fewer tokens than the header has columns fails
    /// with [`BindError::RaggedRow`] before anything is parsed. Any failure
    /// aborts the row; skip-and-continue policy belongs to the caller.
    pub fn decode(&self, row: &[&str]) -> Result<T, BindError> {
        if row.len() != self.columns.len() {
            return Err(BindError::RaggedRow {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        let mut values: Vec<Value> = Vec::with_capacity(row.len());
        for (spec, token) in self.columns.iter().zip(row) {
            values.push(spec.parse(token)?);
        }

        self.constructor.invoke(&values)
    }
}
