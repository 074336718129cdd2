use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::value::ValueKind;

#[derive(Error, Debug)]
/// Binding error
pub enum BindError {
    /// The locator handed to a source does not exist.
    #[error("source not found: {}", path.display())]
    SourceMissing { path: PathBuf, source: io::Error },

    /// The source has no first line, or its first line holds no column names.
    #[error("header row is missing or empty")]
    HeaderNotFound,

    /// A header column name is not mapped by any field of the schema.
    #[error("no field mapped to column `{0}`")]
    FieldNotFound(String),

    /// No declared constructor takes as many values as the header has columns.
    #[error("no constructor taking {0} values")]
    ConstructorNotFound(usize),

    /// A row token could not be converted to its field's kind.
    #[error("column `{column}`: cannot parse `{token}` as {kind}")]
    Parse {
        column: String,
        token: String,
        kind: ValueKind,
    },

    /// A record field value could not be read back for encoding.
    #[error("cannot read field `{0}`")]
    FieldAccess(String),

    /// A data row has a different number of tokens than the header has columns.
    #[error("row has {actual} values but header has {expected} columns")]
    RaggedRow { expected: usize, actual: usize },

    /// A constructor was handed a value of the wrong kind. Values are passed
    /// in header column order, so this means the header order does not match
    /// the selected constructor's parameter order.
    #[error("constructor expected {expected} value, got {found}")]
    ValueMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    /// A 1-indexed line range was empty or started at zero.
    #[error("invalid line range [{from}, {to})")]
    InvalidRange { from: u64, to: u64 },

    #[error(transparent)]
    Io(#[from] io::Error),
}
