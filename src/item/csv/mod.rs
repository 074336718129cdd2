/// CSV support for reading and writing typed records.
///
/// This module provides the file-facing half of the crate:
///
/// 1. **CsvReader**: reads raw lines from a source, binds the header row to
///    a record type's schema once per session, and decodes each following
///    line into a record.
///
/// 2. **CsvWriter**: encodes records through the same schema and writes one
///    delimited line per record, with an optional header line emitted
///    before the first record.
///
/// Both follow the builder pattern and work over files, in-memory buffers,
/// or any custom [`LineSource`](crate::core::line::LineSource) /
/// [`LineSink`](crate::core::line::LineSink).
///
/// # Wire format
///
/// Plain UTF-8 text, one record per line with a trailing newline, fields
/// joined by a single-byte delimiter (comma by default). There is no
/// quoting or escaping, so field values must not contain the delimiter.
/// The first line of a readable file is always the header naming the
/// columns in the writer's declared field order.
///
/// # Error policy
///
/// Every failure aborts the operation that hit it and surfaces as a
/// [`BindError`](crate::BindError) naming the offending column, token, or
/// path. The reader never skips a malformed row on its own; callers that
/// want skip-and-continue wrap the per-record [`read`] call and decide for
/// themselves.
///
/// [`read`]: csv_reader::CsvReader::read

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;
