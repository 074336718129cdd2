use crate::BindError;
use crate::core::schema::Record;

/// Encodes records back into ordered field texts.
///
/// The inverse of [`RecordDecoder`](crate::core::decoder::RecordDecoder):
/// field order is the schema's declaration order, both for the header names
/// and for every encoded row, so a file written from these rows can be read
/// back by a constructor whose parameters follow the declared field order.
pub struct RecordEncoder;

impl RecordEncoder {
    /// The column names a write session puts on its header line, in schema
    /// declaration order.
    pub fn header_of<T: Record>() -> Vec<String> {
        T::schema()
            .fields()
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    /// Renders one record as an ordered list of field texts.
    ///
    /// Each field's current value is read through
    /// [`Record::value_of`](crate::core::schema::Record::value_of) and
    /// rendered by its [`FieldSpec`](crate::core::schema::FieldSpec). Fails
    /// with [`BindError::FieldAccess`] only when a value cannot be read at
    /// all.
    pub fn encode<T: Record>(record: &T) -> Result<Vec<String>, BindError> {
        let schema = T::schema();

        let mut row = Vec::with_capacity(schema.fields().len());
        for spec in schema.fields() {
            let value = record.value_of(spec)?;
            row.push(spec.render(&value));
        }

        Ok(row)
    }
}
