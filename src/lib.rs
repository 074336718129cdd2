/*!
 # csvbind

 Schema-driven binding between CSV rows and typed records.

 A record type declares, once, which of its fields are exposed under which
 column names, how each one parses and formats, and how instances are
 constructed from positional values. Reading a file then becomes: bind the
 header row to the schema, decode every following line into a record.
 Writing is the inverse: render each record's fields in declared order and
 put the column names on the first line.

 ## Core Concepts

 - **`ValueKind` / `Value`:** the scalar kinds a mapped field can hold
   (int, long, double, datetime, date, text) and their parsed values.
 - **`FieldSpec`:** metadata for one mapped field — exposed column name,
   kind, and a date format pattern for dated kinds.
 - **`RecordSchema`:** a type's ordered fields plus its constructors. A
   constructor is selected by value count, first declared match wins, and is
   invoked with values in header column order.
 - **`Record`:** the trait a bindable type implements, handing out its
   schema and its field values.
 - **`CsvReader` / `CsvWriter`:** the file-facing glue over pluggable line
   sources and sinks.

 ## Getting Started

```rust
use std::sync::LazyLock;

use csvbind::BindError;
use csvbind::core::schema::{FieldSpec, Record, RecordSchema};
use csvbind::core::value::{Value, ValueKind};
use csvbind::item::csv::csv_reader::CsvReaderBuilder;
use csvbind::item::csv::csv_writer::CsvWriterBuilder;

#[derive(Debug, PartialEq)]
struct Car {
    make: String,
    year: i32,
}

impl Record for Car {
    fn schema() -> &'static RecordSchema<Self> {
        static SCHEMA: LazyLock<RecordSchema<Car>> = LazyLock::new(|| {
            RecordSchema::builder()
                .field(FieldSpec::new("make", ValueKind::Text))
                .field(FieldSpec::new("year", ValueKind::Int))
                .constructor(2, |values| {
                    Ok(Car {
                        make: values[0].as_text()?.to_string(),
                        year: values[1].as_int()?,
                    })
                })
                .build()
        });
        &SCHEMA
    }

    fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError> {
        match field.name() {
            "make" => Ok(Value::Text(self.make.clone())),
            "year" => Ok(Value::Int(self.year)),
            other => Err(BindError::FieldAccess(other.to_string())),
        }
    }
}

fn main() -> Result<(), BindError> {
    let csv = "make,year\nPorsche,1948\nPeugeot,1995";

    let reader = CsvReaderBuilder::new().from_reader::<Car, _>(csv.as_bytes());
    let cars = reader.read_all()?;

    assert_eq!(cars.len(), 2);
    assert_eq!(cars[0], Car { make: "Porsche".to_string(), year: 1948 });

    let writer = CsvWriterBuilder::new()
        .has_headers(true)
        .from_writer::<Car, _>(Vec::new());
    writer.write_all(&cars)?;

    let text = String::from_utf8(writer.into_inner().into_inner()).unwrap();
    assert_eq!(text, "make,year\nPorsche,1948\nPeugeot,1995\n");

    Ok(())
}
```

 ## Error Handling

 Every failure surfaces as a [`BindError`] variant naming what went wrong:
 the unmapped column, the arity with no constructor, the token that failed
 to parse. The crate never retries and never recovers a partial row; any
 skip-and-continue policy belongs to the caller.
*/

/// Core module for record marshalling
pub mod core;

/// Error types for binding operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of record readers / writers over delimited text
pub mod item;
