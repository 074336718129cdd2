//! Shared test record used across the decoder, encoder, and csv tests.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};

use crate::BindError;
use crate::core::schema::{FieldSpec, Record, RecordSchema};
use crate::core::value::{Value, ValueKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub name: String,
    pub id: i32,
    pub joined: NaiveDateTime,
}

impl Data {
    pub fn new(name: &str, id: i32, joined: NaiveDateTime) -> Self {
        Self {
            name: name.to_string(),
            id,
            joined,
        }
    }

    pub fn epoch() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }
}

impl Record for Data {
    fn schema() -> &'static RecordSchema<Self> {
        static SCHEMA: LazyLock<RecordSchema<Data>> = LazyLock::new(|| {
            RecordSchema::builder()
                .field(FieldSpec::new("name", ValueKind::Text))
                .field(FieldSpec::new("id", ValueKind::Int))
                .field(FieldSpec::new("joined", ValueKind::DateTime))
                .constructor(3, |values| {
                    Ok(Data {
                        name: values[0].as_text()?.to_string(),
                        id: values[1].as_int()?,
                        joined: values[2].as_datetime()?,
                    })
                })
                .constructor(2, |values| {
                    Ok(Data {
                        name: values[0].as_text()?.to_string(),
                        id: values[1].as_int()?,
                        joined: Data::epoch(),
                    })
                })
                .constructor(1, |values| {
                    Ok(Data {
                        name: String::new(),
                        id: values[0].as_int()?,
                        joined: Data::epoch(),
                    })
                })
                .build()
        });
        &SCHEMA
    }

    fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError> {
        match field.name() {
            "name" => Ok(Value::Text(self.name.clone())),
            "id" => Ok(Value::Int(self.id)),
            "joined" => Ok(Value::DateTime(self.joined)),
            other => Err(BindError::FieldAccess(other.to_string())),
        }
    }
}
