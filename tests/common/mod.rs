use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use csvbind::BindError;
use csvbind::core::schema::{FieldSpec, Record, RecordSchema};
use csvbind::core::value::{Value, ValueKind};

/// Record shared by the integration tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub id: i64,
    pub price: f64,
    pub restocked: NaiveDateTime,
}

impl Product {
    pub fn new(name: &str, id: i64, price: f64, restocked: NaiveDateTime) -> Self {
        Self {
            name: name.to_string(),
            id,
            price,
            restocked,
        }
    }
}

pub fn restocked_at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

impl Record for Product {
    fn schema() -> &'static RecordSchema<Self> {
        static SCHEMA: LazyLock<RecordSchema<Product>> = LazyLock::new(|| {
            RecordSchema::builder()
                .field(FieldSpec::new("name", ValueKind::Text))
                .field(FieldSpec::new("id", ValueKind::Long))
                .field(FieldSpec::new("price", ValueKind::Double))
                .field(FieldSpec::new("restocked", ValueKind::DateTime))
                .constructor(4, |values| {
                    Ok(Product {
                        name: values[0].as_text()?.to_string(),
                        id: values[1].as_long()?,
                        price: values[2].as_double()?,
                        restocked: values[3].as_datetime()?,
                    })
                })
                .constructor(2, |values| {
                    Ok(Product {
                        name: values[0].as_text()?.to_string(),
                        id: values[1].as_long()?,
                        price: 0.0,
                        restocked: epoch(),
                    })
                })
                .build()
        });
        &SCHEMA
    }

    fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError> {
        match field.name() {
            "name" => Ok(Value::Text(self.name.clone())),
            "id" => Ok(Value::Long(self.id)),
            "price" => Ok(Value::Double(self.price)),
            "restocked" => Ok(Value::DateTime(self.restocked)),
            other => Err(BindError::FieldAccess(other.to_string())),
        }
    }
}
