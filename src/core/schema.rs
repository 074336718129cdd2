use chrono::{NaiveDate, NaiveDateTime};

use crate::BindError;
use crate::core::value::{Value, ValueKind};

/// Date format applied to `DateTime` and `Date` fields that do not declare
/// their own pattern.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata for one mapped field of a record type.
///
/// A `FieldSpec` pairs the field's exposed column name with its
/// [`ValueKind`] and, for dated kinds, a chrono format pattern. The spec is
/// immutable once built and owns the parse/render dispatch for its kind, so
/// nothing downstream ever inspects a token to guess its type.
///
/// # Examples
///
/// ```
/// use csvbind::core::schema::FieldSpec;
/// use csvbind::core::value::ValueKind;
///
/// let id = FieldSpec::new("id", ValueKind::Int);
/// let born = FieldSpec::new("born", ValueKind::Date).with_format("%Y-%m-%d");
///
/// assert_eq!(id.name(), "id");
/// assert_eq!(born.date_format(), Some("%Y-%m-%d"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    kind: ValueKind,
    date_format: Option<String>,
}

impl FieldSpec {
    /// Creates a spec for the field exposed as `name`.
    ///
    /// `DateTime` and `Date` fields start out with
    /// [`DEFAULT_DATE_FORMAT`]; override it with [`FieldSpec::with_format`].
    pub fn new(name: &str, kind: ValueKind) -> Self {
        let date_format = kind.is_dated().then(|| DEFAULT_DATE_FORMAT.to_string());

        Self {
            name: name.to_string(),
            kind,
            date_format,
        }
    }

    /// Replaces the date format pattern. Only meaningful for dated kinds.
    pub fn with_format(mut self, format: &str) -> Self {
        self.date_format = Some(format.to_string());
        self
    }

    /// The column name this field is exposed as.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn date_format(&self) -> Option<&str> {
        self.date_format.as_deref()
    }

    /// Converts one row token into a [`Value`] of this field's kind.
    ///
    /// Integers parse base 10, doubles through the standard float grammar,
    /// dated kinds through the field's format pattern. `Text` passes the
    /// token through unchanged; embedded delimiters are not unescaped.
    pub fn parse(&self, token: &str) -> Result<Value, BindError> {
        match self.kind {
            ValueKind::Int => token
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|_| self.parse_error(token)),
            ValueKind::Long => token
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|_| self.parse_error(token)),
            ValueKind::Double => token
                .parse::<f64>()
                .map(Value::Double)
                .map_err(|_| self.parse_error(token)),
            ValueKind::DateTime => NaiveDateTime::parse_from_str(token, self.format())
                .map(Value::DateTime)
                .map_err(|_| self.parse_error(token)),
            ValueKind::Date => NaiveDate::parse_from_str(token, self.format())
                .map(Value::Date)
                .map_err(|_| self.parse_error(token)),
            ValueKind::Text => Ok(Value::Text(token.to_string())),
        }
    }

    /// Renders a value back to its row text: numbers through standard
    /// decimal formatting, dated kinds through the field's format pattern,
    /// text unchanged. No delimiter escaping.
    pub fn render(&self, value: &Value) -> String {
        match value {
            Value::Int(v) => v.to_string(),
            Value::Long(v) => v.to_string(),
            Value::Double(v) => v.to_string(),
            Value::DateTime(v) => v.format(self.format()).to_string(),
            Value::Date(v) => v.format(self.format()).to_string(),
            Value::Text(v) => v.clone(),
        }
    }

    fn format(&self) -> &str {
        self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT)
    }

    fn parse_error(&self, token: &str) -> BindError {
        BindError::Parse {
            column: self.name.clone(),
            token: token.to_string(),
            kind: self.kind,
        }
    }
}

/// One way to build a record from positional values.
///
/// The build function receives exactly `arity` values, in the order the
/// header columns appear — not in any declared field order. Bodies should
/// extract through the typed accessors on [`Value`] so that a header whose
/// column order does not match the parameter order fails loudly.
#[derive(Debug)]
pub struct Constructor<T> {
    arity: usize,
    build: fn(&[Value]) -> Result<T, BindError>,
}

impl<T> Constructor<T> {
    pub fn new(arity: usize, build: fn(&[Value]) -> Result<T, BindError>) -> Self {
        Self { arity, build }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn invoke(&self, values: &[Value]) -> Result<T, BindError> {
        (self.build)(values)
    }
}

/// The declared mapping for one record type: its ordered fields and its
/// available constructors.
///
/// Built once per type (see [`Record::schema`]) and read-only afterwards.
/// Field names are unique within a schema; the builder enforces this.
pub struct RecordSchema<T> {
    fields: Vec<FieldSpec>,
    constructors: Vec<Constructor<T>>,
}

impl<T> RecordSchema<T> {
    pub fn builder() -> RecordSchemaBuilder<T> {
        RecordSchemaBuilder {
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Mapped fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks a field up by its exposed column name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Selects the constructor taking `arity` values.
    ///
    /// When several constructors share an arity, the first one in
    /// declaration order wins. Declaration order is the order of
    /// `constructor` calls on the builder, so selection is deterministic.
    pub fn constructor_for(&self, arity: usize) -> Option<&Constructor<T>> {
        self.constructors.iter().find(|c| c.arity() == arity)
    }
}

/// Builder for [`RecordSchema`].
pub struct RecordSchemaBuilder<T> {
    fields: Vec<FieldSpec>,
    constructors: Vec<Constructor<T>>,
}

impl<T> RecordSchemaBuilder<T> {
    /// Declares the next mapped field.
    ///
    /// # Panics
    ///
    /// Panics if a field with the same exposed name was already declared;
    /// duplicate column names are a programming error in the record type.
    pub fn field(mut self, spec: FieldSpec) -> Self {
        if self.fields.iter().any(|f| f.name() == spec.name()) {
            panic!("duplicate field name `{}` in record schema", spec.name());
        }
        self.fields.push(spec);
        self
    }

    /// Declares the next constructor.
    pub fn constructor(mut self, arity: usize, build: fn(&[Value]) -> Result<T, BindError>) -> Self {
        self.constructors.push(Constructor::new(arity, build));
        self
    }

    pub fn build(self) -> RecordSchema<T> {
        RecordSchema {
            fields: self.fields,
            constructors: self.constructors,
        }
    }
}

/// A type that can be bound to CSV rows.
///
/// Implementations play the role the `@Column` annotations play in an
/// annotation-driven mapper: they declare, once per type, which fields are
/// exposed under which column names and how instances are constructed from
/// positional values.
///
/// `schema` should hand out a reference to a `LazyLock`-initialized static,
/// so the schema is derived on first use and cached by the type itself:
///
/// ```
/// use std::sync::LazyLock;
///
/// use csvbind::BindError;
/// use csvbind::core::schema::{FieldSpec, Record, RecordSchema};
/// use csvbind::core::value::{Value, ValueKind};
///
/// struct Data {
///     id: i32,
///     name: String,
/// }
///
/// impl Record for Data {
///     fn schema() -> &'static RecordSchema<Self> {
///         static SCHEMA: LazyLock<RecordSchema<Data>> = LazyLock::new(|| {
///             RecordSchema::builder()
///                 .field(FieldSpec::new("id", ValueKind::Int))
///                 .field(FieldSpec::new("name", ValueKind::Text))
///                 .constructor(2, |values| {
///                     Ok(Data {
///                         id: values[0].as_int()?,
///                         name: values[1].as_text()?.to_string(),
///                     })
///                 })
///                 .build()
///         });
///         &SCHEMA
///     }
///
///     fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError> {
///         match field.name() {
///             "id" => Ok(Value::Int(self.id)),
///             "name" => Ok(Value::Text(self.name.clone())),
///             other => Err(BindError::FieldAccess(other.to_string())),
///         }
///     }
/// }
/// ```
pub trait Record: Sized + 'static {
    /// The schema declared for this type.
    fn schema() -> &'static RecordSchema<Self>;

    /// Reads the current value of one mapped field, for encoding.
    ///
    /// Implementations owning their fields directly cannot fail; the error
    /// is reserved for types whose values sit behind a runtime boundary.
    fn value_of(&self, field: &FieldSpec) -> Result<Value, BindError>;
}
