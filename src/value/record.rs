//! Named tuples: fixed-arity records whose positions carry field names.

use std::fmt;
use std::sync::Arc;

use crate::error::{ConstructionError, FromValueError};

use super::Value;

#[derive(PartialEq, Eq, Hash)]
struct RecordTypeInner {
    name: Arc<str>,
    fields: Box<[Arc<str>]>,
}

/// The type of a [`Record`]: a name plus ordered field names.
///
/// Cloning is cheap; every record built from the same `RecordType` shares it.
/// Two record types are equal when their names and field lists are equal.
///
/// # Examples
///
/// ```rust
/// use nestmap::RecordType;
///
/// let point = RecordType::new("Point", ["x", "y"]);
/// assert_eq!(point.name(), "Point");
/// assert_eq!(point.arity(), 2);
/// assert_eq!(point.position("y"), Some(1));
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RecordType(Arc<RecordTypeInner>);

impl RecordType {
    /// Creates a record type.
    pub fn new<N, F, I>(name: N, fields: I) -> Self
    where
        N: Into<Arc<str>>,
        F: Into<Arc<str>>,
        I: IntoIterator<Item = F>,
    {
        Self(Arc::new(RecordTypeInner {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }))
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns the field names in positional order.
    pub fn fields(&self) -> &[Arc<str>] {
        &self.0.fields
    }

    /// Returns the number of fields.
    pub fn arity(&self) -> usize {
        self.0.fields.len()
    }

    /// Returns the position of a field.
    pub fn position(&self, field: &str) -> Option<usize> {
        self.0.fields.iter().position(|name| &**name == field)
    }

    /// Builds a record of this type from positional values.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ArityMismatch`] when the number of values
    /// differs from the number of fields.
    pub fn instantiate<I>(&self, values: I) -> Result<Record, ConstructionError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Record::new(self.clone(), values.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}(", self.name())?;
        for (index, field) in self.fields().iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            formatter.write_str(field)?;
        }
        formatter.write_str(")")
    }
}

/// A named tuple value.
///
/// # Examples
///
/// ```rust
/// use nestmap::{Record, RecordType, Value};
///
/// let point = RecordType::new("Point", ["x", "y"]);
/// let record = Record::new(point, vec![Value::Int(1), Value::Int(2)]).unwrap();
/// assert_eq!(record.get("y"), Some(&Value::Int(2)));
///
/// let too_short = Record::new(record.record_type().clone(), vec![Value::Int(1)]);
/// assert!(too_short.is_err());
/// ```
#[derive(Clone, PartialEq)]
pub struct Record {
    record_type: RecordType,
    values: Vec<Value>,
}

impl Record {
    /// Creates a record, checking the arity.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::ArityMismatch`] when `values` does not
    /// have exactly one value per field.
    pub fn new(record_type: RecordType, values: Vec<Value>) -> Result<Self, ConstructionError> {
        if values.len() != record_type.arity() {
            return Err(ConstructionError::ArityMismatch {
                type_name: record_type.name().to_string(),
                expected: record_type.arity(),
                actual: values.len(),
            });
        }
        Ok(Self {
            record_type,
            values,
        })
    }

    /// Builds a record from values generated by `#[derive(NamedTuple)]`.
    #[doc(hidden)]
    pub fn __from_derived(record_type: RecordType, values: Vec<Value>) -> Self {
        debug_assert_eq!(values.len(), record_type.arity());
        Self {
            record_type,
            values,
        }
    }

    /// Splits a record (or a mapping with matching keys) into positional
    /// values for `#[derive(NamedTuple)]`.
    #[doc(hidden)]
    pub fn __destructure(
        value: Value,
        type_name: &str,
        fields: &[&str],
    ) -> Result<Vec<Value>, FromValueError> {
        match value {
            Value::Record(record) if record.record_type.name() == type_name => {
                if record.values.len() != fields.len() {
                    return Err(FromValueError::type_mismatch(
                        format!("{type_name} with {} fields", fields.len()),
                        format!("{type_name} with {} fields", record.values.len()),
                    ));
                }
                Ok(record.values)
            }
            Value::Map(mut mapping) => fields
                .iter()
                .map(|field| {
                    mapping
                        .remove(*field)
                        .ok_or_else(|| FromValueError::MissingField {
                            type_name: type_name.to_string(),
                            field: (*field).to_string(),
                        })
                })
                .collect(),
            other => Err(FromValueError::type_mismatch(type_name, other.type_name())),
        }
    }

    /// Returns the record's type.
    pub const fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` for a record type without fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the value of a field by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.record_type
            .position(field)
            .and_then(|index| self.values.get(index))
    }

    /// Returns the value at a position.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the values in positional order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterates over `(field, value)` pairs in positional order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.record_type
            .fields()
            .iter()
            .map(|field| &**field)
            .zip(&self.values)
    }

    /// Consumes the record, returning its type and values.
    pub fn into_parts(self) -> (RecordType, Vec<Value>) {
        (self.record_type, self.values)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut record = formatter.debug_struct(self.record_type.name());
        for (field, value) in self.iter() {
            record.field(field, value);
        }
        record.finish()
    }
}
