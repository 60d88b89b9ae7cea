//! Conversions between Rust values and [`Value`] trees.
//!
//! [`IntoValue`] and [`FromValue`] let typed data go through a mapping pass
//! and come back typed:
//!
//! ```rust
//! use nestmap::{map_collection, FromValue, IntoValue, TypeTag, Value};
//!
//! let scores: Vec<Option<i64>> = vec![Some(1), None, Some(3)];
//! let doubled = map_collection(scores.into_value(), &TypeTag::Int, |value| {
//!     Value::Int(value.as_int().unwrap_or_default() * 2)
//! })
//! .unwrap();
//!
//! let back = Vec::<Option<i64>>::from_value(doubled).unwrap();
//! assert_eq!(back, vec![Some(2), None, Some(6)]);
//! ```
//!
//! Structs with named fields get both traits from `#[derive(NamedTuple)]`.

use std::collections::BTreeMap;

use crate::error::FromValueError;
use crate::value::{Key, Mapping, Value};

/// Converts a Rust value into a [`Value`].
pub trait IntoValue {
    /// Performs the conversion.
    fn into_value(self) -> Value;
}

/// Converts a [`Value`] back into a Rust value.
pub trait FromValue: Sized {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns a [`FromValueError`] when the value has the wrong type or
    /// does not fit the target.
    fn from_value(value: Value) -> Result<Self, FromValueError>;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        Ok(value)
    }
}

macro_rules! impl_into_value_via_from {
    ($($source:ty),* $(,)?) => {
        $(
            impl IntoValue for $source {
                fn into_value(self) -> Value {
                    Value::from(self)
                }
            }
        )*
    };
}

impl_into_value_via_from!(bool, i32, i64, u32, f64, String, &str);

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        value
            .as_bool()
            .ok_or_else(|| FromValueError::type_mismatch("bool", value.type_name()))
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Int(number) => Ok(number),
            Value::Bool(flag) => Ok(Self::from(flag)),
            other => Err(FromValueError::type_mismatch("int", other.type_name())),
        }
    }
}

macro_rules! impl_from_value_narrowing {
    ($($target:ty),* $(,)?) => {
        $(
            impl FromValue for $target {
                fn from_value(value: Value) -> Result<Self, FromValueError> {
                    let number = i64::from_value(value)?;
                    Self::try_from(number).map_err(|_| FromValueError::OutOfRange {
                        value: number,
                        target: stringify!($target),
                    })
                }
            }
        )*
    };
}

impl_from_value_narrowing!(i32, u32);

impl FromValue for f64 {
    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Float(number) => Ok(number),
            Value::Int(number) => Ok(number as Self),
            other => Err(FromValueError::type_mismatch("float", other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Str(text) => Ok(text),
            other => Err(FromValueError::type_mismatch("str", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::list(self.into_iter().map(IntoValue::into_value))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::Seq(sequence) => sequence
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    T::from_value(item).map_err(|error| error.in_field(index.to_string()))
                })
                .collect(),
            other => Err(FromValueError::type_mismatch("sequence", other.type_name())),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::None, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for BTreeMap<String, T> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, value)| (key, value.into_value()))
                .collect::<Mapping>(),
        )
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, FromValueError> {
        let mapping = match value {
            Value::Map(mapping) => mapping,
            other => return Err(FromValueError::type_mismatch("mapping", other.type_name())),
        };
        mapping
            .into_iter()
            .map(|(key, value)| match key {
                Key::Str(name) => match T::from_value(value) {
                    Ok(converted) => Ok((name, converted)),
                    Err(error) => Err(error.in_field(name)),
                },
                Key::Int(number) => Err(FromValueError::type_mismatch(
                    "string key",
                    format!("integer key {number}"),
                )),
            })
            .collect()
    }
}
