//! serde support for values, keys and dtypes.
//!
//! Values serialize as the plain data they hold:
//!
//! - `None` as unit, scalars and bytes natively;
//! - mappings as maps, with integer keys as integers. Formats whose map
//!   keys are always strings, such as JSON, write them as strings and read
//!   them back as [`Key::Str`];
//! - records as maps from field name to value;
//! - every sequence kind as a sequence.
//!
//! Container kinds and record types are not part of the serialized form, so
//! deserializing produces plain dictionaries and lists. Objects cannot be
//! serialized.
//!
//! A [`DType`] serializes as a list of tags and deserializes from either a
//! list or a single tag.

use std::fmt;

use serde::Deserialize as _;

use crate::dtype::{DType, TypeTag};
use crate::value::{Key, Mapping, Sequence, Value};

// =============================================================================
// Value
// =============================================================================

impl serde::Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::{Error, SerializeMap, SerializeSeq};

        match self {
            Self::None => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(number) => serializer.serialize_i64(*number),
            Self::Float(number) => serializer.serialize_f64(*number),
            Self::Str(text) => serializer.serialize_str(text),
            Self::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Self::Map(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (key, value) in mapping.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Self::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for (field, value) in record.iter() {
                    map.serialize_entry(field, value)?;
                }
                map.end()
            }
            Self::Seq(sequence) => {
                let mut seq = serializer.serialize_seq(Some(sequence.len()))?;
                for item in sequence {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(object) => Err(S::Error::custom(format!(
                "cannot serialize object `{}`",
                object.type_name()
            ))),
        }
    }
}

struct ValueVisitor;

impl<'de> serde::de::Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any value")
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::None)
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde::Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, flag: bool) -> Result<Value, E> {
        Ok(Value::Bool(flag))
    }

    fn visit_i64<E>(self, number: i64) -> Result<Value, E> {
        Ok(Value::Int(number))
    }

    fn visit_u64<E>(self, number: u64) -> Result<Value, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(number)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {number} out of range for i64")))
    }

    fn visit_f64<E>(self, number: f64) -> Result<Value, E> {
        Ok(Value::Float(number))
    }

    fn visit_str<E>(self, text: &str) -> Result<Value, E> {
        Ok(Value::Str(text.to_string()))
    }

    fn visit_string<E>(self, text: String) -> Result<Value, E> {
        Ok(Value::Str(text))
    }

    fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(bytes.to_vec()))
    }

    fn visit_byte_buf<E>(self, bytes: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(bytes))
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut sequence = Sequence::list(Vec::<Value>::new());
        while let Some(item) = access.next_element::<Value>()? {
            sequence.push(item);
        }
        Ok(Value::Seq(sequence))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((key, value)) = access.next_entry::<Key, Value>()? {
            mapping.insert(key, value);
        }
        Ok(Value::Map(mapping))
    }
}

impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

// =============================================================================
// Key
// =============================================================================

impl serde::Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Int(number) => serializer.serialize_i64(*number),
            Self::Str(text) => serializer.serialize_str(text),
        }
    }
}

struct KeyVisitor;

impl serde::de::Visitor<'_> for KeyVisitor {
    type Value = Key;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or integer key")
    }

    fn visit_i64<E>(self, number: i64) -> Result<Key, E> {
        Ok(Key::Int(number))
    }

    fn visit_u64<E>(self, number: u64) -> Result<Key, E>
    where
        E: serde::de::Error,
    {
        i64::try_from(number)
            .map(Key::Int)
            .map_err(|_| E::custom(format!("key {number} out of range for i64")))
    }

    fn visit_str<E>(self, text: &str) -> Result<Key, E> {
        Ok(Key::Str(text.to_string()))
    }

    fn visit_string<E>(self, text: String) -> Result<Key, E> {
        Ok(Key::Str(text))
    }
}

impl<'de> serde::Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(KeyVisitor)
    }
}

// =============================================================================
// DType
// =============================================================================

impl serde::Serialize for DType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.tags())
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum DTypeRepr {
    One(TypeTag),
    Many(Vec<TypeTag>),
}

impl<'de> serde::Deserialize<'de> for DType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match DTypeRepr::deserialize(deserializer)? {
            DTypeRepr::One(tag) => Self::of(tag),
            DTypeRepr::Many(tags) => tags.into_iter().collect(),
        })
    }
}
