//! The dynamic value tree the mapper walks.
//!
//! A [`Value`] is either a scalar leaf, one of three built-in container
//! kinds, or a caller-defined [`Object`]:
//!
//! - [`Mapping`]: insertion-ordered key to value entries, tagged with a
//!   [`MappingKind`];
//! - [`Record`]: a named tuple with a shared [`RecordType`];
//! - [`Sequence`]: ordered items tagged with a [`SequenceKind`]. Plain tuples
//!   are sequences of kind [`SequenceKind::Tuple`].
//!
//! Strings are always leaves. Byte strings are sequences of integers.
//!
//! # Examples
//!
//! ```rust
//! use nestmap::{NodeShape, Value};
//!
//! let batch = Value::dict([
//!     ("inputs", Value::list([1, 2, 3])),
//!     ("label", Value::from("cat")),
//! ]);
//!
//! assert_eq!(batch.node_shape(), NodeShape::Mapping);
//! assert_eq!(batch.get("label"), Some(&Value::from("cat")));
//! ```

mod mapping;
mod object;
mod record;
mod sequence;

use std::fmt;

pub use mapping::{Mapping, MappingKind};
pub use object::{Contents, Object, ObjectRef};
pub use record::{Record, RecordType};
pub use sequence::{Sequence, SequenceKind};

use crate::dtype::TypeTag;

/// A mapping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(String),
}

impl Key {
    /// Returns the key as a string slice, if it is a string key.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(key) => Some(key),
            Self::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(key) => write!(formatter, "{key}"),
            Self::Str(key) => formatter.write_str(key),
        }
    }
}

impl From<&str> for Key {
    fn from(key: &str) -> Self {
        Self::Str(key.to_string())
    }
}

impl From<String> for Key {
    fn from(key: String) -> Self {
        Self::Str(key)
    }
}

impl From<&String> for Key {
    fn from(key: &String) -> Self {
        Self::Str(key.clone())
    }
}

impl From<i64> for Key {
    fn from(key: i64) -> Self {
        Self::Int(key)
    }
}

impl From<i32> for Key {
    fn from(key: i32) -> Self {
        Self::Int(i64::from(key))
    }
}

/// The structural shape of a node, as seen by the mapper.
///
/// The mapper classifies every node once, in a fixed priority order: a
/// dtype match makes it a [`NodeShape::Leaf`], otherwise it is probed as a
/// mapping, labeled tuple, or sequence, and anything else is opaque. The
/// shape is recorded on the mapper's trace events.
///
/// [`Value::node_shape`] runs the structural probe alone, so it never
/// returns [`NodeShape::Leaf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// A node that matched the dtype and was handed to the function.
    Leaf,
    /// A key to value mapping.
    Mapping,
    /// A named tuple.
    LabeledTuple,
    /// An ordered sequence.
    Sequence,
    /// Anything else. Returned unchanged unless it matches the dtype.
    Opaque,
}

/// A dynamically typed, arbitrarily nested value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// The absence of a value.
    #[default]
    None,
    /// A boolean. Booleans are also instances of [`TypeTag::Int`].
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A text string. Always a leaf.
    Str(String),
    /// A byte string. Descended as a sequence of integers.
    Bytes(Vec<u8>),
    /// A keyed mapping.
    Map(Mapping),
    /// A named tuple.
    Record(Record),
    /// An ordered sequence.
    Seq(Sequence),
    /// A caller-defined object.
    Object(ObjectRef),
}

impl Value {
    /// Creates a list.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Seq(Sequence::list(items))
    }

    /// Creates a tuple without field names.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::Seq(Sequence::tuple(items))
    }

    /// Creates a dictionary.
    pub fn dict<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Self>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Map(entries.into_iter().collect())
    }

    /// Wraps a caller-defined object.
    pub fn object<T: Object>(object: T) -> Self {
        Self::Object(ObjectRef::new(object))
    }

    /// Returns the name of this value's concrete type.
    pub fn type_name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bytes(_) => "bytes",
            Self::Map(mapping) => mapping.kind().name(),
            Self::Record(record) => record.record_type().name(),
            Self::Seq(sequence) => sequence.kind().name(),
            Self::Object(object) => object.type_name(),
        }
    }

    /// Returns `true` if this value is an instance of `tag`.
    ///
    /// ```rust
    /// use nestmap::{TypeTag, Value};
    ///
    /// assert!(Value::Bool(true).is_instance(&TypeTag::Int));
    /// assert!(!Value::Int(1).is_instance(&TypeTag::Bool));
    /// assert!(Value::from("abc").is_instance(&TypeTag::Sequence));
    /// assert!(!Value::None.is_instance(&TypeTag::Sequence));
    /// ```
    pub fn is_instance(&self, tag: &TypeTag) -> bool {
        tag.admits(self)
    }

    /// Probes the structural shape of this value.
    ///
    /// For objects this calls [`Object::contents`].
    pub fn node_shape(&self) -> NodeShape {
        match self {
            Self::Map(_) => NodeShape::Mapping,
            Self::Record(_) => NodeShape::LabeledTuple,
            Self::Seq(_) | Self::Bytes(_) => NodeShape::Sequence,
            Self::Object(object) => match object.as_object().contents() {
                Some(Contents::Mapping(_)) => NodeShape::Mapping,
                Some(Contents::Fields(_)) => NodeShape::LabeledTuple,
                Some(Contents::Elements(_)) => NodeShape::Sequence,
                None => NodeShape::Opaque,
            },
            Self::None
            | Self::Bool(_)
            | Self::Int(_)
            | Self::Float(_)
            | Self::Str(_) => NodeShape::Opaque,
        }
    }

    /// Returns `true` for [`Value::None`].
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the float, if this is a [`Value::Float`].
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a [`Value::Bytes`].
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a [`Value::Map`].
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Map(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Returns the record, if this is a [`Value::Record`].
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the sequence, if this is a [`Value::Seq`].
    pub const fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Seq(sequence) => Some(sequence),
            _ => None,
        }
    }

    /// Returns the object handle, if this is a [`Value::Object`].
    pub const fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up a mapping entry or a record field by name.
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(mapping) => mapping.get(key),
            Self::Record(record) => record.get(key),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($source:ty => $variant:ident($convert:expr)),* $(,)?) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant($convert(value))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool(std::convert::identity),
    i64 => Int(std::convert::identity),
    i32 => Int(i64::from),
    u32 => Int(i64::from),
    f64 => Float(std::convert::identity),
    f32 => Float(f64::from),
    String => Str(std::convert::identity),
    &str => Str(str::to_string),
    Mapping => Map(std::convert::identity),
    Record => Record(std::convert::identity),
    Sequence => Seq(std::convert::identity),
    ObjectRef => Object(std::convert::identity),
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Self::None
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Seq(Sequence::new(SequenceKind::List, items))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::None, Into::into)
    }
}
