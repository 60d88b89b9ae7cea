//! Selecting which values the mapper transforms.
//!
//! The mapper never inspects types directly; it asks a [`TypeMatch`]
//! whether a value matches. Three implementations cover the usual cases:
//!
//! - [`TypeTag`]: one type, with subtype rules (a boolean is an integer);
//! - [`DType`]: a set of tags, matching if any tag matches;
//! - [`Predicate`]: an arbitrary caller predicate.
//!
//! # Examples
//!
//! ```rust
//! use nestmap::{DType, TypeMatch, TypeTag, Value, predicate};
//!
//! let numbers = DType::any_of([TypeTag::Int, TypeTag::Float]);
//! assert!(numbers.matches(&Value::Float(0.5)));
//! assert!(!numbers.matches(&Value::from("0.5")));
//!
//! let positive = predicate(|value: &Value| value.as_int().is_some_and(|n| n > 0));
//! assert!(positive.matches(&Value::Int(3)));
//! assert!(!positive.matches(&Value::Int(-3)));
//! ```

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::value::{MappingKind, SequenceKind, Value};

/// A type a [`Value`] can be an instance of.
///
/// | Tag          | Instances                                                    |
/// |--------------|--------------------------------------------------------------|
/// | `Any`        | every value                                                  |
/// | `Int`        | integers and booleans                                        |
/// | `Tuple`      | plain tuples and every record                                |
/// | `Sequence`   | every sequence, record, string and byte string               |
/// | `Named(n)`   | mappings, sequences, records, or objects whose type name is `n` |
///
/// The remaining tags match exactly their own variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TypeTag {
    /// Every value.
    Any,
    /// [`Value::None`].
    None,
    /// Booleans.
    Bool,
    /// Integers, including booleans.
    Int,
    /// Floats.
    Float,
    /// Text strings.
    Str,
    /// Byte strings.
    Bytes,
    /// Every mapping.
    Mapping,
    /// Every named tuple.
    Record,
    /// Plain tuples and named tuples.
    Tuple,
    /// Lists.
    List,
    /// Every sequence and named tuple, plus strings and byte strings.
    ///
    /// Matching a string does not make it a container: the mapper never
    /// descends into text.
    Sequence,
    /// Every caller-defined object.
    Object,
    /// A concrete named type.
    Named(Arc<str>),
}

impl TypeTag {
    /// Creates a [`TypeTag::Named`] tag.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Returns `true` if `value` is an instance of this tag.
    pub fn admits(&self, value: &Value) -> bool {
        if let Value::Object(object) = value {
            return object.as_object().is_instance(self);
        }
        match self {
            Self::Any => true,
            Self::None => matches!(value, Value::None),
            Self::Bool => matches!(value, Value::Bool(_)),
            Self::Int => matches!(value, Value::Int(_) | Value::Bool(_)),
            Self::Float => matches!(value, Value::Float(_)),
            Self::Str => matches!(value, Value::Str(_)),
            Self::Bytes => matches!(value, Value::Bytes(_)),
            Self::Mapping => matches!(value, Value::Map(_)),
            Self::Record => matches!(value, Value::Record(_)),
            Self::Tuple => match value {
                Value::Seq(sequence) => matches!(sequence.kind(), SequenceKind::Tuple),
                Value::Record(_) => true,
                _ => false,
            },
            Self::List => match value {
                Value::Seq(sequence) => matches!(sequence.kind(), SequenceKind::List),
                _ => false,
            },
            Self::Sequence => matches!(
                value,
                Value::Seq(_) | Value::Record(_) | Value::Str(_) | Value::Bytes(_)
            ),
            Self::Object => false,
            Self::Named(name) => match value {
                Value::Map(mapping) => {
                    matches!(mapping.kind(), MappingKind::Named(kind) if kind == name)
                }
                Value::Seq(sequence) => {
                    matches!(sequence.kind(), SequenceKind::Named(kind) if kind == name)
                }
                Value::Record(record) => record.record_type().name() == &**name,
                _ => false,
            },
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Any => "any",
            Self::None => "none",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bytes => "bytes",
            Self::Mapping => "mapping",
            Self::Record => "record",
            Self::Tuple => "tuple",
            Self::List => "list",
            Self::Sequence => "sequence",
            Self::Object => "object",
            Self::Named(name) => &**name,
        };
        formatter.write_str(name)
    }
}

/// Decides whether a value is selected.
///
/// Used both for the dtype (which values the function is applied to) and
/// for the exclusion (which values are never transformed).
pub trait TypeMatch {
    /// Returns `true` if `value` is selected.
    fn matches(&self, value: &Value) -> bool;

    /// Returns `true` if this matcher can never select anything.
    ///
    /// An empty exclusion is treated as no exclusion and is not evaluated.
    fn is_empty(&self) -> bool {
        false
    }
}

impl TypeMatch for TypeTag {
    fn matches(&self, value: &Value) -> bool {
        self.admits(value)
    }
}

impl<T: TypeMatch + ?Sized> TypeMatch for &T {
    fn matches(&self, value: &Value) -> bool {
        (**self).matches(value)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl TypeMatch for [TypeTag] {
    fn matches(&self, value: &Value) -> bool {
        self.iter().any(|tag| tag.admits(value))
    }

    fn is_empty(&self) -> bool {
        <[TypeTag]>::is_empty(self)
    }
}

impl<const N: usize> TypeMatch for [TypeTag; N] {
    fn matches(&self, value: &Value) -> bool {
        self.as_slice().matches(value)
    }

    fn is_empty(&self) -> bool {
        N == 0
    }
}

/// A set of [`TypeTag`]s. Matches a value if any of its tags does.
///
/// # Examples
///
/// ```rust
/// use nestmap::{DType, TypeMatch, TypeTag, Value};
///
/// let dtype: DType = TypeTag::Str.into();
/// assert!(dtype.matches(&Value::from("abc")));
///
/// let empty = DType::new();
/// assert!(empty.is_empty());
/// assert!(!empty.matches(&Value::Int(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DType(SmallVec<[TypeTag; 4]>);

impl DType {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set containing one tag.
    pub fn of(tag: TypeTag) -> Self {
        let mut tags = SmallVec::new();
        tags.push(tag);
        Self(tags)
    }

    /// Creates a set from several tags.
    pub fn any_of(tags: impl IntoIterator<Item = TypeTag>) -> Self {
        tags.into_iter().collect()
    }

    /// Adds a tag, ignoring duplicates.
    #[must_use]
    pub fn with(mut self, tag: TypeTag) -> Self {
        self.insert(tag);
        self
    }

    /// Adds a tag, ignoring duplicates. Returns `true` if it was added.
    pub fn insert(&mut self, tag: TypeTag) -> bool {
        if self.0.contains(&tag) {
            false
        } else {
            self.0.push(tag);
            true
        }
    }

    /// Returns the tags in insertion order.
    pub fn tags(&self) -> &[TypeTag] {
        &self.0
    }

    /// Returns `true` if the set contains `tag` itself.
    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.0.contains(tag)
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TypeMatch for DType {
    fn matches(&self, value: &Value) -> bool {
        self.tags().matches(value)
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<TypeTag> for DType {
    fn from(tag: TypeTag) -> Self {
        Self::of(tag)
    }
}

impl FromIterator<TypeTag> for DType {
    fn from_iter<I: IntoIterator<Item = TypeTag>>(iter: I) -> Self {
        let mut dtype = Self::new();
        for tag in iter {
            dtype.insert(tag);
        }
        dtype
    }
}

impl fmt::Display for DType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("(")?;
        for (index, tag) in self.0.iter().enumerate() {
            if index > 0 {
                formatter.write_str(", ")?;
            }
            write!(formatter, "{tag}")?;
        }
        formatter.write_str(")")
    }
}

/// A [`TypeMatch`] backed by a caller predicate.
#[derive(Clone, Copy)]
pub struct Predicate<F>(F);

impl<F> Predicate<F>
where
    F: Fn(&Value) -> bool,
{
    /// Wraps a predicate.
    pub const fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<F> TypeMatch for Predicate<F>
where
    F: Fn(&Value) -> bool,
{
    fn matches(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl<F> fmt::Debug for Predicate<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Predicate(..)")
    }
}

/// Wraps a closure as a [`TypeMatch`].
pub const fn predicate<F>(predicate: F) -> Predicate<F>
where
    F: Fn(&Value) -> bool,
{
    Predicate::new(predicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Mapping, RecordType, Sequence};
    use rstest::rstest;

    fn point() -> Value {
        Value::Record(RecordType::new("Point", ["x", "y"]).instantiate([1, 2]).unwrap())
    }

    #[rstest]
    #[case(TypeTag::Int, Value::Int(1), true)]
    #[case(TypeTag::Int, Value::Bool(true), true)]
    #[case(TypeTag::Bool, Value::Int(1), false)]
    #[case(TypeTag::Float, Value::Int(1), false)]
    #[case(TypeTag::Str, Value::from("a"), true)]
    #[case(TypeTag::Sequence, Value::from("abc"), true)]
    #[case(TypeTag::Sequence, Value::Bytes(vec![1]), true)]
    #[case(TypeTag::Sequence, Value::dict([("a", 1)]), false)]
    #[case(TypeTag::Sequence, Value::list([1]), true)]
    #[case(TypeTag::Sequence, Value::tuple([1]), true)]
    #[case(TypeTag::Sequence, point(), true)]
    #[case(TypeTag::Tuple, point(), true)]
    #[case(TypeTag::Tuple, Value::list([1]), false)]
    #[case(TypeTag::List, Value::tuple([1]), false)]
    #[case(TypeTag::Record, Value::tuple([1]), false)]
    #[case(TypeTag::Mapping, Value::dict([("a", 1)]), true)]
    #[case(TypeTag::named("Point"), point(), true)]
    #[case(TypeTag::named("Point"), Value::tuple([1, 2]), false)]
    #[case(TypeTag::None, Value::None, true)]
    #[case(TypeTag::Any, Value::Bytes(vec![]), true)]
    fn admits(#[case] tag: TypeTag, #[case] value: Value, #[case] expected: bool) {
        assert_eq!(tag.admits(&value), expected);
    }

    #[rstest]
    fn named_tags_match_named_containers() {
        let batch = Value::Map(Mapping::with_kind(MappingKind::named("Batch")));
        let deque = Value::Seq(Sequence::new(SequenceKind::named("Deque"), vec![]));

        assert!(TypeTag::named("Batch").admits(&batch));
        assert!(TypeTag::Mapping.admits(&batch));
        assert!(!TypeTag::named("Batch").admits(&Value::dict(Vec::<(&str, i64)>::new())));
        assert!(TypeTag::named("Deque").admits(&deque));
        assert!(!TypeTag::List.admits(&deque));
    }

    #[rstest]
    fn dtype_deduplicates_and_matches_any_tag() {
        let dtype = DType::any_of([TypeTag::Int, TypeTag::Str, TypeTag::Int]);
        assert_eq!(dtype.len(), 2);
        assert!(dtype.matches(&Value::from("x")));
        assert!(dtype.matches(&Value::Bool(false)));
        assert!(!dtype.matches(&Value::Float(1.0)));
        assert_eq!(dtype.to_string(), "(int, str)");
    }

    #[rstest]
    fn arrays_and_slices_match() {
        let tags = [TypeTag::Float, TypeTag::None];
        assert!(tags.matches(&Value::None));
        assert!(!tags.matches(&Value::Int(0)));
        let none: [TypeTag; 0] = [];
        assert!(TypeMatch::is_empty(&none));
    }

    #[rstest]
    fn predicate_matches_by_closure() {
        let long_strings = predicate(|value: &Value| value.as_str().is_some_and(|s| s.len() > 3));
        assert!(long_strings.matches(&Value::from("abcd")));
        assert!(!long_strings.matches(&Value::from("abc")));
        assert!(!long_strings.is_empty());
    }
}
