//! Ordered sequences: lists, plain tuples, and named sequence types.

use std::fmt;
use std::sync::Arc;

use super::Value;

/// The concrete type of a [`Sequence`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SequenceKind {
    /// A growable list.
    #[default]
    List,
    /// A tuple without field names.
    Tuple,
    /// A caller-defined sequence type, identified by name.
    Named(Arc<str>),
}

impl SequenceKind {
    /// Creates a named sequence kind.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the type name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Tuple => "tuple",
            Self::Named(name) => &**name,
        }
    }
}

/// An ordered sequence of values tagged with its concrete kind.
#[derive(Clone, PartialEq, Default)]
pub struct Sequence {
    kind: SequenceKind,
    items: Vec<Value>,
}

impl Sequence {
    /// Creates a sequence of the given kind.
    pub const fn new(kind: SequenceKind, items: Vec<Value>) -> Self {
        Self { kind, items }
    }

    /// Creates a list.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::new(SequenceKind::List, items.into_iter().map(Into::into).collect())
    }

    /// Creates a tuple without field names.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::new(SequenceKind::Tuple, items.into_iter().map(Into::into).collect())
    }

    /// Returns the concrete kind of this sequence.
    pub const fn kind(&self) -> &SequenceKind {
        &self.kind
    }

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns the items as a slice.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Iterates over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    /// Appends an item.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Consumes the sequence, returning its kind and items.
    pub fn into_parts(self) -> (SequenceKind, Vec<Value>) {
        (self.kind, self.items)
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SequenceKind::List => formatter.debug_list().entries(&self.items).finish(),
            SequenceKind::Tuple => {
                let mut tuple = formatter.debug_tuple("");
                for item in &self.items {
                    tuple.field(item);
                }
                tuple.finish()
            }
            SequenceKind::Named(name) => {
                formatter.write_str(name)?;
                formatter.debug_list().entries(&self.items).finish()
            }
        }
    }
}

impl<V: Into<Value>> FromIterator<V> for Sequence {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self::list(iter)
    }
}

impl IntoIterator for Sequence {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
