//! Keyed mappings with insertion-ordered entries.

use std::fmt;
use std::sync::Arc;

use super::{Key, Value};

/// The concrete type of a [`Mapping`].
///
/// The kind survives every mapping pass: a `Named("Batch")` mapping is
/// rebuilt as a `Named("Batch")` mapping with the same keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MappingKind {
    /// A plain dictionary.
    #[default]
    Dict,
    /// A caller-defined mapping type, identified by name.
    Named(Arc<str>),
}

impl MappingKind {
    /// Creates a named mapping kind.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::Named(name.into())
    }

    /// Returns the type name of this kind.
    pub fn name(&self) -> &str {
        match self {
            Self::Dict => "dict",
            Self::Named(name) => &**name,
        }
    }
}

/// An insertion-ordered key to value mapping.
///
/// Inserting a key that is already present replaces its value and keeps
/// the key at its original position. Equality compares the kind and the
/// entries in order.
///
/// # Examples
///
/// ```rust
/// use nestmap::{Key, Mapping, Value};
///
/// let mut mapping = Mapping::new();
/// mapping.insert("b", 2);
/// mapping.insert("a", 1);
/// mapping.insert("b", 3);
///
/// let keys: Vec<&Key> = mapping.keys().collect();
/// assert_eq!(keys, vec![&Key::from("b"), &Key::from("a")]);
/// assert_eq!(mapping.get("b"), Some(&Value::Int(3)));
/// ```
#[derive(Clone, PartialEq, Default)]
pub struct Mapping {
    kind: MappingKind,
    entries: Vec<(Key, Value)>,
}

impl Mapping {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty mapping of the given kind.
    pub const fn with_kind(kind: MappingKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    /// Creates a mapping of the given kind from entries.
    ///
    /// Later duplicates replace earlier values, keeping the first position.
    pub fn from_entries<K, V, I>(kind: MappingKind, entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut mapping = Self::with_kind(kind);
        mapping.extend(entries);
        mapping
    }

    /// Builds a mapping from entries whose keys are already unique.
    pub(crate) const fn from_unique_entries(kind: MappingKind, entries: Vec<(Key, Value)>) -> Self {
        Self { kind, entries }
    }

    /// Returns the concrete kind of this mapping.
    pub const fn kind(&self) -> &MappingKind {
        &self.kind
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.entries.iter().position(|(existing, _)| existing == key)
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        let key = key.into();
        self.position(&key).map(|index| &self.entries[index].1)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        let key = key.into();
        self.position(&key).map(|index| &mut self.entries[index].1)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.position(&key.into()).is_some()
    }

    /// Inserts a value, returning the previous value stored under the key.
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Removes a key, returning its value. Remaining entries keep their order.
    pub fn remove(&mut self, key: impl Into<Key>) -> Option<Value> {
        let key = key.into();
        self.position(&key)
            .map(|index| self.entries.remove(index).1)
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Iterates over values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Consumes the mapping, returning its kind and entries.
    pub fn into_parts(self) -> (MappingKind, Vec<(Key, Value)>) {
        (self.kind, self.entries)
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let MappingKind::Named(name) = &self.kind {
            formatter.write_str(name)?;
        }
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

impl<K: Into<Key>, V: Into<Value>> Extend<(K, V)> for Mapping {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(MappingKind::Dict, iter)
    }
}

impl IntoIterator for Mapping {
    type Item = (Key, Value);
    type IntoIter = std::vec::IntoIter<(Key, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
