//! Extra arguments forwarded to every invocation of the transform function.

use crate::value::Value;

/// Positional and keyword arguments handed, unchanged, to every call of the
/// transform function.
///
/// # Examples
///
/// ```rust
/// use nestmap::{Args, CollectionMapper, TypeTag, Value};
///
/// let args = Args::new().arg(10).kwarg("offset", 1);
/// let mapper = CollectionMapper::new(TypeTag::Int).with_args(args);
///
/// let result = mapper
///     .apply_with(Value::list([1, 2]), |value, args| {
///         let scale = args.positional()[0].as_int().unwrap();
///         let offset = args.keyword("offset").and_then(Value::as_int).unwrap();
///         Value::Int(value.as_int().unwrap() * scale + offset)
///     })
///     .unwrap();
///
/// assert_eq!(result, Value::list([11, 21]));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    /// Creates an empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Sets a keyword argument, replacing an earlier value for the same name.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.keyword.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.keyword.push((name, value)),
        }
        self
    }

    /// Returns the positional arguments in order.
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Returns a keyword argument by name.
    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.keyword
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Iterates over keyword arguments in the order they were first set.
    pub fn keywords(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.keyword.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns `true` if there are no arguments of either kind.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn kwarg_replaces_existing_name_in_place() {
        let args = Args::new().kwarg("a", 1).kwarg("b", 2).kwarg("a", 3);
        let keywords: Vec<(&str, &Value)> = args.keywords().collect();
        assert_eq!(keywords, vec![("a", &Value::Int(3)), ("b", &Value::Int(2))]);
    }

    #[rstest]
    fn positional_preserves_order() {
        let args = Args::new().arg("x").arg(2.5);
        assert_eq!(args.positional(), &[Value::from("x"), Value::Float(2.5)]);
        assert_eq!(args.keyword("x"), None);
        assert!(!args.is_empty());
        assert!(Args::new().is_empty());
    }
}
