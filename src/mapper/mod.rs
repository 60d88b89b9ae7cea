//! The collection mapper.
//!
//! A [`CollectionMapper`] applies a function to every leaf of a selected type
//! inside nested mappings, records and sequences, and rebuilds a structure
//! of the same shape around the results.
//!
//! At every node the mapper decides, in this order:
//!
//! 1. If the node matches the dtype and is not excluded, the function is
//!    applied to the whole node. A matching container is not descended.
//! 2. A mapping has its values mapped and is rebuilt with the same kind and
//!    the same keys in the same order.
//! 3. A record has its fields mapped and is rebuilt with the same
//!    [`RecordType`](crate::RecordType).
//! 4. A sequence has its elements mapped and is rebuilt with the same
//!    [`SequenceKind`](crate::SequenceKind). A byte string is a sequence of
//!    integers and must still hold bytes after mapping. Text is never
//!    descended.
//! 5. Anything else is returned unchanged.
//!
//! Objects take part in steps 2 to 4 when [`Object::contents`] reports a
//! shape, and are rebuilt through [`Object::rebuild`].
//!
//! [`Object::contents`]: crate::Object::contents
//! [`Object::rebuild`]: crate::Object::rebuild
//!
//! # Examples
//!
//! ```rust
//! use nestmap::{map_collection, TypeTag, Value};
//!
//! let batch = Value::dict([
//!     ("a", Value::Int(1)),
//!     ("b", Value::list([2, 3])),
//!     ("label", Value::from("cat")),
//! ]);
//!
//! let scaled = map_collection(batch, &TypeTag::Int, |value| {
//!     Value::Int(value.as_int().unwrap_or_default() * 10)
//! })
//! .unwrap();
//!
//! assert_eq!(
//!     scaled,
//!     Value::dict([
//!         ("a", Value::Int(10)),
//!         ("b", Value::list([20, 30])),
//!         ("label", Value::from("cat")),
//!     ])
//! );
//! ```

mod args;
mod node;
mod walk;

pub use args::Args;
pub(crate) use node::decompose;

use std::fmt;

use crate::dtype::{DType, TypeMatch};
use crate::error::ConstructionError;
use crate::value::Value;

use walk::Walk;

/// Which traversal engine a mapper runs.
///
/// Both engines make the same decisions and call the function in the same
/// order. The recursive engine uses the call stack, so its stack use grows
/// with the nesting depth of the input. The iterative engine keeps its own
/// work stack on the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Traversal {
    /// Recurse on the call stack.
    #[default]
    Recursive,
    /// Loop over an explicit work stack.
    Iterative,
}

/// Where the exclusion matcher is consulted.
///
/// With [`Root`](Self::Root) only the value handed to the mapper is checked
/// against the exclusion; nested values are selected by the dtype alone.
/// With [`EveryNode`](Self::EveryNode) the exclusion is checked at every
/// depth. In both cases an excluded container is still descended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ExclusionScope {
    /// Check the exclusion on the outermost value only.
    #[default]
    Root,
    /// Check the exclusion on every node.
    EveryNode,
}

impl ExclusionScope {
    pub(crate) const fn applies_at(self, depth: usize) -> bool {
        match self {
            Self::Root => depth == 0,
            Self::EveryNode => true,
        }
    }
}

/// Decides which nodes are leaves to transform.
pub(crate) struct Selector<'a, D: ?Sized, W: ?Sized> {
    dtype: &'a D,
    wrong_dtype: Option<&'a W>,
    exclusion_scope: ExclusionScope,
}

impl<D: ?Sized, W: ?Sized> Clone for Selector<'_, D, W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized, W: ?Sized> Copy for Selector<'_, D, W> {}

impl<'a, D, W> Selector<'a, D, W>
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
{
    pub(crate) const fn new(
        dtype: &'a D,
        wrong_dtype: Option<&'a W>,
        exclusion_scope: ExclusionScope,
    ) -> Self {
        Self {
            dtype,
            wrong_dtype,
            exclusion_scope,
        }
    }

    /// Returns `true` if `value`, found at `depth`, goes to the function.
    pub(crate) fn selects(&self, value: &Value, depth: usize) -> bool {
        if !self.dtype.matches(value) {
            return false;
        }
        match self.wrong_dtype {
            Some(wrong_dtype)
                if !wrong_dtype.is_empty() && self.exclusion_scope.applies_at(depth) =>
            {
                !wrong_dtype.matches(value)
            }
            _ => true,
        }
    }
}

/// A configured mapping pass.
///
/// `D` selects the leaves to transform and `W` excludes values the dtype
/// would otherwise select. Both are [`TypeMatch`] implementations: a single
/// [`TypeTag`](crate::TypeTag), a [`DType`] set, an array of tags or a
/// [`Predicate`](crate::Predicate).
///
/// A mapper holds no state between calls and can be applied any number of
/// times.
///
/// # Examples
///
/// ```rust
/// use nestmap::{CollectionMapper, Traversal, TypeTag, Value};
///
/// let mapper = CollectionMapper::new(TypeTag::Int)
///     .excluding(TypeTag::Bool)
///     .traversal(Traversal::Iterative);
///
/// assert_eq!(
///     mapper.apply(Value::Bool(true), |_| Value::Int(0)).unwrap(),
///     Value::Bool(true)
/// );
/// assert_eq!(
///     mapper.apply(Value::Int(2), |value| Value::Int(value.as_int().unwrap() + 1)).unwrap(),
///     Value::Int(3)
/// );
/// ```
#[derive(Clone)]
pub struct CollectionMapper<D, W = DType> {
    dtype: D,
    wrong_dtype: Option<W>,
    args: Args,
    traversal: Traversal,
    exclusion_scope: ExclusionScope,
}

impl<D: TypeMatch> CollectionMapper<D> {
    /// Creates a mapper selecting leaves that match `dtype`.
    pub fn new(dtype: D) -> Self {
        Self {
            dtype,
            wrong_dtype: None,
            args: Args::new(),
            traversal: Traversal::default(),
            exclusion_scope: ExclusionScope::default(),
        }
    }
}

impl CollectionMapper<DType> {
    /// Builds a mapper from a plain description of its settings.
    ///
    /// An empty `wrong_dtype` in the options leaves the exclusion unset.
    pub fn from_options(options: MapperOptions) -> Self {
        let MapperOptions {
            dtype,
            wrong_dtype,
            traversal,
            exclusion_scope,
        } = options;
        Self {
            dtype,
            wrong_dtype: (!wrong_dtype.is_empty()).then_some(wrong_dtype),
            args: Args::new(),
            traversal,
            exclusion_scope,
        }
    }
}

impl<D, W> CollectionMapper<D, W> {
    /// Excludes values matching `wrong_dtype`, even when they match the
    /// dtype. An exclusion that matches nothing counts as unset.
    pub fn excluding<X>(self, wrong_dtype: X) -> CollectionMapper<D, X> {
        CollectionMapper {
            dtype: self.dtype,
            wrong_dtype: Some(wrong_dtype),
            args: self.args,
            traversal: self.traversal,
            exclusion_scope: self.exclusion_scope,
        }
    }

    /// Sets the arguments forwarded to every call of the function.
    #[must_use]
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Picks the traversal engine.
    #[must_use]
    pub fn traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Sets where the exclusion is checked.
    #[must_use]
    pub fn exclusion_scope(mut self, exclusion_scope: ExclusionScope) -> Self {
        self.exclusion_scope = exclusion_scope;
        self
    }

    /// Returns the leaf selector.
    pub const fn dtype(&self) -> &D {
        &self.dtype
    }

    /// Returns the exclusion, if one was set.
    pub const fn wrong_dtype(&self) -> Option<&W> {
        self.wrong_dtype.as_ref()
    }

    /// Returns the forwarded arguments.
    pub const fn args(&self) -> &Args {
        &self.args
    }

    /// Returns the traversal engine this mapper runs.
    pub const fn traversal_kind(&self) -> Traversal {
        self.traversal
    }

    /// Returns where the exclusion is checked.
    pub const fn exclusion_scope_kind(&self) -> ExclusionScope {
        self.exclusion_scope
    }
}

impl<D, W> CollectionMapper<D, W>
where
    D: TypeMatch,
    W: TypeMatch,
{
    pub(crate) fn selector(&self) -> Selector<'_, D, W> {
        Selector::new(&self.dtype, self.wrong_dtype.as_ref(), self.exclusion_scope)
    }

    /// Maps `data` with a fallible function that also receives the
    /// forwarded arguments.
    ///
    /// The first error stops the pass: later leaves are not visited. The
    /// function's error is returned as is. A container that cannot be
    /// rebuilt reports a [`ConstructionError`] converted into `E`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function` or by rebuilding a
    /// container.
    pub fn try_apply_with<F, E>(&self, data: Value, function: F) -> Result<Value, E>
    where
        F: FnMut(Value, &Args) -> Result<Value, E>,
        E: From<ConstructionError>,
    {
        run(self.selector(), &self.args, self.traversal, data, function)
    }

    /// Maps `data` with a fallible function.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `function` or by rebuilding a
    /// container.
    pub fn try_apply<F, E>(&self, data: Value, mut function: F) -> Result<Value, E>
    where
        F: FnMut(Value) -> Result<Value, E>,
        E: From<ConstructionError>,
    {
        self.try_apply_with(data, |value, _| function(value))
    }

    /// Maps `data` with a function that also receives the forwarded
    /// arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if a container cannot be rebuilt.
    pub fn apply_with<F>(&self, data: Value, mut function: F) -> Result<Value, ConstructionError>
    where
        F: FnMut(Value, &Args) -> Value,
    {
        self.try_apply_with(data, |value, args| {
            Ok::<_, ConstructionError>(function(value, args))
        })
    }

    /// Maps `data` with a function.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if a container cannot be rebuilt.
    pub fn apply<F>(&self, data: Value, mut function: F) -> Result<Value, ConstructionError>
    where
        F: FnMut(Value) -> Value,
    {
        self.try_apply_with(data, |value, _| Ok::<_, ConstructionError>(function(value)))
    }
}

impl<D: fmt::Debug, W: fmt::Debug> fmt::Debug for CollectionMapper<D, W> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CollectionMapper")
            .field("dtype", &self.dtype)
            .field("wrong_dtype", &self.wrong_dtype)
            .field("traversal", &self.traversal)
            .field("exclusion_scope", &self.exclusion_scope)
            .finish_non_exhaustive()
    }
}

/// A plain description of a [`CollectionMapper`].
///
/// With the `serde` feature this deserializes from any serde format. Only
/// `dtype` is required; a single tag may stand in for a list.
///
/// ```rust
/// # #[cfg(feature = "serde")]
/// # fn main() -> Result<(), serde_json::Error> {
/// use nestmap::{CollectionMapper, MapperOptions, Traversal, TypeTag};
///
/// let options: MapperOptions = serde_json::from_str(
///     r#"{"dtype": ["int"], "wrong_dtype": "bool", "traversal": "iterative"}"#,
/// )?;
/// assert_eq!(options.traversal, Traversal::Iterative);
/// assert!(options.wrong_dtype.contains(&TypeTag::Bool));
///
/// let mapper = CollectionMapper::from_options(options);
/// assert!(mapper.wrong_dtype().is_some());
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "serde"))]
/// # fn main() {}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapperOptions {
    /// Tags selecting the leaves to transform.
    pub dtype: DType,
    /// Tags excluded even when they match `dtype`. Empty means unset.
    #[cfg_attr(feature = "serde", serde(default))]
    pub wrong_dtype: DType,
    /// The traversal engine.
    #[cfg_attr(feature = "serde", serde(default))]
    pub traversal: Traversal,
    /// Where the exclusion is checked.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclusion_scope: ExclusionScope,
}

impl MapperOptions {
    /// Creates options selecting `dtype` with every other setting at its
    /// default.
    pub fn new(dtype: impl Into<DType>) -> Self {
        Self {
            dtype: dtype.into(),
            wrong_dtype: DType::new(),
            traversal: Traversal::default(),
            exclusion_scope: ExclusionScope::default(),
        }
    }
}

fn run<D, W, F, E>(
    selector: Selector<'_, D, W>,
    args: &Args,
    traversal: Traversal,
    data: Value,
    function: F,
) -> Result<Value, E>
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
    F: FnMut(Value, &Args) -> Result<Value, E>,
    E: From<ConstructionError>,
{
    let mut walk = Walk::new(selector, args, function);
    let result = match traversal {
        Traversal::Recursive => walk.recursive(data, 0),
        Traversal::Iterative => walk.iterative(data),
    };
    tracing::debug!(
        ?traversal,
        nodes = walk.nodes(),
        leaves = walk.leaves(),
        ok = result.is_ok(),
        "mapped collection"
    );
    result
}

/// Applies `function` to every leaf of `data` matching `dtype`.
///
/// Uses the recursive engine with no exclusion and no forwarded arguments.
///
/// # Errors
///
/// Returns a [`ConstructionError`] if a container cannot be rebuilt.
pub fn map_collection<D, F>(data: Value, dtype: &D, mut function: F) -> Result<Value, ConstructionError>
where
    D: TypeMatch + ?Sized,
    F: FnMut(Value) -> Value,
{
    let args = Args::new();
    let selector = Selector::<D, DType>::new(dtype, None, ExclusionScope::Root);
    run(selector, &args, Traversal::Recursive, data, |value, _| {
        Ok(function(value))
    })
}

/// Applies a fallible `function` to every leaf of `data` matching `dtype`.
///
/// # Errors
///
/// Returns the first error produced by `function`, or a rebuild failure
/// converted into `E`.
pub fn try_map_collection<D, F, E>(data: Value, dtype: &D, mut function: F) -> Result<Value, E>
where
    D: TypeMatch + ?Sized,
    F: FnMut(Value) -> Result<Value, E>,
    E: From<ConstructionError>,
{
    let args = Args::new();
    let selector = Selector::<D, DType>::new(dtype, None, ExclusionScope::Root);
    run(selector, &args, Traversal::Recursive, data, |value, _| {
        function(value)
    })
}

/// Applies `function` to every leaf of `data` matching `dtype`, except the
/// outermost value when it also matches `wrong_dtype`.
///
/// # Errors
///
/// Returns a [`ConstructionError`] if a container cannot be rebuilt.
pub fn map_collection_excluding<D, W, F>(
    data: Value,
    dtype: &D,
    wrong_dtype: &W,
    mut function: F,
) -> Result<Value, ConstructionError>
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
    F: FnMut(Value) -> Value,
{
    let args = Args::new();
    let selector = Selector::new(dtype, Some(wrong_dtype), ExclusionScope::Root);
    run(selector, &args, Traversal::Recursive, data, |value, _| {
        Ok(function(value))
    })
}
