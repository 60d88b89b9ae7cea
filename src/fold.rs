//! Read-only folding over the leaves a mapper would transform.
//!
//! A fold visits exactly the leaves [`map_collection`] would hand to its
//! function, in the same order, without consuming or rebuilding anything.
//!
//! ```text
//! fold_collection(&data, &dtype, init, f)
//!     == collect_leaves(&data, &dtype).iter().fold(init, f)
//! ```
//!
//! # Examples
//!
//! ```rust
//! use nestmap::{count_leaves, fold_collection, TypeTag, Value};
//!
//! let batch = Value::dict([
//!     ("a", Value::Int(1)),
//!     ("b", Value::list([Value::Int(2), Value::from("x"), Value::Int(3)])),
//! ]);
//!
//! let sum = fold_collection(&batch, &TypeTag::Int, 0, |total, leaf| {
//!     total + leaf.as_int().unwrap_or_default()
//! });
//! assert_eq!(sum, 6);
//! assert_eq!(count_leaves(&batch, &TypeTag::Int), 3);
//! ```
//!
//! [`map_collection`]: crate::map_collection

use std::borrow::Cow;

use crate::dtype::{DType, TypeMatch};
use crate::mapper::{CollectionMapper, ExclusionScope, Selector, Traversal, decompose};
use crate::value::Value;

/// Children of a container in visiting order. Children the tree holds are
/// borrowed; children produced on demand (bytes, object contents) are owned.
fn children_of(value: Cow<'_, Value>) -> Option<Vec<Cow<'_, Value>>> {
    let value = match value {
        Cow::Borrowed(value) => value,
        Cow::Owned(value) => return owned_children(value),
    };
    let children = match value {
        Value::Map(mapping) => mapping.values().map(Cow::Borrowed).collect(),
        Value::Record(record) => record.values().iter().map(Cow::Borrowed).collect(),
        Value::Seq(sequence) => sequence.iter().map(Cow::Borrowed).collect(),
        Value::Bytes(_) | Value::Object(_) => return owned_children(value.clone()),
        _ => return None,
    };
    Some(children)
}

fn owned_children<'v>(value: Value) -> Option<Vec<Cow<'v, Value>>> {
    let (_, children) = decompose(value).ok()?;
    Some(children.into_iter().map(Cow::Owned).collect())
}

fn visit<D, W, B, F>(
    selector: Selector<'_, D, W>,
    value: Cow<'_, Value>,
    depth: usize,
    accumulator: B,
    function: &mut F,
) -> B
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
    F: FnMut(B, &Value) -> B,
{
    if selector.selects(&value, depth) {
        return function(accumulator, &*value);
    }
    match children_of(value) {
        Some(children) => children.into_iter().fold(accumulator, |accumulator, child| {
            visit(selector, child, depth + 1, accumulator, function)
        }),
        None => accumulator,
    }
}

/// Same visiting order as [`visit`], with an explicit stack.
fn visit_iteratively<D, W, B, F>(
    selector: Selector<'_, D, W>,
    root: &Value,
    init: B,
    function: &mut F,
) -> B
where
    D: TypeMatch + ?Sized,
    W: TypeMatch + ?Sized,
    F: FnMut(B, &Value) -> B,
{
    let mut accumulator = init;
    let mut pending = vec![(Cow::Borrowed(root), 0)];
    while let Some((value, depth)) = pending.pop() {
        if selector.selects(&value, depth) {
            accumulator = function(accumulator, &*value);
        } else if let Some(children) = children_of(value) {
            pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }
    accumulator
}

/// Folds every leaf of `data` matching `dtype`, left to right.
pub fn fold_collection<D, B, F>(data: &Value, dtype: &D, init: B, mut function: F) -> B
where
    D: TypeMatch + ?Sized,
    F: FnMut(B, &Value) -> B,
{
    let selector = Selector::<D, DType>::new(dtype, None, ExclusionScope::Root);
    visit(selector, Cow::Borrowed(data), 0, init, &mut function)
}

/// Clones every leaf of `data` matching `dtype`, in visiting order.
pub fn collect_leaves<D>(data: &Value, dtype: &D) -> Vec<Value>
where
    D: TypeMatch + ?Sized,
{
    fold_collection(data, dtype, Vec::new(), |mut leaves, leaf| {
        leaves.push(leaf.clone());
        leaves
    })
}

/// Counts the leaves of `data` matching `dtype`.
pub fn count_leaves<D>(data: &Value, dtype: &D) -> usize
where
    D: TypeMatch + ?Sized,
{
    fold_collection(data, dtype, 0, |count, _| count + 1)
}

impl<D, W> CollectionMapper<D, W>
where
    D: TypeMatch,
    W: TypeMatch,
{
    /// Folds the leaves this mapper would transform, honouring its
    /// exclusion, exclusion scope and traversal engine.
    ///
    /// ```rust
    /// use nestmap::{CollectionMapper, ExclusionScope, TypeTag, Value};
    ///
    /// let data = Value::list([Value::Int(1), Value::Bool(true), Value::Int(2)]);
    /// let mapper = CollectionMapper::new(TypeTag::Int)
    ///     .excluding(TypeTag::Bool)
    ///     .exclusion_scope(ExclusionScope::EveryNode);
    ///
    /// assert_eq!(mapper.fold(&data, 0, |count, _| count + 1), 2);
    /// ```
    pub fn fold<B, F>(&self, data: &Value, init: B, mut function: F) -> B
    where
        F: FnMut(B, &Value) -> B,
    {
        match self.traversal_kind() {
            Traversal::Recursive => {
                visit(self.selector(), Cow::Borrowed(data), 0, init, &mut function)
            }
            Traversal::Iterative => {
                visit_iteratively(self.selector(), data, init, &mut function)
            }
        }
    }
}
