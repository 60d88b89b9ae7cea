//! # nestmap
//!
//! Apply a function to every leaf of a chosen type inside arbitrarily
//! nested collections, and get back a structure of the same shape.
//!
//! ## Overview
//!
//! Data is represented as a dynamic [`Value`] tree: scalars, insertion-ordered
//! mappings, named tuples ([`Record`]), sequences, and caller-defined
//! [`Object`]s. A [`CollectionMapper`] walks the tree depth first and hands
//! every value selected by its dtype to the caller's function:
//!
//! - **Selection**: a dtype is anything implementing [`TypeMatch`], such as a
//!   [`TypeTag`], a [`DType`] set, or a [`Predicate`]. An optional exclusion
//!   vetoes values the dtype would select.
//! - **Rebuilding**: mappings keep their kind, keys and order; records keep
//!   their [`RecordType`]; sequences keep their [`SequenceKind`]. Objects can
//!   opt in through [`Object::contents`] and [`Object::rebuild`].
//! - **Errors**: the function's own error type propagates unchanged. A
//!   container that cannot be rebuilt reports a [`ConstructionError`].
//! - **Folding**: [`fold_collection`] and friends visit the same leaves
//!   without rebuilding anything.
//!
//! ## Feature Flags
//!
//! - `derive` (default): re-exports `#[derive(NamedTuple)]`
//! - `serde`: serialization for values, dtypes and [`MapperOptions`]
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use nestmap::prelude::*;
//!
//! let batch = Value::dict([
//!     ("inputs", Value::list([Value::Float(0.5), Value::Float(1.5)])),
//!     ("mask", Value::tuple([Value::Bool(true), Value::Bool(false)])),
//!     ("name", Value::from("sample")),
//! ]);
//!
//! let halved = CollectionMapper::new(TypeTag::Float)
//!     .apply(batch, |value| Value::Float(value.as_float().unwrap_or_default() / 2.0))
//!     .unwrap();
//!
//! assert_eq!(
//!     halved.get("inputs"),
//!     Some(&Value::list([Value::Float(0.25), Value::Float(0.75)]))
//! );
//! assert_eq!(halved.get("name"), Some(&Value::from("sample")));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

extern crate self as nestmap;

/// Prelude module for convenient imports.
///
/// Re-exports the mapper, the value model and the conversion traits.
///
/// # Usage
///
/// ```rust
/// use nestmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::convert::{FromValue, IntoValue};
    pub use crate::dtype::{DType, TypeMatch, TypeTag};
    pub use crate::error::ConstructionError;
    pub use crate::fold::{collect_leaves, count_leaves, fold_collection};
    pub use crate::mapper::{
        Args, CollectionMapper, Traversal, map_collection, map_collection_excluding,
        try_map_collection,
    };
    pub use crate::value::{Object, Value};

    #[cfg(feature = "derive")]
    pub use nestmap_derive::NamedTuple;
}

pub mod dtype;
pub mod error;

mod convert;
mod fold;
mod mapper;
mod value;

#[cfg(feature = "serde")]
mod serde_impl;

pub use convert::{FromValue, IntoValue};
pub use dtype::{DType, Predicate, TypeMatch, TypeTag, predicate};
pub use error::{ConstructionError, FromValueError};
pub use fold::{collect_leaves, count_leaves, fold_collection};
pub use mapper::{
    Args, CollectionMapper, ExclusionScope, MapperOptions, Traversal, map_collection,
    map_collection_excluding, try_map_collection,
};
pub use value::{
    Contents, Key, Mapping, MappingKind, NodeShape, Object, ObjectRef, Record, RecordType,
    Sequence, SequenceKind, Value,
};

#[cfg(feature = "derive")]
pub use nestmap_derive::NamedTuple;
