//! Caller-defined values embedded in a [`Value`] tree.
//!
//! An [`Object`] is opaque to the mapper unless it opts in to being a
//! container. The opt-in is a capability probe: [`Object::contents`] exposes
//! the object's children as a mapping, as named fields, or as ordered
//! elements, and [`Object::rebuild`] constructs a new value of the same type
//! from mapped children.
//!
//! # Examples
//!
//! ```rust
//! use nestmap::{Object, ObjectRef, TypeTag, Value, map_collection};
//!
//! #[derive(Debug, PartialEq)]
//! struct Tensor(Vec<f32>);
//!
//! impl Object for Tensor {
//!     fn type_name(&self) -> &str {
//!         "Tensor"
//!     }
//! }
//!
//! let batch = Value::list([Value::object(Tensor(vec![1.0])), Value::Int(7)]);
//! let doubled = map_collection(batch, &TypeTag::named("Tensor"), |value| {
//!     let tensor = value.as_object().and_then(ObjectRef::downcast_ref::<Tensor>).unwrap();
//!     Value::object(Tensor(tensor.0.iter().map(|x| x * 2.0).collect()))
//! })
//! .unwrap();
//!
//! let first = doubled.as_sequence().unwrap().get(0).unwrap();
//! let tensor = first.as_object().unwrap().downcast_ref::<Tensor>().unwrap();
//! assert_eq!(tensor, &Tensor(vec![2.0]));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::dtype::TypeTag;
use crate::error::ConstructionError;

use super::{Key, Value};

/// The children of a container object, as exposed by [`Object::contents`].
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    /// Key to value entries, in the object's iteration order.
    Mapping(Vec<(Key, Value)>),
    /// Named fields in positional order.
    Fields(Vec<(Arc<str>, Value)>),
    /// Ordered elements.
    Elements(Vec<Value>),
}

impl Contents {
    /// Returns a short name for the shape of these contents.
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Mapping(_) => "mapping",
            Self::Fields(_) => "fields",
            Self::Elements(_) => "elements",
        }
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        match self {
            Self::Mapping(entries) => entries.len(),
            Self::Fields(fields) => fields.len(),
            Self::Elements(elements) => elements.len(),
        }
    }

    /// Returns `true` if there are no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A caller-defined value that can live inside a [`Value`] tree.
///
/// Only [`type_name`](Object::type_name) is required. The remaining methods
/// have defaults describing an opaque leaf that matches [`TypeTag::Any`],
/// [`TypeTag::Object`], and `TypeTag::Named(type_name)`.
pub trait Object: Any + fmt::Debug + Send + Sync {
    /// Returns the name of this object's type.
    fn type_name(&self) -> &str;

    /// Returns `true` if this object is an instance of `tag`.
    ///
    /// Override to declare additional supertypes, for example a mapping-like
    /// object that should also match [`TypeTag::Mapping`].
    fn is_instance(&self, tag: &TypeTag) -> bool {
        match tag {
            TypeTag::Any | TypeTag::Object => true,
            TypeTag::Named(name) => &**name == self.type_name(),
            _ => false,
        }
    }

    /// Exposes this object's children, if it is a container.
    fn contents(&self) -> Option<Contents> {
        None
    }

    /// Builds a new value of this object's type from mapped children.
    ///
    /// The contents have the same shape and keys as those returned by
    /// [`contents`](Object::contents); only the values differ.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if the object cannot be rebuilt from
    /// the given contents.
    fn rebuild(&self, contents: Contents) -> Result<Value, ConstructionError> {
        Err(ConstructionError::rejected(
            self.type_name(),
            format!("cannot be rebuilt from {}", contents.shape_name()),
        ))
    }

    /// Compares this object with another for equality.
    ///
    /// The default only considers an object equal to itself.
    fn object_eq(&self, other: &dyn Object) -> bool {
        let _ = other;
        false
    }
}

/// A shared handle to an [`Object`].
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Object>);

impl ObjectRef {
    /// Wraps an object.
    pub fn new<T: Object>(object: T) -> Self {
        Self(Arc::new(object))
    }

    /// Returns the wrapped object.
    pub fn as_object(&self) -> &dyn Object {
        &*self.0
    }

    /// Returns the object's type name.
    pub fn type_name(&self) -> &str {
        self.0.type_name()
    }

    /// Returns `true` if both handles point to the same object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Downcasts to the concrete object type.
    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        let any: &dyn Any = &*self.0;
        any.downcast_ref::<T>()
    }
}

impl From<Arc<dyn Object>> for ObjectRef {
    fn from(object: Arc<dyn Object>) -> Self {
        Self(object)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, formatter)
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.object_eq(other.as_object())
    }
}
