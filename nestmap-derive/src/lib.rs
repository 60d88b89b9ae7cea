//! Derive macro for nestmap named tuples.
//!
//! `#[derive(NamedTuple)]` turns a struct with named fields into a
//! [`Record`](https://docs.rs/nestmap/latest/nestmap/struct.Record.html)
//! whenever it is converted into a `Value`, so it can take part in a mapping
//! pass and be converted back afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use nestmap::{map_collection, FromValue, IntoValue, NamedTuple, TypeTag, Value};
//!
//! #[derive(Debug, PartialEq, NamedTuple)]
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! let value = Point { x: 1, y: 2 }.into_value();
//! let moved = map_collection(value, &TypeTag::Int, |v| Value::Int(v.as_int().unwrap() + 10)).unwrap();
//! assert_eq!(Point::from_value(moved).unwrap(), Point { x: 11, y: 12 });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod named_tuple;

use proc_macro::TokenStream;

/// Derive macro making a struct convertible to and from a nestmap record.
///
/// # Requirements
///
/// - The struct must have named fields (not a tuple or unit struct)
/// - Every field type must implement `IntoValue` and `FromValue`
///
/// # Generated Code
///
/// ```rust,ignore
/// impl StructName {
///     pub fn record_type() -> ::nestmap::RecordType { ... }
/// }
/// impl ::nestmap::IntoValue for StructName { ... }
/// impl ::nestmap::FromValue for StructName { ... }
/// ```
///
/// The record type is named after the struct and lists the fields in
/// declaration order. Converting back accepts a record of the same name and
/// arity, or a mapping with one entry per field.
#[proc_macro_derive(NamedTuple)]
pub fn derive_named_tuple(input: TokenStream) -> TokenStream {
    named_tuple::derive_named_tuple_impl(input)
}
