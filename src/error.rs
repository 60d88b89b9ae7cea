//! Error types for collection mapping and value conversion.
//!
//! The mapper itself never fails on its own account. The only failures it
//! can surface are:
//!
//! - errors returned by the caller's transform function, which propagate
//!   unchanged;
//! - [`ConstructionError`], raised when a container cannot be rebuilt from
//!   its mapped contents.
//!
//! [`FromValueError`] belongs to the conversion layer ([`crate::FromValue`])
//! and is never produced by the mapper.

use thiserror::Error;

/// A container could not be rebuilt from its mapped contents.
///
/// Built-in containers ([`Mapping`](crate::Mapping), [`Record`](crate::Record),
/// [`Sequence`](crate::Sequence)) always rebuild successfully during a
/// mapping pass. Construction errors come from [`Record::new`](crate::Record::new)
/// with a wrong number of values, from a byte string whose mapped elements
/// are no longer bytes, or from an [`Object`](crate::Object) whose `rebuild`
/// refuses the contents it was handed.
///
/// # Examples
///
/// ```rust
/// use nestmap::ConstructionError;
///
/// let error = ConstructionError::ArityMismatch {
///     type_name: "Point".to_string(),
///     expected: 2,
///     actual: 3,
/// };
/// assert_eq!(error.to_string(), "cannot construct Point: expected 2 values, got 3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// The number of values does not match the record's field count.
    #[error("cannot construct {type_name}: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Name of the type being constructed.
        type_name: String,
        /// Number of fields the type declares.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// The contents handed to a rebuild had a different shape than the type accepts.
    #[error("cannot construct {type_name} from {actual} contents, expected {expected}")]
    ShapeMismatch {
        /// Name of the type being constructed.
        type_name: String,
        /// The shape the type accepts.
        expected: &'static str,
        /// The shape that was supplied.
        actual: &'static str,
    },

    /// The type's constructor rejected the contents.
    #[error("cannot construct {type_name}: {reason}")]
    Rejected {
        /// Name of the type being constructed.
        type_name: String,
        /// Why the constructor refused.
        reason: String,
    },
}

impl ConstructionError {
    /// Creates a [`ConstructionError::Rejected`].
    pub fn rejected(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the type that failed to construct.
    pub fn type_name(&self) -> &str {
        match self {
            Self::ArityMismatch { type_name, .. }
            | Self::ShapeMismatch { type_name, .. }
            | Self::Rejected { type_name, .. } => type_name,
        }
    }
}

/// A [`Value`](crate::Value) could not be converted into a Rust type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FromValueError {
    /// The value has a different type than the target expects.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Description of the expected value.
        expected: String,
        /// Type name of the value that was found.
        found: String,
    },

    /// A record or mapping lacks a field the target requires.
    #[error("missing field `{field}` in {type_name}")]
    MissingField {
        /// Name of the type being converted into.
        type_name: String,
        /// The missing field.
        field: String,
    },

    /// An integer does not fit the target type.
    #[error("integer {value} out of range for {target}")]
    OutOfRange {
        /// The offending integer.
        value: i64,
        /// The target Rust type.
        target: &'static str,
    },

    /// A nested field failed to convert.
    #[error("in field `{field}`: {source}")]
    Field {
        /// The field whose value failed.
        field: String,
        /// The underlying conversion failure.
        #[source]
        source: Box<FromValueError>,
    },
}

impl FromValueError {
    /// Creates a [`FromValueError::TypeMismatch`].
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Wraps this error with the name of the field that produced it.
    #[must_use]
    pub fn in_field(self, field: impl Into<String>) -> Self {
        Self::Field {
            field: field.into(),
            source: Box::new(self),
        }
    }
}
