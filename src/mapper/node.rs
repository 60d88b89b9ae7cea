//! Splitting containers into children and rebuilding them afterwards.

use std::sync::Arc;

use crate::error::ConstructionError;
use crate::value::{
    Contents, Key, Mapping, MappingKind, NodeShape, ObjectRef, Record, RecordType, Sequence,
    SequenceKind, Value,
};

/// How an object's children were laid out when they were taken apart.
#[derive(Debug)]
pub(crate) enum ObjectLayout {
    Mapping(Vec<Key>),
    Fields(Vec<Arc<str>>),
    Elements,
}

/// Everything needed to rebuild a container once its children are mapped.
#[derive(Debug)]
pub(crate) enum Rebuild {
    Mapping { kind: MappingKind, keys: Vec<Key> },
    Record(RecordType),
    Sequence(SequenceKind),
    Bytes,
    Object { object: ObjectRef, layout: ObjectLayout },
}

impl Rebuild {
    pub(crate) const fn shape(&self) -> NodeShape {
        match self {
            Self::Mapping { .. }
            | Self::Object {
                layout: ObjectLayout::Mapping(_),
                ..
            } => NodeShape::Mapping,
            Self::Record(_)
            | Self::Object {
                layout: ObjectLayout::Fields(_),
                ..
            } => NodeShape::LabeledTuple,
            Self::Sequence(_)
            | Self::Bytes
            | Self::Object {
                layout: ObjectLayout::Elements,
                ..
            } => NodeShape::Sequence,
        }
    }

    pub(crate) fn type_name(&self) -> &str {
        match self {
            Self::Mapping { kind, .. } => kind.name(),
            Self::Record(record_type) => record_type.name(),
            Self::Sequence(kind) => kind.name(),
            Self::Bytes => "bytes",
            Self::Object { object, .. } => object.type_name(),
        }
    }

    /// Rebuilds the container from its mapped children, in the order
    /// [`decompose`] produced them.
    pub(crate) fn finish(self, children: Vec<Value>) -> Result<Value, ConstructionError> {
        match self {
            Self::Mapping { kind, keys } => {
                let entries = keys.into_iter().zip(children).collect();
                Ok(Value::Map(Mapping::from_unique_entries(kind, entries)))
            }
            Self::Record(record_type) => Record::new(record_type, children).map(Value::Record),
            Self::Sequence(kind) => Ok(Value::Seq(Sequence::new(kind, children))),
            Self::Bytes => children
                .into_iter()
                .map(byte_of)
                .collect::<Result<Vec<u8>, _>>()
                .map(Value::Bytes),
            Self::Object { object, layout } => {
                let contents = match layout {
                    ObjectLayout::Mapping(keys) => {
                        Contents::Mapping(keys.into_iter().zip(children).collect())
                    }
                    ObjectLayout::Fields(names) => {
                        Contents::Fields(names.into_iter().zip(children).collect())
                    }
                    ObjectLayout::Elements => Contents::Elements(children),
                };
                object.as_object().rebuild(contents)
            }
        }
    }
}

fn byte_of(value: Value) -> Result<u8, ConstructionError> {
    match value {
        Value::Int(number) => u8::try_from(number).map_err(|_| {
            ConstructionError::rejected("bytes", format!("byte {number} must be in range 0..=255"))
        }),
        Value::Bool(flag) => Ok(u8::from(flag)),
        other => Err(ConstructionError::rejected(
            "bytes",
            format!("expected an integer byte, got {}", other.type_name()),
        )),
    }
}

/// A node after dispatch: the leaf match first, then the container probe.
#[derive(Debug)]
pub(crate) enum Step {
    Leaf(Value),
    Descend(Rebuild, Vec<Value>),
    Opaque(Value),
}

impl Step {
    pub(crate) fn of(value: Value, selected: bool) -> Self {
        if selected {
            return Self::Leaf(value);
        }
        match decompose(value) {
            Ok((rebuild, children)) => Self::Descend(rebuild, children),
            Err(opaque) => Self::Opaque(opaque),
        }
    }

    pub(crate) const fn shape(&self) -> NodeShape {
        match self {
            Self::Leaf(_) => NodeShape::Leaf,
            Self::Descend(rebuild, _) => rebuild.shape(),
            Self::Opaque(_) => NodeShape::Opaque,
        }
    }
}

/// Takes a container apart, probing in the fixed order mapping, labeled
/// tuple, sequence. Byte strings split into one integer per byte. Values
/// that are not containers come back as `Err`.
pub(crate) fn decompose(value: Value) -> Result<(Rebuild, Vec<Value>), Value> {
    match value {
        Value::Map(mapping) => {
            let (kind, entries) = mapping.into_parts();
            let (keys, children) = entries.into_iter().unzip();
            Ok((Rebuild::Mapping { kind, keys }, children))
        }
        Value::Record(record) => {
            let (record_type, children) = record.into_parts();
            Ok((Rebuild::Record(record_type), children))
        }
        Value::Seq(sequence) => {
            let (kind, children) = sequence.into_parts();
            Ok((Rebuild::Sequence(kind), children))
        }
        Value::Bytes(bytes) => {
            let children = bytes.into_iter().map(|byte| Value::Int(i64::from(byte))).collect();
            Ok((Rebuild::Bytes, children))
        }
        Value::Object(object) => match object.as_object().contents() {
            Some(Contents::Mapping(entries)) => {
                let (keys, children) = entries.into_iter().unzip();
                let layout = ObjectLayout::Mapping(keys);
                Ok((Rebuild::Object { object, layout }, children))
            }
            Some(Contents::Fields(fields)) => {
                let (names, children) = fields.into_iter().unzip();
                let layout = ObjectLayout::Fields(names);
                Ok((Rebuild::Object { object, layout }, children))
            }
            Some(Contents::Elements(children)) => {
                let layout = ObjectLayout::Elements;
                Ok((Rebuild::Object { object, layout }, children))
            }
            None => Err(Value::Object(object)),
        },
        leaf => Err(leaf),
    }
}
