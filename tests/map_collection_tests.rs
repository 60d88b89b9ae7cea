//! Integration tests for `CollectionMapper` and the `map_collection` family.
//!
//! Covers leaf selection, exclusion, rebuilding of every container kind,
//! forwarded arguments, caller-defined objects, and error propagation.

use nestmap::{
    Args, CollectionMapper, ConstructionError, Contents, DType, ExclusionScope, Key, Mapping,
    MappingKind, Object, RecordType, Sequence, SequenceKind, Traversal, TypeTag, Value,
    map_collection, map_collection_excluding, predicate, try_map_collection,
};
use rstest::rstest;
use thiserror::Error;

// =============================================================================
// Helpers
// =============================================================================

fn times_ten(value: Value) -> Value {
    match value {
        Value::Int(number) => Value::Int(number * 10),
        Value::Float(number) => Value::Float(number * 10.0),
        other => other,
    }
}

fn increment(value: Value) -> Value {
    Value::Int(value.as_int().unwrap_or_default() + 1)
}

/// A tensor stand-in: an opaque leaf with a device label.
#[derive(Debug, Clone, PartialEq)]
struct Tensor {
    data: Vec<f64>,
    device: String,
}

impl Tensor {
    fn on(device: &str, data: &[f64]) -> Value {
        Value::object(Self {
            data: data.to_vec(),
            device: device.to_string(),
        })
    }
}

impl Object for Tensor {
    fn type_name(&self) -> &str {
        "Tensor"
    }

    fn object_eq(&self, other: &dyn Object) -> bool {
        (other as &dyn std::any::Any)
            .downcast_ref::<Self>()
            .is_some_and(|other| other == self)
    }
}

fn to_device(value: Value, args: &Args) -> Value {
    let device = args
        .keyword("device")
        .and_then(Value::as_str)
        .unwrap_or("cpu");
    let tensor = value
        .as_object()
        .and_then(|object| object.downcast_ref::<Tensor>())
        .cloned();
    tensor.map_or(value, |tensor| Tensor::on(device, &tensor.data))
}

fn device_of(value: &Value) -> Option<&str> {
    value
        .as_object()
        .and_then(|object| object.downcast_ref::<Tensor>())
        .map(|tensor| tensor.device.as_str())
}

/// A mapping-shaped object that refuses to be rebuilt.
#[derive(Debug)]
struct FrozenBatch(Vec<(Key, Value)>);

impl Object for FrozenBatch {
    fn type_name(&self) -> &str {
        "FrozenBatch"
    }

    fn contents(&self) -> Option<Contents> {
        Some(Contents::Mapping(self.0.clone()))
    }

    fn rebuild(&self, _contents: Contents) -> Result<Value, ConstructionError> {
        Err(ConstructionError::rejected("FrozenBatch", "frozen"))
    }
}

/// A mapping-shaped object that rebuilds itself.
#[derive(Debug)]
struct Batch(Vec<(Key, Value)>);

impl Object for Batch {
    fn type_name(&self) -> &str {
        "Batch"
    }

    fn contents(&self) -> Option<Contents> {
        Some(Contents::Mapping(self.0.clone()))
    }

    fn rebuild(&self, contents: Contents) -> Result<Value, ConstructionError> {
        match contents {
            Contents::Mapping(entries) => Ok(Value::object(Self(entries))),
            other => Err(ConstructionError::ShapeMismatch {
                type_name: "Batch".to_string(),
                expected: "mapping",
                actual: other.shape_name(),
            }),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
enum TransformError {
    #[error("negative value {0}")]
    Negative(i64),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

// =============================================================================
// Leaves
// =============================================================================

#[rstest]
#[case(Value::from("text"))]
#[case(Value::Float(1.5))]
#[case(Value::None)]
#[case(Value::Bytes(Vec::new()))]
#[case(Tensor::on("cpu", &[1.0]))]
fn non_matching_leaves_are_returned_unchanged(#[case] value: Value) {
    let mut calls = 0;
    let result = map_collection(value.clone(), &TypeTag::Int, |value| {
        calls += 1;
        value
    })
    .unwrap();
    assert_eq!(result, value);
    assert_eq!(calls, 0);
}

#[rstest]
fn matching_root_is_transformed() {
    assert_eq!(
        map_collection(Value::Int(5), &TypeTag::Int, increment).unwrap(),
        Value::Int(6)
    );
}

#[rstest]
fn nested_mapping_is_rebuilt_with_transformed_leaves() {
    let data = Value::dict([("a", Value::Int(1)), ("b", Value::list([2, 3]))]);
    let result = map_collection(data, &TypeTag::Int, times_ten).unwrap();
    assert_eq!(
        result,
        Value::dict([("a", Value::Int(10)), ("b", Value::list([20, 30]))])
    );
}

#[rstest]
fn strings_are_transformed_whole() {
    let data = Value::list([Value::from("ab"), Value::from("cd")]);
    let mut seen = Vec::new();
    let result = map_collection(data, &TypeTag::Str, |value| {
        let text = value.as_str().unwrap_or_default().to_uppercase();
        seen.push(text.clone());
        Value::Str(text)
    })
    .unwrap();
    assert_eq!(seen, vec!["AB", "CD"]);
    assert_eq!(result, Value::list(["AB", "CD"]));
}

#[rstest]
fn sequence_tag_transforms_strings_whole() {
    let data = Value::dict([("text", Value::from("abc")), ("count", Value::Int(1))]);
    let result = map_collection(data, &TypeTag::Sequence, |value| {
        Value::Int(value.as_str().map_or(-1, |text| i64::try_from(text.len()).unwrap_or(-1)))
    })
    .unwrap();
    assert_eq!(result, Value::dict([("text", 3), ("count", 1)]));
}

#[rstest]
fn bytes_are_mapped_byte_by_byte() {
    let result = map_collection(Value::Bytes(vec![1, 2]), &TypeTag::Int, increment).unwrap();
    assert_eq!(result, Value::Bytes(vec![2, 3]));
}

#[rstest]
fn bytes_tag_transforms_bytes_whole() {
    let data = Value::list([Value::Bytes(b"ab".to_vec())]);
    let result = map_collection(data, &TypeTag::Bytes, |_| Value::from("bytes")).unwrap();
    assert_eq!(result, Value::list(["bytes"]));
}

#[rstest]
#[case(Traversal::Recursive)]
#[case(Traversal::Iterative)]
fn bytes_must_still_hold_bytes_after_mapping(#[case] traversal: Traversal) {
    let error = CollectionMapper::new(TypeTag::Int)
        .traversal(traversal)
        .apply(Value::list([Value::Bytes(vec![255])]), increment)
        .unwrap_err();
    assert!(matches!(error, ConstructionError::Rejected { .. }));
    assert_eq!(error.type_name(), "bytes");
}

#[rstest]
fn bools_count_as_ints() {
    let data = Value::list([Value::Int(1), Value::Bool(true)]);
    let leaves = nestmap::collect_leaves(&data, &TypeTag::Int);
    assert_eq!(leaves.len(), 2);
}

#[rstest]
fn predicate_selects_leaves() {
    let positive = predicate(|value: &Value| value.as_int().is_some_and(|number| number > 0));
    let data = Value::list([-1, 2, 0, 3]);
    let result = map_collection(data, &positive, |_| Value::Int(100)).unwrap();
    assert_eq!(result, Value::list([-1, 100, 0, 100]));
}

#[rstest]
fn dtype_set_selects_any_member() {
    let numbers = DType::any_of([TypeTag::Int, TypeTag::Float]);
    let data = Value::tuple([Value::Int(1), Value::Float(0.5), Value::from("x")]);
    let result = map_collection(data, &numbers, times_ten).unwrap();
    assert_eq!(
        result,
        Value::tuple([Value::Int(10), Value::Float(5.0), Value::from("x")])
    );
}

// =============================================================================
// Exclusion
// =============================================================================

#[rstest]
fn excluded_root_is_returned_unchanged() {
    let result =
        map_collection_excluding(Value::Bool(true), &TypeTag::Int, &TypeTag::Bool, increment)
            .unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[rstest]
fn non_excluded_root_is_transformed() {
    let result =
        map_collection_excluding(Value::Int(2), &TypeTag::Int, &TypeTag::Bool, increment).unwrap();
    assert_eq!(result, Value::Int(3));
}

#[rstest]
fn empty_exclusion_is_ignored() {
    let result =
        map_collection_excluding(Value::Bool(true), &TypeTag::Int, &DType::new(), |_| {
            Value::Int(7)
        })
        .unwrap();
    assert_eq!(result, Value::Int(7));
}

#[rstest]
#[case(ExclusionScope::Root, Value::list([Value::Int(2), Value::Int(1)]))]
#[case(ExclusionScope::EveryNode, Value::list([Value::Int(2), Value::Bool(false)]))]
fn exclusion_scope_controls_nested_exclusion(
    #[case] scope: ExclusionScope,
    #[case] expected: Value,
) {
    let data = Value::list([Value::Int(1), Value::Bool(false)]);
    let mapper = CollectionMapper::new(TypeTag::Int)
        .excluding(TypeTag::Bool)
        .exclusion_scope(scope);
    assert_eq!(mapper.apply(data, increment).unwrap(), expected);
}

#[rstest]
fn excluded_container_is_still_descended() {
    let data = Value::list([1, 2]);
    let mapper = CollectionMapper::new(TypeTag::Any)
        .excluding(TypeTag::List)
        .exclusion_scope(ExclusionScope::EveryNode);
    let result = mapper.apply(data, |_| Value::from("leaf")).unwrap();
    assert_eq!(result, Value::list(["leaf", "leaf"]));
}

// =============================================================================
// Containers
// =============================================================================

#[rstest]
fn record_is_rebuilt_with_same_type() {
    let point = RecordType::new("Point", ["x", "y"]);
    let data = Value::Record(point.instantiate([1, 2]).unwrap());
    let result = map_collection(data, &TypeTag::Int, times_ten).unwrap();
    let record = result.as_record().unwrap();
    assert_eq!(record.record_type(), &point);
    assert_eq!(record.get("x"), Some(&Value::Int(10)));
    assert_eq!(record.get("y"), Some(&Value::Int(20)));
}

#[rstest]
fn mapping_kind_and_key_order_survive() {
    let mapping = Mapping::from_entries(
        MappingKind::named("OrderedDict"),
        [("z", 1), ("a", 2), ("m", 3)],
    );
    let result = map_collection(Value::Map(mapping), &TypeTag::Int, times_ten).unwrap();
    let mapping = result.as_mapping().unwrap();
    assert_eq!(mapping.kind(), &MappingKind::named("OrderedDict"));
    let keys: Vec<String> = mapping.keys().map(ToString::to_string).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[rstest]
fn integer_keys_are_not_transformed() {
    let data = Value::dict([(1, 10), (2, 20)]);
    let result = map_collection(data, &TypeTag::Int, increment).unwrap();
    assert_eq!(result, Value::dict([(1, 11), (2, 21)]));
}

#[rstest]
#[case(SequenceKind::List)]
#[case(SequenceKind::Tuple)]
#[case(SequenceKind::named("Deque"))]
fn sequence_kind_survives(#[case] kind: SequenceKind) {
    let data = Value::Seq(Sequence::new(kind.clone(), vec![Value::Int(1), Value::Int(2)]));
    let result = map_collection(data, &TypeTag::Int, increment).unwrap();
    let sequence = result.as_sequence().unwrap();
    assert_eq!(sequence.kind(), &kind);
    assert_eq!(sequence.items(), &[Value::Int(2), Value::Int(3)]);
}

#[rstest]
#[case(Value::dict(Vec::<(&str, Value)>::new()))]
#[case(Value::list(Vec::<Value>::new()))]
#[case(Value::tuple(Vec::<Value>::new()))]
#[case(Value::Map(Mapping::with_kind(MappingKind::named("Batch"))))]
fn empty_containers_are_rebuilt_without_calls(#[case] data: Value) {
    let mut calls = 0;
    let result = map_collection(data.clone(), &TypeTag::Int, |value| {
        calls += 1;
        value
    })
    .unwrap();
    assert_eq!(result, data);
    assert_eq!(calls, 0);
}

#[rstest]
fn matching_container_is_transformed_not_descended() {
    let data = Value::dict([("inner", Value::list([1, 2])), ("n", Value::Int(3))]);
    let mut seen = Vec::new();
    let result = map_collection(data, &TypeTag::List, |value| {
        seen.push(value.clone());
        Value::from("replaced")
    })
    .unwrap();
    assert_eq!(seen, vec![Value::list([1, 2])]);
    assert_eq!(
        result,
        Value::dict([("inner", Value::from("replaced")), ("n", Value::Int(3))])
    );
}

#[rstest]
fn named_tag_selects_named_records() {
    let point = RecordType::new("Point", ["x", "y"]);
    let data = Value::list([
        Value::Record(point.instantiate([1, 2]).unwrap()),
        Value::tuple([1, 2]),
    ]);
    let result = map_collection(data, &TypeTag::named("Point"), |_| Value::None).unwrap();
    assert_eq!(result, Value::list([Value::None, Value::tuple([1, 2])]));
}

// =============================================================================
// Arguments
// =============================================================================

#[rstest]
#[case(Traversal::Recursive)]
#[case(Traversal::Iterative)]
fn forwarded_arguments_reach_every_call(#[case] traversal: Traversal) {
    let batch = Value::dict([
        ("inputs", Tensor::on("cpu", &[1.0, 2.0])),
        (
            "targets",
            Value::list([Tensor::on("cpu", &[3.0]), Tensor::on("cpu", &[4.0])]),
        ),
        ("step", Value::Int(3)),
    ]);
    let args = Args::new().kwarg("device", "cuda:0");
    let mapper = CollectionMapper::new(TypeTag::named("Tensor"))
        .with_args(args.clone())
        .traversal(traversal);

    let mut received = Vec::new();
    let moved = mapper
        .apply_with(batch, |value, call_args| {
            received.push(call_args.clone());
            to_device(value, call_args)
        })
        .unwrap();

    assert_eq!(received, vec![args.clone(), args.clone(), args]);
    assert_eq!(moved.get("inputs").and_then(device_of), Some("cuda:0"));
    let targets = moved.get("targets").and_then(Value::as_sequence).unwrap();
    assert!(targets.iter().all(|target| device_of(target) == Some("cuda:0")));
    assert_eq!(moved.get("step"), Some(&Value::Int(3)));
}

#[rstest]
fn positional_arguments_are_forwarded_in_order() {
    let args = Args::new().arg(2).arg(3);
    let mapper = CollectionMapper::new(TypeTag::Int).with_args(args);
    let result = mapper
        .apply_with(Value::list([1, 2]), |value, args| {
            let factors: i64 = args.positional().iter().filter_map(Value::as_int).product();
            Value::Int(value.as_int().unwrap_or_default() * factors)
        })
        .unwrap();
    assert_eq!(result, Value::list([6, 12]));
}

// =============================================================================
// Objects
// =============================================================================

#[rstest]
fn object_with_mapping_contents_is_descended() {
    let batch = Value::object(Batch(vec![
        (Key::from("a"), Value::Int(1)),
        (Key::from("b"), Value::from("x")),
    ]));
    let result = map_collection(batch, &TypeTag::Int, increment).unwrap();
    let rebuilt = result
        .as_object()
        .and_then(|object| object.downcast_ref::<Batch>())
        .unwrap();
    assert_eq!(
        rebuilt.0,
        vec![(Key::from("a"), Value::Int(2)), (Key::from("b"), Value::from("x"))]
    );
}

#[rstest]
fn opaque_object_is_a_leaf_for_object_tag() {
    let data = Value::list([Tensor::on("cpu", &[1.0]), Value::Int(1)]);
    let result = map_collection(data, &TypeTag::Object, |_| Value::from("tensor")).unwrap();
    assert_eq!(result, Value::list([Value::from("tensor"), Value::Int(1)]));
}

#[rstest]
#[case(Traversal::Recursive)]
#[case(Traversal::Iterative)]
fn rebuild_failure_surfaces_construction_error(#[case] traversal: Traversal) {
    let frozen = Value::object(FrozenBatch(vec![(Key::from("a"), Value::Int(1))]));
    let data = Value::list([frozen]);
    let error = CollectionMapper::new(TypeTag::Int)
        .traversal(traversal)
        .apply(data, increment)
        .unwrap_err();
    assert_eq!(error, ConstructionError::rejected("FrozenBatch", "frozen"));
    assert_eq!(error.type_name(), "FrozenBatch");
}

#[rstest]
fn rebuild_failure_converts_into_caller_error() {
    let frozen = Value::object(FrozenBatch(vec![(Key::from("a"), Value::Int(1))]));
    let result: Result<Value, TransformError> =
        try_map_collection(frozen, &TypeTag::Int, |value| Ok(increment(value)));
    assert_eq!(
        result,
        Err(TransformError::Construction(ConstructionError::rejected(
            "FrozenBatch",
            "frozen"
        )))
    );
}

// =============================================================================
// Errors from the function
// =============================================================================

#[rstest]
#[case(Traversal::Recursive)]
#[case(Traversal::Iterative)]
fn function_error_stops_the_pass(#[case] traversal: Traversal) {
    let data = Value::dict([
        ("a", Value::Int(1)),
        ("b", Value::list([Value::Int(-2), Value::Int(3)])),
        ("c", Value::Int(4)),
    ]);
    let mut visited = Vec::new();
    let result = CollectionMapper::new(TypeTag::Int)
        .traversal(traversal)
        .try_apply(data, |value| {
            let number = value.as_int().unwrap_or_default();
            visited.push(number);
            if number < 0 {
                Err(TransformError::Negative(number))
            } else {
                Ok(Value::Int(number))
            }
        });
    assert_eq!(result, Err(TransformError::Negative(-2)));
    assert_eq!(visited, vec![1, -2]);
}

#[rstest]
fn function_error_is_not_wrapped() {
    let result: Result<Value, TransformError> =
        try_map_collection(Value::Int(-1), &TypeTag::Int, |value| {
            Err(TransformError::Negative(value.as_int().unwrap_or_default()))
        });
    assert_eq!(result.unwrap_err().to_string(), "negative value -1");
}

// =============================================================================
// Reuse
// =============================================================================

#[rstest]
fn mapper_is_reusable() {
    let mapper = CollectionMapper::new(TypeTag::Int);
    let first = mapper.apply(Value::list([1]), increment).unwrap();
    let second = mapper.apply(first, increment).unwrap();
    assert_eq!(second, Value::list([3]));
}
