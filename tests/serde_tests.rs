//! Serialization tests, enabled with the `serde` feature.
#![cfg(feature = "serde")]

use nestmap::{
    CollectionMapper, ExclusionScope, MapperOptions, Traversal, TypeTag, Value, map_collection,
};
use rstest::rstest;

#[rstest]
fn json_document_maps_like_any_value() {
    let document: Value = serde_json::from_str(r#"{"a": 1, "b": [2, 3.5, "x"], "c": null}"#).unwrap();
    let scaled = map_collection(document, &TypeTag::Int, |value| {
        Value::Int(value.as_int().unwrap_or_default() * 10)
    })
    .unwrap();
    assert_eq!(
        serde_json::to_string(&scaled).unwrap(),
        r#"{"a":10,"b":[20,3.5,"x"],"c":null}"#
    );
}

#[rstest]
fn mapper_builds_from_json_options() {
    let options: MapperOptions = serde_json::from_str(
        r#"{"dtype": ["int"], "wrong_dtype": ["bool"], "traversal": "iterative"}"#,
    )
    .unwrap();
    assert_eq!(options.traversal, Traversal::Iterative);
    assert_eq!(options.exclusion_scope, ExclusionScope::Root);

    let mapper = CollectionMapper::from_options(options);
    assert_eq!(
        mapper.apply(Value::Bool(true), |_| Value::Int(0)).unwrap(),
        Value::Bool(true)
    );
    assert_eq!(
        mapper.apply(Value::Int(4), |_| Value::Int(0)).unwrap(),
        Value::Int(0)
    );
}

#[rstest]
#[case(r#"{"dtype": "int", "traversal": "sideways"}"#)]
#[case(r#"{"dtype": ["integer"]}"#)]
#[case(r#"{"traversal": "recursive"}"#)]
fn invalid_options_are_rejected(#[case] json: &str) {
    assert!(serde_json::from_str::<MapperOptions>(json).is_err());
}

#[rstest]
fn options_round_trip() {
    let options = MapperOptions {
        exclusion_scope: ExclusionScope::EveryNode,
        ..MapperOptions::new(TypeTag::named("Tensor"))
    };
    let json = serde_json::to_string(&options).unwrap();
    assert_eq!(
        json,
        r#"{"dtype":[{"named":"Tensor"}],"wrong_dtype":[],"traversal":"recursive","exclusion_scope":"every_node"}"#
    );
    assert_eq!(serde_json::from_str::<MapperOptions>(&json).unwrap(), options);
}
