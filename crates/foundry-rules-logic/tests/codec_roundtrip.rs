//! Round-trip law of the wire codec over arbitrary JSON documents.

use foundry_rules_logic::codec::{
    compress, compress_to_encoded_uri_component, decompress, decompress_from_encoded_uri_component,
};
use proptest::prelude::*;
use serde_json::Value;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "\\PC{0,16}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z_]{1,10}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn document_survives_round_trip(document in json_value()) {
        let envelope = compress(&document);
        prop_assert_eq!(decompress(&envelope).unwrap(), document);
    }

    #[test]
    fn text_survives_round_trip(text in "\\PC{1,200}") {
        let encoded = compress_to_encoded_uri_component(&text);
        prop_assert_eq!(decompress_from_encoded_uri_component(&encoded), Some(text));
    }
}
