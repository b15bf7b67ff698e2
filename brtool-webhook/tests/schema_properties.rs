//! Property-based tests for schema composition.
//!
//! - Any custom field set disjoint from the base fields composes into exactly
//!   the union of both, base fields first.
//! - Any custom field set naming `id` or `order` is rejected.

use brtool_webhook::{FieldType, RecordShape, WebhookError, compose};
use proptest::prelude::*;
use std::collections::HashSet;

fn field_type_strategy() -> impl Strategy<Value = FieldType> {
    prop_oneof![
        Just(FieldType::Text),
        Just(FieldType::Integer),
        Just(FieldType::Number),
        Just(FieldType::Bool),
        Just(FieldType::Timestamp),
        Just(FieldType::Json),
        Just(FieldType::Array(Box::new(FieldType::Integer))),
    ]
}

fn custom_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9_ ]{0,15}")
        .unwrap()
        .prop_filter("base field name", |name| name != "id" && name != "order")
}

fn custom_shape_strategy() -> impl Strategy<Value = RecordShape> {
    prop::collection::vec((custom_name_strategy(), field_type_strategy()), 0..12).prop_map(
        |fields| {
            fields
                .into_iter()
                .fold(RecordShape::new(), |shape, (name, ty)| shape.with_field(name, ty))
        },
    )
}

proptest! {
    #[test]
    fn compose_yields_union_of_fields(custom in custom_shape_strategy()) {
        let composed = compose(&custom).unwrap();

        prop_assert_eq!(composed.len(), custom.len() + 2);

        let names: Vec<&str> = composed.field_names().collect();
        prop_assert_eq!(&names[..2], &["id", "order"]);
        prop_assert_eq!(
            names[2..].to_vec(),
            custom.field_names().collect::<Vec<_>>()
        );

        for (name, ty) in custom.fields() {
            prop_assert_eq!(composed.get(name), Some(ty));
        }

        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn compose_rejects_base_names(
        custom in custom_shape_strategy(),
        base in prop_oneof![Just("id"), Just("order")],
        ty in field_type_strategy(),
    ) {
        let shape = custom.with_field(base, ty);
        match compose(&shape) {
            Err(WebhookError::SchemaConflict { field }) => prop_assert_eq!(field, base),
            other => prop_assert!(false, "expected SchemaConflict, got {:?}", other),
        }
    }
}
