//! Shared fixtures for webhook tests: the demo table and its three sample
//! deliveries.

#![allow(dead_code)]

use brtool_webhook::RecordShape;

pub const CREATE_SAMPLE: &str = r#"{
    "table_id": 531,
    "database_id": 101,
    "workspace_id": 100,
    "event_id": "c6516a4f-47fd-4609-8b21-f81386266e46",
    "event_type": "rows.created",
    "items": [
        {
            "id": 6,
            "order": "2.00000000000000000000",
            "Number": null,
            "Updated": "2024-04-15T17:27:05.492550Z",
            "Url": {
                "url": "(не обработано)",
                "label": null
            },
            "Report": "(не обработано)"
        }
    ]
}"#;

pub const UPDATE_SAMPLE: &str = r#"{
    "table_id": 531,
    "database_id": 101,
    "workspace_id": 100,
    "event_id": "cf2b25b9-09c1-47d7-80bd-93cb984c6720",
    "event_type": "rows.updated",
    "items": [
        {
            "id": 8,
            "order": "1.00000000000000000000",
            "Number": "14846168484",
            "Updated": "2024-04-15T17:34:16.070200Z",
            "Url": {
                "url": "(не обработано)",
                "label": null
            },
            "Report": "(не обработано)"
        }
    ],
    "old_items": [
        {
            "id": 8,
            "order": "1.00000000000000000000",
            "Number": "4846168484",
            "Updated": "2024-04-15T17:32:41.250376Z",
            "Url": {
                "url": "(не обработано)",
                "label": null
            },
            "Report": "(не обработано)"
        }
    ]
}"#;

pub const DELETE_SAMPLE: &str = r#"{
    "table_id": 531,
    "database_id": 101,
    "workspace_id": 100,
    "event_id": "17295694-2b1d-433a-aa5e-fec9ddb579b7",
    "event_type": "rows.deleted",
    "row_ids": [7, 6, 1]
}"#;

/// "(не обработано)", the placeholder the demo table stores in text cells.
pub const UNPROCESSED: &str = "(\u{43d}\u{435} \u{43e}\u{431}\u{440}\u{430}\u{431}\u{43e}\u{442}\u{430}\u{43d}\u{43e})";

/// Custom fields of the demo table.
pub fn demo_fields() -> RecordShape {
    RecordShape::new()
        .text("Number")
        .timestamp("Updated")
        .object("Url", RecordShape::new().text("url").text("label"))
        .text("Report")
}

/// Replaces the `event_type` of a sample payload.
pub fn with_event_type(sample: &str, event_type: &str) -> String {
    let mut value: serde_json::Value = serde_json::from_str(sample).unwrap();
    value["event_type"] = serde_json::Value::String(event_type.to_string());
    value.to_string()
}
