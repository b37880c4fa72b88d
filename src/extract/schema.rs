use serde_json::{json, Value};

pub const SCHEMA_NAME: &str = "bill_extraction";

/// Strict JSON Schema for a bill, with `category` closed over `categories`.
///
/// Strict structured output rejects optional keys, so every property is
/// listed in `required` and optionality is expressed through `null` in the
/// property's type.
pub fn build_schema(categories: &[String]) -> Value {
    let category = if categories.is_empty() {
        json!({ "type": ["string", "null"] })
    } else {
        json!({
            "anyOf": [
                { "type": "string", "enum": categories },
                { "type": "null" }
            ]
        })
    };

    let line_item = strict_object(vec![
        ("description", json!({ "type": "string" })),
        ("quantity", json!({ "type": ["number", "null"] })),
        ("unit_price", json!({ "type": ["number", "null"] })),
        ("price", json!({ "type": "number" })),
        ("category", category),
    ]);

    strict_object(vec![
        ("bill_number", json!({ "type": ["string", "null"] })),
        ("items", json!({ "type": "array", "items": line_item })),
        ("source_filename", json!({ "type": ["string", "null"] })),
    ])
}

fn strict_object(properties: Vec<(&str, Value)>) -> Value {
    let required: Vec<&str> = properties.iter().map(|(name, _)| *name).collect();
    let properties: serde_json::Map<String, Value> = properties
        .into_iter()
        .map(|(name, schema)| (name.to_string(), schema))
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}
