use serde::Deserialize;
use serde_json::Value;

use super::error::ExtractError;
use crate::models::{Bill, LineItem};

#[derive(Deserialize)]
struct RawBill {
    #[serde(default)]
    bill_number: Option<String>,
    #[serde(default)]
    items: Option<Vec<RawLineItem>>,
    source_filename: String,
}

#[derive(Deserialize)]
struct RawLineItem {
    description: String,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    unit_price: Option<f64>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    category: Option<String>,
}

/// Convert raw model output into a [`Bill`].
///
/// `source_filename` is filled in when the output leaves it out or null; a
/// value the model supplied is kept.
pub fn normalize(raw: &str, source_filename: &str) -> Result<Bill, ExtractError> {
    let mut value = parse_json(raw)?;
    let obj = value.as_object_mut().ok_or_else(|| {
        ExtractError::UnexpectedResponseShape("top-level JSON value is not an object".to_string())
    })?;

    let has_filename = obj
        .get("source_filename")
        .is_some_and(|v| !v.is_null());
    if !has_filename {
        obj.insert(
            "source_filename".to_string(),
            Value::String(source_filename.to_string()),
        );
    }

    let raw_bill: RawBill = serde_json::from_value(value)
        .map_err(|e| ExtractError::UnexpectedResponseShape(e.to_string()))?;

    let mut items = Vec::new();
    for (idx, raw_item) in raw_bill.items.unwrap_or_default().into_iter().enumerate() {
        if let Some(item) = line_item(idx, raw_item)? {
            items.push(item);
        }
    }

    Ok(Bill {
        bill_number: raw_bill.bill_number,
        items,
        source_filename: raw_bill.source_filename,
    })
}

/// Parse `raw` as JSON, retrying once on the brace-trimmed substring.
pub fn parse_json(raw: &str) -> Result<Value, ExtractError> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }
    tracing::debug!("model output is not plain JSON; trimming to outer braces");
    trim_to_braces(raw)
        .and_then(|trimmed| serde_json::from_str(trimmed).ok())
        .ok_or_else(|| ExtractError::malformed(raw))
}

/// The substring from the first `{` to the last `}`, inclusive.
pub fn trim_to_braces(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn line_item(idx: usize, raw: RawLineItem) -> Result<Option<LineItem>, ExtractError> {
    let description = raw.description.trim().to_string();
    if description.is_empty() {
        tracing::warn!(index = idx, "dropping line item with empty description");
        return Ok(None);
    }

    let price = match (raw.price, raw.quantity, raw.unit_price) {
        (Some(price), _, _) => price,
        (None, Some(qty), Some(unit)) => round_cents(qty * unit),
        _ => {
            return Err(ExtractError::UnexpectedResponseShape(format!(
                "line item {idx} ({description}) has no price"
            )))
        }
    };

    Ok(Some(LineItem {
        description,
        quantity: raw.quantity,
        unit_price: raw.unit_price,
        price,
        category: raw.category,
    }))
}

fn round_cents(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}
