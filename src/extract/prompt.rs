/// Literal category list that templates carry in place of the real vocabulary.
pub const CATEGORY_PLACEHOLDER: &str = r#"["groceries", "utilities", "other"]"#;

const DEFAULT_PROMPT: &str = r#"You are reading an attached bill or receipt. Extract every purchased or billed line item.

Allowed categories: ["groceries", "utilities", "other"]

Rules:
- Use only the allowed categories above. When unsure, pick the closest match; never invent a new category. If the list is empty, set category to null.
- quantity, unit_price and price must be JSON numbers, not strings, rounded to 2 decimals.
- If a line shows quantity and unit price but no price, set price to quantity * unit_price.
- Use null for quantity or unit_price when the document does not state them.
- Ignore subtotals, totals, taxes, tips and shipping unless they are genuinely separate line items.
- Set bill_number to the invoice/receipt number if printed, otherwise null.
- Keep line items in the order they appear on the document.
- Respond with valid JSON only, with no commentary before or after it."#;

/// Build the extraction instruction for `categories`.
///
/// `template` is the externally stored prompt, if any. It must contain
/// [`CATEGORY_PLACEHOLDER`]; a template without it is ignored in favour of
/// the built-in prompt.
pub fn build_prompt(categories: &[String], template: Option<&str>) -> String {
    let encoded = serde_json::to_string(categories).unwrap_or_else(|_| "[]".to_string());
    match template {
        Some(t) if t.contains(CATEGORY_PLACEHOLDER) => t.replace(CATEGORY_PLACEHOLDER, &encoded),
        Some(_) => {
            tracing::warn!("prompt template has no category placeholder; using built-in prompt");
            DEFAULT_PROMPT.replace(CATEGORY_PLACEHOLDER, &encoded)
        }
        None => DEFAULT_PROMPT.replace(CATEGORY_PLACEHOLDER, &encoded),
    }
}

/// The built-in prompt, unsubstituted. `billbook config init-prompt` writes
/// this out as a starting point for a custom template.
pub fn default_template() -> &'static str {
    DEFAULT_PROMPT
}
