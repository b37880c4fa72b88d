use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: i64,
    pub account: String,
    pub description: String,
    pub price: f64,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Structured result of extracting one bill or receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub bill_number: Option<String>,
    pub items: Vec<LineItem>,
    pub source_filename: String,
}

/// One billed entry within a [`Bill`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,
    pub price: f64,
    pub category: Option<String>,
}

impl Bill {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }
}
