//! Line item model for invoice-book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One billable entry on an invoice.
///
/// `total` is always `quantity * unit_price`; go through the setters (or call
/// [`InvoiceItem::recalculate`]) rather than assigning it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceItem {
    pub id: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total: Decimal,
}

impl InvoiceItem {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            quantity,
            unit_price,
            total: quantity * unit_price,
        }
    }

    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = quantity;
        self.recalculate();
    }

    pub fn set_unit_price(&mut self, unit_price: Decimal) {
        self.unit_price = unit_price;
        self.recalculate();
    }

    pub fn recalculate(&mut self) {
        self.total = self.quantity * self.unit_price;
    }
}
