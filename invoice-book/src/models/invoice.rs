//! Invoice model for invoice-book.

use super::line_item::InvoiceItem;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Sent => "SENT",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
        }
    }

    /// Unknown values read as `Draft`.
    pub fn from_string(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "SENT" => InvoiceStatus::Sent,
            "PAID" => InvoiceStatus::Paid,
            "OVERDUE" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Draft,
        }
    }
}

impl<'de> Deserialize<'de> for InvoiceStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(InvoiceStatus::from_string(&raw))
    }
}

pub(crate) fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Invoice document.
///
/// Totals are derived from `items` and `tax_rate` by [`Invoice::recalculate`].
/// The collection operations run it again before every write, so a persisted
/// invoice always carries consistent totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<InvoiceItem>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub sub_total: Decimal,
    /// Fraction, e.g. `0.05` for 5%.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_rate: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_amount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub grand_total: Decimal,
    pub status: InvoiceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Default for Invoice {
    fn default() -> Self {
        Self {
            id: String::new(),
            invoice_number: String::new(),
            client_name: String::new(),
            client_email: String::new(),
            invoice_date: epoch_date(),
            due_date: epoch_date(),
            items: Vec::new(),
            sub_total: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            grand_total: Decimal::ZERO,
            status: InvoiceStatus::Draft,
            notes: None,
        }
    }
}

impl Invoice {
    /// Recompute every item total, then the subtotal, tax and grand total.
    pub fn recalculate(&mut self) {
        for item in &mut self.items {
            item.recalculate();
        }
        self.sub_total = self.items.iter().map(|item| item.total).sum();
        self.tax_amount = self.sub_total * self.tax_rate;
        self.grand_total = self.sub_total + self.tax_amount;
    }

    pub fn set_tax_rate(&mut self, tax_rate: Decimal) {
        self.tax_rate = tax_rate;
        self.recalculate();
    }

    pub fn push_item(&mut self, item: InvoiceItem) {
        self.items.push(item);
        self.recalculate();
    }

    /// Remove the item with `item_id`, returning it if present.
    pub fn remove_item(&mut self, item_id: &str) -> Option<InvoiceItem> {
        let index = self.items.iter().position(|item| item.id == item_id)?;
        let removed = self.items.remove(index);
        self.recalculate();
        Some(removed)
    }

    /// Apply `update` to the item with `item_id` and recompute totals.
    /// Returns `false` if no such item exists.
    pub fn update_item<F>(&mut self, item_id: &str, update: F) -> bool
    where
        F: FnOnce(&mut InvoiceItem),
    {
        let Some(item) = self.items.iter_mut().find(|item| item.id == item_id) else {
            return false;
        };
        update(item);
        self.recalculate();
        true
    }

    /// Whether the stored totals agree with the items and tax rate.
    pub fn totals_are_consistent(&self) -> bool {
        let mut expected = self.clone();
        expected.recalculate();
        expected.items == self.items
            && expected.sub_total == self.sub_total
            && expected.tax_amount == self.tax_amount
            && expected.grand_total == self.grand_total
    }
}

/// Filter parameters for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct ListInvoicesFilter {
    pub status: Option<InvoiceStatus>,
    /// Case-insensitive match against client name or email.
    pub client_query: Option<String>,
}

impl ListInvoicesFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        if let Some(status) = self.status {
            if invoice.status != status {
                return false;
            }
        }

        match self.client_query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                invoice.client_name.to_lowercase().contains(&query)
                    || invoice.client_email.to_lowercase().contains(&query)
            }
            _ => true,
        }
    }
}
