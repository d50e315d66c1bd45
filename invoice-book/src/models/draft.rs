//! Form input used to create or edit an invoice.

use super::invoice::{Invoice, InvoiceStatus};
use super::line_item::InvoiceItem;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item as entered on the form. Items without an `id` are new.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftItem {
    #[serde(default)]
    pub id: Option<String>,
    pub description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub unit_price: Decimal,
}

impl DraftItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    fn into_item(self) -> InvoiceItem {
        let id = self
            .id
            .unwrap_or_else(|| format!("item-{}", Uuid::new_v4()));
        InvoiceItem::new(id, self.description, self.quantity, self.unit_price)
    }
}

/// Everything the invoice form collects. Identity (`id`, `invoice_number`) and
/// totals are not part of a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub client_name: String,
    pub client_email: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub items: Vec<DraftItem>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: InvoiceStatus,
}

impl InvoiceDraft {
    /// Build a new invoice with the given identity and derived totals.
    pub fn into_invoice(self, id: impl Into<String>, invoice_number: impl Into<String>) -> Invoice {
        let mut invoice = Invoice {
            id: id.into(),
            invoice_number: invoice_number.into(),
            ..Invoice::default()
        };
        self.apply_to(&mut invoice);
        invoice
    }

    /// Overwrite the editable fields of `invoice`, keeping its `id` and
    /// `invoice_number`, and recompute totals.
    pub fn apply_to(self, invoice: &mut Invoice) {
        invoice.client_name = self.client_name;
        invoice.client_email = self.client_email;
        invoice.invoice_date = self.invoice_date;
        invoice.due_date = self.due_date;
        invoice.items = self.items.into_iter().map(DraftItem::into_item).collect();
        invoice.tax_rate = self.tax_rate;
        invoice.notes = self.notes.filter(|notes| !notes.trim().is_empty());
        invoice.status = self.status;
        invoice.recalculate();
    }

    /// Draft pre-filled from an existing invoice, for the edit form.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            client_name: invoice.client_name.clone(),
            client_email: invoice.client_email.clone(),
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            items: invoice
                .items
                .iter()
                .map(|item| DraftItem {
                    id: Some(item.id.clone()),
                    description: item.description.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                })
                .collect(),
            tax_rate: invoice.tax_rate,
            notes: invoice.notes.clone(),
            status: invoice.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            client_name: "Global Logistics Ltd.".to_string(),
            client_email: "accounts@globallogistics.com".to_string(),
            invoice_date: date(2024, 6, 20),
            due_date: date(2024, 7, 20),
            items: vec![
                DraftItem::new("Freight Forwarding Services", dec!(1), dec!(1200)),
                DraftItem::new("Customs Clearance", dec!(2), dec!(75.25)),
            ],
            tax_rate: dec!(0.1),
            notes: Some("  ".to_string()),
            status: InvoiceStatus::Sent,
        }
    }

    #[test]
    fn into_invoice_assigns_identity_and_totals() {
        let invoice = draft().into_invoice("abc", "INV-2024-010");

        assert_eq!(invoice.id, "abc");
        assert_eq!(invoice.invoice_number, "INV-2024-010");
        assert_eq!(invoice.status, InvoiceStatus::Sent);
        assert_eq!(invoice.sub_total, dec!(1350.50));
        assert_eq!(invoice.tax_amount, dec!(135.05));
        assert_eq!(invoice.grand_total, dec!(1485.55));
        assert_eq!(invoice.notes, None);
        assert!(invoice.items.iter().all(|item| item.id.starts_with("item-")));
        assert_ne!(invoice.items[0].id, invoice.items[1].id);
    }

    #[test]
    fn apply_keeps_identity_and_existing_item_ids() {
        let mut invoice = draft().into_invoice("abc", "INV-2024-010");
        let kept_item_id = invoice.items[0].id.clone();

        let mut edit = InvoiceDraft::from_invoice(&invoice);
        edit.items.truncate(1);
        edit.items[0].quantity = dec!(3);
        edit.items.push(DraftItem::new("Storage", dec!(1), dec!(50)));
        edit.notes = Some("Urgent".to_string());
        edit.apply_to(&mut invoice);

        assert_eq!(invoice.id, "abc");
        assert_eq!(invoice.invoice_number, "INV-2024-010");
        assert_eq!(invoice.items.len(), 2);
        assert_eq!(invoice.items[0].id, kept_item_id);
        assert_eq!(invoice.items[0].total, dec!(3600));
        assert_eq!(invoice.sub_total, dec!(3650));
        assert_eq!(invoice.notes.as_deref(), Some("Urgent"));
        assert!(invoice.totals_are_consistent());
    }

    #[test]
    fn draft_amounts_serialize_like_invoice_amounts() {
        let draft = draft();
        let invoice = draft.clone().into_invoice("abc", "INV-2024-010");

        let draft_json = serde_json::to_value(&draft).unwrap();
        let invoice_json = serde_json::to_value(&invoice).unwrap();

        assert!(draft_json["taxRate"].is_number());
        assert_eq!(draft_json["taxRate"], invoice_json["taxRate"]);
        assert_eq!(draft_json["items"][1]["unitPrice"], invoice_json["items"][1]["unitPrice"]);
        assert_eq!(draft_json["items"][1]["quantity"], invoice_json["items"][1]["quantity"]);

        let decoded: InvoiceDraft = serde_json::from_value(draft_json).unwrap();
        assert_eq!(decoded, draft);
    }
}
