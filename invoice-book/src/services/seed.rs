//! Initial contents of a brand-new book.

use crate::models::{Invoice, InvoiceItem, InvoiceStatus};
use chrono::NaiveDate;
use rust_decimal_macros::dec;

/// What a book starts with when nothing has been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seed {
    #[default]
    Empty,
    /// Three demonstration invoices, numbered INV-2024-001 to 003.
    SampleInvoices,
}

impl Seed {
    pub fn invoices(&self) -> Vec<Invoice> {
        match self {
            Seed::Empty => Vec::new(),
            Seed::SampleInvoices => sample_invoices(),
        }
    }

    /// First counter value, following the seeded invoice numbers.
    pub fn first_invoice_number(&self) -> u64 {
        self.invoices().len() as u64 + 1
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn sample_invoices() -> Vec<Invoice> {
    let mut invoices = vec![
        Invoice {
            id: "1".to_string(),
            invoice_number: "INV-2024-001".to_string(),
            client_name: "Tech Solutions Inc.".to_string(),
            client_email: "contact@techsolutions.com".to_string(),
            invoice_date: date(2024, 7, 1),
            due_date: date(2024, 7, 31),
            items: vec![
                InvoiceItem::new("item-1-1", "Website Development (Phase 1)", dec!(1), dec!(2500)),
                InvoiceItem::new("item-1-2", "SEO Consulting", dec!(10), dec!(150)),
            ],
            tax_rate: dec!(0.08),
            status: InvoiceStatus::Sent,
            notes: Some("Payment due within 30 days. Thank you for your business!".to_string()),
            ..Invoice::default()
        },
        Invoice {
            id: "2".to_string(),
            invoice_number: "INV-2024-002".to_string(),
            client_name: "Creative Designs Co.".to_string(),
            client_email: "hello@creativedesigns.co".to_string(),
            invoice_date: date(2024, 7, 15),
            due_date: date(2024, 8, 14),
            items: vec![
                InvoiceItem::new("item-2-1", "Logo Design Package", dec!(1), dec!(800)),
                InvoiceItem::new("item-2-2", "Business Card Design (250 units)", dec!(1), dec!(150)),
            ],
            tax_rate: dec!(0.05),
            status: InvoiceStatus::Paid,
            ..Invoice::default()
        },
        Invoice {
            id: "3".to_string(),
            invoice_number: "INV-2024-003".to_string(),
            client_name: "Global Logistics Ltd.".to_string(),
            client_email: "accounts@globallogistics.com".to_string(),
            invoice_date: date(2024, 6, 20),
            due_date: date(2024, 7, 20),
            items: vec![InvoiceItem::new(
                "item-3-1",
                "Freight Forwarding Services",
                dec!(1),
                dec!(1200),
            )],
            tax_rate: dec!(0),
            status: InvoiceStatus::Overdue,
            notes: Some("Urgent: Payment overdue. Please remit promptly.".to_string()),
            ..Invoice::default()
        },
    ];

    for invoice in &mut invoices {
        invoice.recalculate();
    }
    invoices
}
