//! Invoice Book - invoice totals, numbering and local persistence.

pub mod config;
pub mod models;
pub mod services;

pub use models::{DraftItem, Invoice, InvoiceDraft, InvoiceItem, InvoiceStatus, ListInvoicesFilter};
pub use services::{Clock, FixedClock, InvoiceBook, Seed, SystemClock};
