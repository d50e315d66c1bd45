//! Domain models for invoice-book.

mod draft;
mod invoice;
mod line_item;

pub use draft::{DraftItem, InvoiceDraft};
pub use invoice::{Invoice, InvoiceStatus, ListInvoicesFilter};
pub use line_item::InvoiceItem;
