//! Test helper module for invoice-book integration tests.
//!
//! Provides books over in-memory and temporary-directory storage with a
//! pinned clock.

#![allow(dead_code)]

use book_core::store::{FileBackend, MemoryBackend, PersistedStore};
use chrono::NaiveDate;
use invoice_book::{
    DraftItem, FixedClock, Invoice, InvoiceBook, InvoiceDraft, InvoiceItem, InvoiceStatus,
};
use rust_decimal::Decimal;
use std::sync::Once;
use tempfile::TempDir;

pub const TEST_YEAR: i32 = 2024;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,invoice_book=debug,book_core=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// An empty book over in-memory storage, pinned to [`TEST_YEAR`].
pub fn memory_book() -> InvoiceBook<MemoryBackend, FixedClock> {
    init_tracing();
    InvoiceBook::new(
        PersistedStore::new(MemoryBackend::new()),
        FixedClock::year(TEST_YEAR),
    )
}

/// Rebuild a memory book from the backend of `book`, as after a restart.
pub fn restart(
    book: InvoiceBook<MemoryBackend, FixedClock>,
) -> InvoiceBook<MemoryBackend, FixedClock> {
    let backend = book.into_store().into_backend();
    InvoiceBook::new(PersistedStore::new(backend), FixedClock::year(TEST_YEAR))
}

/// A book stored in a temporary directory that can be reopened.
pub struct TestBook {
    pub book: InvoiceBook<FileBackend, FixedClock>,
    pub dir: TempDir,
}

impl TestBook {
    pub fn open() -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let book = Self::book_in(&dir, None);
        Self { book, dir }
    }

    pub fn open_with_quota(quota_bytes: usize) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let book = Self::book_in(&dir, Some(quota_bytes));
        Self { book, dir }
    }

    /// Drop the book and open a fresh one over the same directory.
    pub fn reopen(self) -> Self {
        let TestBook { book, dir } = self;
        drop(book);
        let book = Self::book_in(&dir, None);
        Self { book, dir }
    }

    pub fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.path().join(format!("{}.json", key))
    }

    fn book_in(dir: &TempDir, quota_bytes: Option<usize>) -> InvoiceBook<FileBackend, FixedClock> {
        let backend = FileBackend::open(dir.path()).expect("Failed to open file backend");
        let backend = match quota_bytes {
            Some(quota) => backend.with_quota(quota),
            None => backend,
        };
        InvoiceBook::new(PersistedStore::new(backend), FixedClock::year(TEST_YEAR))
    }
}

/// An invoice whose totals have not been computed yet.
pub fn test_invoice(id: &str, items: &[(Decimal, Decimal)], tax_rate: Decimal) -> Invoice {
    Invoice {
        id: id.to_string(),
        invoice_number: format!("INV-{}-{:0>3}", TEST_YEAR, id),
        client_name: "Tech Solutions Inc.".to_string(),
        client_email: "contact@techsolutions.com".to_string(),
        invoice_date: date(TEST_YEAR, 7, 1),
        due_date: date(TEST_YEAR, 7, 31),
        items: items
            .iter()
            .enumerate()
            .map(|(index, (quantity, unit_price))| InvoiceItem {
                id: format!("item-{}-{}", id, index + 1),
                description: format!("Line {}", index + 1),
                quantity: *quantity,
                unit_price: *unit_price,
                total: Decimal::ZERO,
            })
            .collect(),
        tax_rate,
        status: InvoiceStatus::Draft,
        ..Invoice::default()
    }
}

pub fn test_draft(client_name: &str, items: Vec<DraftItem>, tax_rate: Decimal) -> InvoiceDraft {
    InvoiceDraft {
        client_name: client_name.to_string(),
        client_email: format!(
            "billing@{}.example",
            client_name.to_lowercase().replace(' ', "-")
        ),
        invoice_date: date(TEST_YEAR, 9, 1),
        due_date: date(TEST_YEAR, 10, 1),
        items,
        tax_rate,
        notes: None,
        status: InvoiceStatus::Draft,
    }
}
