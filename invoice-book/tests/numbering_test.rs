//! Invoice numbering integration tests for invoice-book.

mod common;

use book_core::store::{MemoryBackend, PersistedStore};
use common::{init_tracing, test_draft, TestBook};
use invoice_book::services::numbering::COUNTER_KEY;
use invoice_book::{DraftItem, FixedClock, InvoiceBook};
use rust_decimal_macros::dec;

fn suffix(number: &str) -> u64 {
    number
        .rsplit('-')
        .next()
        .and_then(|n| n.parse().ok())
        .expect("numeric suffix")
}

#[test]
fn generate_continues_from_stored_counter() {
    init_tracing();
    let mut store = PersistedStore::new(MemoryBackend::new());
    store.write(COUNTER_KEY, 4u64);
    let mut book = InvoiceBook::new(store, FixedClock::year(2024));

    assert_eq!(book.generate_invoice_number(), "INV-2024-004");
    assert_eq!(book.generate_invoice_number(), "INV-2024-005");
}

#[test]
fn generated_numbers_strictly_increase() {
    let mut book = common::memory_book();

    let numbers: Vec<String> = (0..50).map(|_| book.generate_invoice_number()).collect();

    for pair in numbers.windows(2) {
        assert!(suffix(&pair[1]) > suffix(&pair[0]), "{:?}", pair);
    }
    assert_eq!(numbers.first().map(String::as_str), Some("INV-2024-001"));
    assert_eq!(numbers.last().map(String::as_str), Some("INV-2024-050"));
}

#[test]
fn abandoned_numbers_are_skipped() {
    let mut book = common::memory_book();

    let abandoned = book.generate_invoice_number();
    let created = book.create_invoice(test_draft(
        "Tech Solutions Inc.",
        vec![DraftItem::new("SEO Consulting", dec!(10), dec!(150))],
        dec!(0.08),
    ));

    assert_eq!(abandoned, "INV-2024-001");
    assert_eq!(created.invoice_number, "INV-2024-002");
    assert!(book.get_invoice_by_id(&created.id).is_some());
    assert!(book
        .invoices()
        .iter()
        .all(|invoice| invoice.invoice_number != abandoned));
}

#[test]
fn counter_survives_restart() {
    let mut test_book = TestBook::open();
    test_book.book.generate_invoice_number();
    test_book.book.generate_invoice_number();

    let mut test_book = test_book.reopen();

    assert_eq!(test_book.book.generate_invoice_number(), "INV-2024-003");
    let raw = std::fs::read_to_string(test_book.path(COUNTER_KEY)).unwrap();
    assert_eq!(raw, "4");
}

#[test]
fn year_comes_from_injected_clock() {
    init_tracing();
    let mut book = InvoiceBook::new(
        PersistedStore::new(MemoryBackend::new()),
        FixedClock::year(2031),
    )
    .with_numbering("SOP", 4);

    assert_eq!(book.generate_invoice_number(), "SOP-2031-0001");
}
