//! Prometheus metrics for invoice-book.

use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, CounterVec, TextEncoder};

/// Collection operations by operation and outcome (applied, not_found).
pub static INVOICE_OPERATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoicing_invoice_operations_total",
        "Total number of invoice collection operations",
        &["operation", "outcome"]
    )
    .expect("Failed to register invoice_operations_total")
});

/// Store writes by durability (persisted, memory_only, discarded).
pub static STORE_WRITES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoicing_store_writes_total",
        "Total number of invoice store writes by durability",
        &["durability"]
    )
    .expect("Failed to register store_writes_total")
});

/// Invoice numbers minted, including ones never saved.
pub static INVOICE_NUMBERS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "invoicing_invoice_numbers_total",
        "Total number of invoice numbers generated",
        &["prefix"]
    )
    .expect("Failed to register invoice_numbers_total")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&INVOICE_OPERATIONS_TOTAL);
    Lazy::force(&STORE_WRITES_TOTAL);
    Lazy::force(&INVOICE_NUMBERS_TOTAL);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
