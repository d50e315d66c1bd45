//! Sequential, year-stamped invoice numbers backed by a persisted counter.

use super::clock::Clock;
use book_core::store::{PersistedStore, StorageBackend};
use tracing::{error, info, warn};

/// Storage key of the next-number counter.
pub const COUNTER_KEY: &str = "invoiceCounter";

pub const DEFAULT_PREFIX: &str = "INV";
pub const DEFAULT_WIDTH: usize = 3;

/// `<prefix>-<year>-<n>` with `n` zero-padded to `width` digits.
pub fn format_invoice_number(prefix: &str, year: i32, n: u64, width: usize) -> String {
    format!("{}-{}-{:0>width$}", prefix, year, n, width = width)
}

/// Mints invoice numbers from the persisted counter.
///
/// Every call to [`generate`](Self::generate) consumes a number, whether or not
/// the invoice it was minted for is ever saved.
#[derive(Debug, Clone)]
pub struct InvoiceNumberGenerator<C: Clock> {
    clock: C,
    prefix: String,
    width: usize,
    first_number: u64,
}

impl<C: Clock> InvoiceNumberGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            prefix: DEFAULT_PREFIX.to_string(),
            width: DEFAULT_WIDTH,
            first_number: 1,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Counter value used when none has been stored yet.
    pub fn with_first_number(mut self, first_number: u64) -> Self {
        self.first_number = first_number;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Return the number for the current counter value and advance the counter.
    pub fn generate<B: StorageBackend>(&self, store: &mut PersistedStore<B>) -> String {
        let first = self.first_number;
        let n: u64 = store.read(COUNTER_KEY, || first);
        let number = format_invoice_number(&self.prefix, self.clock.current_year(), n, self.width);

        let Some(next) = n.checked_add(1) else {
            error!(invoice_number = %number, "Invoice counter exhausted, not advancing");
            return number;
        };

        let durability = store.write(COUNTER_KEY, next);
        if !durability.is_persisted() {
            warn!(
                invoice_number = %number,
                durability = durability.as_str(),
                "Invoice counter advance was not persisted"
            );
        }

        info!(invoice_number = %number, "Invoice number generated");
        number
    }

    /// The number the next [`generate`](Self::generate) call would return.
    pub fn peek<B: StorageBackend>(&self, store: &mut PersistedStore<B>) -> String {
        let first = self.first_number;
        let n: u64 = store.read(COUNTER_KEY, || first);
        format_invoice_number(&self.prefix, self.clock.current_year(), n, self.width)
    }
}
