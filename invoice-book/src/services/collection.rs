//! Invoice collection operations over the persisted store.

use crate::config::InvoiceBookConfig;
use crate::models::{Invoice, InvoiceDraft, InvoiceStatus, ListInvoicesFilter};
use crate::services::clock::{Clock, SystemClock};
use crate::services::metrics::{
    init_metrics, INVOICE_NUMBERS_TOTAL, INVOICE_OPERATIONS_TOTAL, STORE_WRITES_TOTAL,
};
use crate::services::numbering::InvoiceNumberGenerator;
use crate::services::seed::Seed;
use book_core::error::AppError;
use book_core::store::{Durability, FileBackend, LenientVec, PersistedStore, StorageBackend};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Storage key of the invoice collection.
pub const INVOICES_KEY: &str = "invoices";

type StoredInvoices = LenientVec<Invoice>;

// -------------------------------------------------------------------------
// Pure collection transformations
// -------------------------------------------------------------------------

/// `invoices` with `invoice` at the end.
pub fn appended(invoices: Vec<Invoice>, invoice: Invoice) -> Vec<Invoice> {
    invoices.into_iter().chain(std::iter::once(invoice)).collect()
}

/// `invoices` with every element sharing `invoice.id` replaced. The flag
/// reports whether anything matched.
pub fn replaced(invoices: Vec<Invoice>, invoice: Invoice) -> (Vec<Invoice>, bool) {
    let mut matched = false;
    let updated = invoices
        .into_iter()
        .map(|existing| {
            if existing.id == invoice.id {
                matched = true;
                invoice.clone()
            } else {
                existing
            }
        })
        .collect();
    (updated, matched)
}

/// `invoices` with only the status of invoice `id` changed.
pub fn with_status(invoices: Vec<Invoice>, id: &str, status: InvoiceStatus) -> (Vec<Invoice>, bool) {
    let mut matched = false;
    let updated = invoices
        .into_iter()
        .map(|invoice| {
            if invoice.id == id {
                matched = true;
                Invoice { status, ..invoice }
            } else {
                invoice
            }
        })
        .collect();
    (updated, matched)
}

/// `invoices` without invoice `id`.
pub fn without(invoices: Vec<Invoice>, id: &str) -> (Vec<Invoice>, bool) {
    let before = invoices.len();
    let remaining: Vec<Invoice> = invoices.into_iter().filter(|invoice| invoice.id != id).collect();
    let matched = remaining.len() != before;
    (remaining, matched)
}

fn record_operation(operation: &str, matched: bool, durability: Durability) {
    let outcome = if matched { "applied" } else { "not_found" };
    INVOICE_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    STORE_WRITES_TOTAL
        .with_label_values(&[durability.as_str()])
        .inc();
}

// -------------------------------------------------------------------------
// Invoice book
// -------------------------------------------------------------------------

/// The mutation and lookup surface over the persisted invoice collection.
///
/// Owns its store; every list change is computed from the latest stored
/// collection and written straight back. Operations on an unknown id are
/// silent no-ops.
pub struct InvoiceBook<B: StorageBackend, C: Clock = SystemClock> {
    store: PersistedStore<B>,
    numbers: InvoiceNumberGenerator<C>,
    seed: Seed,
}

impl InvoiceBook<FileBackend, SystemClock> {
    /// Open a file-backed book as described by `config`.
    #[instrument(skip(config), fields(service = %config.service_name, version = %config.service_version))]
    pub fn from_config(config: &InvoiceBookConfig) -> Result<Self, AppError> {
        let backend = FileBackend::from_config(&config.common)?;

        info!(
            data_dir = %config.common.data_dir.display(),
            seed = ?config.seed,
            "Invoice book opened"
        );

        Ok(Self::new(PersistedStore::new(backend), SystemClock)
            .with_seed(config.seed)
            .with_numbering(config.numbering.prefix.clone(), config.numbering.width))
    }
}

impl<B: StorageBackend, C: Clock> InvoiceBook<B, C> {
    pub fn new(store: PersistedStore<B>, clock: C) -> Self {
        init_metrics();
        Self {
            store,
            numbers: InvoiceNumberGenerator::new(clock),
            seed: Seed::Empty,
        }
    }

    /// Contents used when no collection has been stored yet. Also moves the
    /// first invoice number past the seeded ones.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self.numbers = self.numbers.with_first_number(seed.first_invoice_number());
        self
    }

    pub fn with_numbering(mut self, prefix: impl Into<String>, width: usize) -> Self {
        self.numbers = self.numbers.with_prefix(prefix).with_width(width);
        self
    }

    pub fn into_store(self) -> PersistedStore<B> {
        self.store
    }

    /// All invoices in stored order.
    pub fn invoices(&mut self) -> Vec<Invoice> {
        let seed = self.seed;
        self.store
            .read(INVOICES_KEY, || StoredInvoices::from(seed.invoices()))
            .into_inner()
    }

    pub fn list_invoices(&mut self, filter: &ListInvoicesFilter) -> Vec<Invoice> {
        self.invoices()
            .into_iter()
            .filter(|invoice| filter.matches(invoice))
            .collect()
    }

    #[instrument(skip(self))]
    pub fn get_invoice_by_id(&mut self, id: &str) -> Option<Invoice> {
        let found = self.invoices().into_iter().find(|invoice| invoice.id == id);
        if found.is_none() {
            debug!("Invoice not found");
        }
        found
    }

    /// Mint the next invoice number. The number is consumed even if the
    /// invoice is never saved.
    pub fn generate_invoice_number(&mut self) -> String {
        let number = self.numbers.generate(&mut self.store);
        INVOICE_NUMBERS_TOTAL
            .with_label_values(&[self.numbers.prefix()])
            .inc();
        number
    }

    /// The number the next [`generate_invoice_number`](Self::generate_invoice_number) would return.
    pub fn peek_invoice_number(&mut self) -> String {
        self.numbers.peek(&mut self.store)
    }

    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id, invoice_number = %invoice.invoice_number))]
    pub fn add_invoice(&mut self, mut invoice: Invoice) -> Durability {
        invoice.recalculate();
        let seed = self.seed;

        let durability = self.store.write_with(
            INVOICES_KEY,
            || StoredInvoices::from(seed.invoices()),
            |stored| appended(stored.into_inner(), invoice).into(),
        );

        record_operation("add", true, durability);
        info!(durability = durability.as_str(), "Invoice added");
        durability
    }

    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    pub fn update_invoice(&mut self, mut invoice: Invoice) -> Durability {
        invoice.recalculate();
        let seed = self.seed;
        let mut matched = false;

        let durability = self.store.write_with(
            INVOICES_KEY,
            || StoredInvoices::from(seed.invoices()),
            |stored| {
                let (updated, hit) = replaced(stored.into_inner(), invoice);
                matched = hit;
                updated.into()
            },
        );

        record_operation("update", matched, durability);
        if matched {
            info!(durability = durability.as_str(), "Invoice updated");
        } else {
            debug!("No invoice to update");
        }
        durability
    }

    #[instrument(skip(self))]
    pub fn update_invoice_status(&mut self, id: &str, status: InvoiceStatus) -> Durability {
        let seed = self.seed;
        let mut matched = false;

        let durability = self.store.write_with(
            INVOICES_KEY,
            || StoredInvoices::from(seed.invoices()),
            |stored| {
                let (updated, hit) = with_status(stored.into_inner(), id, status);
                matched = hit;
                updated.into()
            },
        );

        record_operation("update_status", matched, durability);
        if matched {
            info!(
                status = status.as_str(),
                durability = durability.as_str(),
                "Invoice status updated"
            );
        } else {
            debug!("No invoice to update status");
        }
        durability
    }

    /// Remove invoice `id`. Callers are expected to have confirmed the deletion.
    #[instrument(skip(self))]
    pub fn delete_invoice(&mut self, id: &str) -> Durability {
        let seed = self.seed;
        let mut matched = false;

        let durability = self.store.write_with(
            INVOICES_KEY,
            || StoredInvoices::from(seed.invoices()),
            |stored| {
                let (remaining, hit) = without(stored.into_inner(), id);
                matched = hit;
                remaining.into()
            },
        );

        record_operation("delete", matched, durability);
        if matched {
            info!(durability = durability.as_str(), "Invoice deleted");
        } else {
            debug!("No invoice to delete");
        }
        durability
    }

    /// New-invoice flow: mint an id and number, build the invoice from
    /// `draft` and add it.
    pub fn create_invoice(&mut self, draft: InvoiceDraft) -> Invoice {
        let number = self.generate_invoice_number();
        let invoice = draft.into_invoice(Uuid::new_v4().to_string(), number);

        let durability = self.add_invoice(invoice.clone());
        if !durability.is_persisted() {
            warn!(invoice_id = %invoice.id, durability = durability.as_str(), "New invoice not durably saved");
        }
        invoice
    }

    /// Edit flow: apply `draft` to invoice `id`, keeping its id and number.
    /// Returns `None` if there is no such invoice.
    pub fn edit_invoice(&mut self, id: &str, draft: InvoiceDraft) -> Option<Invoice> {
        let mut invoice = self.get_invoice_by_id(id)?;
        draft.apply_to(&mut invoice);

        let durability = self.update_invoice(invoice.clone());
        if !durability.is_persisted() {
            warn!(invoice_id = %invoice.id, durability = durability.as_str(), "Edited invoice not durably saved");
        }
        Some(invoice)
    }
}
