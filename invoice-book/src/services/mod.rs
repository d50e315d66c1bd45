//! Services module for invoice-book.

pub mod clock;
pub mod collection;
pub mod metrics;
pub mod numbering;
pub mod seed;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collection::InvoiceBook;
pub use metrics::{get_metrics, init_metrics};
pub use numbering::InvoiceNumberGenerator;
pub use seed::Seed;
