//! book-core: Shared infrastructure for the invoice book.
pub mod config;
pub mod error;
pub mod observability;
pub mod store;
