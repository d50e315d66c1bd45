//! Configuration module for invoice-book.

use crate::services::numbering::{DEFAULT_PREFIX, DEFAULT_WIDTH};
use crate::services::seed::Seed;
use book_core::config as core_config;
use book_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct InvoiceBookConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub numbering: NumberingConfig,
    pub seed: Seed,
}

#[derive(Debug, Clone)]
pub struct NumberingConfig {
    pub prefix: String,
    pub width: usize,
}

impl InvoiceBookConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        let width = match env::var("INVOICE_NUMBER_WIDTH") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!(
                    "INVOICE_NUMBER_WIDTH must be an integer, got '{}': {}",
                    raw,
                    e
                ))
            })?,
            Err(_) => DEFAULT_WIDTH,
        };

        let seed = match env::var("SEED_SAMPLE_INVOICES")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            Ok("1") | Ok("true") | Ok("yes") => Seed::SampleInvoices,
            _ => Seed::Empty,
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "invoice-book".to_string()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            numbering: NumberingConfig {
                prefix: env::var("INVOICE_NUMBER_PREFIX")
                    .unwrap_or_else(|_| DEFAULT_PREFIX.to_string()),
                width,
            },
            seed,
        })
    }
}
