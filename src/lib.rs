#![doc(test(attr(deny(warnings))))]

//! Bank Core keeps client records with a single savings or checking account each, applies
//! deposits, withdrawals, and transfers, and persists everything as JSON blobs.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default filter.
pub fn init() {
    init_with_filter(None);
}

/// Initializes global tracing, preferring `RUST_LOG`, then `filter`, then `bank_core=info`.
/// Only the first call has any effect.
pub fn init_with_filter(filter: Option<&str>) {
    INIT_TRACING.call_once(|| {
        utils::init_tracing(filter);
        tracing::debug!("Bank Core tracing initialized.");
    });
}
