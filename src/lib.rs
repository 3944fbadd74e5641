#![doc(test(attr(deny(warnings))))]

//! School Ledger keeps per-school gain and loss entries, reports balances over
//! rolling calendar windows, and turns structured payment remarks into
//! display tags.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod remarks;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("School Ledger tracing initialized.");
    });
}
