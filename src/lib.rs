#![doc(test(attr(deny(warnings))))]

//! Field Service tracks ministry time for a publisher: logged entries, carries
//! between months, goals across the service year, monthly reports, reminders,
//! and zip backups.

pub mod backup;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod intro;
pub mod reminder;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Field Service tracing initialized.");
    });
}
