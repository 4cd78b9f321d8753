//! Core infrastructure: shared enumerations, constants, error handling and
//! the diagnostics channel used for non-fatal signals.
//!
//! - [`types`]: method and policy enumerations
//! - [`constants`]: defaults and numeric tolerances
//! - [`error`]: the crate error type
//! - [`diagnostics`]: observable data-quality and fallback signals

pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod types;

pub use constants::*;
pub use diagnostics::{Diagnosed, Diagnostic, Diagnostics, Severity};
pub use error::{OneRError, Result};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();
static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the `env_logger` backend once, defaulting the filter to `info`
/// when `RUST_LOG` is unset. Safe to call repeatedly.
pub fn initialize_core() -> Result<()> {
    LOGGING_INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("info");
        // Another logger may already be installed by the host application.
        let _ = env_logger::Builder::from_env(env).try_init();
        INITIALIZED.store(true, Ordering::SeqCst);
        log::debug!("oner {} initialized", ONER_RUST_VERSION);
    });
    Ok(())
}

/// Check if [`initialize_core`] has run
pub fn is_core_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
