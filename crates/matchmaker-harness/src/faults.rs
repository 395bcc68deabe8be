//! Process-wide fault observer.
//!
//! A single, process-lifetime hook that logs faults escaping the normal
//! control flow and then lets the previous hook run. It is an
//! observability sink only: scenario pass/fail is decided by the executor,
//! never here, and a logged fault cannot be attributed to a specific
//! scenario.

use std::sync::Once;

/// Fixed prefix on every logged fault
pub const FAULT_LOG_PREFIX: &str = "got unhandled fault:";

static INSTALL: Once = Once::new();

/// Install the fault observer. Safe to call more than once; only the first
/// call takes effect.
pub fn install_fault_observer() {
    INSTALL.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());

            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown location".to_string());

            tracing::error!("{} {} (at {})", FAULT_LOG_PREFIX, message, location);

            previous(info);
        }));
    });
}
