// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide default logger.
//!
//! Messages that no thread-local override consumes are offered to the
//! default logger, and failing that, printed to the console.  The slot is
//! meant to be set once at startup; replacing it later is allowed but
//! in-flight messages may still reach the previous logger.
//!
//! ```
//! use richlog::MemoryLogger;
//! use richlog::global_logger::{global_default_logger, set_global_default_logger};
//! use std::sync::Arc;
//!
//! let logger = MemoryLogger::new();
//! set_global_default_logger(Some(Arc::new(logger.clone())));
//! assert!(global_default_logger().is_some());
//! set_global_default_logger(None);
//! ```
//!
//! # Implementation notes
//!
//! The slot is guarded by the crate's spinlock.  The lock is held only to
//! clone or swap the `Arc`; the logger itself runs after the lock is
//! released, so it may log or even replace itself.

use crate::logger::Logger;
use crate::message::MessageRef;
use crate::spinlock::SpinRwLock;
use std::sync::Arc;

/// A logger that may be shared between threads.
pub type SharedLogger = Arc<dyn Logger + Send + Sync>;

static GLOBAL_DEFAULT_LOGGER: SpinRwLock<Option<SharedLogger>> = SpinRwLock::new(None);

/// Installs (or with `None`, removes) the default logger and returns the
/// previous one.
pub fn set_global_default_logger(logger: Option<SharedLogger>) -> Option<SharedLogger> {
    std::mem::replace(&mut *GLOBAL_DEFAULT_LOGGER.write(), logger)
}

pub fn global_default_logger() -> Option<SharedLogger> {
    GLOBAL_DEFAULT_LOGGER.read().clone()
}

pub(crate) fn offer_to_global_logger(message: &MessageRef<'_>, break_on_log: &mut bool) -> bool {
    match global_default_logger() {
        Some(logger) => logger.log(message, break_on_log),
        None => false,
    }
}

/// Serializes unit tests that touch the default logger.
#[cfg(test)]
pub(crate) static TEST_LOGGER_GUARD: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn set_and_replace() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let logger: SharedLogger = Arc::new(move |_: &MessageRef<'_>, _: &mut bool| {
            counter.fetch_add(1, Ordering::Relaxed);
            true
        });
        let original = set_global_default_logger(Some(logger));

        let message = MessageRef {
            timestamp: std::time::SystemTime::UNIX_EPOCH,
            location: crate::location!(),
            domain: &crate::domains::Default::DOMAIN,
            verbosity: crate::Verbosity::Info,
            thread_name: "",
            message: "m",
        };
        let mut brk = false;
        assert!(offer_to_global_logger(&message, &mut brk));
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert!(set_global_default_logger(original).is_some());
    }
}
