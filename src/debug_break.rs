// SPDX-License-Identifier: MIT OR Apache-2.0

//! Breaking into a debugger on log messages.
//!
//! After a message has been routed, the dispatcher runs the break hook if the
//! message asked for a break.  A message asks for one when its verbosity
//! reaches the break minimum ([`Verbosity::Fatal`] by default), when its call
//! site requested one (see [`Location::request_break_once`](crate::Location::request_break_once)),
//! or when a logger set the flag.  Loggers may also clear it.
//!
//! The default hook raises `SIGTRAP` when a debugger is attached and does
//! nothing otherwise, so a program run outside a debugger is not killed.

use crate::message::MessageRef;
use crate::spinlock::SpinRwLock;
use crate::verbosity::Verbosity;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Called when a dispatched message requests a break.
pub type BreakHook = Arc<dyn Fn(&MessageRef<'_>) + Send + Sync>;

const NEVER: u8 = u8::MAX;

static BREAK_MIN: AtomicU8 = AtomicU8::new(Verbosity::Fatal as u8);
static BREAK_HOOK: SpinRwLock<Option<BreakHook>> = SpinRwLock::new(None);

/// Messages at or above `verbosity` request a break.  `None` turns the
/// policy off; call-site requests and loggers still work.
pub fn set_break_on_log_minimum_verbosity(verbosity: Option<Verbosity>) {
    BREAK_MIN.store(verbosity.map_or(NEVER, |v| v as u8), Ordering::Relaxed);
}

pub fn break_on_log_minimum_verbosity() -> Option<Verbosity> {
    Verbosity::from_u8(BREAK_MIN.load(Ordering::Relaxed))
}

pub(crate) fn verbosity_requests_break(verbosity: Verbosity) -> bool {
    verbosity as u8 >= BREAK_MIN.load(Ordering::Relaxed)
}

/// Replaces the break hook.  `None` restores the default.  Returns the
/// previous custom hook.
pub fn set_break_hook(hook: Option<BreakHook>) -> Option<BreakHook> {
    std::mem::replace(&mut *BREAK_HOOK.write(), hook)
}

pub(crate) fn trigger_break(message: &MessageRef<'_>) {
    let hook = BREAK_HOOK.read().clone();
    match hook {
        Some(hook) => hook(message),
        None => default_break(),
    }
}

fn default_break() {
    if debugger_attached() {
        // SAFETY: raising a signal has no memory-safety preconditions
        unsafe {
            libc::raise(libc::SIGTRAP);
        }
    }
}

/// Whether a tracer (debugger) is attached to this process.
///
/// Only Linux is detected, via `TracerPid` in `/proc/self/status`; other
/// platforms report `false`.
pub fn debugger_attached() -> bool {
    #[cfg(target_os = "linux")]
    {
        let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
            return false;
        };
        status
            .lines()
            .find_map(|line| line.strip_prefix("TracerPid:"))
            .is_some_and(|pid| pid.trim() != "0")
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_logger::TEST_LOGGER_GUARD;

    #[test]
    fn policy_threshold() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        assert!(verbosity_requests_break(Verbosity::Fatal));
        assert!(!verbosity_requests_break(Verbosity::Error));

        set_break_on_log_minimum_verbosity(Some(Verbosity::Warning));
        assert!(verbosity_requests_break(Verbosity::Error));
        assert_eq!(break_on_log_minimum_verbosity(), Some(Verbosity::Warning));

        set_break_on_log_minimum_verbosity(None);
        assert!(!verbosity_requests_break(Verbosity::Fatal));
        assert_eq!(break_on_log_minimum_verbosity(), None);

        set_break_on_log_minimum_verbosity(Some(Verbosity::Fatal));
    }

    #[test]
    fn custom_hook_replaces_default() {
        use std::sync::atomic::AtomicUsize;

        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let previous = set_break_hook(Some(Arc::new(move |_: &MessageRef<'_>| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));
        let message = MessageRef {
            timestamp: std::time::SystemTime::UNIX_EPOCH,
            location: crate::location!(),
            domain: &crate::domains::Default::DOMAIN,
            verbosity: Verbosity::Fatal,
            thread_name: "",
            message: "m",
        };
        trigger_break(&message);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        set_break_hook(previous);
    }
}
