// SPDX-License-Identifier: MIT OR Apache-2.0

//! From a log call to the loggers.
//!
//! The macros evaluate the cheap gates inline (compile-time minimum, domain
//! verbosity, rate limiter) and call [`dispatch`] only for messages that
//! pass.  Dispatching then
//!
//! 1. formats the message into a stack buffer, or an exact-size heap buffer
//!    when it does not fit, so messages are never truncated,
//! 2. drops messages of whitelisted domains the whitelist filter rejects,
//! 3. offers the message to the thread's override stack, innermost first,
//!    then to the global default logger, then prints it to the console,
//! 4. runs the break hook if the message still requests a break.

use crate::debug_break;
use crate::domain::Domain;
use crate::experimental;
use crate::format::{Arg, try_format_into};
use crate::global_logger;
use crate::local_logger;
use crate::location::Location;
use crate::message::MessageRef;
use crate::thread_name;
use crate::verbosity::Verbosity;
use std::time::SystemTime;

/// Messages up to this many bytes are formatted without allocating.
pub const MESSAGE_BUFFER_SIZE: usize = 4096;

/// Who consumed a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// A logger on the thread's override stack.
    Local,
    /// The global default logger.
    GlobalDefault,
    /// Nobody; the message was printed to the console.
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchOutcome {
    pub consumed_by: Route,
    /// Whether the break hook ran.
    pub break_requested: bool,
}

/// Formats into `out`.  A malformed call is a bug at the call site: debug
/// builds panic, release builds log the raw format string.
fn format_message(location: &Location, out: &mut [u8], fmt: &str, args: &[Arg<'_>]) -> usize {
    match try_format_into(out, fmt, args) {
        Ok(len) => len,
        Err(err) => {
            if cfg!(debug_assertions) {
                panic!("invalid log call at {location}: {err}");
            }
            let len = fmt.len().min(out.len().saturating_sub(1));
            out[..len].copy_from_slice(&fmt.as_bytes()[..len]);
            fmt.len()
        }
    }
}

/// Formats and routes one message, skipping the verbosity and rate-limit
/// gates.  Returns `None` if the whitelist filter dropped the message.
///
/// ```
/// use richlog::dispatch::{Route, dispatch_message};
/// use richlog::format::Arg;
/// use richlog::{MemoryLogger, Verbosity, domains, scoped_logger_override};
///
/// let logger = MemoryLogger::new();
/// let _guard = scoped_logger_override(logger.clone());
/// let outcome = dispatch_message(
///     richlog::location!(),
///     domains::Default::domain(),
///     Verbosity::Debug,
///     "%k + %k",
///     &[Arg::I32(1), Arg::I32(2)],
/// )
/// .unwrap();
/// assert_eq!(outcome.consumed_by, Route::Local);
/// assert_eq!(logger.drain_logs(), "1 + 2");
/// ```
pub fn dispatch_message(
    location: &Location,
    domain: &Domain,
    verbosity: Verbosity,
    fmt: &str,
    args: &[Arg<'_>],
) -> Option<DispatchOutcome> {
    let timestamp = SystemTime::now();
    let mut buffer = [0u8; MESSAGE_BUFFER_SIZE];
    let len = format_message(location, &mut buffer, fmt, args);
    if len < buffer.len() {
        return route(location, domain, verbosity, timestamp, &buffer[..len]);
    }
    let mut heap = vec![0u8; len + 1];
    let len = format_message(location, &mut heap, fmt, args).min(heap.len() - 1);
    route(location, domain, verbosity, timestamp, &heap[..len])
}

fn route(
    location: &Location,
    domain: &Domain,
    verbosity: Verbosity,
    timestamp: SystemTime,
    text: &[u8],
) -> Option<DispatchOutcome> {
    let text = String::from_utf8_lossy(text);
    if !experimental::passes_whitelist(domain, &text) {
        return None;
    }

    // both sides evaluated: the one-shot request is consumed either way
    let mut break_on_log =
        debug_break::verbosity_requests_break(verbosity) | location.take_break_request();

    let outcome = thread_name::with_current_thread_name(|thread_name| {
        let message = MessageRef {
            timestamp,
            location,
            domain,
            verbosity,
            thread_name,
            message: &text,
        };
        let consumed_by = if local_logger::offer_to_local_loggers(&message, &mut break_on_log) {
            Route::Local
        } else if global_logger::offer_to_global_logger(&message, &mut break_on_log) {
            Route::GlobalDefault
        } else {
            crate::console::default_logger(&message, &mut break_on_log);
            Route::Console
        };
        if break_on_log {
            debug_break::trigger_break(&message);
        }
        DispatchOutcome {
            consumed_by,
            break_requested: break_on_log,
        }
    });
    Some(outcome)
}

/// Entry point of the logging macros.
#[doc(hidden)]
#[inline(never)]
pub fn dispatch(
    location: &'static Location,
    domain: &'static Domain,
    verbosity: Verbosity,
    fmt: &'static str,
    args: &[Arg<'_>],
) {
    let _ = dispatch_message(location, domain, verbosity, fmt, args);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global_logger::TEST_LOGGER_GUARD;
    use crate::{MemoryLogger, domains, scoped_logger_override};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dispatch_text(verbosity: Verbosity, location: &Location, text: &'static str) -> DispatchOutcome {
        dispatch_message(location, domains::Default::domain(), verbosity, text, &[]).unwrap()
    }

    #[test]
    fn routes_to_the_innermost_override() {
        let outer = MemoryLogger::new();
        let inner = MemoryLogger::new();
        let _outer = scoped_logger_override(outer.clone());
        let _inner = scoped_logger_override(inner.clone());
        let outcome = dispatch_text(Verbosity::Info, crate::location!(), "hello");
        assert_eq!(outcome.consumed_by, Route::Local);
        assert_eq!(inner.drain_logs(), "hello");
        assert!(outer.is_empty());
    }

    #[test]
    fn pass_through_logger_falls_back_to_global() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let global = MemoryLogger::new();
        let previous = global_logger::set_global_default_logger(Some(Arc::new(global.clone())));
        let local = MemoryLogger::pass_through();
        let _local = scoped_logger_override(local.clone());

        let outcome = dispatch_text(Verbosity::Info, crate::location!(), "both");
        assert_eq!(outcome.consumed_by, Route::GlobalDefault);
        assert_eq!(local.drain_logs(), "both");
        assert_eq!(global.drain_logs(), "both");

        global_logger::set_global_default_logger(previous);
    }

    #[test]
    fn long_messages_are_not_truncated() {
        let logger = MemoryLogger::new();
        let _guard = scoped_logger_override(logger.clone());
        let long = "z".repeat(3 * MESSAGE_BUFFER_SIZE);
        dispatch_message(
            crate::location!(),
            domains::Default::domain(),
            Verbosity::Info,
            "[%k]",
            &[Arg::Str(&long)],
        );
        let messages = logger.drain_messages();
        assert_eq!(messages[0].message.len(), long.len() + 2);
    }

    #[test]
    fn break_policy_and_logger_override() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let previous_hook = debug_break::set_break_hook(Some(Arc::new(move |_: &MessageRef<'_>| {
            counter.fetch_add(1, Ordering::Relaxed);
        })));

        {
            let _capture = scoped_logger_override(MemoryLogger::new());
            assert!(!dispatch_text(Verbosity::Error, crate::location!(), "e").break_requested);
            assert!(dispatch_text(Verbosity::Fatal, crate::location!(), "f").break_requested);
        }
        assert_eq!(hits.load(Ordering::Relaxed), 1);

        {
            // a logger may veto the break
            let _veto = scoped_logger_override(|_: &MessageRef<'_>, brk: &mut bool| {
                *brk = false;
                true
            });
            assert!(!dispatch_text(Verbosity::Fatal, crate::location!(), "f").break_requested);
        }
        {
            // or request one
            let _ask = scoped_logger_override(|_: &MessageRef<'_>, brk: &mut bool| {
                *brk = true;
                true
            });
            assert!(dispatch_text(Verbosity::Info, crate::location!(), "i").break_requested);
        }
        assert_eq!(hits.load(Ordering::Relaxed), 2);

        debug_break::set_break_hook(previous_hook);
    }

    #[test]
    fn call_site_break_requests() {
        let _guard = TEST_LOGGER_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let previous_hook = debug_break::set_break_hook(Some(Arc::new(|_: &MessageRef<'_>| {})));
        let _capture = scoped_logger_override(MemoryLogger::new());
        let here = crate::location!();

        here.request_break_once();
        assert!(dispatch_text(Verbosity::Info, here, "1").break_requested);
        assert!(!dispatch_text(Verbosity::Info, here, "2").break_requested);

        here.set_break_always(true);
        assert!(dispatch_text(Verbosity::Info, here, "3").break_requested);
        assert!(dispatch_text(Verbosity::Info, here, "4").break_requested);
        here.set_break_always(false);
        assert!(!dispatch_text(Verbosity::Info, here, "5").break_requested);

        debug_break::set_break_hook(previous_hook);
    }

    #[test]
    fn reentrant_logging_from_a_logger() {
        let inner = MemoryLogger::new();
        let _bottom = scoped_logger_override(inner.clone());
        let _top = scoped_logger_override(|message: &MessageRef<'_>, _: &mut bool| {
            if message.message == "outer" {
                // the top logger sees this too, and ignores it
                crate::log!("inner");
                true
            } else {
                false
            }
        });
        dispatch_text(Verbosity::Info, crate::location!(), "outer");
        assert_eq!(inner.drain_logs(), "inner");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid log call")]
    fn malformed_call_panics_in_debug() {
        let _capture = scoped_logger_override(MemoryLogger::new());
        dispatch_message(
            crate::location!(),
            domains::Default::domain(),
            Verbosity::Info,
            "%k %k",
            &[Arg::I32(1)],
        );
    }
}
