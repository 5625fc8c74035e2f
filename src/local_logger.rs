// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-thread stack of overriding loggers.
//!
//! A logger pushed here sees every message of the current thread before the
//! global default logger does.  Pushes nest: the most recent logger is asked
//! first and, if it consumes the message, the older ones never see it.
//!
//! Prefer [`scoped_logger_override`], which pops its entry when the guard
//! goes out of scope:
//!
//! ```
//! use richlog::{MemoryLogger, scoped_logger_override};
//!
//! let outer = MemoryLogger::new();
//! let _outer_guard = scoped_logger_override(outer.clone());
//! {
//!     let inner = MemoryLogger::new();
//!     let _inner_guard = scoped_logger_override(inner.clone());
//!     richlog::log!("only the inner logger sees this");
//!     assert_eq!(inner.messages().len(), 1);
//! }
//! richlog::log!("back to the outer one");
//! assert_eq!(outer.drain_messages()[0].message, "back to the outer one");
//! ```

use crate::logger::{Logger, LoggerId};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::Rc;

type Entry = (LoggerId, Rc<dyn Logger>);

thread_local! {
    static STACK: RefCell<Vec<Entry>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// Pushes `logger` on top of this thread's stack.
pub fn push_local_logger<L: Logger + 'static>(logger: L) -> LoggerId {
    let id = NEXT_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        LoggerId(id)
    });
    STACK.with_borrow_mut(|stack| stack.push((id, Rc::new(logger))));
    id
}

/// Pops the top of this thread's stack.
///
/// # Panics
///
/// In debug builds, if the stack is empty.  Release builds log a warning
/// instead.
pub fn pop_local_logger() {
    let popped = STACK.with_borrow_mut(Vec::pop);
    if popped.is_none() {
        if cfg!(debug_assertions) {
            panic!("pop_local_logger called on an empty logger stack");
        }
        crate::warning!("pop_local_logger called on an empty logger stack");
    }
}

/// Number of loggers on this thread's stack.
pub fn local_logger_depth() -> usize {
    STACK.with_borrow(Vec::len)
}

/// Removes the entry `id`, wherever it is.  Returns whether it was found.
fn remove_local_logger(id: LoggerId) -> bool {
    // the entry is dropped after the borrow ends, in case its drop logs
    let removed = STACK.with_borrow_mut(|stack| {
        stack
            .iter()
            .rposition(|(entry, _)| *entry == id)
            .map(|index| stack.remove(index))
    });
    removed.is_some()
}

/// Offers the message to this thread's loggers, innermost first.  Returns
/// whether one consumed it.
///
/// Each logger is cloned out of the stack before it runs, so loggers may log,
/// push or pop themselves.
pub(crate) fn offer_to_local_loggers(
    message: &crate::MessageRef<'_>,
    break_on_log: &mut bool,
) -> bool {
    let mut index = local_logger_depth();
    while index > 0 {
        index -= 1;
        let Some(logger) = STACK.with_borrow(|stack| stack.get(index).map(|(_, l)| l.clone()))
        else {
            // a logger popped entries below us; continue from the new top
            index = local_logger_depth();
            continue;
        };
        if logger.log(message, break_on_log) {
            return true;
        }
    }
    false
}

/// Pushes `logger` and returns a guard that pops it again.
///
/// Guards should be dropped in reverse order of creation, which scoping does
/// naturally.  A guard dropped out of order removes its own entry and leaves
/// the others in place.
pub fn scoped_logger_override<L: Logger + 'static>(logger: L) -> ScopedLoggerOverride {
    ScopedLoggerOverride {
        id: push_local_logger(logger),
        _not_send: PhantomData,
    }
}

/// Returned by [`scoped_logger_override`].
#[must_use = "the override is removed when this guard is dropped"]
#[derive(Debug)]
pub struct ScopedLoggerOverride {
    id: LoggerId,
    // the entry lives on this thread's stack
    _not_send: PhantomData<*const ()>,
}

impl ScopedLoggerOverride {
    pub fn id(&self) -> LoggerId {
        self.id
    }
}

impl Drop for ScopedLoggerOverride {
    fn drop(&mut self) {
        let removed = remove_local_logger(self.id);
        debug_assert!(removed, "scoped logger override was already popped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageRef;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: Rc<RefCell<Vec<&'static str>>>, name: &'static str, consume: bool) -> impl Logger {
        move |_: &MessageRef<'_>, _: &mut bool| {
            log.borrow_mut().push(name);
            consume
        }
    }

    fn message() -> MessageRef<'static> {
        MessageRef {
            timestamp: std::time::SystemTime::UNIX_EPOCH,
            location: crate::location!(),
            domain: &crate::domains::Default::DOMAIN,
            verbosity: crate::Verbosity::Info,
            thread_name: "",
            message: "m",
        }
    }

    #[test]
    fn innermost_first_and_stops_at_consumer() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _a = scoped_logger_override(recorder(seen.clone(), "a", true));
        let _b = scoped_logger_override(recorder(seen.clone(), "b", false));
        let mut brk = false;
        assert!(offer_to_local_loggers(&message(), &mut brk));
        assert_eq!(*seen.borrow(), ["b", "a"]);
    }

    #[test]
    fn guards_pop_in_scope_order() {
        let before = local_logger_depth();
        {
            let _a = scoped_logger_override(|_: &MessageRef<'_>, _: &mut bool| true);
            let _b = scoped_logger_override(|_: &MessageRef<'_>, _: &mut bool| true);
            assert_eq!(local_logger_depth(), before + 2);
        }
        assert_eq!(local_logger_depth(), before);
    }

    #[test]
    fn out_of_order_drop_removes_its_own_entry() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = scoped_logger_override(recorder(seen.clone(), "a", false));
        let b = scoped_logger_override(recorder(seen.clone(), "b", false));
        drop(a);
        let mut brk = false;
        assert!(!offer_to_local_loggers(&message(), &mut brk));
        assert_eq!(*seen.borrow(), ["b"]);
        drop(b);
    }

    #[test]
    fn explicit_push_pop() {
        let before = local_logger_depth();
        push_local_logger(|_: &MessageRef<'_>, _: &mut bool| false);
        assert_eq!(local_logger_depth(), before + 1);
        pop_local_logger();
        assert_eq!(local_logger_depth(), before);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "empty logger stack")]
    fn popping_empty_stack_panics_in_debug() {
        // fresh thread-local state: tests run on their own threads
        pop_local_logger();
    }

    #[test]
    fn logger_can_pop_itself() {
        let before = local_logger_depth();
        push_local_logger(|_: &MessageRef<'_>, _: &mut bool| {
            pop_local_logger();
            false
        });
        let mut brk = false;
        offer_to_local_loggers(&message(), &mut brk);
        assert_eq!(local_logger_depth(), before);
    }
}
