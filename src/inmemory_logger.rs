// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Logger
//!
//! [`MemoryLogger`] keeps messages instead of printing them, which makes it
//! the tool of choice for asserting on log output in tests:
//!
//! ```rust
//! use richlog::{MemoryLogger, Verbosity, scoped_logger_override};
//!
//! let logger = MemoryLogger::new();
//! let _guard = scoped_logger_override(logger.clone());
//!
//! richlog::warning!("disk at %k%%", 93u8);
//!
//! let messages = logger.drain_messages();
//! assert_eq!(messages.len(), 1);
//! assert_eq!(messages[0].message, "disk at 93%");
//! assert_eq!(messages[0].verbosity, Verbosity::Warning);
//! ```
//!
//! Clones share one buffer, so a clone can be handed to the logger stack (or
//! the global slot) while the test keeps another to inspect.

use crate::logger::Logger;
use crate::message::{MessageRef, OwnedMessage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A logger that stores messages in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    messages: Arc<Mutex<Vec<OwnedMessage>>>,
    pass_through: bool,
}

// ============================================================================
// BOILERPLATE TRAIT IMPLEMENTATIONS
// ============================================================================
//
// - Clone: shares the buffer, which is the point of cloning a capture logger
// - Default: an empty buffer that consumes messages
// - PartialEq/Eq/Hash: NOT implemented, equality of a shared buffer is unclear
// - Send/Sync: automatic through Arc<Mutex<_>>, so it also fits the global slot

impl MemoryLogger {
    /// A logger that consumes what it captures.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that captures messages but lets them continue to the next
    /// logger.
    pub fn pass_through() -> Self {
        MemoryLogger {
            pass_through: true,
            ..Self::default()
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<OwnedMessage>> {
        // a panicking test thread must not hide the messages from the others
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A copy of everything captured so far.
    pub fn messages(&self) -> Vec<OwnedMessage> {
        self.lock().clone()
    }

    /// Takes everything captured so far.
    pub fn drain_messages(&self) -> Vec<OwnedMessage> {
        std::mem::take(&mut *self.lock())
    }

    /// The captured message texts joined by newlines, clearing the buffer.
    pub fn drain_logs(&self) -> String {
        let messages = self.drain_messages();
        let texts: Vec<&str> = messages.iter().map(|m| m.message.as_str()).collect();
        texts.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &MessageRef<'_>, _break_on_log: &mut bool) -> bool {
        let owned = message.to_owned_message();
        self.lock().push(owned);
        !self.pass_through
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Verbosity, domains};

    fn message(text: &str) -> MessageRef<'_> {
        MessageRef {
            timestamp: std::time::SystemTime::UNIX_EPOCH,
            location: crate::location!(),
            domain: &domains::Default::DOMAIN,
            verbosity: Verbosity::Info,
            thread_name: "t",
            message: text,
        }
    }

    #[test]
    fn clones_share_the_buffer() {
        let logger = MemoryLogger::new();
        let clone = logger.clone();
        let mut brk = false;
        assert!(clone.log(&message("one"), &mut brk));
        assert!(clone.log(&message("two"), &mut brk));
        assert_eq!(logger.len(), 2);
        assert_eq!(logger.drain_logs(), "one\ntwo");
        assert!(logger.is_empty());
    }

    #[test]
    fn pass_through_does_not_consume() {
        let logger = MemoryLogger::pass_through();
        let mut brk = false;
        assert!(!logger.log(&message("x"), &mut brk));
        assert_eq!(logger.messages()[0].message, "x");
    }
}
