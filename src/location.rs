// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-site descriptors.
//!
//! Every logging macro expansion owns one `static` [`Location`].  Besides
//! identifying the call site it carries the little mutable state a call site
//! needs: whether a debugger break was requested for it.  Cooldowns keep
//! their own state in a [`Cooldown`](crate::rate_limit::Cooldown).

use std::sync::atomic::{AtomicBool, Ordering};

/// A logging call site.
#[derive(Debug)]
pub struct Location {
    module_path: &'static str,
    file: &'static str,
    line: u32,
    break_once: AtomicBool,
    break_always: AtomicBool,
}

impl Location {
    /// Usually you want [`location!`](crate::location!) instead.
    pub const fn new(module_path: &'static str, file: &'static str, line: u32) -> Self {
        Location {
            module_path,
            file,
            line,
            break_once: AtomicBool::new(false),
            break_always: AtomicBool::new(false),
        }
    }

    /// The enclosing module.  Rust has no stable way to name the enclosing
    /// function, so this stands in for it.
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Requests a break the next time this call site dispatches a message.
    pub fn request_break_once(&self) {
        self.break_once.store(true, Ordering::Relaxed);
    }

    /// Requests a break on every message from this call site.
    pub fn set_break_always(&self, enabled: bool) {
        self.break_always.store(enabled, Ordering::Relaxed);
    }

    /// Reads (and clears the one-shot part of) the break request.
    pub(crate) fn take_break_request(&self) -> bool {
        let once = self.break_once.swap(false, Ordering::Relaxed);
        once || self.break_always.load(Ordering::Relaxed)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Creates a `&'static Location` for the current call site.
///
/// ```
/// let here = richlog::location!();
/// assert_eq!(here.file(), file!());
/// ```
#[macro_export]
macro_rules! location {
    () => {{
        static LOCATION: $crate::Location =
            $crate::Location::new(::std::module_path!(), ::std::file!(), ::std::line!());
        &LOCATION
    }};
}
