// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-thread display names for log messages.
//!
//! Names are short labels such as `"render"` or `"worker 3"`, capped at
//! [`MAX_THREAD_NAME_LEN`] bytes.  A thread that never sets one uses its
//! `std::thread` name, if any.

use std::cell::RefCell;

/// Longest thread name kept, in bytes.
pub const MAX_THREAD_NAME_LEN: usize = 31;

thread_local! {
    static THREAD_NAME: RefCell<Option<String>> = const { RefCell::new(None) };
}

fn truncate(name: &str) -> &str {
    if name.len() <= MAX_THREAD_NAME_LEN {
        return name;
    }
    let mut end = MAX_THREAD_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Sets (or with `None`, clears) the current thread's name.  Longer names
/// are cut on a character boundary.
pub fn set_current_thread_name(name: Option<&str>) {
    let name = name.map(|n| truncate(n).to_string());
    THREAD_NAME.with_borrow_mut(|slot| *slot = name);
}

/// Calls `f` with the current thread's name, or `""`.
pub(crate) fn with_current_thread_name<R>(f: impl FnOnce(&str) -> R) -> R {
    let mut copy = [0u8; MAX_THREAD_NAME_LEN];
    let len = THREAD_NAME.with_borrow(|slot| match slot {
        Some(name) => copy_into(&mut copy, name),
        None => copy_into(&mut copy, std::thread::current().name().unwrap_or("")),
    });
    // the copy lets `f` log or rename the thread
    f(std::str::from_utf8(&copy[..len]).unwrap_or(""))
}

fn copy_into(dst: &mut [u8; MAX_THREAD_NAME_LEN], name: &str) -> usize {
    let name = truncate(name);
    dst[..name.len()].copy_from_slice(name.as_bytes());
    name.len()
}

pub fn current_thread_name() -> String {
    with_current_thread_name(str::to_string)
}

/// Sets the current thread's name from a printf-style format.
///
/// ```
/// richlog::set_thread_name!("worker %k", 3u32);
/// assert_eq!(richlog::current_thread_name(), "worker 3");
/// ```
#[macro_export]
macro_rules! set_thread_name {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        let name = $crate::format_printf!($fmt $(, $arg)*);
        $crate::set_current_thread_name(::std::option::Option::Some(&name));
    }};
}
