// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
A printf-compatible formatter with a generic placeholder.

Format strings use C printf syntax plus `%k`, which means "the natural
specifier for this argument" (`%d` for an `i32`, `%.6f` for an `f64`, `%s`
for a string, and so on).  Types that are not C-printable but implement
[`Display`](std::fmt::Display) are accepted too; they are stringified into a
scratch region when the formatter reaches them.

```
let name = "world";
let mut buf = [0u8; 64];
let len = richlog::snprintf!(&mut buf, "hello %k, %5.1f%% done, %k items", name, 42.5f64, 3u32);
assert_eq!(&buf[..len], b"hello world,  42.5% done, 3 items");
assert_eq!(buf[len], 0);
```

Formatting happens in two passes.  [`rewrite`] replaces generic placeholders
by native specifiers in a stack buffer of [`FORMAT_BUFFER_SIZE`] bytes, and
the renderer then walks the rewritten text.  Each native numeric specifier is
passed to the platform `snprintf` on its own, so numbers come out exactly as
C would print them.

The argument count must match the format string.  With the macros this is
checked at compile time; [`format_into`] asserts it in debug builds and
prints the raw format string in release builds.
*/

mod arg;
mod printf;
pub mod rewrite;
mod spec;

#[cfg(test)]
mod tests;

pub use arg::{Arg, PrintfArg, kind};
pub use rewrite::{GENERIC_SPECIFIER, count_argument_slots, rewrite_format, rewrite_format_with};

use printf::Output;

/// Size of the stack buffer holding the rewritten format string.  The part
/// not used by the format string is the scratch region for stringified
/// arguments.
pub const FORMAT_BUFFER_SIZE: usize = 4096;

/// A format string that does not fit its arguments, or exceeds a fixed
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("the format string needs more arguments than the {supplied} supplied")]
    TooFewArguments { supplied: usize },
    #[error("{unused} of {supplied} arguments are not used by the format string")]
    TooManyArguments { supplied: usize, unused: usize },
    #[error("the rewritten format string exceeds {capacity} bytes")]
    FormatTooLong { capacity: usize },
    #[error("a stringified argument exceeds the {capacity} byte scratch region")]
    ScratchOverflow { capacity: usize },
}

/// Formats into `out`.
///
/// Writes at most `out.len() - 1` bytes plus a NUL terminator (nothing at all
/// if `out` is empty) and returns the length the complete output would have.
pub fn try_format_into(out: &mut [u8], fmt: &str, args: &[Arg<'_>]) -> Result<usize, FormatError> {
    let mut buffer = [0u8; FORMAT_BUFFER_SIZE];
    let rewritten_len = rewrite_format_with(&mut buffer, fmt, args.len(), |i| {
        args.get(i).and_then(Arg::default_specifier)
    })?;
    let (rewritten, scratch) = buffer.split_at_mut(rewritten_len);
    let mut output = Output::new(out);
    printf::render(&mut output, rewritten, args, scratch)?;
    Ok(output.finish())
}

/// Like [`try_format_into`], for callers that guarantee a well-formed call.
///
/// # Panics
///
/// In debug builds, if the format string does not match the arguments.
/// Release builds write the format string itself instead.
pub fn format_into(out: &mut [u8], fmt: &str, args: &[Arg<'_>]) -> usize {
    match try_format_into(out, fmt, args) {
        Ok(len) => len,
        Err(err) => {
            if cfg!(debug_assertions) {
                panic!("cannot format {fmt:?}: {err}");
            }
            let mut output = Output::new(out);
            output.push(fmt.as_bytes());
            output.finish()
        }
    }
}

/// Formats into a new `String`.  Invalid UTF-8 (e.g. from a cut `%.3s`) is
/// replaced.
pub fn format_to_string(fmt: &str, args: &[Arg<'_>]) -> String {
    let mut stack = [0u8; 256];
    let len = format_into(&mut stack, fmt, args);
    if len < stack.len() {
        return String::from_utf8_lossy(&stack[..len]).into_owned();
    }
    let mut heap = vec![0u8; len + 1];
    let len = format_into(&mut heap, fmt, args);
    heap.truncate(len);
    match String::from_utf8(heap) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}
