// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewriting generic placeholders into native printf specifiers.
//!
//! `%k` (and the legacy `{}`) stands for "whatever specifier suits the
//! argument".  The rewriter replaces each one with the default specifier of
//! the argument it lines up with, or `%s` for arguments that will be
//! stringified, and leaves native specifiers alone.
//!
//! ```
//! let mut out = [0u8; 64];
//! let len = richlog::format::rewrite_format(
//!     &mut out,
//!     "%k apples, %5.2f kg, %k",
//!     &[Some("%d"), Some("%f"), None],
//! )
//! .unwrap();
//! assert_eq!(&out[..len], b"%d apples, %5.2f kg, %s");
//! ```

use super::FormatError;
use super::spec::Spec;

/// The conversion character of the generic placeholder.
pub const GENERIC_SPECIFIER: u8 = b'k';

struct Rewritten<'a> {
    out: &'a mut [u8],
    len: usize,
}

impl Rewritten<'_> {
    fn push(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let end = self.len + bytes.len();
        let Some(dst) = self.out.get_mut(self.len..end) else {
            return Err(FormatError::FormatTooLong {
                capacity: self.out.len(),
            });
        };
        dst.copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }
}

fn is_generic(bytes: &[u8], at: usize) -> bool {
    matches!(
        (bytes.get(at), bytes.get(at + 1)),
        (Some(b'%'), Some(&GENERIC_SPECIFIER)) | (Some(b'{'), Some(b'}'))
    )
}

/// Splits `fmt` into literal runs, generic placeholders and native
/// specifiers.
fn walk<F>(fmt: &[u8], mut on_token: F) -> Result<(), FormatError>
where
    F: FnMut(Token<'_>) -> Result<(), FormatError>,
{
    let mut i = 0;
    while i < fmt.len() {
        if is_generic(fmt, i) {
            on_token(Token::Generic)?;
            i += 2;
        } else if fmt[i] == b'%' {
            if fmt.get(i + 1) == Some(&b'%') {
                on_token(Token::Literal(b"%%"))?;
                i += 2;
            } else {
                let spec = Spec::parse(&fmt[i..]);
                on_token(Token::Native {
                    text: &fmt[i..i + spec.len],
                    slots: spec.argument_slots(),
                })?;
                i += spec.len;
            }
        } else {
            let run = fmt[i..]
                .iter()
                .position(|&b| b == b'%' || b == b'{')
                .map_or(fmt.len(), |p| i + p.max(1));
            on_token(Token::Literal(&fmt[i..run]))?;
            i = run;
        }
    }
    Ok(())
}

enum Token<'a> {
    Literal(&'a [u8]),
    Generic,
    Native { text: &'a [u8], slots: usize },
}

/// Rewrites `fmt` into `out`, returning the rewritten length.
///
/// `default_specifier(i)` is the default specifier of argument `i`, or `None`
/// if it must be stringified.  No terminator is written.
pub fn rewrite_format_with<'s, F>(
    out: &mut [u8],
    fmt: &str,
    num_args: usize,
    default_specifier: F,
) -> Result<usize, FormatError>
where
    F: Fn(usize) -> Option<&'s str>,
{
    let mut rewritten = Rewritten { out, len: 0 };
    let mut next_arg = 0;
    walk(fmt.as_bytes(), |token| match token {
        Token::Literal(text) => rewritten.push(text),
        Token::Generic => {
            if next_arg >= num_args {
                return Err(FormatError::TooFewArguments { supplied: num_args });
            }
            let spec = default_specifier(next_arg).unwrap_or("%s");
            next_arg += 1;
            rewritten.push(spec.as_bytes())
        }
        Token::Native { text, slots } => {
            next_arg += slots;
            if next_arg > num_args {
                return Err(FormatError::TooFewArguments { supplied: num_args });
            }
            rewritten.push(text)
        }
    })?;
    if next_arg < num_args {
        return Err(FormatError::TooManyArguments {
            supplied: num_args,
            unused: num_args - next_arg,
        });
    }
    Ok(rewritten.len)
}

/// [`rewrite_format_with`] for a slice of default specifiers.
pub fn rewrite_format(
    out: &mut [u8],
    fmt: &str,
    default_specifiers: &[Option<&str>],
) -> Result<usize, FormatError> {
    rewrite_format_with(out, fmt, default_specifiers.len(), |i| {
        default_specifiers.get(i).copied().flatten()
    })
}

/// How many arguments `fmt` expects: one per placeholder or specifier, plus
/// one per `*` width or precision.
pub fn count_argument_slots(fmt: &str) -> usize {
    let mut slots = 0;
    let _ = walk(fmt.as_bytes(), |token| {
        match token {
            Token::Literal(_) => {}
            Token::Generic => slots += 1,
            Token::Native { slots: n, .. } => slots += n,
        }
        Ok(())
    });
    slots
}
