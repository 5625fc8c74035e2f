// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of a rewritten format string.
//!
//! Numeric conversions are handed to the platform `snprintf` one specifier
//! at a time, with the argument converted to exactly the C type the
//! specifier's length modifier names.  That keeps the output byte-identical
//! to C without ever passing C a mismatched variadic argument.  Text
//! conversions (`%s`, `%c`) are rendered here with C semantics.

use super::FormatError;
use super::arg::Arg;
use super::spec::{
    self, Count, FLAG_ALT, FLAG_GROUP, FLAG_LEFT, FLAG_PLUS, FLAG_SPACE, FLAG_ZERO, Length, Spec,
};
use libc::{
    c_char, c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong, c_void, intmax_t, ptrdiff_t,
    size_t, ssize_t, uintmax_t,
};
use std::fmt::{Display, Write as _};

/// A bounded, NUL-terminated output buffer that still counts everything it
/// could not store, like `snprintf`'s return value.
pub(crate) struct Output<'a> {
    buf: &'a mut [u8],
    written: usize,
    total: usize,
}

impl<'a> Output<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        Output {
            buf,
            written: 0,
            total: 0,
        }
    }

    fn room(&self) -> usize {
        self.buf.len().saturating_sub(1).saturating_sub(self.written)
    }

    pub(crate) fn push(&mut self, bytes: &[u8]) {
        let n = bytes.len().min(self.room());
        self.buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;
        self.total += bytes.len();
    }

    fn pad(&mut self, byte: u8, count: usize) {
        let n = count.min(self.room());
        self.buf[self.written..self.written + n].fill(byte);
        self.written += n;
        self.total += count;
    }

    /// Runs `snprintf(remainder, spec, value)`.  `spec` must be NUL-terminated.
    fn c_format(&mut self, spec: &[u8], value: CValue) {
        debug_assert_eq!(spec.last(), Some(&0));
        let remainder = &mut self.buf[self.written..];
        let capacity = remainder.len();
        let dst: *mut c_char = if capacity == 0 {
            std::ptr::null_mut()
        } else {
            remainder.as_mut_ptr().cast()
        };
        let fmt: *const c_char = spec.as_ptr().cast();
        // SAFETY: `dst` is null with a zero size or points to `capacity`
        // writable bytes; `fmt` is a NUL-terminated single specifier whose
        // length modifier matches the C type of the one variadic argument.
        let n = unsafe {
            match value {
                CValue::Int(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::UInt(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::Long(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::ULong(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::LongLong(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::ULongLong(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::IntMax(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::UIntMax(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::Size(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::SSize(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::PtrDiff(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::Double(v) => libc::snprintf(dst, capacity, fmt, v),
                CValue::Ptr(v) => libc::snprintf(dst, capacity, fmt, v),
            }
        };
        // a negative return is an encoding error, which cannot happen for
        // numeric conversions; count it as nothing written
        let n = usize::try_from(n).unwrap_or(0);
        self.written += n.min(capacity.saturating_sub(1));
        self.total += n;
    }

    /// Terminates the buffer and returns the untruncated length.
    pub(crate) fn finish(self) -> usize {
        if let Some(last) = self.buf.len().checked_sub(1) {
            self.buf[self.written.min(last)] = 0;
        }
        self.total
    }
}

#[derive(Debug, Clone, Copy)]
enum CValue {
    Int(c_int),
    UInt(c_uint),
    Long(c_long),
    ULong(c_ulong),
    LongLong(c_longlong),
    ULongLong(c_ulonglong),
    IntMax(intmax_t),
    UIntMax(uintmax_t),
    Size(size_t),
    SSize(ssize_t),
    PtrDiff(ptrdiff_t),
    Double(f64),
    Ptr(*const c_void),
}

/// Width and precision after `*` arguments have been read.
#[derive(Debug, Clone, Copy, Default)]
struct Resolved {
    width: usize,
    left: bool,
    precision: Option<usize>,
}

/// A single specifier as C text, NUL-terminated.
struct CSpec {
    buf: [u8; 64],
    len: usize,
}

impl std::fmt::Write for CSpec {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        let dst = self.buf.get_mut(self.len..end).ok_or(std::fmt::Error)?;
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl CSpec {
    fn build(spec: &Spec, resolved: &Resolved, length: &[u8], conversion: u8) -> CSpec {
        let mut text = CSpec {
            buf: [0; 64],
            len: 0,
        };
        // every piece is bounded (six flags, two ten-digit numbers, a
        // two-byte length), so the fixed buffer always suffices
        let _ = text.write_char('%');
        for (flag, c) in [
            (FLAG_LEFT, '-'),
            (FLAG_PLUS, '+'),
            (FLAG_SPACE, ' '),
            (FLAG_ALT, '#'),
            (FLAG_ZERO, '0'),
            (FLAG_GROUP, '\''),
        ] {
            if spec.has_flag(flag) || (flag == FLAG_LEFT && resolved.left) {
                let _ = text.write_char(c);
            }
        }
        if resolved.width > 0 {
            let _ = write!(text, "{}", resolved.width);
        }
        if let Some(precision) = resolved.precision {
            let _ = write!(text, ".{precision}");
        }
        for &b in length.iter().chain([conversion, 0].iter()) {
            let _ = text.write_char(char::from(b));
        }
        text
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

fn integer_value(bits: u64, signed: bool, length: Length) -> (CValue, &'static [u8]) {
    let s = bits as i64;
    let value = match length {
        Length::None | Length::Hh | Length::H => {
            if signed {
                CValue::Int(s as c_int)
            } else {
                CValue::UInt(bits as c_uint)
            }
        }
        Length::L => {
            if signed {
                CValue::Long(s as c_long)
            } else {
                CValue::ULong(bits as c_ulong)
            }
        }
        Length::Ll | Length::BigL => {
            if signed {
                CValue::LongLong(s as c_longlong)
            } else {
                CValue::ULongLong(bits as c_ulonglong)
            }
        }
        Length::J => {
            if signed {
                CValue::IntMax(s as intmax_t)
            } else {
                CValue::UIntMax(bits as uintmax_t)
            }
        }
        Length::Z => {
            if signed {
                CValue::SSize(s as ssize_t)
            } else {
                CValue::Size(bits as size_t)
            }
        }
        Length::T => CValue::PtrDiff(s as ptrdiff_t),
    };
    let text = match length {
        Length::BigL => Length::Ll.text(),
        other => other.text(),
    };
    (value, text)
}

struct ScratchWriter<'s> {
    buf: &'s mut [u8],
    len: usize,
    overflowed: bool,
}

impl std::fmt::Write for ScratchWriter<'_> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        let Some(dst) = self.buf.get_mut(self.len..end) else {
            self.overflowed = true;
            return Err(std::fmt::Error);
        };
        dst.copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Stringifies `value` into `scratch`, returning the length used.
fn stringify(value: &dyn Display, scratch: &mut [u8]) -> Result<usize, FormatError> {
    let capacity = scratch.len();
    let mut writer = ScratchWriter {
        buf: scratch,
        len: 0,
        overflowed: false,
    };
    // a Display impl that fails on its own keeps what it wrote so far
    let _ = write!(writer, "{value}");
    if writer.overflowed {
        return Err(FormatError::ScratchOverflow { capacity });
    }
    Ok(writer.len)
}

fn write_padded(out: &mut Output<'_>, resolved: &Resolved, bytes: &[u8]) {
    let padding = resolved.width.saturating_sub(bytes.len());
    if resolved.left {
        out.push(bytes);
        out.pad(b' ', padding);
    } else {
        out.pad(b' ', padding);
        out.push(bytes);
    }
}

/// `%s`: text ends at the first NUL, precision counts bytes.
fn write_text(out: &mut Output<'_>, resolved: &Resolved, text: &[u8]) {
    let text = text
        .iter()
        .position(|&b| b == 0)
        .map_or(text, |end| &text[..end]);
    let shown = match resolved.precision {
        Some(precision) => &text[..precision.min(text.len())],
        None => text,
    };
    write_padded(out, resolved, shown);
}

/// Renders `arg` as text.  Numeric arguments are rendered with their default
/// specifier first.
fn render_as_text(
    out: &mut Output<'_>,
    resolved: &Resolved,
    arg: &Arg<'_>,
    scratch: &mut [u8],
) -> Result<(), FormatError> {
    match *arg {
        Arg::Str(s) => write_text(out, resolved, s.as_bytes()),
        Arg::CStr(s) => write_text(out, resolved, s.to_bytes()),
        Arg::Display(d) => {
            let len = stringify(d, scratch)?;
            write_text(out, resolved, &scratch[..len]);
        }
        _ => {
            // wide enough for any f64 with "%.6f"
            let mut digits = [0u8; 400];
            let mut tmp = Output::new(&mut digits);
            if let Some(default) = arg.default_specifier() {
                let spec = Spec::parse(default.as_bytes());
                render_native(&mut tmp, &spec, &Resolved::from_fixed(&spec), arg);
            }
            let len = tmp.finish().min(digits.len() - 1);
            write_text(out, resolved, &digits[..len]);
        }
    }
    Ok(())
}

impl Resolved {
    fn from_fixed(spec: &Spec) -> Resolved {
        Resolved {
            width: match spec.width {
                Count::Fixed(w) => w,
                _ => 0,
            },
            left: spec.has_flag(FLAG_LEFT),
            precision: match spec.precision {
                Count::Fixed(p) => Some(p),
                _ => None,
            },
        }
    }
}

/// Renders a numeric, pointer or character conversion of a non-textual
/// argument.
fn render_native(out: &mut Output<'_>, spec: &Spec, resolved: &Resolved, arg: &Arg<'_>) {
    let Some(conversion) = spec.conversion else {
        return;
    };
    if spec::is_signed_conversion(conversion) || spec::is_unsigned_conversion(conversion) {
        let bits = arg.integer_bits().unwrap_or(0);
        let (value, length) =
            integer_value(bits, spec::is_signed_conversion(conversion), spec.length);
        out.c_format(
            CSpec::build(spec, resolved, length, conversion).as_bytes(),
            value,
        );
    } else if spec::is_float_conversion(conversion) {
        let value = arg.as_f64().unwrap_or(0.0);
        out.c_format(
            CSpec::build(spec, resolved, b"", conversion).as_bytes(),
            CValue::Double(value),
        );
    } else if conversion == b'p' {
        out.c_format(
            CSpec::build(spec, resolved, b"", b'p').as_bytes(),
            CValue::Ptr(arg.as_pointer().cast()),
        );
    } else if conversion == b'c' {
        // a Rust char is written whole, not truncated to one byte
        match *arg {
            Arg::Char(c) => write_padded(out, resolved, c.encode_utf8(&mut [0; 4]).as_bytes()),
            _ => {
                let byte = arg.integer_bits().unwrap_or(0) as u8;
                write_padded(out, resolved, &[byte]);
            }
        }
    }
}

fn next_arg<'x, 'a>(args: &'x [Arg<'a>], next: &mut usize) -> Result<&'x Arg<'a>, FormatError> {
    let arg = args
        .get(*next)
        .ok_or(FormatError::TooFewArguments { supplied: args.len() })?;
    *next += 1;
    Ok(arg)
}

fn star_value(arg: &Arg<'_>) -> i32 {
    // C reads `*` arguments as int
    arg.integer_bits().map_or(0, |bits| bits as i64 as i32)
}

/// Renders `fmt` (already free of generic placeholders) with `args` into
/// `out`.  `scratch` receives stringified arguments.
pub(crate) fn render(
    out: &mut Output<'_>,
    fmt: &[u8],
    args: &[Arg<'_>],
    scratch: &mut [u8],
) -> Result<(), FormatError> {
    let mut next = 0;
    let mut i = 0;
    while i < fmt.len() {
        let literal_end = fmt[i..]
            .iter()
            .position(|&b| b == b'%')
            .map_or(fmt.len(), |p| i + p);
        if literal_end > i {
            out.push(&fmt[i..literal_end]);
            i = literal_end;
            continue;
        }
        if fmt.get(i + 1) == Some(&b'%') {
            out.push(b"%");
            i += 2;
            continue;
        }

        let spec = Spec::parse(&fmt[i..]);
        let raw = &fmt[i..i + spec.len];
        i += spec.len;
        let conversion = match spec.conversion {
            None => {
                out.push(raw);
                continue;
            }
            Some(b'%') => {
                out.push(b"%");
                continue;
            }
            Some(c) => c,
        };

        let mut resolved = Resolved::from_fixed(&spec);
        if spec.width == Count::FromArg {
            let width = star_value(next_arg(args, &mut next)?);
            resolved.left |= width < 0;
            resolved.width = width.unsigned_abs() as usize;
        }
        if spec.precision == Count::FromArg {
            let precision = star_value(next_arg(args, &mut next)?);
            resolved.precision = usize::try_from(precision).ok();
        }
        let arg = next_arg(args, &mut next)?;

        match conversion {
            b's' => render_as_text(out, &resolved, arg, scratch)?,
            b'n' => {}
            b'c' | b'p' => {
                if arg.is_textual() && conversion == b'c' {
                    render_as_text(out, &resolved, arg, scratch)?;
                } else {
                    render_native(out, &spec, &resolved, arg);
                }
            }
            c if spec::is_signed_conversion(c)
                || spec::is_unsigned_conversion(c)
                || spec::is_float_conversion(c) =>
            {
                if arg.is_textual() {
                    // precision means something else for numbers
                    let text = Resolved {
                        precision: None,
                        ..resolved
                    };
                    render_as_text(out, &text, arg, scratch)?;
                } else {
                    render_native(out, &spec, &resolved, arg);
                }
            }
            _ => out.push(raw),
        }
    }
    Ok(())
}
