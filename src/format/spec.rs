// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of a single printf conversion specifier.
//!
//! A specifier run is `%`, then optional flags, width, precision and length
//! modifier, terminated by a conversion character.  The same parser drives
//! both the format rewriter (which only counts argument slots) and the
//! renderer (which needs every field).

/// Flag characters, as a bitset.
pub(crate) const FLAG_LEFT: u8 = 1 << 0;
pub(crate) const FLAG_PLUS: u8 = 1 << 1;
pub(crate) const FLAG_SPACE: u8 = 1 << 2;
pub(crate) const FLAG_ALT: u8 = 1 << 3;
pub(crate) const FLAG_ZERO: u8 = 1 << 4;
pub(crate) const FLAG_GROUP: u8 = 1 << 5;

/// Width or precision of a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Count {
    Unset,
    Fixed(usize),
    /// `*`: taken from the next argument.
    FromArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Length {
    None,
    Hh,
    H,
    L,
    Ll,
    J,
    Z,
    T,
    /// `L`, long double for floats and long long for integers.
    BigL,
}

impl Length {
    pub(crate) fn text(self) -> &'static [u8] {
        match self {
            Length::None | Length::BigL => b"",
            Length::Hh => b"hh",
            Length::H => b"h",
            Length::L => b"l",
            Length::Ll => b"ll",
            Length::J => b"j",
            Length::Z => b"z",
            Length::T => b"t",
        }
    }
}

/// A parsed specifier.  `len` is the number of bytes of the run, including
/// the leading `%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Spec {
    pub(crate) flags: u8,
    pub(crate) width: Count,
    pub(crate) precision: Count,
    pub(crate) length: Length,
    /// `None` when the format string ends inside the run.
    pub(crate) conversion: Option<u8>,
    pub(crate) len: usize,
}

const MAX_FIELD: usize = i32::MAX as usize;

fn parse_digits(bytes: &[u8], cursor: &mut usize) -> usize {
    let mut value: usize = 0;
    while let Some(&b) = bytes.get(*cursor) {
        if !b.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(b - b'0'))
            .min(MAX_FIELD);
        *cursor += 1;
    }
    value
}

impl Spec {
    /// Parses the run starting at `bytes[0]`, which must be `%`.
    pub(crate) fn parse(bytes: &[u8]) -> Spec {
        debug_assert_eq!(bytes.first(), Some(&b'%'));
        let mut cursor = 1;

        let mut flags = 0;
        while let Some(&b) = bytes.get(cursor) {
            let flag = match b {
                b'-' => FLAG_LEFT,
                b'+' => FLAG_PLUS,
                b' ' => FLAG_SPACE,
                b'#' => FLAG_ALT,
                b'0' => FLAG_ZERO,
                b'\'' => FLAG_GROUP,
                _ => break,
            };
            flags |= flag;
            cursor += 1;
        }

        let width = if bytes.get(cursor) == Some(&b'*') {
            cursor += 1;
            Count::FromArg
        } else if bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            Count::Fixed(parse_digits(bytes, &mut cursor))
        } else {
            Count::Unset
        };

        let precision = if bytes.get(cursor) == Some(&b'.') {
            cursor += 1;
            if bytes.get(cursor) == Some(&b'*') {
                cursor += 1;
                Count::FromArg
            } else {
                Count::Fixed(parse_digits(bytes, &mut cursor))
            }
        } else {
            Count::Unset
        };

        let length = match (bytes.get(cursor), bytes.get(cursor + 1)) {
            (Some(b'h'), Some(b'h')) => {
                cursor += 2;
                Length::Hh
            }
            (Some(b'l'), Some(b'l')) => {
                cursor += 2;
                Length::Ll
            }
            (Some(b'h'), _) => {
                cursor += 1;
                Length::H
            }
            (Some(b'l'), _) => {
                cursor += 1;
                Length::L
            }
            (Some(b'q'), _) => {
                cursor += 1;
                Length::Ll
            }
            (Some(b'j'), _) => {
                cursor += 1;
                Length::J
            }
            (Some(b'z'), _) => {
                cursor += 1;
                Length::Z
            }
            (Some(b't'), _) => {
                cursor += 1;
                Length::T
            }
            (Some(b'L'), _) => {
                cursor += 1;
                Length::BigL
            }
            _ => Length::None,
        };

        let conversion = bytes.get(cursor).copied();
        if conversion.is_some() {
            cursor += 1;
        }

        Spec {
            flags,
            width,
            precision,
            length,
            conversion,
            len: cursor,
        }
    }

    /// How many positional arguments this specifier consumes.
    pub(crate) fn argument_slots(&self) -> usize {
        let converts = match self.conversion {
            None | Some(b'%') => 0,
            Some(_) => 1,
        };
        if converts == 0 {
            return 0;
        }
        let stars = usize::from(self.width == Count::FromArg)
            + usize::from(self.precision == Count::FromArg);
        stars + converts
    }

    pub(crate) fn has_flag(&self, flag: u8) -> bool {
        self.flags & flag != 0
    }
}

pub(crate) fn is_signed_conversion(c: u8) -> bool {
    matches!(c, b'd' | b'i')
}

pub(crate) fn is_unsigned_conversion(c: u8) -> bool {
    matches!(c, b'u' | b'o' | b'x' | b'X')
}

pub(crate) fn is_float_conversion(c: u8) -> bool {
    matches!(c, b'f' | b'F' | b'e' | b'E' | b'g' | b'G' | b'a' | b'A')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_conversion() {
        let spec = Spec::parse(b"%d rest");
        assert_eq!(spec.conversion, Some(b'd'));
        assert_eq!(spec.len, 2);
        assert_eq!(spec.argument_slots(), 1);
    }

    #[test]
    fn full_run() {
        let spec = Spec::parse(b"%-+08.3llx");
        assert!(spec.has_flag(FLAG_LEFT));
        assert!(spec.has_flag(FLAG_PLUS));
        assert!(spec.has_flag(FLAG_ZERO));
        assert_eq!(spec.width, Count::Fixed(8));
        assert_eq!(spec.precision, Count::Fixed(3));
        assert_eq!(spec.length, Length::Ll);
        assert_eq!(spec.conversion, Some(b'x'));
        assert_eq!(spec.len, 10);
    }

    #[test]
    fn star_fields_consume_arguments() {
        assert_eq!(Spec::parse(b"%*d").argument_slots(), 2);
        assert_eq!(Spec::parse(b"%*.*f").argument_slots(), 3);
        assert_eq!(Spec::parse(b"%.f").precision, Count::Fixed(0));
    }

    #[test]
    fn unterminated_run() {
        let spec = Spec::parse(b"%5");
        assert_eq!(spec.conversion, None);
        assert_eq!(spec.len, 2);
        assert_eq!(spec.argument_slots(), 0);
    }

    #[test]
    fn percent_after_flags_is_literal() {
        assert_eq!(Spec::parse(b"%-%").argument_slots(), 0);
    }
}
