// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of format arguments.
//!
//! Every argument of a formatting call becomes an [`Arg`].  Types the C
//! formatter understands natively implement [`PrintfArg`] and keep their
//! value; any other [`Display`] type is carried by reference and stringified
//! only when the formatter reaches it.

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::fmt::{Debug, Display};

/// One positional argument.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Ptr(*const ()),
    Str(&'a str),
    CStr(&'a CStr),
    /// Stringified on consumption.
    Display(&'a dyn Display),
}

impl<'a> Arg<'a> {
    /// The specifier a generic `%k` placeholder becomes for this argument, or
    /// `None` if the argument is stringified and printed with `%s`.
    pub const fn default_specifier(&self) -> Option<&'static str> {
        Some(match self {
            Arg::Char(_) => "%c",
            Arg::Bool(_) => "%d",
            Arg::F32(_) => "%.4f",
            Arg::F64(_) => "%.6f",
            Arg::I8(_) | Arg::I16(_) | Arg::I32(_) => "%d",
            Arg::I64(_) | Arg::Isize(_) => "%lld",
            Arg::U8(_) | Arg::U16(_) | Arg::U32(_) => "%u",
            Arg::U64(_) | Arg::Usize(_) => "%llu",
            Arg::Str(_) | Arg::CStr(_) => "%s",
            Arg::Ptr(_) => "%p",
            Arg::Display(_) => return None,
        })
    }

    /// The argument as integer bits, as C would read it from a register.
    /// `None` for textual arguments.
    pub(crate) fn integer_bits(&self) -> Option<u64> {
        Some(match *self {
            Arg::Bool(v) => u64::from(v),
            Arg::Char(v) => u64::from(v),
            Arg::I8(v) => v as i64 as u64,
            Arg::I16(v) => v as i64 as u64,
            Arg::I32(v) => v as i64 as u64,
            Arg::I64(v) => v as u64,
            Arg::Isize(v) => v as i64 as u64,
            Arg::U8(v) => u64::from(v),
            Arg::U16(v) => u64::from(v),
            Arg::U32(v) => u64::from(v),
            Arg::U64(v) => v,
            Arg::Usize(v) => v as u64,
            Arg::F32(v) => v as i64 as u64,
            Arg::F64(v) => v as i64 as u64,
            Arg::Ptr(v) => v as usize as u64,
            Arg::Str(_) | Arg::CStr(_) | Arg::Display(_) => return None,
        })
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        Some(match *self {
            Arg::F32(v) => f64::from(v),
            Arg::F64(v) => v,
            Arg::I8(v) => f64::from(v),
            Arg::I16(v) => f64::from(v),
            Arg::I32(v) => f64::from(v),
            Arg::I64(v) => v as f64,
            Arg::Isize(v) => v as f64,
            Arg::U8(v) => f64::from(v),
            Arg::U16(v) => f64::from(v),
            Arg::U32(v) => f64::from(v),
            Arg::U64(v) => v as f64,
            Arg::Usize(v) => v as f64,
            Arg::Bool(v) => f64::from(u8::from(v)),
            Arg::Char(v) => f64::from(u32::from(v)),
            Arg::Ptr(v) => v as usize as f64,
            Arg::Str(_) | Arg::CStr(_) | Arg::Display(_) => return None,
        })
    }

    pub(crate) fn as_pointer(&self) -> *const () {
        match *self {
            Arg::Ptr(p) => p,
            Arg::Str(s) => s.as_ptr().cast(),
            Arg::CStr(s) => s.as_ptr().cast(),
            Arg::Display(d) => std::ptr::from_ref(d).cast(),
            _ => self.integer_bits().unwrap_or(0) as usize as *const (),
        }
    }

    /// Whether the value reaches the renderer as bytes rather than a number.
    pub(crate) fn is_textual(&self) -> bool {
        matches!(self, Arg::Str(_) | Arg::CStr(_) | Arg::Display(_))
    }
}

impl Debug for Arg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Arg::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Arg::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Arg::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Arg::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Arg::Isize(v) => f.debug_tuple("Isize").field(v).finish(),
            Arg::U8(v) => f.debug_tuple("U8").field(v).finish(),
            Arg::U16(v) => f.debug_tuple("U16").field(v).finish(),
            Arg::U32(v) => f.debug_tuple("U32").field(v).finish(),
            Arg::U64(v) => f.debug_tuple("U64").field(v).finish(),
            Arg::Usize(v) => f.debug_tuple("Usize").field(v).finish(),
            Arg::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Arg::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Arg::Ptr(v) => f.debug_tuple("Ptr").field(v).finish(),
            Arg::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Arg::CStr(v) => f.debug_tuple("CStr").field(v).finish(),
            Arg::Display(v) => f.debug_tuple("Display").field(&v.to_string()).finish(),
        }
    }
}

/*
Boilerplate notes.

# Arg

Copy, since it is a handful of words that borrow from the caller.
No PartialEq: Display payloads have no meaningful equality, and float equality would surprise.
No Default.
Not Send or Sync, because of the raw pointer.  Args never leave the formatting call.
*/

/// A type the C formatter understands directly.
///
/// Implemented for the primitive numeric types, `bool`, `char`, raw
/// pointers and string types.  String types hand over their backing text
/// without copying.
pub trait PrintfArg {
    fn to_printf_arg(&self) -> Arg<'_>;
}

macro_rules! printf_arg_by_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PrintfArg for $ty {
                #[inline]
                fn to_printf_arg(&self) -> Arg<'_> {
                    Arg::$variant(*self)
                }
            }
        )*
    };
}

printf_arg_by_value! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl PrintfArg for str {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl PrintfArg for String {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Str(self.as_str())
    }
}

impl PrintfArg for Box<str> {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Str(self)
    }
}

impl PrintfArg for Cow<'_, str> {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Str(self.as_ref())
    }
}

impl PrintfArg for CStr {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::CStr(self)
    }
}

impl PrintfArg for CString {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::CStr(self.as_c_str())
    }
}

impl<T: ?Sized> PrintfArg for *const T {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Ptr(self.cast::<()>())
    }
}

impl<T: ?Sized> PrintfArg for *mut T {
    fn to_printf_arg(&self) -> Arg<'_> {
        Arg::Ptr(self.cast_const().cast::<()>())
    }
}

impl<T: PrintfArg + ?Sized> PrintfArg for &T {
    fn to_printf_arg(&self) -> Arg<'_> {
        (**self).to_printf_arg()
    }
}

impl<T: PrintfArg + ?Sized> PrintfArg for &mut T {
    fn to_printf_arg(&self) -> Arg<'_> {
        (**self).to_printf_arg()
    }
}

/// Picks the [`Arg`] variant for a macro argument.
///
/// Method resolution prefers [`NativeKind`] (implemented on `Wrap`) over
/// [`DisplayKind`] (implemented on `&Wrap`), so a type that is both
/// [`PrintfArg`] and [`Display`] keeps its native representation.  Macros
/// call `(&Wrap(&value)).printf_arg()` with both traits in scope.
#[doc(hidden)]
pub mod kind {
    use super::{Arg, PrintfArg};
    use std::fmt::Display;

    pub struct Wrap<'a, T: ?Sized>(pub &'a T);

    pub trait NativeKind<'a> {
        fn printf_arg(&self) -> Arg<'a>;
    }

    impl<'a, T: PrintfArg + ?Sized> NativeKind<'a> for Wrap<'a, T> {
        #[inline]
        fn printf_arg(&self) -> Arg<'a> {
            PrintfArg::to_printf_arg(self.0)
        }
    }

    pub trait DisplayKind<'a> {
        fn printf_arg(&self) -> Arg<'a>;
    }

    impl<'a, T: Display> DisplayKind<'a> for &Wrap<'a, T> {
        #[inline]
        fn printf_arg(&self) -> Arg<'a> {
            Arg::Display(self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::kind::{DisplayKind as _, NativeKind as _, Wrap};
    use super::*;

    struct Meters(u32);
    impl Display for Meters {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}m", self.0)
        }
    }

    #[test]
    fn default_specifiers() {
        assert_eq!(Arg::Char('x').default_specifier(), Some("%c"));
        assert_eq!(Arg::Bool(true).default_specifier(), Some("%d"));
        assert_eq!(Arg::F32(1.0).default_specifier(), Some("%.4f"));
        assert_eq!(Arg::F64(1.0).default_specifier(), Some("%.6f"));
        assert_eq!(Arg::I16(1).default_specifier(), Some("%d"));
        assert_eq!(Arg::Isize(1).default_specifier(), Some("%lld"));
        assert_eq!(Arg::U8(1).default_specifier(), Some("%u"));
        assert_eq!(Arg::Usize(1).default_specifier(), Some("%llu"));
        assert_eq!(Arg::Str("").default_specifier(), Some("%s"));
        assert_eq!(Arg::Ptr(std::ptr::null()).default_specifier(), Some("%p"));
        assert_eq!(Arg::Display(&Meters(1)).default_specifier(), None);
    }

    #[test]
    fn autoref_prefers_native() {
        let n = 7u16;
        assert!(matches!((&Wrap(&n)).printf_arg(), Arg::U16(7)));
        let s = String::from("text");
        assert!(matches!((&Wrap(&s)).printf_arg(), Arg::Str("text")));
        let r: &str = "borrowed";
        assert!(matches!((&Wrap(&r)).printf_arg(), Arg::Str("borrowed")));
        let m = Meters(3);
        assert!(matches!((&Wrap(&m)).printf_arg(), Arg::Display(_)));
    }

    #[test]
    fn integer_bits_sign_extend() {
        assert_eq!(Arg::I8(-1).integer_bits(), Some(u64::MAX));
        assert_eq!(Arg::U8(255).integer_bits(), Some(255));
        assert_eq!(Arg::Str("x").integer_bits(), None);
    }
}
