// SPDX-License-Identifier: MIT OR Apache-2.0

use super::*;
use std::ffi::CString;
use std::fmt::Display;

struct Vec3 {
    x: i32,
    y: i32,
    z: i32,
}

impl Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn format(fmt: &str, args: &[Arg<'_>]) -> String {
    format_to_string(fmt, args)
}

#[test]
fn generic_placeholder_uses_default_specifier() {
    assert_eq!(
        format("value: %k", &[Arg::I32(42)]),
        format("value: %d", &[Arg::I32(42)])
    );
    assert_eq!(format("%k", &[Arg::F64(0.5)]), "0.500000");
    assert_eq!(format("%k", &[Arg::F32(0.5)]), "0.5000");
    assert_eq!(format("%k", &[Arg::Bool(true)]), "1");
    assert_eq!(format("%k", &[Arg::Char('é')]), "é");
    assert_eq!(format("%k", &[Arg::I64(-1 << 40)]), "-1099511627776");
    assert_eq!(format("%k", &[Arg::U64(u64::MAX)]), "18446744073709551615");
}

#[test]
fn display_arguments_are_stringified() {
    let v = Vec3 { x: 1, y: -2, z: 3 };
    let manual = v.to_string();
    assert_eq!(
        format("at %k", &[Arg::Display(&v)]),
        format("at %s", &[Arg::Str(&manual)])
    );
    assert_eq!(format("at %k", &[Arg::Display(&v)]), "at (1, -2, 3)");
}

#[test]
fn display_arguments_honor_width_and_precision() {
    let v = Vec3 { x: 1, y: 2, z: 3 };
    assert_eq!(format("[%12s]", &[Arg::Display(&v)]), "[   (1, 2, 3)]");
    assert_eq!(format("[%-4.2s]", &[Arg::Display(&v)]), "[(1  ]");
}

#[test]
fn legacy_braces_placeholder() {
    assert_eq!(format("{} + {} = %k", &[Arg::I32(1), Arg::I32(2), Arg::I32(3)]), "1 + 2 = 3");
}

#[test]
fn percent_escapes() {
    assert_eq!(format("100%%", &[]), "100%");
    assert_eq!(format("%% fatal %%", &[]), "% fatal %");
    assert_eq!(format("%%k", &[]), "%k");
}

#[test]
fn star_width_and_precision() {
    assert_eq!(format("[%*d]", &[Arg::I32(5), Arg::I32(42)]), "[   42]");
    assert_eq!(format("[%*d]", &[Arg::I32(-5), Arg::I32(42)]), "[42   ]");
    assert_eq!(
        format("[%.*f]", &[Arg::I32(2), Arg::F64(3.14159)]),
        "[3.14]"
    );
    assert_eq!(format("[%.*s]", &[Arg::I32(-1), Arg::Str("abc")]), "[abc]");
}

#[test]
fn strings() {
    let owned = CString::new("c string").unwrap();
    assert_eq!(format("%s", &[Arg::CStr(&owned)]), "c string");
    assert_eq!(format("%.3s|%5s|%-5s|", &[Arg::Str("abcdef"), Arg::Str("ab"), Arg::Str("ab")]), "abc|   ab|ab   |");
    assert_eq!(format("%c%c", &[Arg::Char('o'), Arg::U8(b'k')]), "ok");
}

#[test]
fn chars_are_written_as_utf8() {
    // width still counts bytes, as for %s
    assert_eq!(format("[%c|%3c|%k]", &[Arg::Char('é'), Arg::Char('é'), Arg::Char('é')]), "[é| é|é]");
    assert_eq!(format("%c", &[Arg::Char('€')]).as_bytes(), "€".as_bytes());
}

#[test]
fn numeric_argument_with_string_specifier() {
    assert_eq!(format("%s", &[Arg::I32(12)]), "12");
    assert_eq!(format("%4s", &[Arg::F32(1.5)]), "1.5000");
}

#[test]
fn truncation_reports_full_length() {
    let mut buf = [0xffu8; 6];
    let len = try_format_into(&mut buf, "hello %k", &[Arg::Str("world")]).unwrap();
    assert_eq!(len, 11);
    assert_eq!(&buf, b"hello\0");
}

#[test]
fn truncation_inside_a_number() {
    let mut buf = [0xffu8; 4];
    let len = try_format_into(&mut buf, "%d", &[Arg::I32(123456)]).unwrap();
    assert_eq!(len, 6);
    assert_eq!(&buf, b"123\0");
}

#[test]
fn empty_output_buffer() {
    let len = try_format_into(&mut [], "abc %d", &[Arg::I32(7)]).unwrap();
    assert_eq!(len, 5);
}

#[test]
fn non_finite_floats() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let text = format("%k", &[Arg::F64(value)]);
        assert!(!text.is_empty());
        assert!(text.contains("nan") || text.contains("inf"), "{text}");
    }
}

#[test]
fn long_output_goes_to_the_heap() {
    let long = "x".repeat(10_000);
    let text = format("<%k>", &[Arg::Str(&long)]);
    assert_eq!(text.len(), 10_002);
    assert!(text.starts_with("<x") && text.ends_with("x>"));
}

#[test]
fn arity_errors() {
    let mut buf = [0u8; 32];
    assert_eq!(
        try_format_into(&mut buf, "%k %k", &[Arg::I32(1)]),
        Err(FormatError::TooFewArguments { supplied: 1 })
    );
    assert_eq!(
        try_format_into(&mut buf, "%k", &[Arg::I32(1), Arg::I32(2)]),
        Err(FormatError::TooManyArguments {
            supplied: 2,
            unused: 1
        })
    );
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "cannot format")]
fn arity_mismatch_panics_in_debug() {
    let mut buf = [0u8; 32];
    format_into(&mut buf, "%k and %k", &[Arg::I32(1)]);
}

#[test]
fn scratch_overflow() {
    let big = "y".repeat(FORMAT_BUFFER_SIZE);
    let display: &dyn Display = &big;
    let mut buf = [0u8; 16];
    assert!(matches!(
        try_format_into(&mut buf, "%k", &[Arg::Display(display)]),
        Err(FormatError::ScratchOverflow { .. })
    ));
}

#[test]
fn unknown_conversions_are_copied() {
    assert_eq!(format("%y", &[Arg::I32(1)]), "%y");
}

#[test]
fn matches_libc_for_a_few_specifiers() {
    fn c(fmt: &str, value: libc::c_int) -> String {
        let fmt = CString::new(fmt).unwrap();
        let mut buf = [0u8; 64];
        let n = unsafe {
            libc::snprintf(buf.as_mut_ptr().cast(), buf.len(), fmt.as_ptr(), value)
        };
        String::from_utf8(buf[..n as usize].to_vec()).unwrap()
    }
    for fmt in ["%d", "%+5d", "%-8x|", "%#o", "%08X", "% i", "%.3d"] {
        for value in [0, -1, i32::MIN, i32::MAX, 255] {
            assert_eq!(format(fmt, &[Arg::I32(value)]), c(fmt, value), "{fmt} {value}");
        }
    }
}

#[test]
fn macros_classify_arguments() {
    let v = Vec3 { x: 0, y: 0, z: 1 };
    let s = String::from("s");
    let text = crate::format_printf!("%k %k %k %k %.2f", 1u8, s, v, 'c', 2.0f64);
    assert_eq!(text, "1 s (0, 0, 1) c 2.00");

    let mut buf = [0u8; 8];
    let len = crate::snprintf!(&mut buf, "%k-%k", -3i64, true);
    assert_eq!(&buf[..len], b"-3-1");
}
