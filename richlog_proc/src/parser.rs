//SPDX-License-Identifier: MIT OR Apache-2.0

/// Decodes the source text of a string literal (`"..."` or `r#"..."#`).
///
/// Returns `None` for anything else, e.g. byte strings or numbers.
pub fn decode_string_literal(source: &str) -> Option<String> {
    if let Some(raw) = source.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw[hashes..].strip_prefix('"')?;
        let body = body.strip_suffix(&"#".repeat(hashes))?;
        return body.strip_suffix('"').map(str::to_string);
    }
    let body = source.strip_prefix('"')?.strip_suffix('"')?;
    unescape(body)
}

fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                let value = u8::from_str_radix(&hex, 16).ok()?;
                out.push(char::from(value));
            }
            'u' => {
                if chars.next()? != '{' {
                    return None;
                }
                let mut hex = String::new();
                loop {
                    match chars.next()? {
                        '}' => break,
                        '_' => {}
                        d => hex.push(d),
                    }
                }
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            '\n' => {
                // line continuation: skip the newline and leading whitespace
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Counts the arguments a format string consumes.
///
/// `%k` and `{}` take one argument, `%%` none, and a native specifier one
/// plus one for each `*` in its width or precision.  A `%` at the very end
/// takes nothing.
pub fn count_argument_slots(fmt: &str) -> usize {
    let bytes = fmt.as_bytes();
    let mut slots = 0;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'%', Some(b'k')) | (b'{', Some(b'}')) => {
                slots += 1;
                i += 2;
            }
            (b'%', Some(b'%')) => i += 2,
            (b'%', _) => {
                let (len, taken) = native_specifier(&bytes[i..]);
                slots += taken;
                i += len;
            }
            _ => i += 1,
        }
    }
    slots
}

/// Length of the specifier at `bytes[0]` (a `%`) and how many arguments it
/// takes.
fn native_specifier(bytes: &[u8]) -> (usize, usize) {
    let mut cursor = 1;
    while bytes
        .get(cursor)
        .is_some_and(|b| matches!(b, b'-' | b'+' | b' ' | b'#' | b'0' | b'\''))
    {
        cursor += 1;
    }

    let mut stars = 0;
    if bytes.get(cursor) == Some(&b'*') {
        stars += 1;
        cursor += 1;
    } else {
        while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
            cursor += 1;
        }
    }
    if bytes.get(cursor) == Some(&b'.') {
        cursor += 1;
        if bytes.get(cursor) == Some(&b'*') {
            stars += 1;
            cursor += 1;
        } else {
            while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
                cursor += 1;
            }
        }
    }

    cursor += match (bytes.get(cursor), bytes.get(cursor + 1)) {
        (Some(b'h'), Some(b'h')) | (Some(b'l'), Some(b'l')) => 2,
        (Some(b'h' | b'l' | b'q' | b'j' | b'z' | b't' | b'L'), _) => 1,
        _ => 0,
    };

    match bytes.get(cursor) {
        None => (cursor, 0),
        Some(b'%') => (cursor + 1, 0),
        Some(_) => (cursor + 1, 1 + stars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert_eq!(decode_string_literal(r#""a%kb""#).as_deref(), Some("a%kb"));
        assert_eq!(decode_string_literal(r#""\x25d\n""#).as_deref(), Some("%d\n"));
        assert_eq!(decode_string_literal(r#""\u{25}s""#).as_deref(), Some("%s"));
        assert_eq!(
            decode_string_literal(r###"r#"say "%k""#"###).as_deref(),
            Some(r#"say "%k""#)
        );
        assert_eq!(decode_string_literal("r\"%d\"").as_deref(), Some("%d"));
        assert_eq!(decode_string_literal("\"a\\\n    b\"").as_deref(), Some("ab"));
        assert_eq!(decode_string_literal(r#"b"bytes""#), None);
        assert_eq!(decode_string_literal("42"), None);
    }

    #[test]
    fn slots() {
        assert_eq!(count_argument_slots("plain"), 0);
        assert_eq!(count_argument_slots("%k and {} and %d"), 3);
        assert_eq!(count_argument_slots("100%%"), 0);
        assert_eq!(count_argument_slots("%*.*f|%-08.3lld"), 4);
        assert_eq!(count_argument_slots("%hhu %zu %Lf %5%"), 3);
        assert_eq!(count_argument_slots("trailing %"), 0);
        assert_eq!(count_argument_slots("trailing %5l"), 0);
        assert_eq!(count_argument_slots("{ } {x}"), 0);
    }
}
