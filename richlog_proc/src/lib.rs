//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
Procedural macros for richlog.

This crate has one job: check at compile time that a log call supplies as
many arguments as its format string consumes.  Use it through the macros in
`richlog`; it is not meant to be called directly.
*/

mod parser;

use proc_macro::{Delimiter, Group, Ident, Literal, Punct, Spacing, Span, TokenStream, TokenTree};

fn compile_error(message: &str, span: Span) -> TokenStream {
    let mut literal = Literal::string(message);
    literal.set_span(span);
    let mut group = Group::new(
        Delimiter::Parenthesis,
        TokenStream::from(TokenTree::Literal(literal)),
    );
    group.set_span(span);
    let mut bang = Punct::new('!', Spacing::Alone);
    bang.set_span(span);
    let mut semi = Punct::new(';', Spacing::Alone);
    semi.set_span(span);
    [
        TokenTree::Ident(Ident::new("compile_error", span)),
        TokenTree::Punct(bang),
        TokenTree::Group(group),
        TokenTree::Punct(semi),
    ]
    .into_iter()
    .collect()
}

/// Unwraps the invisible groups `macro_rules!` puts around forwarded
/// fragments.
fn strip_invisible(tree: TokenTree) -> TokenTree {
    match tree {
        TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
            let mut inner = group.stream().into_iter();
            match (inner.next(), inner.next()) {
                (Some(only), None) => strip_invisible(only),
                _ => TokenTree::Group(group),
            }
        }
        other => other,
    }
}

/// Counts the comma-separated arguments after the format string.
fn count_arguments(rest: impl Iterator<Item = TokenTree>) -> Result<usize, Span> {
    let mut arguments = 0;
    let mut in_argument = false;
    let mut expect_comma = true;
    for tree in rest {
        match tree {
            TokenTree::Punct(p) if p.as_char() == ',' => {
                if expect_comma {
                    expect_comma = false;
                    continue;
                }
                if !in_argument {
                    return Err(p.span());
                }
                in_argument = false;
            }
            other => {
                if expect_comma {
                    return Err(other.span());
                }
                if !in_argument {
                    arguments += 1;
                    in_argument = true;
                }
            }
        }
    }
    Ok(arguments)
}

/**
Checks a format string against its arguments.

`check_format!("fmt", a, b)` expands to nothing when `"fmt"` consumes exactly
two arguments and to a `compile_error!` otherwise.

```
// expands to nothing
richlog_proc::check_format!("%k is %5.1f%%", name, ratio);
```
*/
#[proc_macro]
pub fn check_format(input: TokenStream) -> TokenStream {
    let mut input = input.into_iter();
    let Some(first) = input.next().map(strip_invisible) else {
        return compile_error("expected a format string", Span::call_site());
    };
    let TokenTree::Literal(literal) = &first else {
        return compile_error("the format string must be a string literal", first.span());
    };
    let Some(format) = parser::decode_string_literal(&literal.to_string()) else {
        return compile_error("the format string must be a string literal", literal.span());
    };

    let supplied = match count_arguments(input) {
        Ok(supplied) => supplied,
        Err(span) => return compile_error("expected `,` between arguments", span),
    };
    let expected = parser::count_argument_slots(&format);
    if supplied == expected {
        return TokenStream::new();
    }
    let message = format!(
        "format string consumes {expected} argument{} but {supplied} {} supplied",
        if expected == 1 { "" } else { "s" },
        if supplied == 1 { "was" } else { "were" },
    );
    compile_error(&message, literal.span())
}
