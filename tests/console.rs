//SPDX-License-Identifier: MIT OR Apache-2.0

use richlog::{ConsoleLogStyle, Location, MessageRef, Verbosity, render_message};
use std::time::SystemTime;

richlog::define_domain!(Render);

static LOCATION: Location = Location::new(module_path!(), file!(), line!());

fn render(style: ConsoleLogStyle, text: &str) -> String {
    let message = MessageRef {
        timestamp: SystemTime::now(),
        location: &LOCATION,
        domain: Render::domain(),
        verbosity: Verbosity::Info,
        thread_name: "main",
        message: text,
    };
    let mut out = Vec::new();
    render_message(style, &message, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn without_escapes(text: &str) -> String {
    let mut plain = String::new();
    let mut in_escape = false;
    for c in text.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (false, c) => plain.push(c),
            (true, 'm') => in_escape = false,
            (true, _) => {}
        }
    }
    plain
}

#[test]
fn multi_line_brief() {
    let rendered = without_escapes(&render(ConsoleLogStyle::Brief, "line one\nline two"));
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 2);

    // HH:MM:SS INFO Render line one
    let column = lines[0].find("line one").unwrap();
    assert_eq!(&lines[0][8..column], " INFO Render ");
    assert_eq!(lines[1], format!("{}line two", " ".repeat(column)));
    assert!(rendered.ends_with('\n'));
}

#[test]
fn message_only_keeps_blank_lines() {
    assert_eq!(render(ConsoleLogStyle::MessageOnly, "a\n\nb"), "a\n\nb\n");
}
