// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console output, the last stop for messages no logger consumed.
//!
//! Each message becomes one line (plus indented continuation lines for
//! multi-line messages) with a style-dependent prefix:
//!
//! ```text
//! Verbose:             06.05.20 07:14:10 main INFO     Net       connected
//! Brief:               07:14:10 INFO Net connected
//! Briefer:             07:14 I Net connected
//! MessageOnly:         connected
//! ```
//!
//! `VerboseWithLocation` adds a header line naming the call site.  Messages
//! of [`Verbosity::Error`] and above go to stderr, the rest to stdout.

use crate::color::{ANSI_RESET, ColorStyle, TIMESTAMP_COLOR, enable_ansi_colors};
use crate::message::MessageRef;
use crate::verbosity::Verbosity;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::SystemTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// How the console renders messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum ConsoleLogStyle {
    /// Date, time, thread, severity and domain, colored.
    #[default]
    Verbose = 0,
    /// Time, severity and domain.
    Brief = 1,
    /// Hours and minutes, the first letter of the severity, and the domain.
    Briefer = 2,
    MessageOnly = 3,
    /// `Verbose` without escape codes.
    VerboseNoColor = 4,
    /// `Verbose` with a header line naming the call site.
    VerboseWithLocation = 5,
}

impl ConsoleLogStyle {
    fn from_u8(value: u8) -> ConsoleLogStyle {
        match value {
            1 => ConsoleLogStyle::Brief,
            2 => ConsoleLogStyle::Briefer,
            3 => ConsoleLogStyle::MessageOnly,
            4 => ConsoleLogStyle::VerboseNoColor,
            5 => ConsoleLogStyle::VerboseWithLocation,
            _ => ConsoleLogStyle::Verbose,
        }
    }

    fn is_colored(self) -> bool {
        !matches!(
            self,
            ConsoleLogStyle::VerboseNoColor | ConsoleLogStyle::MessageOnly
        )
    }
}

/// Returned when a string names no [`ConsoleLogStyle`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown console style `{0}` (expected verbose, brief, briefer, message_only, verbose_no_color or verbose_with_location)"
)]
pub struct ParseStyleError(pub String);

impl FromStr for ConsoleLogStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "verbose" => Ok(ConsoleLogStyle::Verbose),
            "brief" => Ok(ConsoleLogStyle::Brief),
            "briefer" => Ok(ConsoleLogStyle::Briefer),
            "message_only" | "message" => Ok(ConsoleLogStyle::MessageOnly),
            "verbose_no_color" | "no_color" => Ok(ConsoleLogStyle::VerboseNoColor),
            "verbose_with_location" | "location" => Ok(ConsoleLogStyle::VerboseWithLocation),
            _ => Err(ParseStyleError(s.to_string())),
        }
    }
}

static CONSOLE_STYLE: AtomicU8 = AtomicU8::new(ConsoleLogStyle::Verbose as u8);

pub fn set_console_log_style(style: ConsoleLogStyle) {
    CONSOLE_STYLE.store(style as u8, Ordering::Relaxed);
}

pub fn console_log_style() -> ConsoleLogStyle {
    ConsoleLogStyle::from_u8(CONSOLE_STYLE.load(Ordering::Relaxed))
}

const VERBOSE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year repr:last_two] [hour]:[minute]:[second]");
const BRIEF_TIME: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const BRIEFER_TIME: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]");

fn local_offset() -> UtcOffset {
    // determined once: the OS query is unreliable once other threads run
    static OFFSET: OnceLock<UtcOffset> = OnceLock::new();
    *OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

fn push_time(prefix: &mut String, timestamp: SystemTime, format: &[BorrowedFormatItem<'_>]) {
    let local = OffsetDateTime::from(timestamp).to_offset(local_offset());
    match local.format(format) {
        Ok(text) => prefix.push_str(&text),
        Err(_) => prefix.push('?'),
    }
}

struct Painter {
    enabled: bool,
}

impl Painter {
    fn paint(&self, prefix: &mut String, color: ColorStyle, text: std::fmt::Arguments<'_>) {
        if self.enabled && color != ColorStyle::Neutral {
            prefix.push_str(color.ansi_code());
            let _ = prefix.write_fmt(text);
            prefix.push_str(ANSI_RESET);
        } else {
            let _ = prefix.write_fmt(text);
        }
    }
}

fn build_prefix(style: ConsoleLogStyle, message: &MessageRef<'_>) -> String {
    let painter = Painter {
        enabled: style.is_colored() && enable_ansi_colors(),
    };
    let severity = message.verbosity.name();
    let severity_color = ColorStyle::for_verbosity(message.verbosity);
    let domain = message.domain.name();
    let domain_color = message.domain.color();

    let mut prefix = String::with_capacity(96);
    match style {
        ConsoleLogStyle::Verbose
        | ConsoleLogStyle::VerboseNoColor
        | ConsoleLogStyle::VerboseWithLocation => {
            let mut time = String::with_capacity(18);
            push_time(&mut time, message.timestamp, VERBOSE_TIME);
            painter.paint(
                &mut prefix,
                TIMESTAMP_COLOR,
                format_args!("{time} {} ", message.thread_name),
            );
            painter.paint(&mut prefix, severity_color, format_args!("{severity:<7} "));
            prefix.push(' ');
            painter.paint(&mut prefix, domain_color, format_args!("{domain:<9} "));
        }
        ConsoleLogStyle::Brief => {
            let mut time = String::with_capacity(9);
            push_time(&mut time, message.timestamp, BRIEF_TIME);
            painter.paint(&mut prefix, TIMESTAMP_COLOR, format_args!("{time} "));
            painter.paint(&mut prefix, severity_color, format_args!("{severity} "));
            painter.paint(&mut prefix, domain_color, format_args!("{domain} "));
        }
        ConsoleLogStyle::Briefer => {
            let mut time = String::with_capacity(6);
            push_time(&mut time, message.timestamp, BRIEFER_TIME);
            let initial = severity.chars().next().unwrap_or(' ');
            painter.paint(&mut prefix, TIMESTAMP_COLOR, format_args!("{time} "));
            painter.paint(&mut prefix, severity_color, format_args!("{initial} "));
            painter.paint(&mut prefix, domain_color, format_args!("{domain} "));
        }
        ConsoleLogStyle::MessageOnly => {}
    }
    prefix
}

/// Width of `text` on a terminal, skipping `ESC [ ... m` sequences.
fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

/// Writes `message` in `style` to `out`.  Continuation lines of a
/// multi-line message are indented to the first line's message column.
pub fn render_message<W: Write + ?Sized>(
    style: ConsoleLogStyle,
    message: &MessageRef<'_>,
    out: &mut W,
) -> io::Result<()> {
    let prefix = build_prefix(style, message);
    let mut text = String::with_capacity(prefix.len() + message.message.len() + 64);
    if style == ConsoleLogStyle::VerboseWithLocation {
        let _ = writeln!(
            text,
            "         {}:{}  ({}):",
            message.location.file(),
            message.location.line(),
            message.location.module_path()
        );
    }
    text.push_str(&prefix);

    let indent = visible_width(&prefix);
    let body = message.message.strip_suffix('\n').unwrap_or(message.message);
    for (i, line) in body.split('\n').enumerate() {
        if i > 0 {
            text.extend(std::iter::repeat_n(' ', indent));
        }
        text.push_str(line);
        text.push('\n');
    }
    out.write_all(text.as_bytes())
}

/// Renders `message` to stdout or stderr with the process-wide style.
///
/// Write errors are ignored: there is nowhere left to report them.
pub fn print_to_console(message: &MessageRef<'_>) {
    print_styled(console_log_style(), message);
}

fn print_styled(style: ConsoleLogStyle, message: &MessageRef<'_>) {
    let mut line = Vec::with_capacity(128 + message.message.len());
    if render_message(style, message, &mut line).is_err() {
        return;
    }
    if message.verbosity >= Verbosity::Error {
        let _ = io::stdout().flush();
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(&line);
        let _ = stderr.flush();
    } else {
        let mut stdout = io::stdout().lock();
        let _ = stdout.write_all(&line);
        let _ = stdout.flush();
        drop(stdout);
        let _ = io::stderr().flush();
    }
}

/// A logger that prints every message to the console and consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConsoleLogger {
    /// `None` follows [`console_log_style`].
    pub style: Option<ConsoleLogStyle>,
}

impl ConsoleLogger {
    pub const fn new(style: Option<ConsoleLogStyle>) -> Self {
        ConsoleLogger { style }
    }
}

impl crate::Logger for ConsoleLogger {
    fn log(&self, message: &MessageRef<'_>, _break_on_log: &mut bool) -> bool {
        print_styled(self.style.unwrap_or_else(console_log_style), message);
        true
    }
}

/// The fallback for messages nobody consumed.  Usable as a logger itself.
pub fn default_logger(message: &MessageRef<'_>, _break_on_log: &mut bool) -> bool {
    print_to_console(message);
    true
}

/*
Boilerplate notes.

# ConsoleLogger

Copy, since it is a single optional enum.
Default follows the process-wide style, which is what most users want.
*/
