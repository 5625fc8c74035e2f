// SPDX-License-Identifier: MIT OR Apache-2.0

//! The console palette.
//!
//! Colors are 256-color ANSI foreground codes (`ESC[38;5;<n>m`).

use crate::Verbosity;

/// A named console color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorStyle {
    /// No escape code at all.
    Neutral,
    #[default]
    LightGray,
    DarkGray,
    Cyan,
    LightGreen,
    SubtleBlue,
    OrangeRed,
    ErrorRed,
    CriticalRed,
}

impl ColorStyle {
    pub const fn ansi_code(self) -> &'static str {
        match self {
            ColorStyle::Neutral => "",
            ColorStyle::LightGray => "\x1b[38;5;244m",
            ColorStyle::DarkGray => "\x1b[38;5;238m",
            ColorStyle::Cyan => "\x1b[38;5;14m",
            ColorStyle::LightGreen => "\x1b[38;5;148m",
            ColorStyle::SubtleBlue => "\x1b[38;5;37m",
            ColorStyle::OrangeRed => "\x1b[38;5;202m",
            ColorStyle::ErrorRed => "\x1b[38;5;196m\x1b[1m",
            ColorStyle::CriticalRed => "\x1b[38;5;197m\x1b[1m\x1b[7m",
        }
    }

    /// `0xAABBGGRR`, for sinks that render to something other than a terminal.
    pub const fn rgba_hex(self) -> u32 {
        match self {
            ColorStyle::Neutral => 0xFFFFFFFF,
            ColorStyle::LightGray => 0xFF808080,
            ColorStyle::DarkGray => 0xFF444444,
            ColorStyle::Cyan => 0xFFFFFF00,
            ColorStyle::LightGreen => 0xFF00D6AF,
            ColorStyle::SubtleBlue => 0xFFAFAF00,
            ColorStyle::OrangeRed => 0xFF005FFF,
            ColorStyle::ErrorRed => 0xFF0000FF,
            ColorStyle::CriticalRed => 0xFF5F00FF,
        }
    }

    pub const fn for_verbosity(verbosity: Verbosity) -> ColorStyle {
        match verbosity {
            Verbosity::Trace => ColorStyle::Cyan,
            Verbosity::Debug => ColorStyle::LightGreen,
            Verbosity::Info => ColorStyle::LightGray,
            Verbosity::Warning => ColorStyle::OrangeRed,
            Verbosity::Error => ColorStyle::ErrorRed,
            Verbosity::Fatal => ColorStyle::CriticalRed,
        }
    }
}

/// Resets all attributes.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Used for timestamps in the verbose console styles.
pub const TIMESTAMP_COLOR: ColorStyle = ColorStyle::SubtleBlue;

/// Prepares the console for ANSI escape codes and reports whether they are
/// supported.
///
/// Terminals on Unix understand them natively.  Switching a Windows console
/// into virtual terminal mode is left to the application, so this only
/// reports `false` there.
pub fn enable_ansi_colors() -> bool {
    !cfg!(windows)
}
