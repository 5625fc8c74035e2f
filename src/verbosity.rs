// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message verbosity levels.

use std::fmt::Display;
use std::str::FromStr;

/// How relevant a log message is, in increasing order.
///
/// Every domain carries a compile-time and a run-time minimum.  By default
/// `Trace` is compiled out and `Debug` is filtered at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Verbosity {
    /// Diagnostics in very small steps, e.g. every iteration of an algorithm.
    Trace = 0,
    /// Diagnostics that usually do not matter, e.g. the arguments to an algorithm.
    Debug = 1,
    /// Information users of your code may want, e.g. the selected device.
    Info = 2,
    /// Suspicious calls or inputs that are not strictly errors.
    Warning = 3,
    /// Clear errors and wrong API use that do not crash the program.
    Error = 4,
    /// Errors that will likely crash or invalidate the program.
    Fatal = 5,
}

impl Verbosity {
    /// All levels, lowest first.
    pub const ALL: [Verbosity; 6] = [
        Verbosity::Trace,
        Verbosity::Debug,
        Verbosity::Info,
        Verbosity::Warning,
        Verbosity::Error,
        Verbosity::Fatal,
    ];

    /// The name used by the console renderer.
    pub const fn name(self) -> &'static str {
        match self {
            Verbosity::Trace => "TRACE",
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Warning => "WARN",
            Verbosity::Error => "ERROR",
            Verbosity::Fatal => "FATAL",
        }
    }

    pub const fn from_u8(value: u8) -> Option<Verbosity> {
        match value {
            0 => Some(Verbosity::Trace),
            1 => Some(Verbosity::Debug),
            2 => Some(Verbosity::Info),
            3 => Some(Verbosity::Warning),
            4 => Some(Verbosity::Error),
            5 => Some(Verbosity::Fatal),
            _ => None,
        }
    }
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no [`Verbosity`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verbosity `{0}` (expected trace, debug, info, warning, error or fatal)")]
pub struct ParseVerbosityError(pub String);

impl FromStr for Verbosity {
    type Err = ParseVerbosityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Verbosity::Trace),
            "debug" => Ok(Verbosity::Debug),
            "info" => Ok(Verbosity::Info),
            "warn" | "warning" => Ok(Verbosity::Warning),
            "error" => Ok(Verbosity::Error),
            "fatal" => Ok(Verbosity::Fatal),
            _ => Err(ParseVerbosityError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_matches_severity() {
        assert!(Verbosity::Trace < Verbosity::Debug);
        assert!(Verbosity::Warning < Verbosity::Error);
        assert_eq!(Verbosity::ALL.iter().max(), Some(&Verbosity::Fatal));
    }

    #[test]
    fn u8_conversion() {
        for v in Verbosity::ALL {
            assert_eq!(Verbosity::from_u8(v as u8), Some(v));
        }
        assert_eq!(Verbosity::from_u8(6), None);
    }

    #[test]
    fn parse_names() {
        assert_eq!("WARN".parse(), Ok(Verbosity::Warning));
        assert_eq!(" warning ".parse(), Ok(Verbosity::Warning));
        assert_eq!("Trace".parse(), Ok(Verbosity::Trace));
        assert!("loud".parse::<Verbosity>().is_err());
    }
}
