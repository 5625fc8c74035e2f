// SPDX-License-Identifier: MIT OR Apache-2.0

//! The message handed to loggers.
//!
//! A [`MessageRef`] borrows everything it describes: the formatted text lives
//! in the dispatcher's stack buffer and the thread name in a thread-local.
//! Loggers that keep messages past the call convert them with
//! [`MessageRef::to_owned_message`].

use crate::domain::Domain;
use crate::location::Location;
use crate::verbosity::Verbosity;
use std::fmt::Display;
use std::time::SystemTime;

/**
A formatted message, valid for the duration of one [`Logger::log`](crate::Logger::log) call.
*/
#[derive(Debug, Clone, Copy)]
pub struct MessageRef<'a> {
    pub timestamp: SystemTime,
    pub location: &'a Location,
    pub domain: &'a Domain,
    pub verbosity: Verbosity,
    pub thread_name: &'a str,
    pub message: &'a str,
}

impl MessageRef<'_> {
    pub fn to_owned_message(&self) -> OwnedMessage {
        OwnedMessage {
            timestamp: self.timestamp,
            module_path: self.location.module_path(),
            file: self.location.file(),
            line: self.location.line(),
            domain: self.domain.name(),
            verbosity: self.verbosity,
            thread_name: self.thread_name.to_string(),
            message: self.message.to_string(),
        }
    }
}

impl Display for MessageRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.verbosity,
            self.domain.name(),
            self.message
        )
    }
}

/// A message that owns its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnedMessage {
    pub timestamp: SystemTime,
    pub module_path: &'static str,
    pub file: &'static str,
    pub line: u32,
    /// The domain's name.  Domains live forever, so this is free.
    pub domain: &'static str,
    pub verbosity: Verbosity,
    pub thread_name: String,
    pub message: String,
}

impl Display for OwnedMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.verbosity, self.domain, self.message)
    }
}

/*
Boilerplate notes.

# MessageRef

Copy, since it is a bundle of references and a timestamp.
No PartialEq: comparing Locations and Domains by address would be surprising, and by value is meaningless for call sites.
No Default: there is no sensible default location.
Display is a compact one-line form for quick debugging; console formatting lives in the console module.

# OwnedMessage

Clone, Eq and Hash are natural for a plain data record.
*/
