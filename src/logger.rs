//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::message::MessageRef;

/**
A sink for log messages.

Loggers are offered messages innermost-first: the thread's override stack from
the top, then the global default logger, then the console.  The first logger
that returns `true` consumes the message and the search stops.

`break_on_log` arrives set to the dispatcher's break decision (the verbosity
policy and any request on the call site).  A logger may overwrite it; after
routing, a `true` value triggers the break hook.

Loggers may log from inside `log`.  No lock or borrow is held while a logger
runs, so this reenters the dispatcher like any other call.

Closures of the right shape are loggers:

```
use richlog::{MessageRef, scoped_logger_override};

let _quiet = scoped_logger_override(|_msg: &MessageRef<'_>, _brk: &mut bool| true);
richlog::log!("swallowed");
```
*/
pub trait Logger {
    /// Returns whether the message was consumed.
    fn log(&self, message: &MessageRef<'_>, break_on_log: &mut bool) -> bool;
}

impl<F> Logger for F
where
    F: Fn(&MessageRef<'_>, &mut bool) -> bool,
{
    fn log(&self, message: &MessageRef<'_>, break_on_log: &mut bool) -> bool {
        self(message, break_on_log)
    }
}

/// Identifies one entry of a thread's override stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoggerId(pub(crate) u64);

/*
Boilerplate notes.

# Logger

I don't think Clone on Logger makes sense, so copy's out.
PartialEq and Eq are possible but it's a little unclear if we mean data equality or some kind of provenance-based thing.  Let's avoid that and not implement it.
Default is not necessarily sensible since who knows how the logger is constructed.
No Send/Sync supertrait: thread-local overrides may well capture Rc or RefCell.  The global default slot asks for Send + Sync itself.

# LoggerId

Plain Copy handle.  The inner value is private so ids only come from pushes.
*/
