//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# richlog

richlog is a logging library built around *domains* and a printf-compatible
formatter.

# The problem

A large program logs from many subsystems.  A single global log level is too
coarse: turning on debug output for the network code should not flood the
console with debug output from the renderer.  And formatting a message that
nobody will see should cost nothing.

# Domains

Every message belongs to a [`Domain`]: a named, registered channel with its
own run-time minimum verbosity and a compile-time minimum below which call
sites are removed entirely.

```rust
richlog::define_domain!(pub Net);

let peer = "10.0.0.7";
richlog::log!(Net, Debug, "connecting to %k", peer); // filtered at run time by default
Net::DOMAIN.set_min_verbosity(richlog::Verbosity::Debug);
richlog::log!(Net, Debug, "connecting to %k", peer); // printed
```

The built-in [`domains::Default`] is used when no domain is named.

| Level   | Usecase                                              | Default           |
|---------|------------------------------------------------------|-------------------|
| trace   | very small steps                                     | compiled out      |
| debug   | details that usually do not matter                   | filtered          |
| info    | what users of your code may want to know             | printed           |
| warning | suspicious conditions                                | printed           |
| error   | errors that do not crash the program                 | printed           |
| fatal   | errors that likely crash the program                 | printed, breaks   |

# Formatting

Format strings are printf strings plus a generic `%k` placeholder that
picks the natural specifier for its argument (and uses [`std::fmt::Display`]
for anything else).  Placeholders are counted at compile time:

```rust
let result = richlog::format_printf!("%k took %.2f ms (%k)", "solve", 1.5f64, 'x');
assert_eq!(result, "solve took 1.50 ms (x)");
```

See [`format`] for the details.

# Where messages go

Each message is offered to the thread's stack of override loggers
(innermost first), then to the global default logger, and finally printed
to the console.  Any logger can consume the message or let it pass.

```rust
use richlog::{MemoryLogger, scoped_logger_override};

let logger = MemoryLogger::new();
{
    let _guard = scoped_logger_override(logger.clone());
    richlog::info!("captured");
}
assert_eq!(logger.drain_logs(), "captured");
```

Configuration at run time is in [`config`]; rate-limited logging is the
[`log_once!`], [`log_cooldown!`] and [`log_limited!`] macros.
*/

mod color;
pub mod config;
mod console;
mod debug_break;
pub mod dispatch;
mod domain;
pub mod experimental;
pub mod format;
pub mod global_logger;
mod inmemory_logger;
mod local_logger;
mod location;
mod logger;
mod macros;
mod message;
pub mod rate_limit;
mod spinlock;
mod thread_name;
mod verbosity;

/// The domains richlog defines.
pub mod domains {
    crate::define_domain!(pub Default);
}

pub use color::{ColorStyle, enable_ansi_colors};
pub use console::{
    ConsoleLogStyle, ConsoleLogger, ParseStyleError, console_log_style, default_logger,
    print_to_console, render_message, set_console_log_style,
};
pub use debug_break::{
    BreakHook, break_on_log_minimum_verbosity, debugger_attached, set_break_hook,
    set_break_on_log_minimum_verbosity,
};
pub use dispatch::{DispatchOutcome, Route};
pub use domain::{Domain, DomainOptions, find_domain, iterate_all_domains, register_domain};
pub use global_logger::{global_default_logger, set_global_default_logger};
pub use inmemory_logger::MemoryLogger;
pub use local_logger::{
    ScopedLoggerOverride, local_logger_depth, pop_local_logger, push_local_logger,
    scoped_logger_override,
};
pub use location::Location;
pub use logger::{Logger, LoggerId};
pub use message::{MessageRef, OwnedMessage};
pub use rate_limit::RateLimiter;
pub use thread_name::{MAX_THREAD_NAME_LEN, current_thread_name, set_current_thread_name};
pub use verbosity::{ParseVerbosityError, Verbosity};

#[doc(hidden)]
pub mod hidden {
    pub use crate::domain::DefinedDomain;
    pub use inventory;
    pub use richlog_proc::check_format;
}
