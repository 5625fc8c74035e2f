// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logging macros.
//!
//! ```
//! richlog::define_domain!(Net);
//!
//! let peer = "10.0.0.7";
//! richlog::log!("plain message on the Default domain");
//! richlog::log!(Net, Warning, "retrying %k after %.1f s", peer, 0.25f64);
//! richlog::error!("only %k attempts left", 2u8);
//! richlog::info!(Net, "connected to %k", peer);
//! ```
//!
//! # Expansion
//!
//! Every call expands to
//!
//! 1. a `const` comparison of the level with the domain's compile-time
//!    minimum.  Below it, the whole call is dead code and its arguments are
//!    never evaluated;
//! 2. a `static` [`Location`](crate::Location) for the call site;
//! 3. the run-time check [`Domain::is_enabled`](crate::Domain::is_enabled)
//!    and the rate limiter;
//! 4. only then, argument classification and [`dispatch`](crate::dispatch::dispatch).
//!
//! The format string must be a literal.  Its placeholders are counted at
//! compile time, so a call with the wrong number of arguments does not build.

/// Logs a message.
///
/// `log!("fmt", args...)` logs at `Info` on the `Default` domain;
/// `log!(Domain, Level, "fmt", args...)` names both.
#[macro_export]
macro_rules! log {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Info, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], $level, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs only the first time this call site passes the verbosity gates.
///
/// ```
/// for _ in 0..3 {
///     richlog::log_once!(Default, Warning, "deprecated option in use");
/// }
/// ```
#[macro_export]
macro_rules! log_once {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Info, {
            static ONCE: $crate::rate_limit::Once = $crate::rate_limit::Once::new();
            &ONCE
        }, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], $level, {
            static ONCE: $crate::rate_limit::Once = $crate::rate_limit::Once::new();
            &ONCE
        }, $fmt $(, $arg)*)
    };
}

/// Logs at most once per `seconds` (a constant expression) from this call
/// site.
#[macro_export]
macro_rules! log_cooldown {
    ($seconds:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Info, {
            static COOLDOWN: $crate::rate_limit::Cooldown =
                $crate::rate_limit::Cooldown::from_secs_f64($seconds);
            &COOLDOWN
        }, $fmt $(, $arg)*)
    };
    ($seconds:expr, $($domain:ident)::+, $level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], $level, {
            static COOLDOWN: $crate::rate_limit::Cooldown =
                $crate::rate_limit::Cooldown::from_secs_f64($seconds);
            &COOLDOWN
        }, $fmt $(, $arg)*)
    };
}

/// Logs through a caller-provided [`RateLimiter`](crate::RateLimiter).
///
/// ```
/// use richlog::rate_limit::Once;
///
/// let once = Once::new();
/// for i in 0..3 {
///     // one message per `once`, not per call site
///     richlog::log_limited!(&once, "iteration %k", i);
/// }
/// ```
#[macro_export]
macro_rules! log_limited {
    ($limiter:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Info, $limiter, $fmt $(, $arg)*)
    };
    ($limiter:expr, $($domain:ident)::+, $level:ident, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], $level, $limiter, $fmt $(, $arg)*)
    };
}

/// Logs at `Trace`, on the `Default` domain unless one is named first.
#[macro_export]
macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Trace, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Trace, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs at `Debug`, on the `Default` domain unless one is named first.
#[macro_export]
macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Debug, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Debug, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs at `Info`, on the `Default` domain unless one is named first.
#[macro_export]
macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Info, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Info, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs at `Warning`, on the `Default` domain unless one is named first.
///
/// ```
/// richlog::define_domain!(Storage);
/// richlog::warning!(Storage, "%k of %k blocks free", 12u32, 4096u32);
/// ```
#[macro_export]
macro_rules! warning {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Warning, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Warning, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs at `Error`, on the `Default` domain unless one is named first.
#[macro_export]
macro_rules! error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Error, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Error, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

/// Logs at `Fatal`, on the `Default` domain unless one is named first.
#[macro_export]
macro_rules! fatal {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$crate::domains::Default], Fatal, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
    ($($domain:ident)::+, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__log_impl!([$($domain)::+], Fatal, $crate::rate_limit::Unlimited, $fmt $(, $arg)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_impl {
    // `Default` would otherwise resolve to the prelude trait at the call site
    ([Default], $level:ident, $limiter:expr, $fmt:literal $(, $arg:expr)*) => {
        $crate::__log_impl!([$crate::domains::Default], $level, $limiter, $fmt $(, $arg)*)
    };
    ([$($domain:tt)+], $level:ident, $limiter:expr, $fmt:literal $(, $arg:expr)*) => {{
        $crate::hidden::check_format!($fmt $(, $arg)*);
        const ENABLED: bool =
            ($crate::Verbosity::$level as u8) >= ($($domain)+::COMPILE_TIME_MIN as u8);
        if ENABLED {
            static LOCATION: $crate::Location =
                $crate::Location::new(::std::module_path!(), ::std::file!(), ::std::line!());
            let domain: &'static $crate::Domain = $($domain)+::domain();
            if domain.is_enabled($crate::Verbosity::$level)
                && $crate::RateLimiter::try_acquire(&$limiter)
            {
                #[allow(unused_imports)]
                use $crate::format::kind::{DisplayKind as _, NativeKind as _};
                $crate::dispatch::dispatch(
                    &LOCATION,
                    domain,
                    $crate::Verbosity::$level,
                    $fmt,
                    &[$((&$crate::format::kind::Wrap(&$arg)).printf_arg()),*],
                );
            }
        }
    }};
}

/// Formats into a byte buffer, C style.  Returns the length the complete
/// output would have; the buffer receives as much as fits plus a NUL.
#[macro_export]
macro_rules! snprintf {
    ($buf:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::hidden::check_format!($fmt $(, $arg)*);
        #[allow(unused_imports)]
        use $crate::format::kind::{DisplayKind as _, NativeKind as _};
        $crate::format::format_into(
            $buf,
            $fmt,
            &[$((&$crate::format::kind::Wrap(&$arg)).printf_arg()),*],
        )
    }};
}

/// Formats into a `String`.
///
/// ```
/// assert_eq!(richlog::format_printf!("%k/%03d", "a", 7), "a/007");
/// ```
///
/// Argument counts are checked when the call is compiled:
///
/// ```compile_fail
/// let s = richlog::format_printf!("%k and %k", 1);
/// ```
#[macro_export]
macro_rules! format_printf {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        $crate::hidden::check_format!($fmt $(, $arg)*);
        #[allow(unused_imports)]
        use $crate::format::kind::{DisplayKind as _, NativeKind as _};
        $crate::format::format_to_string(
            $fmt,
            &[$((&$crate::format::kind::Wrap(&$arg)).printf_arg()),*],
        )
    }};
}
