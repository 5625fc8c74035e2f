// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rate limiters for log call sites.
//!
//! A limiter is consulted after the verbosity gates and before the message
//! is formatted, so a suppressed message costs one atomic operation.
//!
//! Limiters use relaxed atomics and no locking.  Two threads racing on the same
//! limiter may both pass; the worst case is one extra message.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Decides whether a message may be logged.
pub trait RateLimiter {
    /// Returns `true` if the message should be logged.  May update state.
    fn try_acquire(&self) -> bool;
}

impl<T: RateLimiter + ?Sized> RateLimiter for &T {
    fn try_acquire(&self) -> bool {
        (**self).try_acquire()
    }
}

/// Never limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl RateLimiter for Unlimited {
    #[inline]
    fn try_acquire(&self) -> bool {
        true
    }
}

/// Passes exactly once.
///
/// ```
/// use richlog::rate_limit::{Once, RateLimiter};
/// let once = Once::new();
/// assert!(once.try_acquire());
/// assert!(!once.try_acquire());
/// ```
#[derive(Debug, Default)]
pub struct Once {
    fired: AtomicBool,
}

impl Once {
    pub const fn new() -> Self {
        Once {
            fired: AtomicBool::new(false),
        }
    }
}

impl RateLimiter for Once {
    fn try_acquire(&self) -> bool {
        // load first so the common "already fired" case does not write
        !self.fired.load(Ordering::Relaxed) && !self.fired.swap(true, Ordering::Relaxed)
    }
}

/// A source of monotonic time, measured from an arbitrary fixed epoch.
pub trait Clock {
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// [`Instant`]-based time since the first time any `MonotonicClock` was read.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        EPOCH.get_or_init(Instant::now).elapsed()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub const fn new() -> Self {
        ManualClock {
            nanos: AtomicU64::new(0),
        }
    }

    pub fn set(&self, now: Duration) {
        self.nanos.store(duration_nanos(now), Ordering::Relaxed);
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(duration_nanos(by), Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Relaxed))
    }
}

fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX - 1)
}

const NEVER: u64 = u64::MAX;

/// Passes at most once per interval.
///
/// The first call always passes.  A later call passes when at least the
/// interval has elapsed since the last call that passed.
///
/// ```
/// use richlog::rate_limit::{Cooldown, ManualClock, RateLimiter};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let cooldown = Cooldown::from_duration(Duration::from_secs(1)).with_clock(&clock);
/// assert!(cooldown.try_acquire());
/// assert!(!cooldown.try_acquire());
/// clock.advance(Duration::from_secs(1));
/// assert!(cooldown.try_acquire());
/// ```
#[derive(Debug)]
pub struct Cooldown<C: Clock = MonotonicClock> {
    interval_nanos: u64,
    last_nanos: AtomicU64,
    clock: C,
}

impl Cooldown<MonotonicClock> {
    /// Usable in `static`s.  Negative or NaN intervals never limit.
    pub const fn from_secs_f64(seconds: f64) -> Self {
        // `as` saturates, so huge values clamp instead of wrapping
        let nanos = (seconds * 1_000_000_000.0) as u64;
        Cooldown {
            interval_nanos: nanos,
            last_nanos: AtomicU64::new(NEVER),
            clock: MonotonicClock,
        }
    }

    pub fn from_duration(interval: Duration) -> Self {
        Cooldown {
            interval_nanos: duration_nanos(interval),
            last_nanos: AtomicU64::new(NEVER),
            clock: MonotonicClock,
        }
    }
}

impl<C: Clock> Cooldown<C> {
    /// Replaces the time source.
    pub fn with_clock<D: Clock>(self, clock: D) -> Cooldown<D> {
        Cooldown {
            interval_nanos: self.interval_nanos,
            last_nanos: self.last_nanos,
            clock,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_nanos(self.interval_nanos)
    }
}

impl<C: Clock> RateLimiter for Cooldown<C> {
    fn try_acquire(&self) -> bool {
        let now = duration_nanos(self.clock.now());
        let last = self.last_nanos.load(Ordering::Relaxed);
        if last != NEVER && now.saturating_sub(last) < self.interval_nanos {
            return false;
        }
        self.last_nanos.store(now, Ordering::Relaxed);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_passes_first_call_only() {
        let once = Once::new();
        assert!(once.try_acquire());
        for _ in 0..10 {
            assert!(!once.try_acquire());
        }
    }

    #[test]
    fn cooldown_first_call_passes_at_time_zero() {
        let clock = ManualClock::new();
        let cooldown = Cooldown::from_secs_f64(0.5).with_clock(&clock);
        assert!(cooldown.try_acquire());
        assert!(!cooldown.try_acquire());
    }

    #[test]
    fn cooldown_measures_from_last_pass() {
        let clock = ManualClock::new();
        let cooldown = Cooldown::from_duration(Duration::from_millis(100)).with_clock(&clock);
        assert!(cooldown.try_acquire());
        clock.advance(Duration::from_millis(60));
        assert!(!cooldown.try_acquire());
        clock.advance(Duration::from_millis(40));
        assert!(cooldown.try_acquire());
        clock.advance(Duration::from_millis(99));
        assert!(!cooldown.try_acquire());
    }

    #[test]
    fn zero_interval_never_limits() {
        let clock = ManualClock::new();
        let cooldown = Cooldown::from_secs_f64(0.0).with_clock(&clock);
        assert!(cooldown.try_acquire());
        assert!(cooldown.try_acquire());
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let a = MonotonicClock.now();
        let b = MonotonicClock.now();
        assert!(b >= a);
    }

    #[test]
    fn limiter_by_reference() {
        fn takes<L: RateLimiter>(limiter: L) -> bool {
            limiter.try_acquire()
        }
        let once = Once::new();
        assert!(takes(&once));
        assert!(!takes(&once));
        assert!(takes(Unlimited));
    }
}
