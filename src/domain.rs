// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logging domains and the process-wide domain registry.
//!
//! A domain is a named category of messages (usually one per library or
//! subsystem) with its own minimum verbosity.  Domains are `static`s created by
//! [`define_domain!`](crate::define_domain!), which also submits each one to a
//! link-time collection.  The registry gathers that collection on first access,
//! so every defined domain can be enumerated and tuned before it ever logs.
//!
//! ```standalone_crate
//! richlog::define_domain!(Net, richlog::DomainOptions::named("Net").description("sockets"));
//!
//! let found = richlog::find_domain("Net").unwrap();
//! found.set_min_verbosity(richlog::Verbosity::Debug);
//! assert_eq!(found.description(), "sockets");
//! assert!(found.is_enabled(richlog::Verbosity::Debug));
//! ```

use crate::color::ColorStyle;
use crate::spinlock::SpinRwLock;
use crate::verbosity::Verbosity;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// The compile-time minimum of domains that do not choose one.
pub const DEFAULT_COMPILE_TIME_MIN: Verbosity = if cfg!(feature = "compile_trace") {
    Verbosity::Trace
} else {
    Verbosity::Debug
};

/// The run-time minimum of domains that do not choose one.
pub const DEFAULT_MIN_VERBOSITY: Verbosity = Verbosity::Info;

const fn fnv1a(text: &str) -> u64 {
    let bytes = text.as_bytes();
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        i += 1;
    }
    hash
}

/// Construction parameters for a [`Domain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainOptions {
    name: &'static str,
    description: &'static str,
    color: ColorStyle,
    verbosity: Verbosity,
    compile_time_min: Verbosity,
    requires_whitelist: bool,
}

impl DomainOptions {
    pub const fn named(name: &'static str) -> Self {
        DomainOptions {
            name,
            description: "",
            color: ColorStyle::LightGray,
            verbosity: DEFAULT_MIN_VERBOSITY,
            compile_time_min: DEFAULT_COMPILE_TIME_MIN,
            requires_whitelist: false,
        }
    }

    pub const fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub const fn color(mut self, color: ColorStyle) -> Self {
        self.color = color;
        self
    }

    /// Initial run-time minimum.
    pub const fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Call sites below this level are compiled out entirely.
    pub const fn compile_time_min(mut self, verbosity: Verbosity) -> Self {
        self.compile_time_min = verbosity;
        self
    }

    /// Messages of this domain are only dispatched when the whitelist filter
    /// (see [`experimental::set_whitelist_filter`](crate::experimental::set_whitelist_filter))
    /// accepts them.
    pub const fn requires_whitelist(mut self, required: bool) -> Self {
        self.requires_whitelist = required;
        self
    }

    pub const fn compile_time_min_verbosity(&self) -> Verbosity {
        self.compile_time_min
    }
}

/// A logging domain.
///
/// The run-time minimum may be changed at any time; concurrent writers race
/// benignly (the last store wins) and are the caller's to serialize.
#[derive(Debug)]
pub struct Domain {
    name: &'static str,
    description: &'static str,
    color: ColorStyle,
    name_hash: u64,
    min_verbosity: AtomicU8,
    compile_time_min: Verbosity,
    requires_whitelist: bool,
    registered: AtomicBool,
}

impl Domain {
    pub const fn new(options: DomainOptions) -> Domain {
        Domain {
            name: options.name,
            description: options.description,
            color: options.color,
            name_hash: fnv1a(options.name),
            min_verbosity: AtomicU8::new(options.verbosity as u8),
            compile_time_min: options.compile_time_min,
            requires_whitelist: options.requires_whitelist,
            registered: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn color(&self) -> ColorStyle {
        self.color
    }

    pub fn name_hash(&self) -> u64 {
        self.name_hash
    }

    pub fn compile_time_min(&self) -> Verbosity {
        self.compile_time_min
    }

    pub fn requires_whitelist(&self) -> bool {
        self.requires_whitelist
    }

    pub fn min_verbosity(&self) -> Verbosity {
        Verbosity::from_u8(self.min_verbosity.load(Ordering::Relaxed)).unwrap_or(Verbosity::Info)
    }

    pub fn set_min_verbosity(&self, verbosity: Verbosity) {
        self.min_verbosity.store(verbosity as u8, Ordering::Relaxed);
    }

    /// Whether a message of `verbosity` passes both gates of this domain.
    #[inline]
    pub fn is_enabled(&self, verbosity: Verbosity) -> bool {
        verbosity >= self.compile_time_min
            && verbosity as u8 >= self.min_verbosity.load(Ordering::Relaxed)
    }

    pub fn is_registered(&self) -> bool {
        collect_defined_domains();
        self.registered.load(Ordering::Relaxed)
    }
}

/// A domain submitted by [`define_domain!`](crate::define_domain!).
#[doc(hidden)]
pub struct DefinedDomain(pub &'static Domain);

inventory::collect!(DefinedDomain);

static REGISTRY: SpinRwLock<Vec<&'static Domain>> = SpinRwLock::new(Vec::new());
static COLLECTED: Once = Once::new();

/// Adds `domain` to the registry.  Registering the same domain twice is a
/// no-op.  Domains made by [`define_domain!`](crate::define_domain!) are
/// already registered; this is for domains built some other way.
#[inline]
pub fn register_domain(domain: &'static Domain) {
    if domain.registered.load(Ordering::Relaxed) {
        return;
    }
    register_slow(domain);
}

#[cold]
fn register_slow(domain: &'static Domain) {
    collect_defined_domains();
    append(domain);
}

fn append(domain: &'static Domain) {
    if domain
        .registered
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Relaxed)
        .is_ok()
    {
        REGISTRY.write().push(domain);
    }
}

/// Moves every defined domain into the registry: the built-in domain first,
/// then the rest ordered by name.  Link order is unspecified, so sorting keeps
/// iteration stable from run to run.
fn collect_defined_domains() {
    COLLECTED.call_once(|| {
        append(&crate::domains::Default::DOMAIN);
        let mut defined: Vec<&'static Domain> =
            inventory::iter::<DefinedDomain>.into_iter().map(|d| d.0).collect();
        defined.sort_by_key(|d| d.name);
        for domain in defined {
            append(domain);
        }
    });
}

fn registry_snapshot() -> Vec<&'static Domain> {
    collect_defined_domains();
    REGISTRY.read().clone()
}

/// Finds a registered domain by name.  Where two domains share a name the
/// first one registered wins.
pub fn find_domain(name: &str) -> Option<&'static Domain> {
    let hash = fnv1a(name);
    registry_snapshot()
        .into_iter()
        .find(|d| d.name_hash == hash && d.name == name)
}

/// Calls `visitor` for each registered domain in registration order, until it
/// returns `false`.  Returns how many domains were visited.
///
/// The visitor runs on a snapshot, so it may log or register domains itself.
pub fn iterate_all_domains<F>(mut visitor: F) -> usize
where
    F: FnMut(&'static Domain) -> bool,
{
    let mut visited = 0;
    for domain in registry_snapshot() {
        visited += 1;
        if !visitor(domain) {
            break;
        }
    }
    visited
}

/**
Declares a logging domain as a module.

```
richlog::define_domain!(pub Physics);
richlog::define_domain!(
    Audio,
    richlog::DomainOptions::named("Audio")
        .verbosity(richlog::Verbosity::Warning)
        .color(richlog::ColorStyle::Cyan)
);

assert_eq!(Physics::domain().name(), "Physics");
assert!(!Audio::domain().is_enabled(richlog::Verbosity::Info));
```

The generated module contains `OPTIONS`, `COMPILE_TIME_MIN`, the `DOMAIN`
static and `domain()`.  The domain is registered as soon as the program starts,
whether or not it is ever used.  Other modules reach the domain with a plain
`use`.

The options expression is evaluated inside the generated module, which
glob-imports its parent module.  Imports local to a function body are not
visible there, so spell out the path in that case.
*/
#[macro_export]
macro_rules! define_domain {
    ($vis:vis $name:ident) => {
        $crate::define_domain!($vis $name, $crate::DomainOptions::named(::std::stringify!($name)));
    };
    ($vis:vis $name:ident, $options:expr) => {
        #[allow(non_snake_case)]
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            pub const OPTIONS: $crate::DomainOptions = $options;
            pub const COMPILE_TIME_MIN: $crate::Verbosity = OPTIONS.compile_time_min_verbosity();
            pub static DOMAIN: $crate::Domain = $crate::Domain::new(OPTIONS);

            $crate::hidden::inventory::submit! {
                $crate::hidden::DefinedDomain(&DOMAIN)
            }

            #[inline]
            pub fn domain() -> &'static $crate::Domain {
                &DOMAIN
            }
        }
    };
}
