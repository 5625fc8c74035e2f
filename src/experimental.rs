// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces that may still change.

use crate::domain::Domain;
use crate::spinlock::SpinRwLock;
use std::sync::Arc;

/// Decides whether a message of a whitelisted domain is dispatched.  Called
/// with the domain name and the formatted message.
pub type WhitelistFilter = Arc<dyn Fn(&str, &str) -> bool + Send + Sync>;

static WHITELIST_FILTER: SpinRwLock<Option<WhitelistFilter>> = SpinRwLock::new(None);

/// Installs the filter for domains created with
/// [`DomainOptions::requires_whitelist`](crate::DomainOptions::requires_whitelist).
/// Without a filter, those domains are silent.
///
/// ```
/// use richlog::{MemoryLogger, scoped_logger_override};
/// use std::sync::Arc;
///
/// richlog::define_domain!(Chatty, richlog::DomainOptions::named("Chatty").requires_whitelist(true));
///
/// let logger = MemoryLogger::new();
/// let _guard = scoped_logger_override(logger.clone());
/// richlog::log!(Chatty, Info, "dropped");
///
/// richlog::experimental::set_whitelist_filter(Some(Arc::new(|_domain: &str, message: &str| {
///     message.starts_with("keep")
/// })));
/// richlog::log!(Chatty, Info, "keep me");
/// richlog::log!(Chatty, Info, "not me");
/// assert_eq!(logger.drain_logs(), "keep me");
/// ```
pub fn set_whitelist_filter(filter: Option<WhitelistFilter>) -> Option<WhitelistFilter> {
    std::mem::replace(&mut *WHITELIST_FILTER.write(), filter)
}

pub(crate) fn passes_whitelist(domain: &Domain, message: &str) -> bool {
    if !domain.requires_whitelist() {
        return true;
    }
    let filter = WHITELIST_FILTER.read().clone();
    filter.is_some_and(|filter| filter(domain.name(), message))
}
