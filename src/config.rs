// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run-time verbosity and console configuration.
//!
//! A verbosity spec is a comma-separated list of directives.  `Name=level`
//! sets the minimum verbosity of one domain; a bare `level` sets it for
//! every registered domain.  Directives apply left to right, so
//! `"warning,Net=trace"` quiets everything except `Net`.
//!
//! Every domain made by [`define_domain!`](crate::define_domain!) is
//! registered from program start, so a spec read in `main` can name domains
//! that have not logged yet.
//!
//! ```standalone_crate
//! use richlog::Verbosity;
//!
//! richlog::define_domain!(Net);
//!
//! richlog::config::apply_verbosity_spec("Net=trace").unwrap();
//! assert_eq!(Net::DOMAIN.min_verbosity(), Verbosity::Trace);
//!
//! assert!(richlog::config::apply_verbosity_spec("Nowhere=debug").is_err());
//! ```

use crate::console::{self, ConsoleLogStyle, ParseStyleError};
use crate::domain::{self, Domain};
use crate::verbosity::{ParseVerbosityError, Verbosity};

/// Environment variable holding a verbosity spec.
pub const LOG_ENV: &str = "RICH_LOG";
/// Environment variable holding a [`ConsoleLogStyle`] name.
pub const STYLE_ENV: &str = "RICH_LOG_STYLE";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no registered domain is named `{0}`")]
    UnknownDomain(String),
    #[error("malformed directive `{0}` (expected `Domain=level` or `level`)")]
    Malformed(String),
    #[error(transparent)]
    Verbosity(#[from] ParseVerbosityError),
    #[error(transparent)]
    Style(#[from] ParseStyleError),
}

enum Directive {
    All(Verbosity),
    One(&'static Domain, Verbosity),
}

fn parse_directive(token: &str) -> Result<Directive, ConfigError> {
    match token.split_once('=') {
        None => Ok(Directive::All(token.parse()?)),
        Some((name, level)) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::Malformed(token.to_string()));
            }
            let level: Verbosity = level.parse()?;
            let domain =
                domain::find_domain(name).ok_or_else(|| ConfigError::UnknownDomain(name.to_string()))?;
            Ok(Directive::One(domain, level))
        }
    }
}

/// Applies a verbosity spec.  Nothing is changed unless every directive is
/// valid.
pub fn apply_verbosity_spec(spec: &str) -> Result<(), ConfigError> {
    let directives = spec
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_directive)
        .collect::<Result<Vec<_>, _>>()?;

    for directive in directives {
        match directive {
            Directive::All(level) => {
                domain::iterate_all_domains(|domain| {
                    domain.set_min_verbosity(level);
                    true
                });
            }
            Directive::One(domain, level) => domain.set_min_verbosity(level),
        }
    }
    Ok(())
}

fn configure(log: Option<&str>, style: Option<&str>) -> Result<(), ConfigError> {
    // parse the style first so a bad style leaves verbosity untouched too
    let style = style.map(str::parse::<ConsoleLogStyle>).transpose()?;
    if let Some(spec) = log {
        apply_verbosity_spec(spec)?;
    }
    if let Some(style) = style {
        console::set_console_log_style(style);
    }
    Ok(())
}

/// Reads [`LOG_ENV`] and [`STYLE_ENV`].  Unset (or non-Unicode) variables
/// are skipped.
pub fn configure_from_env() -> Result<(), ConfigError> {
    let log = std::env::var(LOG_ENV).ok();
    let style = std::env::var(STYLE_ENV).ok();
    configure(log.as_deref(), style.as_deref())
}
