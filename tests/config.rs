//SPDX-License-Identifier: MIT OR Apache-2.0

use richlog::config::{self, ConfigError};
use richlog::{ConsoleLogStyle, Verbosity, console_log_style};

richlog::define_domain!(Net);
richlog::define_domain!(Disk);

// One test per binary: it changes process-wide state and the environment.
#[test]
fn environment_and_bare_levels() {
    // neither domain has logged or been touched yet
    // SAFETY: this binary runs a single test, so no other thread reads the
    // environment concurrently
    unsafe {
        std::env::set_var(config::LOG_ENV, "error, Net=trace");
        std::env::set_var(config::STYLE_ENV, "brief");
    }
    config::configure_from_env().unwrap();

    assert_eq!(Net::DOMAIN.min_verbosity(), Verbosity::Trace);
    assert_eq!(Disk::DOMAIN.min_verbosity(), Verbosity::Error);
    assert_eq!(richlog::domains::Default::DOMAIN.min_verbosity(), Verbosity::Error);
    assert_eq!(console_log_style(), ConsoleLogStyle::Brief);

    config::apply_verbosity_spec("info").unwrap();
    assert_eq!(Net::DOMAIN.min_verbosity(), Verbosity::Info);

    // SAFETY: as above
    unsafe {
        std::env::set_var(config::STYLE_ENV, "sparkly");
    }
    assert!(matches!(config::configure_from_env(), Err(ConfigError::Style(_))));
    assert_eq!(console_log_style(), ConsoleLogStyle::Brief);
    assert_eq!(
        config::apply_verbosity_spec("Tape=debug")
            .unwrap_err()
            .to_string(),
        "no registered domain is named `Tape`"
    );
}
