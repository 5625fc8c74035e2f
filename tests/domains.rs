//SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

richlog::define_domain!(Test);
richlog::define_domain!(
    Other,
    richlog::DomainOptions::named("Other").description("a second domain")
);

// This binary must hold only one test: the registry is process-wide.
#[test]
fn lookup_and_iteration() {
    // Neither domain has been used; defining them is enough.
    let mut names = Vec::new();
    let visited = richlog::iterate_all_domains(|domain| {
        names.push(domain.name());
        true
    });
    assert_eq!(visited, 3);
    assert_eq!(names.first(), Some(&"Default"));
    assert_eq!(
        names.into_iter().collect::<BTreeSet<_>>(),
        BTreeSet::from(["Default", "Other", "Test"])
    );

    let other = richlog::find_domain("Other").unwrap();
    assert!(std::ptr::eq(other, &Other::DOMAIN));
    assert_eq!(other.description(), "a second domain");
    assert!(Test::DOMAIN.is_registered());
    assert!(richlog::find_domain("Missing").is_none());

    // registering again changes nothing
    richlog::register_domain(&Test::DOMAIN);
    assert_eq!(richlog::iterate_all_domains(|_| true), 3);

    // a spec applied before any logging reaches them
    richlog::config::apply_verbosity_spec("Test=trace").unwrap();
    assert_eq!(Test::DOMAIN.min_verbosity(), richlog::Verbosity::Trace);

    // the visitor can stop early
    let mut seen = 0;
    richlog::iterate_all_domains(|_| {
        seen += 1;
        false
    });
    assert_eq!(seen, 1);
}
