//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for a sync status label in the output
pub fn has_status(status: &str) -> impl Predicate<str> {
    predicates::str::contains(status.to_string())
}

/// Creates a predicate matching the skipped-submodule warning line
pub fn skipped(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Skipped '{name}'"))
}

/// Creates a predicate for the missing-config error
pub fn config_not_found() -> impl Predicate<str> {
    predicates::str::contains("No salt.conf found")
}

/// Creates a predicate for the parent-branch header of status output
pub fn has_parent_branch(branch: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("Parent branch: {branch}"))
}
