//! Branch-mapping resolution: parent branch -> submodule branch.
//!
//! The target branch of a submodule is a deterministic function of the
//! parent repository's current branch, via the submodule's declared
//! mappings. Priority: exact match, then wildcard match, then the
//! submodule's default branch.

use crate::core::config::Submodule;

/// Resolve the submodule branch for `parent_branch`.
///
/// 1. An exact key match returns the mapped value verbatim, even when that
///    value contains `*`.
/// 2. Otherwise keys containing a `*` wildcard are tried in key order. On
///    the first match the captured substring replaces a `*` in the target
///    (a literal target is returned unchanged).
/// 3. Otherwise the default branch.
///
/// Always returns a non-empty branch for a valid submodule.
pub fn resolve_branch(submodule: &Submodule, parent_branch: &str) -> String {
    if let Some(target) = submodule.branch_mappings.get(parent_branch) {
        return target.clone();
    }

    for (pattern, target) in &submodule.branch_mappings {
        if !pattern.contains('*') {
            continue;
        }
        if let Some(capture) = wildcard_capture(pattern, parent_branch) {
            return if target.contains('*') {
                target.replacen('*', &capture, 1)
            } else {
                target.clone()
            };
        }
    }

    submodule.default_branch.clone()
}

/// Whether `pattern` matches `branch`: equality for literal patterns,
/// prefix/suffix matching around a single `*` otherwise.
pub fn pattern_matches(pattern: &str, branch: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == branch;
    }
    wildcard_capture(pattern, branch).is_some()
}

/// Split `pattern` at its first `*` into `prefix*suffix` and return the
/// substring of `branch` between them, if `branch` matches. The wildcard
/// matches the empty string; prefix and suffix may not overlap.
fn wildcard_capture(pattern: &str, branch: &str) -> Option<String> {
    let star = pattern.find('*')?;
    let prefix = &pattern[..star];
    let suffix = &pattern[star + 1..];

    if branch.len() < prefix.len() + suffix.len() {
        return None;
    }
    if branch.starts_with(prefix) && branch.ends_with(suffix) {
        Some(branch[prefix.len()..branch.len() - suffix.len()].to_string())
    } else {
        None
    }
}
