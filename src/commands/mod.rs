//! Command implementations for the salt CLI.
//!
//! Each command is a linear pipeline: load config and state, run the
//! per-submodule steps in declaration order, persist state after every
//! successful mutation, and report. Skips warn and continue; errors
//! accumulate unless `--ci` makes the first one fatal.

pub mod add;
pub mod init;
pub mod pull;
pub mod push;
pub mod remove;
pub mod resolve;
pub mod status;
pub mod sync;

pub use add::{execute_add, AddArgs};
pub use init::{execute_init, InitArgs};
pub use pull::{execute_pull, PullArgs};
pub use push::{execute_push, PushArgs};
pub use remove::{execute_remove, RemoveArgs};
pub use resolve::{execute_resolve, ResolveArgs};
pub use status::{execute_status, StatusArgs};
pub use sync::{execute_sync, SyncArgs};

use crate::core::error::{Result, SaltError};
use crate::core::{print_error, print_warning};

/// Output options threaded into every command, initialized once from the
/// global CLI flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandContext {
    pub quiet: bool,
    pub verbose: bool,
}

/// Per-run outcome accumulator for commands iterating over submodules.
///
/// Skip conditions print a warning and never affect the exit code. Errors
/// print immediately and are collected; under `--ci` the first error aborts
/// the run instead.
pub(crate) struct CommandReport {
    errors: Vec<(String, SaltError)>,
}

impl CommandReport {
    pub fn new() -> Self {
        CommandReport { errors: Vec::new() }
    }

    /// Record a per-submodule failure. Skips are downgraded to warnings;
    /// real errors abort immediately when `ci` is set.
    pub fn record(&mut self, name: &str, err: SaltError, ci: bool) -> Result<()> {
        if err.is_skip() {
            print_warning(&format!("Skipped '{name}': {err}"));
            return Ok(());
        }
        print_error(&format!("{name}: {err}"));
        if ci {
            return Err(err);
        }
        self.errors.push((name.to_string(), err));
        Ok(())
    }

    /// Finish the run: `Ok` when every submodule succeeded or was skipped,
    /// otherwise the accumulated error with the highest exit code.
    pub fn finish(self) -> Result<()> {
        let count = self.errors.len();
        match self.errors.into_iter().max_by_key(|(_, e)| e.exit_code()) {
            None => Ok(()),
            Some((_, worst)) => {
                print_error(&format!("{count} submodule(s) failed"));
                Err(worst)
            }
        }
    }
}

/// Select the submodules a command operates on: all of them, or the one
/// named on the command line.
pub(crate) fn select_submodules<'a>(
    config: &'a crate::core::SaltConfig,
    name: Option<&str>,
) -> Result<Vec<&'a crate::core::Submodule>> {
    match name {
        Some(name) => {
            let sub = config
                .find(name)
                .ok_or_else(|| SaltError::submodule_not_found(name))?;
            Ok(vec![sub])
        }
        None => Ok(config.submodules.iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_skips_never_fail() -> Result<()> {
        let mut report = CommandReport::new();
        report.record("x", SaltError::no_changes("x"), false)?;
        report.record("y", SaltError::no_changes("y"), true)?;
        report.finish()
    }

    #[test]
    fn test_report_accumulates_without_ci() {
        let mut report = CommandReport::new();
        report
            .record("x", SaltError::merge_conflict("boom"), false)
            .unwrap();
        report
            .record("y", SaltError::ConfigNotFound, false)
            .unwrap();
        let err = report.finish().unwrap_err();
        // Highest exit code wins: MergeConflict (3) over ConfigNotFound (2).
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_report_fails_fast_under_ci() {
        let mut report = CommandReport::new();
        let err = report
            .record("x", SaltError::merge_conflict("boom"), true)
            .unwrap_err();
        assert!(matches!(err, SaltError::MergeConflict { .. }));
    }

    #[test]
    fn test_select_submodules_unknown_name() {
        let config = crate::core::SaltConfig::default();
        let err = select_submodules(&config, Some("ghost")).unwrap_err();
        assert!(matches!(err, SaltError::SubmoduleNotFound { .. }));
    }

    #[test]
    fn test_select_submodules_preserves_declaration_order() -> Result<()> {
        let mut config = crate::core::SaltConfig::default();
        for name in ["zeta", "alpha", "mid"] {
            config.upsert(crate::core::Submodule::new(name, name, "u", "main"));
        }
        let all = select_submodules(&config, None)?;
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        Ok(())
    }
}
