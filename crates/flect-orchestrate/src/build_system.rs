//! The external build system.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use crate::error::{OrchestrateError, Result};
use crate::phase::{Phase, PhaseOutcome};

/// Program invoked when none is configured.
pub const DEFAULT_PROGRAM: &str = "make";

/// Something that can run a build phase to completion.
pub trait BuildSystem {
    /// Run `phase` in `dir`, blocking until it finishes.
    ///
    /// A non-zero exit is reported through the outcome, not as an error;
    /// errors mean the phase could not be started at all.
    fn run_phase(&mut self, phase: Phase, dir: &Path) -> Result<PhaseOutcome>;
}

/// Runs phases as `make` child processes that inherit stdio.
#[derive(Debug, Clone)]
pub struct Make {
    program: OsString,
}

impl Make {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Build the command for `phase` without running it.
    pub fn command(&self, phase: Phase, dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(phase.args()).current_dir(dir);
        cmd
    }
}

impl Default for Make {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl BuildSystem for Make {
    fn run_phase(&mut self, phase: Phase, dir: &Path) -> Result<PhaseOutcome> {
        let mut cmd = self.command(phase, dir);
        tracing::debug!("Running command: {:?}", cmd);

        let status = cmd.status().map_err(|source| OrchestrateError::Spawn {
            phase,
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;
        tracing::debug!(%phase, ?status, "phase finished");

        Ok(PhaseOutcome {
            exit_code: status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_program_is_make() {
        assert_eq!(Make::default().program(), "make");
    }

    #[test]
    fn test_command_pins_jobs() {
        let make = Make::default();
        let cmd = make.command(Phase::Test, Path::new("/tmp"));
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, ["test", "-j", "1"]);
        assert_eq!(cmd.get_current_dir(), Some(Path::new("/tmp")));
    }

    #[test]
    fn install_command_has_only_target() {
        let make = Make::new("gmake");
        let cmd = make.command(Phase::Install, Path::new("/src"));
        assert_eq!(cmd.get_program(), "gmake");
        let args: Vec<&OsStr> = cmd.get_args().collect();
        assert_eq!(args, ["install"]);
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut make = Make::new("flect-no-such-build-tool");
        let err = make.run_phase(Phase::Install, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            OrchestrateError::Spawn {
                phase: Phase::Install,
                ..
            }
        ));
    }
}
