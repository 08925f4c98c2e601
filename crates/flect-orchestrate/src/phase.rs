//! Build-system phases.

use std::fmt;

/// Parallelism the test phase is pinned to. Tests must not run concurrently.
pub const TEST_JOBS: u32 = 1;

/// A step of the external build system's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Build and install into the configured prefix.
    Install,
    /// Run the test suite.
    Test,
}

impl Phase {
    /// Target name passed to the build system.
    pub fn target(self) -> &'static str {
        match self {
            Phase::Install => "install",
            Phase::Test => "test",
        }
    }

    /// Full argument list for the build system.
    ///
    /// The test phase always carries an explicit `-j 1`, overriding whatever
    /// parallelism the build system would pick on its own.
    pub fn args(self) -> Vec<String> {
        match self {
            Phase::Install => vec![self.target().to_string()],
            Phase::Test => vec![
                self.target().to_string(),
                "-j".to_string(),
                TEST_JOBS.to_string(),
            ],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target())
    }
}

/// How a phase's child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseOutcome {
    /// Exit status; `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl PhaseOutcome {
    pub fn from_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}
