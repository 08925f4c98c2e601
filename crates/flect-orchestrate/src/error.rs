//! Orchestration error types.

use flect_targets::TargetError;

use crate::phase::Phase;

/// Errors that abort an orchestrated run.
#[derive(Debug, thiserror::Error)]
pub enum OrchestrateError {
    /// Configuration could not be resolved or written.
    #[error(transparent)]
    Target(#[from] TargetError),

    /// A build-system phase exited unsuccessfully.
    #[error("{phase} phase failed: {}", describe_exit(.exit_code))]
    PhaseFailure {
        phase: Phase,
        /// Exit status, or `None` when the child was killed by a signal.
        exit_code: Option<i32>,
    },

    /// The build-system process could not be started.
    #[error("failed to start '{program}' for the {phase} phase: {source}")]
    Spawn {
        phase: Phase,
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl OrchestrateError {
    /// Exit status of the failed phase, if the child reported one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            OrchestrateError::PhaseFailure { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for orchestration.
pub type Result<T> = std::result::Result<T, OrchestrateError>;
