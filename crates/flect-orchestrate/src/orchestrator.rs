//! The configure/install/test state machine.
//!
//! ```text
//! Idle -> Configuring -> Installing -> Done ------------> Terminal(Success)
//!                                  \-> Testing -> Done -/
//! any failure ----------------------------------------> Terminal(Failure)
//! ```
//!
//! `configure` and `test` are separate entry points that run only their own
//! step (`Idle -> Configuring -> Done`, `Idle -> Testing -> Done`).

use std::path::{Path, PathBuf};

use flect_targets::{
    resolve, resolve_layout, write_config, BuildDescriptor, InstallLayout, PlatformProfile,
    CONFIG_FILE_NAME,
};

use crate::build_system::BuildSystem;
use crate::error::{OrchestrateError, Result};
use crate::phase::Phase;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Success,
    Failure,
}

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Configuring,
    Installing,
    Testing,
    Done,
    Terminal(Terminal),
}

/// Caller-supplied inputs for a full run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// Absolute install prefix.
    pub prefix: PathBuf,
    /// Run the test phase after a successful install.
    pub run_tests: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub descriptor: BuildDescriptor,
    pub layout: InstallLayout,
    /// Location of the written `config.mak`.
    pub config_path: PathBuf,
    /// Phases that ran, in order.
    pub phases: Vec<Phase>,
}

/// Sequences configuration and build-system phases in one working directory.
pub struct Orchestrator<B> {
    work_dir: PathBuf,
    build_system: B,
    profile: Option<PlatformProfile>,
    state: State,
    history: Vec<State>,
}

impl<B: BuildSystem> Orchestrator<B> {
    /// Create an orchestrator that writes `config.mak` into `work_dir` and runs
    /// the build system there.
    pub fn new(work_dir: impl Into<PathBuf>, build_system: B) -> Self {
        Self {
            work_dir: work_dir.into(),
            build_system,
            profile: None,
            state: State::Idle,
            history: vec![State::Idle],
        }
    }

    /// Use `profile` instead of detecting the host.
    pub fn with_profile(mut self, profile: PlatformProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path of the configuration artifact.
    pub fn config_path(&self) -> PathBuf {
        self.work_dir.join(CONFIG_FILE_NAME)
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Every state visited by the most recent run, starting with `Idle`.
    pub fn history(&self) -> &[State] {
        &self.history
    }

    pub fn build_system(&self) -> &B {
        &self.build_system
    }

    /// Configure, install, and optionally test.
    pub fn run(&mut self, request: &RunRequest) -> Result<RunReport> {
        self.reset();
        let result = self.run_steps(request);
        self.conclude(result)
    }

    /// Write `config.mak` without touching the build system.
    pub fn configure(&mut self, prefix: &Path) -> Result<RunReport> {
        self.reset();
        let result = self.configure_steps(prefix);
        self.conclude(result)
    }

    /// Run the test phase against an already installed tree.
    pub fn test(&mut self) -> Result<()> {
        self.reset();
        let result = self.test_steps();
        self.conclude(result)
    }

    fn run_steps(&mut self, request: &RunRequest) -> Result<RunReport> {
        let mut report = self.configure_artifact(&request.prefix)?;

        self.transition(State::Installing);
        tracing::info!("Building and installing...");
        self.invoke(Phase::Install)?;
        report.phases.push(Phase::Install);

        if request.run_tests {
            self.transition(State::Testing);
            tracing::info!("Running test suite...");
            self.invoke(Phase::Test)?;
            report.phases.push(Phase::Test);
        }

        self.transition(State::Done);
        Ok(report)
    }

    fn configure_steps(&mut self, prefix: &Path) -> Result<RunReport> {
        let report = self.configure_artifact(prefix)?;
        self.transition(State::Done);
        Ok(report)
    }

    fn test_steps(&mut self) -> Result<()> {
        self.transition(State::Testing);
        tracing::info!("Running test suite...");
        self.invoke(Phase::Test)?;
        self.transition(State::Done);
        Ok(())
    }

    /// Detect, resolve, lay out, and write, in that order.
    fn configure_artifact(&mut self, prefix: &Path) -> Result<RunReport> {
        self.transition(State::Configuring);
        tracing::info!("Configuring the build...");

        let profile = self.profile.unwrap_or_else(PlatformProfile::detect);
        let descriptor = resolve(&profile);
        tracing::debug!(abi = %descriptor.abi, fp_abi = %descriptor.fp_abi, "resolved build descriptor");

        let layout = resolve_layout(prefix)?;
        let config_path = self.config_path();
        write_config(&descriptor, &layout, &config_path)?;
        tracing::info!("Wrote {}", config_path.display());

        Ok(RunReport {
            descriptor,
            layout,
            config_path,
            phases: Vec::new(),
        })
    }

    fn invoke(&mut self, phase: Phase) -> Result<()> {
        let outcome = self.build_system.run_phase(phase, &self.work_dir)?;
        if outcome.success() {
            Ok(())
        } else {
            Err(OrchestrateError::PhaseFailure {
                phase,
                exit_code: outcome.exit_code,
            })
        }
    }

    fn reset(&mut self) {
        self.state = State::Idle;
        self.history.clear();
        self.history.push(State::Idle);
    }

    fn transition(&mut self, next: State) {
        tracing::debug!(from = ?self.state, to = ?next, "state transition");
        self.state = next;
        self.history.push(next);
    }

    fn conclude<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.transition(State::Terminal(Terminal::Success)),
            Err(e) => {
                tracing::debug!(state = ?self.state, "run aborted: {e}");
                self.transition(State::Terminal(Terminal::Failure));
            }
        }
        result
    }
}
