//! Build orchestration for the Flect toolchain.
//!
//! Drives an external, make-based build through its lifecycle:
//!
//! 1. **Configure** — detect the host, resolve the build descriptor and
//!    install layout, and write `config.mak`
//! 2. **Install** — `make install`
//! 3. **Test** (on request) — `make test -j 1`
//!
//! Every step runs sequentially and the first failure stops the run.
//! Nothing is retried or rolled back.

pub mod build_system;
pub mod error;
pub mod orchestrator;
pub mod phase;

pub use build_system::{BuildSystem, Make, DEFAULT_PROGRAM};
pub use error::{OrchestrateError, Result};
pub use orchestrator::{Orchestrator, RunReport, RunRequest, State, Terminal};
pub use phase::{Phase, PhaseOutcome, TEST_JOBS};
