//! `flect-pkg configure`, `install`, and `test` — drive the make-based build.

use anyhow::{Context, Result};
use flect_orchestrate::{Make, Orchestrator, RunReport, RunRequest};

use crate::manifest::Settings;

/// Write `config.mak` only.
pub fn configure(settings: &Settings) -> Result<()> {
    let prefix = settings.require_prefix()?;
    let mut orchestrator = orchestrator(settings);
    let report = orchestrator
        .configure(prefix)
        .context("configuring the build")?;
    print_configuration(&report);
    Ok(())
}

/// Configure, install, and optionally run the test suite.
pub fn install(settings: &Settings) -> Result<()> {
    let request = RunRequest {
        prefix: settings.require_prefix()?.to_path_buf(),
        run_tests: settings.run_tests,
    };
    let mut orchestrator = orchestrator(settings);
    let report = orchestrator.run(&request)?;

    print_configuration(&report);
    let phases: Vec<String> = report.phases.iter().map(ToString::to_string).collect();
    println!("Completed: {}", phases.join(", "));
    println!("Installed to {}", report.layout.prefix().display());
    Ok(())
}

/// Run the test suite of an already installed tree.
pub fn test(settings: &Settings) -> Result<()> {
    let mut orchestrator = orchestrator(settings);
    orchestrator.test()?;
    println!("Test suite passed");
    Ok(())
}

fn orchestrator(settings: &Settings) -> Orchestrator<Make> {
    Orchestrator::new(&settings.project_dir, Make::new(&settings.program))
}

fn print_configuration(report: &RunReport) {
    let d = &report.descriptor;
    println!("Configuration: {}", report.config_path.display());
    println!(
        "  Target: {}-{} ({}, {}-bit, {})",
        d.arch,
        d.os,
        d.abi,
        d.word_size(),
        d.fp_abi
    );
    println!("  Prefix: {}", report.layout.prefix().display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn settings(dir: &Path, program: &str, prefix: Option<&str>, run_tests: bool) -> Settings {
        Settings {
            project_dir: dir.to_path_buf(),
            prefix: prefix.map(PathBuf::from),
            program: program.to_string(),
            run_tests,
        }
    }

    #[test]
    fn configure_writes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        configure(&settings(dir.path(), "make", Some("/opt/flect"), false)).unwrap();
        let entries = flect_targets::read_config(&dir.path().join("config.mak")).unwrap();
        assert_eq!(entries.len(), 16);
    }

    #[test]
    fn configure_requires_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let err = configure(&settings(dir.path(), "make", None, false)).unwrap_err();
        assert!(err.to_string().contains("--prefix"));
        assert!(!dir.path().join("config.mak").exists());
    }

    #[cfg(unix)]
    #[test]
    fn install_with_succeeding_build_tool() {
        let dir = tempfile::tempdir().unwrap();
        install(&settings(dir.path(), "true", Some("/opt/flect"), true)).unwrap();
        assert!(dir.path().join("config.mak").is_file());
    }

    #[cfg(unix)]
    #[test]
    fn install_with_failing_build_tool() {
        let dir = tempfile::tempdir().unwrap();
        let err = install(&settings(dir.path(), "false", Some("/opt/flect"), false)).unwrap_err();
        let orch_err = err
            .downcast_ref::<flect_orchestrate::OrchestrateError>()
            .unwrap();
        assert_eq!(orch_err.exit_code(), Some(1));
    }

    #[test]
    fn relative_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = install(&settings(dir.path(), "true", Some("opt/flect"), false)).unwrap_err();
        assert!(format!("{err:#}").contains("invalid install prefix"));
        assert!(!dir.path().join("config.mak").exists());
    }
}
