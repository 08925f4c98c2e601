//! flect-pkg — configure, install, and test the Flect toolchain from source.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use flect_orchestrate::OrchestrateError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use manifest::{PkgManifest, Settings};

#[derive(Parser)]
#[command(name = "flect-pkg", version, about = "Build and install the Flect toolchain")]
struct Cli {
    /// Enable debug logging (on top of any RUST_LOG filter)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write config.mak for this host without building
    Configure {
        /// Absolute install prefix
        #[arg(long)]
        prefix: Option<PathBuf>,
    },
    /// Configure, then build and install with make
    Install {
        /// Absolute install prefix
        #[arg(long)]
        prefix: Option<PathBuf>,
        /// Run the test suite after installing
        #[arg(long)]
        test: bool,
        /// Build-system executable (default: make)
        #[arg(long)]
        make: Option<String>,
    },
    /// Run the test suite of an installed tree (make test -j 1)
    Test {
        /// Build-system executable (default: make)
        #[arg(long)]
        make: Option<String>,
    },
    /// Show the resolved build configuration for this host
    Describe {
        /// Absolute install prefix (adds the install layout)
        #[arg(long)]
        prefix: Option<PathBuf>,
        /// Output format (human, toml, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Print the current config.mak and any environment overrides
    ShowConfig,
    /// Check the host and build prerequisites
    Doctor,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        process::exit(exit_status(&e));
    }
}

fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(log_filter(EnvFilter::try_from_default_env().ok(), verbose))
        .init();
}

/// `RUST_LOG` (or `info`) as the base; `--verbose` raises it to at least debug.
fn log_filter(from_env: Option<EnvFilter>, verbose: bool) -> EnvFilter {
    let filter = from_env.unwrap_or_else(|| EnvFilter::new("info"));
    // A root directive replaces the one already there, so leave `trace` alone.
    if verbose && filter.max_level_hint() != Some(LevelFilter::TRACE) {
        filter.add_directive(LevelFilter::DEBUG.into())
    } else {
        filter
    }
}

/// A failed build phase exits with the child's own status; anything else with 1.
fn exit_status(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<OrchestrateError>()
        .and_then(OrchestrateError::exit_code)
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Configure { prefix } => {
            let settings = load_settings(&cwd, prefix, None, false)?;
            commands::build::configure(&settings)
        }

        Commands::Install { prefix, test, make } => {
            let settings = load_settings(&cwd, prefix, make, test)?;
            commands::build::install(&settings)
        }

        Commands::Test { make } => {
            let settings = load_settings(&cwd, None, make, true)?;
            commands::build::test(&settings)
        }

        Commands::Describe { prefix, format } => {
            let settings = load_settings(&cwd, prefix, None, false)?;
            commands::describe::run(settings.prefix.as_deref(), format.as_deref())
        }

        Commands::ShowConfig => {
            let settings = load_settings(&cwd, None, None, false)?;
            commands::show_config::run(&settings.project_dir)
        }

        Commands::Doctor => {
            let settings = load_settings(&cwd, None, None, false)?;
            commands::doctor::run(&settings.project_dir, &settings.program)
        }
    }
}

/// Find the manifest (if any) from `cwd` upward and merge CLI overrides into it.
fn load_settings(
    cwd: &Path,
    prefix: Option<PathBuf>,
    program: Option<String>,
    run_tests: bool,
) -> anyhow::Result<Settings> {
    let found = PkgManifest::find_and_load(cwd)?;
    if let Some((_, dir)) = &found {
        tracing::debug!("using {} in {}", manifest::MANIFEST_FILE_NAME, dir.display());
    }
    Ok(Settings::resolve(cwd, found, prefix, program, run_tests))
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Full workflow: configure → show-config → install → test.
    #[cfg(unix)]
    #[test]
    fn configure_install_test_workflow() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(manifest::MANIFEST_FILE_NAME),
            "[install]\nprefix = \"/opt/flect\"\n\n[build]\nprogram = \"true\"\n",
        )
        .unwrap();

        let settings = load_settings(dir.path(), None, None, false).unwrap();
        assert_eq!(settings.project_dir, dir.path());
        assert_eq!(settings.program, "true");

        commands::build::configure(&settings).unwrap();
        commands::show_config::run(&settings.project_dir).unwrap();
        commands::build::install(&settings).unwrap();
        commands::build::test(&settings).unwrap();

        let text = std::fs::read_to_string(dir.path().join("config.mak")).unwrap();
        assert!(text.contains("FLECT_PREFIX ?= /opt/flect\n"));
    }

    #[cfg(unix)]
    #[test]
    fn phase_failure_sets_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::resolve(
            dir.path(),
            None,
            Some(PathBuf::from("/opt/flect")),
            Some("false".into()),
            false,
        );
        let err = commands::build::install(&settings).unwrap_err();
        assert_eq!(exit_status(&err), 1);
    }

    #[test]
    fn default_filter_is_info() {
        assert_eq!(log_filter(None, false).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn verbose_overrides_quiet_rust_log() {
        let from_env = EnvFilter::new("warn");
        assert_eq!(
            log_filter(Some(from_env), true).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn verbose_keeps_trace() {
        let from_env = EnvFilter::new("trace");
        assert_eq!(
            log_filter(Some(from_env), true).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn rust_log_kept_without_verbose() {
        let from_env = EnvFilter::new("warn");
        assert_eq!(
            log_filter(Some(from_env), false).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = anyhow::anyhow!("no install prefix");
        assert_eq!(exit_status(&err), 1);

        let err = anyhow::Error::new(OrchestrateError::PhaseFailure {
            phase: flect_orchestrate::Phase::Install,
            exit_code: Some(2),
        });
        assert_eq!(exit_status(&err), 2);

        let err = anyhow::Error::new(OrchestrateError::PhaseFailure {
            phase: flect_orchestrate::Phase::Test,
            exit_code: None,
        });
        assert_eq!(exit_status(&err), 1);
    }
}
