//! `flect-pkg.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use flect_orchestrate::DEFAULT_PROGRAM;

/// Manifest file name, looked up from the current directory upward.
pub const MANIFEST_FILE_NAME: &str = "flect-pkg.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PkgManifest {
    /// Installation settings.
    #[serde(default)]
    pub install: InstallConfig,
    /// Build-system settings.
    #[serde(default)]
    pub build: BuildConfig,
}

/// `[install]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallConfig {
    /// Default install prefix.
    #[serde(default)]
    pub prefix: Option<PathBuf>,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Build-system executable (default: `make`).
    #[serde(default)]
    pub program: Option<String>,
    /// Run the test phase after installing.
    #[serde(default)]
    pub run_tests: bool,
}

impl PkgManifest {
    /// Search upward from `start_dir` for a manifest, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: PkgManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing flect-pkg.toml")
    }

    /// The build-system program, falling back to `make`.
    pub fn program(&self) -> &str {
        self.build.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }
}

/// Settings for one invocation, after merging CLI flags over the manifest.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where `config.mak` is written and the build system runs.
    pub project_dir: PathBuf,
    pub prefix: Option<PathBuf>,
    pub program: String,
    pub run_tests: bool,
}

impl Settings {
    /// Merge a manifest (if any) with command-line overrides.
    pub fn resolve(
        cwd: &Path,
        found: Option<(PkgManifest, PathBuf)>,
        prefix: Option<PathBuf>,
        program: Option<String>,
        run_tests: bool,
    ) -> Self {
        let (manifest, project_dir) = match found {
            Some((manifest, dir)) => (manifest, dir),
            None => (PkgManifest::default(), cwd.to_path_buf()),
        };

        Self {
            prefix: prefix.or_else(|| manifest.install.prefix.clone()),
            program: program.unwrap_or_else(|| manifest.program().to_string()),
            run_tests: run_tests || manifest.build.run_tests,
            project_dir,
        }
    }

    /// The install prefix, or an error naming both ways to supply it.
    pub fn require_prefix(&self) -> Result<&Path> {
        self.prefix.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "no install prefix: pass --prefix or set `prefix` under [install] in {MANIFEST_FILE_NAME}"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let toml_str = r#"
[install]
prefix = "/opt/flect"

[build]
program = "gmake"
run-tests = true
"#;
        let manifest = PkgManifest::from_str(toml_str).unwrap();
        assert_eq!(manifest.install.prefix.as_deref(), Some(Path::new("/opt/flect")));
        assert_eq!(manifest.program(), "gmake");
        assert!(manifest.build.run_tests);
    }

    #[test]
    fn parse_empty_manifest() {
        let manifest = PkgManifest::from_str("").unwrap();
        assert!(manifest.install.prefix.is_none());
        assert_eq!(manifest.program(), "make");
        assert!(!manifest.build.run_tests);
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(PkgManifest::from_str("this is not valid toml [[[").is_err());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE_NAME),
            "[install]\nprefix = \"/usr/local\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = PkgManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found_dir, dir.path());
        assert_eq!(manifest.install.prefix.as_deref(), Some(Path::new("/usr/local")));
    }

    #[test]
    fn cli_flags_override_manifest() {
        let manifest = PkgManifest::from_str(
            "[install]\nprefix = \"/usr/local\"\n[build]\nprogram = \"gmake\"\n",
        )
        .unwrap();
        let settings = Settings::resolve(
            Path::new("/work"),
            Some((manifest, PathBuf::from("/src/flect"))),
            Some(PathBuf::from("/opt/flect")),
            Some("bmake".into()),
            false,
        );
        assert_eq!(settings.project_dir, Path::new("/src/flect"));
        assert_eq!(settings.prefix.as_deref(), Some(Path::new("/opt/flect")));
        assert_eq!(settings.program, "bmake");
        assert!(!settings.run_tests);
    }

    #[test]
    fn manifest_fills_missing_flags() {
        let manifest = PkgManifest::from_str(
            "[install]\nprefix = \"/usr/local\"\n[build]\nrun-tests = true\n",
        )
        .unwrap();
        let settings = Settings::resolve(
            Path::new("/work"),
            Some((manifest, PathBuf::from("/src/flect"))),
            None,
            None,
            false,
        );
        assert_eq!(settings.prefix.as_deref(), Some(Path::new("/usr/local")));
        assert_eq!(settings.program, "make");
        assert!(settings.run_tests);
    }

    #[test]
    fn no_manifest_uses_cwd() {
        let settings = Settings::resolve(Path::new("/work"), None, None, None, false);
        assert_eq!(settings.project_dir, Path::new("/work"));
        assert!(settings.require_prefix().is_err());
    }
}
