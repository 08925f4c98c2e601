//! `flect-pkg show-config` — print the current `config.mak`.

use std::path::Path;

use anyhow::{Context, Result};
use flect_targets::{read_config, ConfigEntry, CONFIG_FILE_NAME, CONFIG_KEYS};

/// Parse and print the artifact in `project_dir`, flagging any key the
/// environment currently overrides.
pub fn run(project_dir: &Path) -> Result<()> {
    let path = project_dir.join(CONFIG_FILE_NAME);
    let entries = read_config(&path)
        .with_context(|| format!("reading {} (run `flect-pkg configure` first)", path.display()))?;

    println!("{}:", path.display());
    for line in render(&entries, |key| std::env::var(key).ok()) {
        println!("  {line}");
    }

    for key in missing_keys(&entries) {
        eprintln!("warning: {key} is not set in {}", path.display());
    }
    Ok(())
}

/// One display line per entry; environment overrides are shown next to the default.
fn render(entries: &[ConfigEntry], env: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);
    entries
        .iter()
        .map(|e| match env(&e.key) {
            Some(value) => format!(
                "{:<width$} = {}  (environment; default {})",
                e.key, value, e.value
            ),
            None => format!("{:<width$} = {}", e.key, e.value),
        })
        .collect()
}

fn missing_keys(entries: &[ConfigEntry]) -> Vec<&'static str> {
    CONFIG_KEYS
        .iter()
        .copied()
        .filter(|key| !entries.iter().any(|e| e.key == *key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flect_targets::parse_config;

    #[test]
    fn environment_override_is_flagged() {
        let entries = parse_config("FLECT_CC ?= clang\nFLECT_LD ?= ld\n").unwrap();
        let lines = render(&entries, |key| (key == "FLECT_CC").then(|| "gcc-13".to_string()));
        assert_eq!(lines[0], "FLECT_CC = gcc-13  (environment; default clang)");
        assert_eq!(lines[1], "FLECT_LD = ld");
    }

    #[test]
    fn reports_missing_keys() {
        let entries = parse_config("FLECT_ARCH ?= x86\n").unwrap();
        let missing = missing_keys(&entries);
        assert_eq!(missing.len(), 15);
        assert!(!missing.contains(&"FLECT_ARCH"));
    }

    #[test]
    fn missing_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("flect-pkg configure"));
    }

    #[test]
    fn shows_written_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let descriptor = flect_targets::resolve(&flect_targets::PlatformProfile::wide());
        let layout = flect_targets::resolve_layout("/opt/flect").unwrap();
        flect_targets::write_config(&descriptor, &layout, &dir.path().join(CONFIG_FILE_NAME))
            .unwrap();
        assert!(run(dir.path()).is_ok());
    }
}
