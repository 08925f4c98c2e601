//! The `config.mak` configuration artifact.
//!
//! The artifact is a makefile fragment of exported conditional assignments,
//! one per line:
//!
//! ```text
//! export FLECT_ARCH ?= x86
//! export FLECT_OS ?= darwin
//! ...
//! export FLECT_LD_ARGS ?=
//! ...
//! ```
//!
//! `?=` only assigns when the variable is not already defined, so a value
//! exported in the operator's environment wins over the generated default.
//! `export` hands the result to every command a recipe starts.

use std::fs;
use std::path::Path;

use crate::descriptor::BuildDescriptor;
use crate::error::{Result, TargetError};
use crate::layout::InstallLayout;

const EXPORT: &str = "export ";

/// File name of the artifact, relative to the build's working directory.
pub const CONFIG_FILE_NAME: &str = "config.mak";

/// Keys of the artifact, in the order they are written.
pub const CONFIG_KEYS: [&str; 16] = [
    "FLECT_ARCH",
    "FLECT_OS",
    "FLECT_ABI",
    "FLECT_FPABI",
    "FLECT_CROSS",
    "FLECT_CC",
    "FLECT_CC_TYPE",
    "FLECT_CC_ARGS",
    "FLECT_LD",
    "FLECT_LD_TYPE",
    "FLECT_LD_ARGS",
    "FLECT_PREFIX",
    "FLECT_BIN_DIR",
    "FLECT_LIB_DIR",
    "FLECT_ST_LIB_DIR",
    "FLECT_SH_LIB_DIR",
];

/// One `KEY ?= VALUE` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

fn values(descriptor: &BuildDescriptor, layout: &InstallLayout) -> [String; 16] {
    [
        descriptor.arch.clone(),
        descriptor.os.clone(),
        descriptor.abi.to_string(),
        descriptor.fp_abi.to_string(),
        descriptor.cross.to_string(),
        descriptor.compiler.clone(),
        descriptor.compiler_type.clone(),
        descriptor.compiler_args.clone(),
        descriptor.linker.clone(),
        descriptor.linker_type.clone(),
        descriptor.linker_args.clone(),
        layout.prefix().display().to_string(),
        layout.bin_dir().display().to_string(),
        layout.lib_dir().display().to_string(),
        layout.static_lib_dir().display().to_string(),
        layout.shared_lib_dir().display().to_string(),
    ]
}

/// Render the artifact text.
pub fn render_config(descriptor: &BuildDescriptor, layout: &InstallLayout) -> String {
    let mut out = String::new();
    for (key, value) in CONFIG_KEYS.iter().zip(values(descriptor, layout)) {
        out.push_str(EXPORT);
        out.push_str(key);
        out.push_str(" ?=");
        if !value.is_empty() {
            out.push(' ');
            out.push_str(&value);
        }
        out.push('\n');
    }
    out
}

/// Write the artifact to `dest`, replacing any existing file.
///
/// The parent directory must already exist.
pub fn write_config(
    descriptor: &BuildDescriptor,
    layout: &InstallLayout,
    dest: &Path,
) -> Result<()> {
    let text = render_config(descriptor, layout);
    fs::write(dest, text).map_err(|source| TargetError::WriteFailure {
        path: dest.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %dest.display(), "wrote build configuration");
    Ok(())
}

/// Parse artifact text into its assignments, in file order.
///
/// Blank lines and `#` comments are skipped so that hand-annotated files
/// still load. The `export` keyword is optional.
pub fn parse_config(text: &str) -> Result<Vec<ConfigEntry>> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = |detail: &str| TargetError::MalformedArtifact {
            line: idx + 1,
            detail: detail.to_string(),
        };

        let assignment = line.strip_prefix(EXPORT).unwrap_or(line);
        let (key, value) = assignment
            .split_once("?=")
            .ok_or_else(|| malformed("expected `KEY ?= VALUE`"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(malformed("missing key"));
        }
        if !key
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(malformed(&format!("invalid key '{key}'")));
        }
        entries.push(ConfigEntry {
            key: key.to_string(),
            value: value.trim().to_string(),
        });
    }
    Ok(entries)
}

/// Load and parse an artifact from disk.
pub fn read_config(path: &Path) -> Result<Vec<ConfigEntry>> {
    let text = fs::read_to_string(path)?;
    parse_config(&text)
}
