//! Installation layout derived from an install prefix.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, TargetError};

/// Product name used for the library subdirectory.
pub const PRODUCT: &str = "flect";

/// Installation directories. Every path is a function of the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct InstallLayout {
    prefix: PathBuf,
    bin_dir: PathBuf,
    lib_dir: PathBuf,
    static_lib_dir: PathBuf,
    shared_lib_dir: PathBuf,
}

impl InstallLayout {
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    pub fn static_lib_dir(&self) -> &Path {
        &self.static_lib_dir
    }

    pub fn shared_lib_dir(&self) -> &Path {
        &self.shared_lib_dir
    }
}

/// Characters make reads as syntax inside a variable value: `#` starts a
/// comment, `$` a reference, and a trailing `\` continues the line.
const MAKE_SPECIAL: &[char] = &['#', '$', '\\'];

fn check_prefix(prefix: &Path) -> std::result::Result<(), &'static str> {
    if prefix.as_os_str().is_empty() || !prefix.is_absolute() {
        return Err("must be a non-empty absolute path");
    }
    let Some(text) = prefix.to_str() else {
        return Err("must be valid UTF-8");
    };
    if text.contains(MAKE_SPECIAL) {
        return Err("must not contain '#', '$' or '\\'");
    }
    if text.chars().any(char::is_control) {
        return Err("must not contain control characters");
    }
    Ok(())
}

/// Compute the install layout under `prefix`.
///
/// Fails with [`TargetError::InvalidPrefix`] if the prefix is empty, relative,
/// or holds characters that would change the meaning of `config.mak`.
pub fn resolve_layout(prefix: impl AsRef<Path>) -> Result<InstallLayout> {
    let prefix = prefix.as_ref();
    check_prefix(prefix).map_err(|reason| TargetError::InvalidPrefix {
        prefix: prefix.to_path_buf(),
        reason,
    })?;

    let lib_dir = prefix.join("lib").join(PRODUCT);
    Ok(InstallLayout {
        prefix: prefix.to_path_buf(),
        bin_dir: prefix.join("bin"),
        static_lib_dir: lib_dir.join("static"),
        shared_lib_dir: lib_dir.join("shared"),
        lib_dir,
    })
}
