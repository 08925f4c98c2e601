//! Host platform profile.
//!
//! Captures the host traits that drive ABI selection. Only the preferred
//! word width matters today; everything else about the target is fixed.

use std::process::Command;

use serde::{Deserialize, Serialize};

/// Architecture names that positively signal a 64-bit host.
const WIDE_ARCHES: &[&str] = &[
    "x86_64",
    "amd64",
    "aarch64",
    "arm64",
    "powerpc64",
    "riscv64",
    "s390x",
    "sparc64",
    "mips64",
    "loongarch64",
];

/// How the word-width preference was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidthSignal {
    /// The host reported a 64-bit architecture.
    Observed,
    /// Detection was inconclusive; the narrow default applies.
    Defaulted,
}

/// Host traits relevant to ABI resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformProfile {
    /// Whether the host prefers 64-bit code.
    pub prefers_64_bit: bool,
    /// Where the preference came from.
    pub signal: WidthSignal,
}

impl PlatformProfile {
    /// Profile for a host that prefers 64-bit code.
    pub fn wide() -> Self {
        Self {
            prefers_64_bit: true,
            signal: WidthSignal::Observed,
        }
    }

    /// The legacy 32-bit profile used when no wide signal is seen.
    pub fn narrow() -> Self {
        Self {
            prefers_64_bit: false,
            signal: WidthSignal::Defaulted,
        }
    }

    /// Inspect the running host.
    ///
    /// Asks the kernel for the machine name, so a 32-bit build of this tool
    /// on a 64-bit host still reports the host.
    pub fn detect() -> Self {
        Self::detect_with(host_machine)
    }

    /// Detect using `machine` as the source of the host machine name.
    ///
    /// A source that yields nothing gives the narrow profile.
    pub fn detect_with(machine: impl FnOnce() -> Option<String>) -> Self {
        match machine() {
            Some(machine) => Self::from_arch(machine.trim()),
            None => {
                tracing::debug!("host machine unknown, defaulting to 32-bit ABI");
                Self::narrow()
            }
        }
    }

    /// Derive a profile from an architecture name as reported by the host.
    ///
    /// Anything not known to be 64-bit falls back to the narrow profile.
    pub fn from_arch(arch: &str) -> Self {
        if WIDE_ARCHES.contains(&arch) {
            tracing::debug!(arch, "host prefers 64-bit code");
            Self::wide()
        } else {
            tracing::debug!(arch, "no 64-bit signal from host, defaulting to 32-bit ABI");
            Self::narrow()
        }
    }
}

/// Machine hardware name as reported by `uname -m`.
pub fn host_machine() -> Option<String> {
    let output = match Command::new("uname").arg("-m").output() {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("could not run uname: {e}");
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    let machine = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!machine.is_empty()).then_some(machine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_arches_are_observed() {
        for arch in ["x86_64", "aarch64", "riscv64"] {
            let p = PlatformProfile::from_arch(arch);
            assert!(p.prefers_64_bit, "{arch}");
            assert_eq!(p.signal, WidthSignal::Observed);
        }
    }

    #[test]
    fn narrow_and_unknown_arches_default() {
        for arch in ["x86", "arm", "", "mystery-cpu"] {
            let p = PlatformProfile::from_arch(arch);
            assert!(!p.prefers_64_bit, "{arch}");
            assert_eq!(p.signal, WidthSignal::Defaulted);
        }
    }

    #[test]
    fn macos_and_bsd_names_are_wide() {
        assert!(PlatformProfile::from_arch("arm64").prefers_64_bit);
        assert!(PlatformProfile::from_arch("amd64").prefers_64_bit);
    }

    #[test]
    fn unknown_machine_defaults_to_narrow() {
        assert_eq!(PlatformProfile::detect_with(|| None), PlatformProfile::narrow());
    }

    #[test]
    fn machine_name_is_trimmed() {
        let p = PlatformProfile::detect_with(|| Some("x86_64\n".to_string()));
        assert_eq!(p, PlatformProfile::wide());
    }

    #[test]
    fn host_machine_overrides_compiled_target() {
        // A 64-bit kernel wins regardless of what this binary was built for.
        let p = PlatformProfile::detect_with(|| Some("x86_64".to_string()));
        assert!(p.prefers_64_bit);
        let p = PlatformProfile::detect_with(|| Some("i686".to_string()));
        assert!(!p.prefers_64_bit);
    }

    #[test]
    fn detect_uses_host_machine() {
        assert_eq!(
            PlatformProfile::detect(),
            PlatformProfile::detect_with(host_machine)
        );
    }

    #[cfg(unix)]
    #[test]
    fn host_machine_reports_something() {
        let machine = host_machine().unwrap();
        assert!(!machine.contains('\n'));
    }
}
