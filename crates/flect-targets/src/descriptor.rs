//! Build descriptor.
//!
//! Maps a [`PlatformProfile`] to the architecture, ABI, and toolchain
//! parameters handed to the build system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TargetError;
use crate::platform::PlatformProfile;

/// Architecture family of every Flect build.
pub const ARCH: &str = "x86";
/// Target OS family.
pub const OS: &str = "darwin";
/// C compiler driver.
pub const COMPILER: &str = "clang";
/// Command-line flavour of the compiler.
pub const COMPILER_TYPE: &str = "gcc";
/// Linker executable.
pub const LINKER: &str = "ld";
/// Command-line flavour of the linker.
pub const LINKER_TYPE: &str = "ld";
/// Flag forcing 32-bit code generation on a 64-bit capable compiler.
const NARROW_CC_ARGS: &str = "-m32";

/// Calling convention of compiled code.
///
/// Serialized through [`Abi::as_str`], so the tag text lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum Abi {
    /// 32-bit System V (i386).
    SysV32,
    /// 64-bit System V (AMD64).
    SysV64,
}

/// Floating-point calling convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum FpAbi {
    /// Values passed on the x87 stack.
    X87,
    /// Values passed in SSE registers.
    Sse,
}

impl Abi {
    pub const ALL: [Abi; 2] = [Abi::SysV32, Abi::SysV64];

    /// Tag written to `config.mak` and the descriptor formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Abi::SysV32 => "x86-sysv32",
            Abi::SysV64 => "x86-sysv64",
        }
    }

    /// The floating-point ABI paired with this calling convention.
    pub fn fp_abi(self) -> FpAbi {
        match self {
            Abi::SysV32 => FpAbi::X87,
            Abi::SysV64 => FpAbi::Sse,
        }
    }

    /// Native word size in bits.
    pub fn word_size(self) -> u32 {
        match self {
            Abi::SysV32 => 32,
            Abi::SysV64 => 64,
        }
    }
}

impl FpAbi {
    pub const ALL: [FpAbi; 2] = [FpAbi::X87, FpAbi::Sse];

    /// Tag written to `config.mak` and the descriptor formats.
    pub fn as_str(self) -> &'static str {
        match self {
            FpAbi::X87 => "x86-x87",
            FpAbi::Sse => "x86-sse",
        }
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FpAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Abi> for &'static str {
    fn from(abi: Abi) -> Self {
        abi.as_str()
    }
}

impl From<FpAbi> for &'static str {
    fn from(fp_abi: FpAbi) -> Self {
        fp_abi.as_str()
    }
}

impl FromStr for Abi {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Abi::ALL
            .into_iter()
            .find(|abi| abi.as_str() == s)
            .ok_or_else(|| TargetError::UnknownTag {
                kind: "ABI",
                tag: s.to_string(),
            })
    }
}

impl FromStr for FpAbi {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FpAbi::ALL
            .into_iter()
            .find(|fp_abi| fp_abi.as_str() == s)
            .ok_or_else(|| TargetError::UnknownTag {
                kind: "floating-point ABI",
                tag: s.to_string(),
            })
    }
}

impl TryFrom<String> for Abi {
    type Error = TargetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for FpAbi {
    type Error = TargetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Resolved architecture and toolchain parameters for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildDescriptor {
    /// Architecture family (e.g., "x86").
    pub arch: String,
    /// Target OS family (e.g., "darwin").
    pub os: String,
    /// General calling convention.
    pub abi: Abi,
    /// Floating-point calling convention; always `abi.fp_abi()`.
    pub fp_abi: FpAbi,
    /// Whether host and target differ. Never set by [`resolve`].
    pub cross: bool,
    /// C compiler driver.
    pub compiler: String,
    /// Compiler command-line flavour.
    pub compiler_type: String,
    /// Extra compiler flags.
    pub compiler_args: String,
    /// Linker executable.
    pub linker: String,
    /// Linker command-line flavour.
    pub linker_type: String,
    /// Extra linker flags.
    pub linker_args: String,
}

impl BuildDescriptor {
    /// Native word size in bits.
    pub fn word_size(&self) -> u32 {
        self.abi.word_size()
    }

    /// Serialize to pretty TOML.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Resolve the build descriptor for a host profile.
///
/// A 64-bit preference selects System V AMD64 with SSE floats; anything else
/// builds i386 code with x87 floats and forces the compiler down to 32 bits.
pub fn resolve(profile: &PlatformProfile) -> BuildDescriptor {
    let (abi, compiler_args) = if profile.prefers_64_bit {
        (Abi::SysV64, "")
    } else {
        (Abi::SysV32, NARROW_CC_ARGS)
    };

    BuildDescriptor {
        arch: ARCH.into(),
        os: OS.into(),
        abi,
        fp_abi: abi.fp_abi(),
        cross: false,
        compiler: COMPILER.into(),
        compiler_type: COMPILER_TYPE.into(),
        compiler_args: compiler_args.into(),
        linker: LINKER.into(),
        linker_type: LINKER_TYPE.into(),
        linker_args: String::new(),
    }
}
