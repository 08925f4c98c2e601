//! Platform resolution and build configuration for packaging the Flect toolchain.
//!
//! Implements the configuration pipeline: Profile -> Descriptor + Layout = Artifact.
//!
//! - **Platform profile:** what the host prefers (word width)
//! - **Build descriptor:** architecture, ABI, FP ABI, and toolchain selection
//! - **Install layout:** directories derived from the install prefix
//! - **Configuration artifact:** `config.mak`, read by the external build system

pub mod config;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod platform;

pub use config::{
    parse_config, read_config, render_config, write_config, ConfigEntry, CONFIG_FILE_NAME,
    CONFIG_KEYS,
};
pub use descriptor::{resolve, Abi, BuildDescriptor, FpAbi};
pub use error::{Result, TargetError};
pub use layout::{resolve_layout, InstallLayout, PRODUCT};
pub use platform::{host_machine, PlatformProfile, WidthSignal};
