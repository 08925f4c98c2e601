//! `flect-pkg describe` — show the resolved build configuration.

use std::path::Path;

use anyhow::{bail, Result};
use serde::Serialize;

use flect_targets::{resolve, resolve_layout, BuildDescriptor, InstallLayout, PlatformProfile};

/// Everything resolved for this host, without writing anything.
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
struct Description {
    profile: PlatformProfile,
    descriptor: BuildDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    layout: Option<InstallLayout>,
}

fn describe_host(prefix: Option<&Path>) -> Result<Description> {
    let profile = PlatformProfile::detect();
    let descriptor = resolve(&profile);
    let layout = prefix.map(|p| resolve_layout(p)).transpose()?;
    Ok(Description {
        profile,
        descriptor,
        layout,
    })
}

/// Print the descriptor (and layout, when a prefix is known).
pub fn run(prefix: Option<&Path>, format: Option<&str>) -> Result<()> {
    let description = describe_host(prefix)?;
    match format {
        None | Some("human") => print_human(&description),
        Some("toml") => print!("{}", toml::to_string_pretty(&description)?),
        Some("json") => println!("{}", serde_json::to_string_pretty(&description)?),
        Some(other) => bail!("unknown format: '{other}'. Choose: human, toml, json"),
    }
    Ok(())
}

fn print_human(description: &Description) {
    let d = &description.descriptor;
    println!("=== Flect build configuration ===");
    println!();

    println!("--- Host ---");
    println!(
        "  Word width: {}",
        if description.profile.prefers_64_bit {
            "64-bit"
        } else {
            "32-bit"
        }
    );
    println!("  Signal:     {:?}", description.profile.signal);
    println!();

    println!("--- Target ---");
    println!("  Arch:   {}", d.arch);
    println!("  OS:     {}", d.os);
    println!("  ABI:    {}", d.abi);
    println!("  FP ABI: {}", d.fp_abi);
    println!("  Cross:  {}", d.cross);
    println!();

    println!("--- Toolchain ---");
    println!("  CC:      {} ({})", d.compiler, d.compiler_type);
    println!("  CC args: {}", d.compiler_args);
    println!("  LD:      {} ({})", d.linker, d.linker_type);
    println!("  LD args: {}", d.linker_args);

    if let Some(layout) = &description.layout {
        println!();
        println!("--- Layout ---");
        println!("  Prefix:     {}", layout.prefix().display());
        println!("  Binaries:   {}", layout.bin_dir().display());
        println!("  Libraries:  {}", layout.lib_dir().display());
        println!("  Static:     {}", layout.static_lib_dir().display());
        println!("  Shared:     {}", layout.shared_lib_dir().display());
    }
}
