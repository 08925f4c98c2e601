//! `flect-pkg doctor` — host and toolchain diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use flect_targets::{host_machine, resolve, PlatformProfile, CONFIG_FILE_NAME};

use crate::manifest::{PkgManifest, MANIFEST_FILE_NAME};

/// Print diagnostic information about the host and the build prerequisites.
pub fn run(project_dir: &Path, program: &str) -> Result<()> {
    println!("=== Flect Doctor ===");
    println!();

    println!("flect-pkg version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Host ---");
    let profile = PlatformProfile::detect();
    let descriptor = resolve(&profile);
    let machine = host_machine().unwrap_or_else(|| "(unknown)".to_string());
    println!("  Machine: {machine}");
    println!("  Word width signal: {:?}", profile.signal);
    println!("  ABI: {} / {}", descriptor.abi, descriptor.fp_abi);
    println!();

    println!("--- Build Tools ---");
    print_tool_status(program, &["--version"]);
    print_tool_status(&descriptor.compiler, &["--version"]);
    print_tool_status(&descriptor.linker, &["-v"]);
    println!();

    // Elixir builds the compiler; Erlang runs it.
    println!("--- Dependencies ---");
    print_tool_status("elixir", &["--version"]);
    print_tool_status(
        "erl",
        &[
            "-noshell",
            "-eval",
            "io:format(\"OTP ~s~n\", [erlang:system_info(otp_release)]), halt().",
        ],
    );
    println!();

    println!("--- Project Status ---");
    match PkgManifest::find_and_load(project_dir) {
        Ok(Some((manifest, dir))) => {
            println!("  {MANIFEST_FILE_NAME}: found at {}", dir.display());
            if let Some(prefix) = &manifest.install.prefix {
                println!("  Prefix: {}", prefix.display());
            }
            println!("  Build program: {}", manifest.program());
        }
        Ok(None) => println!("  {MANIFEST_FILE_NAME}: not found"),
        Err(e) => println!("  {MANIFEST_FILE_NAME}: error: {e:#}"),
    }
    let config = project_dir.join(CONFIG_FILE_NAME);
    if config.is_file() {
        println!("  {CONFIG_FILE_NAME}: {}", config.display());
    } else {
        println!("  {CONFIG_FILE_NAME}: not written yet");
    }

    Ok(())
}

fn print_tool_status(name: &str, args: &[&str]) {
    match Command::new(name).args(args).output() {
        Ok(output) => {
            // Some tools (ld -v, erl) report on stderr.
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let first_line = stdout
                .lines()
                .chain(stderr.lines())
                .find(|l| !l.trim().is_empty())
                .unwrap_or("(unknown version)");
            println!("  {name}: {first_line}");
        }
        Err(_) => {
            println!("  {name}: not found");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn doctor_runs_without_error() {
        let dir = tempfile::tempdir().unwrap();
        super::run(dir.path(), "make").unwrap();
    }
}
