//! CLI subcommand implementations.

pub mod build;
pub mod describe;
pub mod doctor;
pub mod show_config;
