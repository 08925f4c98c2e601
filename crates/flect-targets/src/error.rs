//! Error types for platform resolution and configuration output.

use std::path::PathBuf;

/// Errors that can occur while resolving or writing the build configuration.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// The install prefix is empty, relative, or cannot be written to `config.mak`.
    #[error("invalid install prefix '{}': {reason}", prefix.display())]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: PathBuf,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The configuration artifact could not be written.
    #[error("failed to write configuration to {}: {source}", path.display())]
    WriteFailure {
        /// Destination of the artifact.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A configuration artifact line is not a `KEY ?= VALUE` assignment.
    #[error("malformed configuration line {line}: {detail}")]
    MalformedArtifact {
        /// 1-based line number.
        line: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A tag does not name any known ABI.
    #[error("unknown {kind} '{tag}'")]
    UnknownTag {
        /// Which tag family was expected.
        kind: &'static str,
        /// The rejected text.
        tag: String,
    },

    /// TOML serialization error.
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for target operations.
pub type Result<T> = std::result::Result<T, TargetError>;
