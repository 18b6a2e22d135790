// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The CLI-boundary error type (§12): everything that should abort the driver outright.

use std::path::PathBuf;

/// Anything that stops `purity_cli` before it can produce a verdict for any method.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input corpus file could not be read.
    #[error("failed to read input file {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input corpus did not parse as the JSON interchange format.
    #[error("failed to parse input file {path} as JSON: {source}")]
    ParseInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The safe-method registry file could not be read.
    #[error("failed to read safe-method registry {path}: {source}")]
    ReadRegistry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The safe-method registry file did not parse as TOML.
    #[error("failed to parse safe-method registry {path} as TOML: {source}")]
    ParseRegistry {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateOutDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a DOT/HTML artifact failed.
    #[error("failed to write artifact {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
