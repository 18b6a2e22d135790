// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CLI configuration (§6.4, §11): every option the driver recognizes, parsed with `clap`.

use std::path::PathBuf;

use clap::Parser;

/// Default output directory for DOT/HTML artifacts (§6.4).
pub const DEFAULT_OUT_DIR: &str = "./purity-out";

/// Output format for the verdict summary printed to stdout (§6.4 `--format`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table, one line per method.
    Text,
    /// Machine-readable JSON array of method summaries.
    Json,
}

/// Parsed and normalized CLI configuration.
#[derive(Debug, Parser)]
#[command(name = "purity", about = "Intra-procedural purity analysis over a JSON method corpus")]
pub struct Config {
    /// Path to the JSON class corpus (§1 NEW, `purity_cli::loader`).
    #[arg(long)]
    pub input: PathBuf,

    /// Optional TOML safe-method registry overriding the built-in defaults (§6.3 NEW).
    #[arg(long)]
    pub safe_methods: Option<PathBuf>,

    /// Method-level parallelism (§5 NEW). `1` (the default) analyzes sequentially.
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,

    /// Directory for DOT/HTML artifacts (§6.4).
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Verdict rendering format for the summary printed to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Emit text and DOT renderings of exit graphs (§6.4 `show_graph`).
    #[arg(long)]
    pub show_graph: bool,

    /// Disable the node merger (C5). Merging is enabled by default.
    #[arg(long)]
    pub no_merge: bool,

    /// Analyze only methods with this name (§6.4 `method_filter`).
    #[arg(long)]
    pub method_filter: Option<String>,

    /// Emit per-method HTML debug traces; implies `show_graph` (§6.4 `debug`).
    #[arg(long)]
    pub debug: bool,

    /// Raise tracing verbosity: `-v` for debug, `-vv` for trace (§10).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Applies the `debug ⇒ show_graph` implication and ensures `out_dir` exists.
    ///
    /// This is a dedicated post-parse step rather than a `clap` default or validator: the
    /// implication is a relationship between two flags' *effective* values, not a parse-time
    /// constraint, and directory creation is an I/O side effect `clap` shouldn't own.
    pub fn normalize(&mut self) -> Result<(), crate::error::CliError> {
        if self.debug {
            self.show_graph = true;
        }
        std::fs::create_dir_all(&self.out_dir).map_err(|source| {
            crate::error::CliError::CreateOutDir {
                path: self.out_dir.clone(),
                source,
            }
        })
    }

    /// Whether the node merger (C5) should run during analysis.
    #[must_use]
    pub fn merge_mode(&self) -> purity_graph::MergeMode {
        if self.no_merge {
            purity_graph::MergeMode::Disabled
        } else {
            purity_graph::MergeMode::Enabled
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_implies_show_graph_after_normalize() {
        let mut config = Config {
            input: PathBuf::from("in.json"),
            safe_methods: None,
            jobs: 1,
            out_dir: std::env::temp_dir().join("purity-cli-config-test"),
            format: OutputFormat::Text,
            show_graph: false,
            no_merge: false,
            method_filter: None,
            debug: true,
            verbose: 0,
        };
        config.normalize().unwrap();
        assert!(config.show_graph);
    }

    #[test]
    fn no_merge_disables_the_merge_mode() {
        let config = Config {
            input: PathBuf::from("in.json"),
            safe_methods: None,
            jobs: 1,
            out_dir: PathBuf::from("."),
            format: OutputFormat::Text,
            show_graph: false,
            no_merge: true,
            method_filter: None,
            debug: false,
            verbose: 0,
        };
        assert_eq!(config.merge_mode(), purity_graph::MergeMode::Disabled);
    }
}
