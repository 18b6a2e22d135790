// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line driver for the purity analysis engine (C8).

mod config;
mod driver;
mod error;
mod html;
mod loader;
mod report;

use std::io::IsTerminal;

use clap::Parser;

use config::Config;
use error::CliError;

fn install_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

fn load_registry(config: &Config) -> Result<purity_graph::SafeMethodRegistry, CliError> {
    let mut registry = purity_graph::SafeMethodRegistry::builtin();
    if let Some(path) = &config.safe_methods {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadRegistry {
            path: path.clone(),
            source,
        })?;
        let file: purity_graph::RegistryFile =
            toml::from_str(&text).map_err(|source| CliError::ParseRegistry {
                path: path.clone(),
                source,
            })?;
        registry.merge(file.into());
    }
    Ok(registry)
}

fn run() -> Result<(), CliError> {
    let mut config = Config::parse();
    install_tracing(config.verbose);
    config.normalize()?;

    let program = loader::load(&config.input)?;
    let registry = load_registry(&config)?;
    let merge_mode = config.merge_mode();

    let summaries = driver::analyze_parallel(
        &program,
        &registry,
        merge_mode,
        config.method_filter.as_deref(),
        config.jobs,
    );

    println!("{}", report::render(&summaries, config.format));

    if config.show_graph {
        let filter = config.method_filter.as_deref();
        let filtered_methods = program
            .methods()
            .filter(|m| driver::matches_filter(m, filter));
        for (method, summary) in filtered_methods.zip(&summaries) {
            let safe_name = summary.signature.to_string().replace(['.', '#'], "_");

            let dot = purity_graph::render::to_dot(&summary.signature.to_string(), &summary.exit_graph);
            let dot_path = config.out_dir.join(format!("{safe_name}.dot"));
            std::fs::write(&dot_path, dot).map_err(|source| CliError::WriteArtifact {
                path: dot_path.clone(),
                source,
            })?;

            if config.debug {
                let page = html::render(method, summary);
                let html_path = config.out_dir.join(format!("{safe_name}.html"));
                std::fs::write(&html_path, page).map_err(|source| CliError::WriteArtifact {
                    path: html_path.clone(),
                    source,
                })?;
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        tracing::error!(error = %err, "purity analysis failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
