// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Verdict summary rendering (§6.4 `--format`).

use purity_graph::{MethodSummary, PurityResult};
use serde::Serialize;

use crate::config::OutputFormat;

#[derive(Serialize)]
struct SummaryJson {
    class: String,
    method: String,
    result: String,
    reason: Option<String>,
}

fn verdict_label(result: &PurityResult) -> (&'static str, Option<String>) {
    match result {
        PurityResult::Pure => ("pure", None),
        PurityResult::Impure(reason) => ("impure", Some(reason.clone())),
        PurityResult::GraphViolation(reason) => ("graph_violation", Some(reason.clone())),
    }
}

/// Renders `summaries` to a string in the requested format.
#[must_use]
pub fn render(summaries: &[MethodSummary], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(summaries),
        OutputFormat::Json => render_json(summaries),
    }
}

fn render_text(summaries: &[MethodSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        let (label, reason) = verdict_label(&summary.result);
        match reason {
            Some(reason) => {
                out.push_str(&format!("{}: {label} ({reason})\n", summary.signature));
            }
            None => {
                out.push_str(&format!("{}: {label}\n", summary.signature));
            }
        }
    }
    out
}

fn render_json(summaries: &[MethodSummary]) -> String {
    let entries: Vec<SummaryJson> = summaries
        .iter()
        .map(|summary| {
            let (label, reason) = verdict_label(&summary.result);
            SummaryJson {
                class: summary.signature.class.to_string(),
                method: summary.signature.method.to_string(),
                result: label.to_owned(),
                reason,
            }
        })
        .collect();
    serde_json::to_string_pretty(&entries).unwrap_or_default()
}
