// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-method HTML debug traces (§6.4 `debug`, §6.5): the IR, the exit graph, and the verdict
//! bundled into one file for inspection. Not consumed by the engine; rendering only.

use purity_graph::{render::to_dot, MethodSummary};
use purity_ir::Method;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders a single self-contained HTML page for one method's analysis trace.
#[must_use]
pub fn render(method: &Method, summary: &MethodSummary) -> String {
    let ir_listing = method
        .statements
        .iter()
        .enumerate()
        .map(|(i, stmt)| format!("{i:>4}: {stmt:?}"))
        .collect::<Vec<_>>()
        .join("\n");

    let dot = to_dot(&summary.signature.to_string(), &summary.exit_graph);

    format!(
        "<!doctype html>\n\
         <html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>\n\
         <h1>{title}</h1>\n\
         <h2>Verdict</h2><pre>{verdict}</pre>\n\
         <h2>IR</h2><pre>{ir}</pre>\n\
         <h2>Exit graph (DOT)</h2><pre>{dot}</pre>\n\
         </body></html>\n",
        title = escape(&summary.signature.to_string()),
        verdict = escape(&summary.result.to_string()),
        ir = escape(&ir_listing),
        dot = escape(&dot),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use purity_graph::{MergeMode, PurityResult};
    use purity_ir::builder::MethodBuilder;
    use purity_ir::{MethodRef, Ty};

    #[test]
    fn bundles_ir_verdict_and_dot_into_one_page() {
        let mut b = MethodBuilder::new(MethodRef::new("demo.Arith", "add"), true, 2);
        b.identity_param(0, Ty::Primitive);
        b.identity_param(1, Ty::Primitive);
        b.ret(None);
        let method = b.build();

        let registry = purity_graph::SafeMethodRegistry::empty();
        let exit_graph = purity_graph::analyze_method(&method, &registry, MergeMode::Enabled);
        let summary = MethodSummary {
            signature: method.signature.clone(),
            exit_graph,
            result: PurityResult::Pure,
        };

        let page = render(&method, &summary);
        assert!(page.contains("demo.Arith.add"));
        assert!(page.contains("digraph"));
        assert!(page.contains("pure"));
    }
}
