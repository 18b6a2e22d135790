// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The analysis driver (C8, §4.7): runs every concrete method of every class through the
//! engine and collects a verdict.

use purity_graph::{check, MergeMode, MethodSummary, PurityResult, SafeMethodRegistry};
use purity_ir::{Method, Program};

/// Analyzes `method` alone: build the flow analysis, obtain the exit graph, invoke the
/// purity checker with `is_constructor` derived from the method name.
#[must_use]
pub fn analyze_one(
    method: &Method,
    registry: &SafeMethodRegistry,
    merge_mode: MergeMode,
) -> MethodSummary {
    let exit_graph = purity_graph::analyze_method(method, registry, merge_mode);
    let result = check(&exit_graph, method.is_constructor());
    MethodSummary {
        signature: method.signature.clone(),
        exit_graph,
        result,
    }
}

/// Analyzes every method of `program` matching `method_filter` (if given), sequentially.
#[must_use]
pub fn analyze_sequential(
    program: &Program,
    registry: &SafeMethodRegistry,
    merge_mode: MergeMode,
    method_filter: Option<&str>,
) -> Vec<MethodSummary> {
    program
        .methods()
        .filter(|m| matches_filter(m, method_filter))
        .map(|m| analyze_one(m, registry, merge_mode))
        .collect()
}

/// Analyzes every matching method of `program`, fanning out across `jobs` scoped threads
/// (§5 NEW). Each method is analyzed independently, which is exactly the soundness argument
/// for doing this at all: no shared state is written during analysis of a single method.
#[must_use]
pub fn analyze_parallel(
    program: &Program,
    registry: &SafeMethodRegistry,
    merge_mode: MergeMode,
    method_filter: Option<&str>,
    jobs: usize,
) -> Vec<MethodSummary> {
    if jobs <= 1 {
        return analyze_sequential(program, registry, merge_mode, method_filter);
    }

    let methods: Vec<&Method> = program
        .methods()
        .filter(|m| matches_filter(m, method_filter))
        .collect();

    if methods.is_empty() {
        return Vec::new();
    }

    let chunk_size = methods.len().div_ceil(jobs).max(1);
    std::thread::scope(|scope| {
        let handles: Vec<_> = methods
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(|| {
                    chunk
                        .iter()
                        .map(|m| analyze_one(m, registry, merge_mode))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().expect("analysis thread panicked"))
            .collect()
    })
}

/// Whether `method`'s name matches `method_filter` (`None` matches everything).
#[must_use]
pub fn matches_filter(method: &Method, method_filter: Option<&str>) -> bool {
    method_filter.is_none_or(|name| &*method.signature.method == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use purity_ir::builder::MethodBuilder;
    use purity_ir::{MethodRef, Ty};

    fn pure_add() -> Method {
        let mut b = MethodBuilder::new(MethodRef::new("demo.Arith", "add"), true, 2);
        b.identity_param(0, Ty::Primitive);
        b.identity_param(1, Ty::Primitive);
        b.ret(None);
        b.build()
    }

    #[test]
    fn sequential_and_parallel_agree_on_the_same_corpus() {
        let mut program = Program::new();
        let methods = vec![pure_add(), pure_add()];
        program.push(purity_ir::ClassFile::new("demo.Arith", methods));
        let registry = SafeMethodRegistry::empty();

        let seq = analyze_sequential(&program, &registry, MergeMode::Enabled, None);
        let par = analyze_parallel(&program, &registry, MergeMode::Enabled, None, 4);

        assert_eq!(seq.len(), par.len());
        assert!(seq.iter().all(|s| matches!(s.result, PurityResult::Pure)));
        assert!(par.iter().all(|s| matches!(s.result, PurityResult::Pure)));
    }

    #[test]
    fn method_filter_narrows_the_corpus() {
        let mut program = Program::new();
        program.push(purity_ir::ClassFile::new("demo.Arith", vec![pure_add()]));
        let registry = SafeMethodRegistry::empty();
        let out = analyze_sequential(&program, &registry, MergeMode::Enabled, Some("nonexistent"));
        assert!(out.is_empty());
    }
}
