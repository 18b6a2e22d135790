// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The purity decision procedure (C7, §4.6).

use std::collections::VecDeque;
use std::fmt;

use hashbrown::HashSet;

use purity_ir::MethodRef;

use crate::graph::PointsToGraph;
use crate::node::Node;

/// The outcome of checking one method's exit graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PurityResult {
    /// No prestate object is mutated or escapes, and no static field is written.
    Pure,
    /// A prestate mutation, escape, or static write was found; the string explains which.
    Impure(String),
    /// The exit graph itself failed `validate()` (R1/R2) before the decision rule could run.
    GraphViolation(String),
}

impl PurityResult {
    /// Returns `true` for [`Self::Pure`].
    #[must_use]
    pub fn is_pure(&self) -> bool {
        matches!(self, Self::Pure)
    }
}

impl fmt::Display for PurityResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pure => f.write_str("pure"),
            Self::Impure(reason) => write!(f, "impure: {reason}"),
            Self::GraphViolation(reason) => write!(f, "graph violation: {reason}"),
        }
    }
}

/// One method's recorded verdict, bundled with the graph it was derived from (§6.2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSummary {
    /// The analyzed method's signature.
    pub signature: MethodRef,
    /// The fixpoint exit graph.
    pub exit_graph: PointsToGraph,
    /// The verdict.
    pub result: PurityResult,
}

/// BFS along outside edges only, from every `Parameter` node: set A, the prestate nodes
/// (§4.6).
fn prestate_closure(g: &PointsToGraph) -> HashSet<Node> {
    let seeds: HashSet<Node> = g
        .nodes()
        .into_iter()
        .filter(|n| matches!(n, Node::Parameter(_)))
        .collect();
    bfs(&seeds, &g.outside_edges())
}

/// BFS along all edges, from `E ∪ {Global}`: set B, the globally accessible nodes (§4.6).
fn global_closure(g: &PointsToGraph) -> HashSet<Node> {
    let mut seeds: HashSet<Node> = g.escaped().iter().copied().collect();
    seeds.insert(Node::Global);
    let edges = g.all_edges();
    bfs(&seeds, &edges)
}

fn bfs(seeds: &HashSet<Node>, edges: &[(Node, &crate::field::FieldOrElem, Node)]) -> HashSet<Node> {
    let mut visited: HashSet<Node> = seeds.clone();
    let mut queue: VecDeque<Node> = seeds.iter().copied().collect();
    while let Some(n) = queue.pop_front() {
        for (src, _, tgt) in edges {
            if *src == n && !visited.contains(tgt) {
                visited.insert(*tgt);
                queue.push_back(*tgt);
            }
        }
    }
    visited
}

/// Applies the purity decision rule (§4.6) to `exit_graph`.
///
/// `is_constructor` enables the constructor exception: direct writes to fields of
/// `Parameter(0)` itself are initialization, not mutation of prior state.
#[must_use]
pub fn check(exit_graph: &PointsToGraph, is_constructor: bool) -> PurityResult {
    let violations = exit_graph.validate();
    if !violations.is_empty() {
        let reason = violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return PurityResult::GraphViolation(reason);
    }

    if exit_graph.global_side_effect() {
        return PurityResult::Impure("unknown callee or static side effect".to_string());
    }

    for (n, f) in exit_graph.mutations() {
        if *n == Node::Global {
            return PurityResult::Impure(format!("writes to static field {f}"));
        }
    }

    let a = prestate_closure(exit_graph);
    let b = global_closure(exit_graph);

    for n in &a {
        if b.contains(n) {
            return PurityResult::Impure(format!(
                "prestate node {} escapes to global scope",
                n.identity()
            ));
        }
        for (mutated, f) in exit_graph.mutations() {
            if mutated != n {
                continue;
            }
            if is_constructor && *n == Node::Parameter(0) {
                continue;
            }
            return PurityResult::Impure(format!(
                "mutates prestate node {} via field {f}",
                n.identity()
            ));
        }
    }

    PurityResult::Pure
}
