// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Method-level forward flow analysis (C6, §4.5): fixpoint over the CFG, block by block.

use purity_ir::analysis::dataflow::solve_forward;
use purity_ir::Method;

use crate::graph::PointsToGraph;
use crate::merge;
use crate::node::NodeIdAllocator;
use crate::registry::SafeMethodRegistry;
use crate::transfer;

/// Whether the node merger (C5) runs after field loads, after joins, and before the exit
/// graph is handed to the purity checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeMode {
    /// Normalize at every scheduled point (§4.4).
    Enabled,
    /// Never normalize. Exit graphs may be larger, but P5 guarantees the verdict is
    /// unaffected — useful for testing that guarantee itself.
    Disabled,
}

impl MergeMode {
    /// Whether this mode normalizes the graph at the scheduled merge points.
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Runs the method to a fixpoint and returns its exit graph: the join of every tail block's
/// out-graph, normalized once more if merging is enabled.
#[must_use]
pub fn analyze_method(
    method: &Method,
    registry: &SafeMethodRegistry,
    merge_mode: MergeMode,
) -> PointsToGraph {
    let _span = tracing::info_span!("analyze_method", method = %method.signature).entered();

    let blocks = method.cfg.blocks();
    if blocks.is_empty() {
        return PointsToGraph::empty();
    }

    let reachable = method.cfg.reachable_from_entry();

    // A block may be re-transferred as the worklist converges, so fresh `Load` identities
    // are minted from one allocator shared across the whole fixpoint rather than per call.
    let alloc_cell = std::cell::RefCell::new(NodeIdAllocator::new());

    let transfer_block = |_idx: usize, block: &purity_ir::cfg::BasicBlock, in_state: &PointsToGraph| {
        let mut g = in_state.clone();
        let mut alloc = alloc_cell.borrow_mut();
        for stmt in &method.statements[block.instr_start..block.instr_end] {
            transfer::apply(stmt, &mut g, &mut alloc, registry, method.is_static);
            if merge_mode.is_enabled() && stmt.is_field_or_array_load() {
                merge::normalize(&mut g);
            }
        }
        g
    };

    let meet_into = |acc: &mut PointsToGraph, incoming: &PointsToGraph| {
        acc.merge_with(incoming);
        if merge_mode.is_enabled() {
            merge::normalize(acc);
        }
    };

    let (_in_states, out_states) = solve_forward(
        blocks,
        &reachable,
        PointsToGraph::empty(),
        PointsToGraph::empty(),
        meet_into,
        transfer_block,
    );

    let mut exit = PointsToGraph::empty();
    for tail in method.cfg.tails() {
        if reachable.get(tail).copied().unwrap_or(false) {
            exit.merge_with(&out_states[tail]);
        }
    }
    if merge_mode.is_enabled() {
        merge::normalize(&mut exit);
    }
    exit
}

#[cfg(test)]
mod tests {
    use super::*;
    use purity_ir::builder::MethodBuilder;
    use purity_ir::{MethodRef, Ty};

    #[test]
    fn straight_line_method_reaches_a_stable_exit_graph() {
        let mut b = MethodBuilder::new(MethodRef::new("a.B", "add"), true, 2);
        let p0 = b.identity_param(0, Ty::Primitive);
        let p1 = b.identity_param(1, Ty::Primitive);
        let _ = (p0, p1);
        b.ret(None);
        let method = b.build();

        let registry = SafeMethodRegistry::empty();
        let exit = analyze_method(&method, &registry, MergeMode::Enabled);
        assert!(exit.mutations().is_empty());
        assert!(!exit.global_side_effect());
    }

    #[test]
    fn diamond_branch_joins_both_sides_mutations() {
        let mut b = MethodBuilder::new(MethodRef::new("a.B", "maybeMutate"), true, 1);
        let recv = b.identity_param(0, Ty::Reference);
        b.start_block();
        b.branch(recv);
        b.set_succs(0, [Some(1), Some(2)]);

        b.start_block();
        let value = b.alloc("literal");
        b.field_store(recv, "x", value);
        b.goto();
        b.set_succs(1, [Some(3), None]);

        b.start_block();
        b.nop();
        b.set_succs(2, [Some(3), None]);

        b.start_block();
        b.ret(None);

        let method = b.build();
        let registry = SafeMethodRegistry::empty();
        let exit = analyze_method(&method, &registry, MergeMode::Enabled);
        assert!(!exit.mutations().is_empty());
    }
}
