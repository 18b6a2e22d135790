// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small, reusable worklist-based dataflow solver.
//!
//! The purity analysis needs one forward fixpoint (the points-to graph). This module keeps
//! the iteration mechanics (worklist, reachability, convergence) generic so the lattice and
//! transfer logic stay local to the caller.
//!
//! Notes:
//!
//! - This solver intentionally doesn't try to be "smart" (RPO, priority queues, etc). Keep it
//!   small and correct; optimize only once a profiler says it's worth it.
//! - Correctness assumes the usual dataflow conditions: `meet_into` and `transfer_block` are
//!   monotone over a finite-height lattice, so iteration reaches a fixpoint.

use std::collections::VecDeque;

use crate::cfg::BasicBlock;

/// Computes a forward dataflow fixpoint.
///
/// The analysis is defined by:
/// - `entry`: initial state at block 0 (only used if block 0 is reachable)
/// - `bottom`: initial state for all other blocks (usually "uninitialized" / "top")
/// - `meet_into`: in-place meet operation: `acc = meet(acc, incoming)`
/// - `transfer_block`: transfer function for a single basic block
///
/// The meet over an empty predecessor set is the current `bottom` value. (For analyses that
/// want a different identity element, pass it as `bottom`.)
///
/// Blocks marked unreachable in `reachable` are ignored and left as `bottom`.
pub fn solve_forward<State, MeetInto, TransferBlock>(
    blocks: &[BasicBlock],
    reachable: &[bool],
    entry: State,
    bottom: State,
    mut meet_into: MeetInto,
    mut transfer_block: TransferBlock,
) -> (Vec<State>, Vec<State>)
where
    State: Clone + PartialEq,
    MeetInto: FnMut(&mut State, &State),
    TransferBlock: FnMut(usize, &BasicBlock, &State) -> State,
{
    // Convention: `in_states[b]` is the fixpoint state at block entry, and `out_states[b]` is
    // the fixpoint state at block exit (after applying the block transfer).
    let n = blocks.len();
    let mut in_states: Vec<State> = (0..n).map(|_| bottom.clone()).collect();
    let mut out_states: Vec<State> = (0..n).map(|_| bottom.clone()).collect();

    if n == 0 {
        return (in_states, out_states);
    }

    let mut work: VecDeque<usize> = VecDeque::new();

    if reachable.first().copied().unwrap_or(false) {
        in_states[0] = entry;
        out_states[0] = transfer_block(0, &blocks[0], &in_states[0]);
        work.push_back(0);
    }

    while let Some(b_idx) = work.pop_front() {
        if !reachable.get(b_idx).copied().unwrap_or(false) {
            continue;
        }

        let out = out_states[b_idx].clone();
        for succ in blocks[b_idx].succs.iter().copied().flatten() {
            if !reachable.get(succ).copied().unwrap_or(false) {
                continue;
            }

            // IN_succ = meet(IN_succ, OUT_pred) for each predecessor.
            let mut new_in = in_states[succ].clone();
            meet_into(&mut new_in, &out);
            if new_in != in_states[succ] {
                in_states[succ] = new_in;

                // OUT_succ is derived purely from IN_succ via the per-block transfer.
                let new_out = transfer_block(succ, &blocks[succ], &in_states[succ]);
                if new_out != out_states[succ] {
                    out_states[succ] = new_out;
                    work.push_back(succ);
                }
            }
        }
    }

    (in_states, out_states)
}
