// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic-block control-flow graph over a method's statement list.

/// A basic block: a contiguous, half-open range `[instr_start, instr_end)` into the
/// owning method's statement list, plus up to two successor block indices.
///
/// A block has at most two successors because the only control-transfer shapes the
/// engine recognizes are conditional branch (two successors: taken/fall-through) and
/// unconditional branch/fall-through (one successor). `Return` ends a block with no
/// successors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicBlock {
    /// Index of the first statement in this block.
    pub instr_start: usize,
    /// Index one past the last statement in this block.
    pub instr_end: usize,
    /// Successor block indices. `None` entries are padding, not absent edges; iterate
    /// with `.iter().copied().flatten()` to get actual successors.
    pub succs: [Option<usize>; 2],
}

impl BasicBlock {
    /// Creates a block with no successors (patched in later by the CFG builder).
    #[must_use]
    pub fn new(instr_start: usize, instr_end: usize) -> Self {
        Self {
            instr_start,
            instr_end,
            succs: [None, None],
        }
    }
}

/// The control-flow graph of one method body: a statement list partitioned into
/// basic blocks, plus block 0 as the unique entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cfg {
    pub(crate) blocks: Vec<BasicBlock>,
}

impl Cfg {
    /// Constructs a CFG from an already-partitioned block list. Block 0 is the entry.
    #[must_use]
    pub fn new(blocks: Vec<BasicBlock>) -> Self {
        Self { blocks }
    }

    /// Returns the basic blocks in index order.
    #[must_use]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Returns the number of basic blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the CFG has no blocks (an empty method body).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Indices of blocks with no successors — the tail set whose out-states are joined
    /// to form the exit graph (§4.5).
    #[must_use]
    pub fn tails(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.succs.iter().all(Option::is_none))
            .map(|(i, _)| i)
            .collect()
    }

    /// Computes block reachability from block 0 via `succs`, for use as the `reachable`
    /// slice expected by [`crate::analysis::dataflow::solve_forward`].
    #[must_use]
    pub fn reachable_from_entry(&self) -> Vec<bool> {
        let n = self.blocks.len();
        let mut reachable = vec![false; n];
        if n == 0 {
            return reachable;
        }
        let mut stack = vec![0usize];
        reachable[0] = true;
        while let Some(b) = stack.pop() {
            for succ in self.blocks[b].succs.iter().copied().flatten() {
                if succ < n && !reachable[succ] {
                    reachable[succ] = true;
                    stack.push(succ);
                }
            }
        }
        reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reachability_follows_successors_only() {
        let mut b0 = BasicBlock::new(0, 1);
        b0.succs[0] = Some(1);
        let b1 = BasicBlock::new(1, 2);
        let b2 = BasicBlock::new(2, 3); // unreachable island
        let cfg = Cfg::new(vec![b0, b1, b2]);
        assert_eq!(cfg.reachable_from_entry(), vec![true, true, false]);
    }

    #[test]
    fn tails_are_blocks_with_no_successors() {
        let mut b0 = BasicBlock::new(0, 1);
        b0.succs[0] = Some(1);
        let b1 = BasicBlock::new(1, 2);
        let cfg = Cfg::new(vec![b0, b1]);
        assert_eq!(cfg.tails(), vec![1]);
    }
}
