// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of abstract heap node variants (C1, §3.1).

use std::fmt;

use purity_ir::AllocSite;

/// An abstract heap location.
///
/// This is a closed, tagged variant rather than an open class hierarchy on purpose: both
/// the purity decision rule (§4.6) and the node-merger priority order (§4.4) pattern-match
/// exhaustively over the four kinds, and the compiler should catch it if a fifth is ever
/// added without updating both call sites.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// An object allocated by the analyzed method at allocation site `i`.
    ///
    /// Mutating an `Inside` node is always allowed; it cannot have existed before the call.
    Inside(u32),
    /// The object bound to formal parameter `k` on entry. `Parameter(0)` is the receiver
    /// ("this") for instance methods.
    Parameter(u32),
    /// An abstract object read from a pre-existing heap slot: a field of a node that was
    /// already reachable before the call (see `Node::is_prestate_reachable`).
    Load(u32),
    /// The singleton representing the namespace of static storage.
    ///
    /// `Global` is a process-wide constant: it is never merged away (the node merger's total
    /// order always ranks it above `Inside`/`Load` but it never appears as a `remove` member
    /// since it is the unique representative of its own identity) and is never constructed
    /// per-graph.
    Global,
}

impl Node {
    /// Returns the stable, string-like identity described in §3.1 (`"I"+i`, `"P"+k`,
    /// `"L"+j`, `"GBL"`). Two nodes are equal iff their identities are equal, which holds
    /// trivially here since identity is just this type's `Eq` impl — the textual form exists
    /// for rendering (DOT/HTML output) and diagnostics.
    #[must_use]
    pub fn identity(self) -> String {
        match self {
            Self::Inside(i) => format!("I{i}"),
            Self::Parameter(k) => format!("P{k}"),
            Self::Load(j) => format!("L{j}"),
            Self::Global => "GBL".to_owned(),
        }
    }

    /// Returns `true` if this node's kind is one that can be reached "from outside" the
    /// method (Parameter, Load, or Global) — i.e. it is plausible prestate.
    ///
    /// This is the test rule (7)/(11) use to decide whether a field/array load should
    /// synthesize a fresh `Load` node for an as-yet-unread slot.
    #[must_use]
    pub fn is_prestate_reachable(self) -> bool {
        !matches!(self, Self::Inside(_))
    }

    /// Returns this node's kind priority for the merger's representative-picking order
    /// (§4.4): `Parameter < Global < Inside < Load`, lower wins.
    #[must_use]
    pub(crate) fn merge_priority(self) -> u8 {
        match self {
            Self::Parameter(_) => 0,
            Self::Global => 1,
            Self::Inside(_) => 2,
            Self::Load(_) => 3,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identity())
    }
}

/// A per-method allocator for fresh `Inside`/`Load` node identities.
///
/// §9 requires these counters be per-method and monotonically increasing, and deterministic
/// under a deterministic statement order, so that DOT output is stable across re-runs.
#[derive(Debug, Default)]
pub struct NodeIdAllocator {
    next_load: u32,
}

impl NodeIdAllocator {
    /// Creates a fresh allocator (its `Load` counter starts at 0).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates an `Inside` node for a given IR-level allocation site.
    ///
    /// Allocation sites are already indexed by the IR (`purity_ir::AllocSite`), so this is a
    /// direct conversion rather than drawing from its own counter.
    #[must_use]
    pub fn inside(&self, site: AllocSite) -> Node {
        Node::Inside(site.0)
    }

    /// Allocates a fresh `Load` node, bumping the per-method counter.
    pub fn fresh_load(&mut self) -> Node {
        let id = self.next_load;
        self.next_load += 1;
        Node::Load(id)
    }
}
