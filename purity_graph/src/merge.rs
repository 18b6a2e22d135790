// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The node merger (C5, §4.4): bounds the graph to one target per `(source, field, kind)`.

use hashbrown::HashSet;

use crate::field::FieldOrElem;
use crate::graph::{EdgeKind, PointsToGraph};
use crate::node::Node;

/// Picks the representative of a violating `{a, b, ...}` target set: lowest
/// [`Node::merge_priority`], ties broken by lexicographically smaller [`Node::identity`].
fn representative(candidates: &HashSet<Node>) -> Node {
    *candidates
        .iter()
        .min_by_key(|n| (n.merge_priority(), n.identity()))
        .expect("candidates is non-empty by construction")
}

/// Finds one `(source, field, kind)` triple with two or more targets, if any remain.
fn find_violation(g: &PointsToGraph) -> Option<(Node, FieldOrElem, EdgeKind)> {
    for ((src, f), targets) in g.inside_entries() {
        if targets.len() >= 2 {
            return Some((src, f, EdgeKind::Inside));
        }
    }
    for ((src, f), targets) in g.outside_entries() {
        if targets.len() >= 2 {
            return Some((src, f, EdgeKind::Outside));
        }
    }
    None
}

/// Repeatedly merges violating target sets until every `(source, field, kind)` triple has at
/// most one target.
///
/// Termination: each iteration strictly reduces the total node count (at least two nodes
/// collapse into one representative), and node count is bounded below by zero.
pub fn normalize(g: &mut PointsToGraph) {
    while let Some((src, f, kind)) = find_violation(g) {
        let candidates = g.targets(src, &f, kind);
        let keep = representative(&candidates);
        let remove: HashSet<Node> = candidates.into_iter().filter(|n| *n != keep).collect();
        tracing::trace!(
            source = %src,
            field = %f,
            keep = %keep,
            removed = remove.len(),
            "merging node targets"
        );
        g.replace_node(&remove, keep);
    }
}
