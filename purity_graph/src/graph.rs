// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The points-to graph: `G = ⟨L, I, O, W, E, s⟩` (C2, §3.2, §4.1, §4.2).

use std::fmt;

use hashbrown::{HashMap, HashSet};

use purity_ir::Local;

use crate::field::FieldOrElem;
use crate::node::Node;

/// Which edge store a lookup should consult.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// `I`: writes performed by this method.
    Inside,
    /// `O`: reads from pre-existing heap.
    Outside,
}

/// A violation of invariant R1 or R2 (§3.2), as returned by [`PointsToGraph::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// R1: an `Inside` node has an outgoing outside edge.
    InsideHasOutsideEdge {
        /// The offending `Inside` node's identity.
        source: String,
        /// The field the edge is keyed on.
        field: String,
    },
    /// R2: an outside edge targets an `Inside` node.
    OutsideEdgeTargetsInside {
        /// The edge's source identity.
        source: String,
        /// The field the edge is keyed on.
        field: String,
        /// The offending `Inside` target's identity.
        target: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsideHasOutsideEdge { source, field } => write!(
                f,
                "R1 violated: inside node {source} has an outside edge on field {field}"
            ),
            Self::OutsideEdgeTargetsInside {
                source,
                field,
                target,
            } => write!(
                f,
                "R2 violated: outside edge {source} --{field}--> {target} targets an inside node"
            ),
        }
    }
}

/// The points-to / escape graph, `G = ⟨L, I, O, W, E, s⟩`.
///
/// Equality is structural over all six components (§4.1), which is exactly what the forward
/// flow analysis (C6) needs to detect a fixpoint: two `PointsToGraph` values compare equal
/// iff they describe the same abstract state, independent of how they were built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsToGraph {
    locals: HashMap<Local, HashSet<Node>>,
    inside: HashMap<(Node, FieldOrElem), HashSet<Node>>,
    outside: HashMap<(Node, FieldOrElem), HashSet<Node>>,
    mutations: HashSet<(Node, FieldOrElem)>,
    escaped: HashSet<Node>,
    global_side_effect: bool,
}

impl PointsToGraph {
    /// Constructs the empty graph (the initial flow at method entry, §4.5).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `L[v]`, or the empty set if `v` is unbound.
    #[must_use]
    pub fn points_to(&self, v: Local) -> HashSet<Node> {
        self.locals.get(&v).cloned().unwrap_or_default()
    }

    /// Replaces `L[v]` with `targets` (a *strong* update — §9 "strong vs weak updates").
    pub fn strong_update(&mut self, v: Local, targets: impl IntoIterator<Item = Node>) {
        self.locals.insert(v, targets.into_iter().collect());
    }

    /// Unconditionally inserts `src --f--> tgt` into `I`.
    pub fn add_inside_edge(&mut self, src: Node, f: FieldOrElem, tgt: Node) {
        self.inside.entry((src, f)).or_default().insert(tgt);
    }

    /// Unconditionally inserts `src --f--> tgt` into `O`.
    pub fn add_outside_edge(&mut self, src: Node, f: FieldOrElem, tgt: Node) {
        self.outside.entry((src, f)).or_default().insert(tgt);
    }

    /// Targets of `(src, f)` within one edge store.
    #[must_use]
    pub fn targets(&self, src: Node, f: &FieldOrElem, kind: EdgeKind) -> HashSet<Node> {
        let store = match kind {
            EdgeKind::Inside => &self.inside,
            EdgeKind::Outside => &self.outside,
        };
        store
            .get(&(src, f.clone()))
            .cloned()
            .unwrap_or_default()
    }

    /// The union of inside- and outside-edge targets of `(src, f)`.
    #[must_use]
    pub fn all_targets(&self, src: Node, f: &FieldOrElem) -> HashSet<Node> {
        let mut result = self.targets(src, f, EdgeKind::Inside);
        result.extend(self.targets(src, f, EdgeKind::Outside));
        result
    }

    /// Returns `true` if `(src, f, _)` has at least one outside edge, for any target.
    #[must_use]
    pub fn has_outside_edge(&self, src: Node, f: &FieldOrElem) -> bool {
        self.outside
            .get(&(src, f.clone()))
            .is_some_and(|s| !s.is_empty())
    }

    /// All fields `n` has an edge on (inside or outside), used by the array-load transfer
    /// (rule 11), which has no per-field precision and must fan out over every field of `n`.
    pub(crate) fn fields_of(&self, n: Node) -> impl Iterator<Item = &FieldOrElem> {
        self.inside
            .keys()
            .chain(self.outside.keys())
            .filter(move |(src, _)| *src == n)
            .map(|(_, f)| f)
    }

    /// Adds `(n, f)` to `W`. `f` may be [`FieldOrElem::Elem`] for array writes.
    pub fn record_mutation(&mut self, n: Node, f: FieldOrElem) {
        self.mutations.insert((n, f));
    }

    /// Adds `n` to `E`.
    pub fn mark_escaped(&mut self, n: Node) {
        self.escaped.insert(n);
    }

    /// Sets the sticky global-side-effect flag `s := true`.
    pub fn set_global_side_effect(&mut self) {
        self.global_side_effect = true;
    }

    /// `s`.
    #[must_use]
    pub fn global_side_effect(&self) -> bool {
        self.global_side_effect
    }

    /// `W`.
    #[must_use]
    pub fn mutations(&self) -> &HashSet<(Node, FieldOrElem)> {
        &self.mutations
    }

    /// `E`.
    #[must_use]
    pub fn escaped(&self) -> &HashSet<Node> {
        &self.escaped
    }

    /// Every node with any presence in the graph: as a local's target, an edge endpoint, a
    /// mutation source, or an escaped/global node. Used by rendering and by the purity
    /// checker's closures.
    #[must_use]
    pub fn nodes(&self) -> HashSet<Node> {
        let mut all = HashSet::new();
        for targets in self.locals.values() {
            all.extend(targets.iter().copied());
        }
        for ((src, _), targets) in self.inside.iter().chain(self.outside.iter()) {
            all.insert(*src);
            all.extend(targets.iter().copied());
        }
        for (n, _) in &self.mutations {
            all.insert(*n);
        }
        all.extend(self.escaped.iter().copied());
        all.insert(Node::Global);
        all
    }

    /// Every `(source, field) → targets` bucket of `I`, for the node merger's violation scan.
    pub(crate) fn inside_entries(&self) -> impl Iterator<Item = ((Node, FieldOrElem), &HashSet<Node>)> {
        self.inside.iter().map(|(k, v)| (k.clone(), v))
    }

    /// Every `(source, field) → targets` bucket of `O`, for the node merger's violation scan.
    pub(crate) fn outside_entries(&self) -> impl Iterator<Item = ((Node, FieldOrElem), &HashSet<Node>)> {
        self.outside.iter().map(|(k, v)| (k.clone(), v))
    }

    /// All outside edges, as `(source, field, target)` triples. Used by the purity checker's
    /// set-A closure (BFS along outside edges only).
    #[must_use]
    pub fn outside_edges(&self) -> Vec<(Node, &FieldOrElem, Node)> {
        self.outside
            .iter()
            .flat_map(|((src, f), targets)| targets.iter().map(move |t| (*src, f, *t)))
            .collect()
    }

    /// All edges (inside and outside), as `(source, field, target)` triples. Used by the
    /// purity checker's set-B closure (BFS along all edges).
    #[must_use]
    pub fn all_edges(&self) -> Vec<(Node, &FieldOrElem, Node)> {
        self.inside
            .iter()
            .chain(self.outside.iter())
            .flat_map(|((src, f), targets)| targets.iter().map(move |t| (*src, f, *t)))
            .collect()
    }

    /// Substitutes `new` for every node in `old` across `L`, `I`, `O`, `W`, and `E`. Used
    /// only by the node merger (C5); `old` never contains [`Node::Global`] (the merger's
    /// total order never selects it for removal).
    pub fn replace_node(&mut self, old: &HashSet<Node>, new: Node) {
        let rewrite = |n: Node| if old.contains(&n) { new } else { n };

        for targets in self.locals.values_mut() {
            if targets.iter().any(|n| old.contains(n)) {
                *targets = targets.iter().map(|n| rewrite(*n)).collect();
            }
        }

        for store in [&mut self.inside, &mut self.outside] {
            let entries: Vec<_> = std::mem::take(store).into_iter().collect();
            for ((src, f), targets) in entries {
                let new_src = rewrite(src);
                let new_targets: HashSet<Node> = targets.into_iter().map(rewrite).collect();
                store
                    .entry((new_src, f))
                    .or_default()
                    .extend(new_targets);
            }
        }

        self.mutations = self
            .mutations
            .drain()
            .map(|(n, f)| (rewrite(n), f))
            .collect();
        self.escaped = self.escaped.drain().map(rewrite).collect();
    }

    /// The monotone join (lattice least upper bound, §4.2): unions `L`, `I`, `O`, `W`, `E`
    /// pointwise and ORs `s`.
    pub fn merge_with(&mut self, other: &Self) {
        for (local, targets) in &other.locals {
            self.locals.entry(*local).or_default().extend(targets.iter().copied());
        }
        for (key, targets) in &other.inside {
            self.inside
                .entry(key.clone())
                .or_default()
                .extend(targets.iter().copied());
        }
        for (key, targets) in &other.outside {
            self.outside
                .entry(key.clone())
                .or_default()
                .extend(targets.iter().copied());
        }
        self.mutations.extend(other.mutations.iter().cloned());
        self.escaped.extend(other.escaped.iter().copied());
        self.global_side_effect |= other.global_side_effect;
    }

    /// Returns a copy of `self` joined with `other`, leaving both inputs untouched. Used at
    /// CFG joins where the caller wants `dest := copy(in1); dest.merge_with(in2)` without
    /// mutating `in1` in place (§4.5).
    #[must_use]
    pub fn joined(&self, other: &Self) -> Self {
        let mut dest = self.clone();
        dest.merge_with(other);
        dest
    }

    /// Checks invariants R1 and R2 (§3.2), returning every violation found.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for ((src, f), _) in &self.outside {
            if matches!(src, Node::Inside(_)) {
                violations.push(Violation::InsideHasOutsideEdge {
                    source: src.identity(),
                    field: f.to_string(),
                });
            }
        }
        for ((src, f), targets) in &self.outside {
            for t in targets {
                if matches!(t, Node::Inside(_)) {
                    violations.push(Violation::OutsideEdgeTargetsInside {
                        source: src.identity(),
                        field: f.to_string(),
                        target: t.identity(),
                    });
                }
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purity_ir::FieldId;

    fn f(name: &str) -> FieldOrElem {
        FieldOrElem::field(FieldId::new(name))
    }

    #[test]
    fn strong_update_replaces_rather_than_unions() {
        let mut g = PointsToGraph::empty();
        g.strong_update(Local::new(0), [Node::Parameter(0)]);
        g.strong_update(Local::new(0), [Node::Inside(1)]);
        assert_eq!(g.points_to(Local::new(0)), HashSet::from([Node::Inside(1)]));
    }

    #[test]
    fn merge_with_unions_every_component() {
        let mut a = PointsToGraph::empty();
        a.strong_update(Local::new(0), [Node::Parameter(0)]);
        a.record_mutation(Node::Parameter(0), f("x"));

        let mut b = PointsToGraph::empty();
        b.strong_update(Local::new(0), [Node::Inside(0)]);
        b.mark_escaped(Node::Inside(0));
        b.set_global_side_effect();

        a.merge_with(&b);
        assert_eq!(
            a.points_to(Local::new(0)),
            HashSet::from([Node::Parameter(0), Node::Inside(0)])
        );
        assert!(a.mutations().contains(&(Node::Parameter(0), f("x"))));
        assert!(a.escaped().contains(&Node::Inside(0)));
        assert!(a.global_side_effect());
    }

    #[test]
    fn merge_is_idempotent_and_commutative() {
        let mut a = PointsToGraph::empty();
        a.strong_update(Local::new(0), [Node::Parameter(0)]);
        a.add_inside_edge(Node::Parameter(0), f("x"), Node::Inside(0));

        let mut b = PointsToGraph::empty();
        b.record_mutation(Node::Parameter(1), f("y"));

        let ab = a.joined(&b);
        let ba = b.joined(&a);
        assert_eq!(ab, ba);

        let ab_again = ab.joined(&ab);
        assert_eq!(ab, ab_again);
    }

    #[test]
    fn replace_node_rewrites_every_component() {
        let mut g = PointsToGraph::empty();
        g.strong_update(Local::new(0), [Node::Load(0), Node::Load(1)]);
        g.add_outside_edge(Node::Parameter(0), f("x"), Node::Load(0));
        g.record_mutation(Node::Load(1), f("y"));
        g.mark_escaped(Node::Load(0));

        let old = HashSet::from([Node::Load(0), Node::Load(1)]);
        g.replace_node(&old, Node::Load(2));

        assert_eq!(g.points_to(Local::new(0)), HashSet::from([Node::Load(2)]));
        assert_eq!(
            g.targets(Node::Parameter(0), &f("x"), EdgeKind::Outside),
            HashSet::from([Node::Load(2)])
        );
        assert!(g.mutations().contains(&(Node::Load(2), f("y"))));
        assert!(g.escaped().contains(&Node::Load(2)));
    }

    #[test]
    fn validate_flags_r1_and_r2_violations() {
        let mut g = PointsToGraph::empty();
        g.add_outside_edge(Node::Inside(0), f("x"), Node::Parameter(0));
        g.add_outside_edge(Node::Parameter(0), f("y"), Node::Inside(1));
        let violations = g.validate();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn validate_is_clean_for_a_well_formed_graph() {
        let mut g = PointsToGraph::empty();
        g.add_inside_edge(Node::Inside(0), f("x"), Node::Parameter(0));
        g.add_outside_edge(Node::Parameter(0), f("y"), Node::Load(0));
        assert!(g.validate().is_empty());
    }
}
