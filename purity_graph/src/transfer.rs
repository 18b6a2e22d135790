// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Statement-level transfer functions (C4, §4.3): one graph mutation per IR statement.

use purity_ir::{Call, Local, Method, Stmt, Ty};

use crate::field::FieldOrElem;
use crate::graph::{EdgeKind, PointsToGraph};
use crate::node::{Node, NodeIdAllocator};
use crate::registry::SafeMethodRegistry;

/// Applies one statement's transfer rule to `g` in place.
///
/// `alloc` mints fresh `Inside`/`Load` node identities; `registry` resolves call targets
/// (rule 13); `is_static` disambiguates the parameter-index shift of rule 2. Malformed
/// statements (§7 category 1) are not representable once past [`purity_ir::builder`], so
/// this function has no "no-op on error" branch of its own — callers that synthesize IR by
/// other means are expected to validate it first.
pub fn apply(
    stmt: &Stmt,
    g: &mut PointsToGraph,
    alloc: &mut NodeIdAllocator,
    registry: &SafeMethodRegistry,
    is_static: bool,
) {
    match stmt {
        Stmt::Identity { dst, source } => {
            use purity_ir::ir::IdentitySource;
            let node = match source {
                IdentitySource::This => Node::Parameter(0),
                IdentitySource::Param(k) => {
                    let shifted = if is_static { *k } else { k + 1 };
                    Node::Parameter(shifted)
                }
            };
            g.strong_update(*dst, [node]);
        }

        Stmt::Alloc { dst, site, .. } => {
            g.strong_update(*dst, [alloc.inside(*site)]);
        }

        Stmt::ArrayAlloc { dst, site, .. } => {
            g.strong_update(*dst, [alloc.inside(*site)]);
        }

        Stmt::Copy { dst, src } => {
            let targets = g.points_to(*src);
            g.strong_update(*dst, targets);
        }

        Stmt::Cast { dst, src, .. } => {
            let targets = g.points_to(*src);
            g.strong_update(*dst, targets);
        }

        Stmt::FieldLoad { dst, base, field } => {
            field_load(g, alloc, *dst, g.points_to(*base), field.clone().into());
        }

        Stmt::FieldStore { base, field, src } => {
            let targets = g.points_to(*src);
            for n in g.points_to(*base) {
                for t in &targets {
                    g.add_inside_edge(n, field.clone().into(), *t);
                }
                g.record_mutation(n, field.clone().into());
            }
        }

        Stmt::StaticFieldLoad { dst, field } => {
            field_load(g, alloc, *dst, [Node::Global].into_iter().collect(), field.clone().into());
        }

        Stmt::StaticFieldStore { field, src } => {
            let key: FieldOrElem = field.clone().into();
            for t in g.points_to(*src) {
                g.add_inside_edge(Node::Global, key.clone(), t);
                g.mark_escaped(t);
            }
            g.record_mutation(Node::Global, key);
            g.set_global_side_effect();
        }

        Stmt::ArrayLoad { dst, base } => {
            let mut result = hashbrown::HashSet::new();
            let bases: Vec<Node> = g.points_to(*base).into_iter().collect();
            for n in &bases {
                let fields: Vec<FieldOrElem> = g.fields_of(*n).cloned().collect();
                for f in fields {
                    result.extend(g.all_targets(*n, &f));
                }
                if n.is_prestate_reachable() {
                    result.insert(alloc.fresh_load());
                }
            }
            g.strong_update(*dst, result);
        }

        Stmt::ArrayStore { base, .. } => {
            for n in g.points_to(*base) {
                g.record_mutation(n, FieldOrElem::Elem);
            }
        }

        Stmt::Call(call) => call_transfer(call, g, alloc, registry),

        Stmt::Return(_) | Stmt::Branch { .. } | Stmt::Goto | Stmt::Nop => {}
    }
}

/// Shared by rules 7 (instance field load) and 9 (static field load, source = `Global`).
fn field_load(
    g: &mut PointsToGraph,
    alloc: &mut NodeIdAllocator,
    dst: Local,
    bases: hashbrown::HashSet<Node>,
    field: FieldOrElem,
) {
    let mut result = hashbrown::HashSet::new();
    for n in bases {
        result.extend(g.targets(n, &field, EdgeKind::Inside));
        result.extend(g.targets(n, &field, EdgeKind::Outside));
        if n.is_prestate_reachable() && !g.has_outside_edge(n, &field) {
            let fresh = alloc.fresh_load();
            g.add_outside_edge(n, field.clone(), fresh);
            result.insert(fresh);
        }
    }
    g.strong_update(dst, result);
}

/// Rule 13.
fn call_transfer(
    call: &Call,
    g: &mut PointsToGraph,
    alloc: &mut NodeIdAllocator,
    registry: &SafeMethodRegistry,
) {
    if registry.is_safe(&call.callee) {
        if let Some(dst) = call.dst {
            if call.dst_ty.is_reference() {
                g.strong_update(dst, [alloc.inside(call.call_site)]);
            }
        }
        return;
    }

    for arg in call.receiver.into_iter().chain(call.args.iter().copied()) {
        for n in g.points_to(arg) {
            g.mark_escaped(n);
        }
    }
    g.set_global_side_effect();

    if let Some(dst) = call.dst {
        if call.dst_ty.is_reference() {
            g.strong_update(dst, [Node::Global]);
        }
    }
}

/// Applies every statement of `method`'s linear statement stream in order, for tests and
/// tools that want a whole-method transfer without going through the block-level CFG
/// machinery of [`crate::flow`].
#[must_use]
pub fn apply_all(
    method: &Method,
    alloc: &mut NodeIdAllocator,
    registry: &SafeMethodRegistry,
) -> PointsToGraph {
    let mut g = PointsToGraph::empty();
    for stmt in &method.statements {
        apply(stmt, &mut g, alloc, registry, method.is_static);
    }
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use purity_ir::{AllocSite, FieldId, MethodRef};

    fn f(name: &str) -> FieldOrElem {
        FieldOrElem::field(FieldId::new(name))
    }

    #[test]
    fn identity_this_binds_parameter_zero() {
        use purity_ir::ir::IdentitySource;
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        apply(
            &Stmt::Identity { dst: Local::new(0), source: IdentitySource::This },
            &mut g,
            &mut alloc,
            &registry,
            false,
        );
        assert_eq!(g.points_to(Local::new(0)), hashbrown::HashSet::from([Node::Parameter(0)]));
    }

    #[test]
    fn identity_param_shifts_for_instance_methods() {
        use purity_ir::ir::IdentitySource;
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        apply(
            &Stmt::Identity { dst: Local::new(0), source: IdentitySource::Param(0) },
            &mut g,
            &mut alloc,
            &registry,
            false,
        );
        assert_eq!(g.points_to(Local::new(0)), hashbrown::HashSet::from([Node::Parameter(0)]));

        let mut g2 = PointsToGraph::empty();
        apply(
            &Stmt::Identity { dst: Local::new(1), source: IdentitySource::Param(0) },
            &mut g2,
            &mut alloc,
            &registry,
            true,
        );
        assert_eq!(g2.points_to(Local::new(1)), hashbrown::HashSet::from([Node::Parameter(1)]));
    }

    #[test]
    fn field_load_creates_a_load_node_once_then_reuses_it() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        g.strong_update(Local::new(0), [Node::Parameter(0)]);
        field_load(&mut g, &mut alloc, Local::new(1), g.points_to(Local::new(0)), f("x"));
        let first = g.points_to(Local::new(1));
        field_load(&mut g, &mut alloc, Local::new(2), g.points_to(Local::new(0)), f("x"));
        let second = g.points_to(Local::new(2));
        assert_eq!(first, second);
    }

    #[test]
    fn field_store_adds_an_inside_edge_and_records_mutation() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        g.strong_update(Local::new(0), [Node::Parameter(0)]);
        g.strong_update(Local::new(1), [Node::Inside(0)]);
        apply(
            &Stmt::FieldStore { base: Local::new(0), field: FieldId::new("x"), src: Local::new(1) },
            &mut g,
            &mut alloc,
            &registry,
            false,
        );
        assert_eq!(
            g.targets(Node::Parameter(0), &f("x"), EdgeKind::Inside),
            hashbrown::HashSet::from([Node::Inside(0)])
        );
        assert!(g.mutations().contains(&(Node::Parameter(0), f("x"))));
    }

    #[test]
    fn static_field_store_escalates_to_global_side_effect() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        g.strong_update(Local::new(0), [Node::Inside(0)]);
        apply(
            &Stmt::StaticFieldStore { field: FieldId::new("Counter.count"), src: Local::new(0) },
            &mut g,
            &mut alloc,
            &registry,
            true,
        );
        assert!(g.global_side_effect());
        assert!(g.escaped().contains(&Node::Inside(0)));
        assert!(g.mutations().contains(&(Node::Global, f("Counter.count"))));
    }

    #[test]
    fn array_store_records_mutation_against_the_sentinel_with_no_edge() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        g.strong_update(Local::new(0), [Node::Inside(0)]);
        apply(
            &Stmt::ArrayStore { base: Local::new(0), src: Local::new(1) },
            &mut g,
            &mut alloc,
            &registry,
            true,
        );
        assert!(g.mutations().contains(&(Node::Inside(0), FieldOrElem::Elem)));
        assert!(g.all_edges().is_empty());
    }

    #[test]
    fn safe_call_does_not_escape_arguments() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let mut registry = SafeMethodRegistry::empty();
        registry.trust_signature("a.B#m");
        g.strong_update(Local::new(0), [Node::Parameter(0)]);
        let call = Call {
            dst: Some(Local::new(1)),
            dst_ty: Ty::Reference,
            callee: MethodRef::new("a.B", "m"),
            receiver: None,
            args: vec![Local::new(0)],
            call_site: AllocSite::new(0),
        };
        apply(&Stmt::Call(call), &mut g, &mut alloc, &registry, true);
        assert!(g.escaped().is_empty());
        assert!(!g.global_side_effect());
        assert!(!g.points_to(Local::new(1)).is_empty());
    }

    #[test]
    fn unknown_call_escapes_receiver_and_args_and_returns_global() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        g.strong_update(Local::new(0), [Node::Parameter(1)]);
        let call = Call {
            dst: Some(Local::new(1)),
            dst_ty: Ty::Reference,
            callee: MethodRef::new("com.example.Widget", "paint"),
            receiver: Some(Local::new(0)),
            args: vec![],
            call_site: AllocSite::new(0),
        };
        apply(&Stmt::Call(call), &mut g, &mut alloc, &registry, false);
        assert!(g.escaped().contains(&Node::Parameter(1)));
        assert!(g.global_side_effect());
        assert_eq!(g.points_to(Local::new(1)), hashbrown::HashSet::from([Node::Global]));
    }

    #[test]
    fn allocation_assigns_a_fresh_inside_node() {
        let mut g = PointsToGraph::empty();
        let mut alloc = NodeIdAllocator::new();
        let registry = SafeMethodRegistry::empty();
        apply(
            &Stmt::Alloc { dst: Local::new(0), site: AllocSite::new(3), label: "array".into() },
            &mut g,
            &mut alloc,
            &registry,
            true,
        );
        assert_eq!(g.points_to(Local::new(0)), hashbrown::HashSet::from([Node::Inside(3)]));
    }
}
