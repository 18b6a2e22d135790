// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOT rendering of exit graphs, for the on-disk artifacts of §6.5.
//!
//! Nodes and edges are sorted by identity before being written so that re-running the
//! analysis on an unchanged input produces byte-identical output.

use std::fmt::Write as _;

use crate::graph::PointsToGraph;
use crate::node::Node;

fn node_shape(n: Node) -> &'static str {
    match n {
        Node::Parameter(_) => "box",
        Node::Global => "doublecircle",
        Node::Inside(_) => "ellipse",
        Node::Load(_) => "diamond",
    }
}

/// Renders `g` as a `digraph` in DOT syntax, labeling inside edges solid and outside edges
/// dashed, matching the kind distinction that drives the purity closures (§4.6).
#[must_use]
pub fn to_dot(name: &str, g: &PointsToGraph) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "digraph \"{name}\" {{");
    let _ = writeln!(out, "  rankdir=LR;");

    let mut nodes: Vec<Node> = g.nodes().into_iter().collect();
    nodes.sort_by_key(Node::identity);
    for n in &nodes {
        let _ = writeln!(
            out,
            "  \"{}\" [shape={}];",
            n.identity(),
            node_shape(*n)
        );
    }

    let mut inside: Vec<(Node, String, Node)> = g
        .all_edges()
        .into_iter()
        .filter(|(src, f, tgt)| {
            g.targets(*src, f, crate::graph::EdgeKind::Inside).contains(tgt)
        })
        .map(|(src, f, tgt)| (src, f.to_string(), tgt))
        .collect();
    inside.sort();
    for (src, f, tgt) in inside {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{f}\", style=solid];",
            src.identity(),
            tgt.identity()
        );
    }

    let mut outside: Vec<(Node, String, Node)> = g
        .all_edges()
        .into_iter()
        .filter(|(src, f, tgt)| {
            g.targets(*src, f, crate::graph::EdgeKind::Outside).contains(tgt)
        })
        .map(|(src, f, tgt)| (src, f.to_string(), tgt))
        .collect();
    outside.sort();
    for (src, f, tgt) in outside {
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [label=\"{f}\", style=dashed];",
            src.identity(),
            tgt.identity()
        );
    }

    out.push_str("}\n");
    out
}
