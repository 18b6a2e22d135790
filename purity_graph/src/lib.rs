// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The points-to/escape analysis engine.
//!
//! Consumes method bodies that satisfy the `purity_ir` contract and produces a
//! [`purity::PurityResult`] per method, by running a forward dataflow fixpoint
//! ([`flow::analyze_method`]) over a points-to graph ([`graph::PointsToGraph`]) and then
//! applying the purity decision rule ([`purity::check`]).
//!
//! This crate performs no I/O and makes no assumption about where method bodies came from;
//! that boundary belongs to the driver that consumes it.

pub mod field;
pub mod flow;
pub mod graph;
pub mod merge;
pub mod node;
pub mod purity;
pub mod registry;
pub mod render;
pub mod transfer;

pub use field::FieldOrElem;
pub use flow::{analyze_method, MergeMode};
pub use graph::{EdgeKind, PointsToGraph, Violation};
pub use node::{Node, NodeIdAllocator};
pub use purity::{check, MethodSummary, PurityResult};
pub use registry::{RegistryFile, SafeMethodRegistry};
