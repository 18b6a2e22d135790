// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three-address IR contract consumed by the purity analysis engine (`purity_graph`).
//!
//! This crate defines *what a method body must look like* (§6.1): a statement list, a
//! basic-block CFG over it, and the handful of per-local/per-method type facts the transfer
//! functions need. It deliberately says nothing about where that method body comes from —
//! bytecode loading and IR construction from a real class file are out of scope (§1) and are
//! treated as an opaque external producer. [`builder::MethodBuilder`] is the stand-in used to
//! construct method bodies directly, for tests, benchmarks, and the CLI's demo corpus.
//!
//! It also carries [`analysis::dataflow::solve_forward`], a generic worklist fixpoint solver
//! that `purity_graph::flow` instantiates with the points-to graph as its lattice.

pub mod analysis;
pub mod builder;
pub mod cfg;
pub mod class;
pub mod ids;
pub mod ir;
pub mod method;
pub mod types;

pub use class::{ClassFile, Program};
pub use ids::{AllocSite, FieldId, Local, MethodRef};
pub use ir::{Call, Stmt};
pub use method::Method;
pub use types::Ty;
