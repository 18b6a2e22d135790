// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The normalized three-address statement shapes consumed by the transfer functions (§6.1).
//!
//! This is the full closed set of shapes the engine recognizes. A bytecode loader that
//! cannot normalize some construct into one of these is expected to lower it to [`Stmt::Nop`]
//! rather than invent a new shape — §6.1 is explicit that "anything else is a no-op for the
//! engine".

use crate::ids::{AllocSite, FieldId, Local, MethodRef};
use crate::types::Ty;

/// Which formal parameter an identity statement binds, or the receiver.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentitySource {
    /// `v := @this` (only valid for instance methods).
    This,
    /// `v := @param k`, `k` zero-indexed among the method's *declared* parameters (i.e.
    /// excluding the implicit receiver).
    Param(u32),
}

/// A call's receiver/argument/return shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    /// Destination local for the return value, if the call's result is used and has
    /// reference type. `None` if the call is a bare statement or returns a primitive
    /// that's discarded.
    pub dst: Option<Local>,
    /// The type of the returned value, consulted only when `dst.is_some()`.
    pub dst_ty: Ty,
    /// The statically resolved (or virtually dispatched) callee.
    pub callee: MethodRef,
    /// The receiver local, for instance/virtual/interface calls. `None` for static calls.
    pub receiver: Option<Local>,
    /// Argument locals, in declaration order (excluding the receiver).
    pub args: Vec<Local>,
    /// A site index from the same per-method sequence as [`crate::ir::Stmt::Alloc`]'s
    /// `site`, used only when the callee is in the safe-method registry and the transfer
    /// rule mints a fresh `Inside` node standing in for its return value (rule 13): the
    /// callee is trusted to return something equivalent to a fresh allocation, so it gets
    /// an identity from the same space, stable across re-transfer of the same statement.
    pub call_site: AllocSite,
}

/// One normalized three-address statement.
///
/// Each variant corresponds to one transfer rule in §4.3 (numbered in that doc's order
/// below for cross-reference).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    /// (1)(2) `v := @this` / `v := @param k`.
    Identity { dst: Local, source: IdentitySource },
    /// (3) `v := new T`.
    Alloc {
        dst: Local,
        site: AllocSite,
        label: Box<str>,
    },
    /// (4) `v := new T[n]`.
    ArrayAlloc {
        dst: Local,
        site: AllocSite,
        size: Option<Local>,
    },
    /// (5) `v := u` (local copy).
    Copy { dst: Local, src: Local },
    /// (6) `v := (T) u` (cast; semantically identical to `Copy` for the engine).
    Cast { dst: Local, src: Local, ty: Ty },
    /// (7) `v := u.f`.
    FieldLoad {
        dst: Local,
        base: Local,
        field: FieldId,
    },
    /// (8) `u.f := x`.
    FieldStore {
        base: Local,
        field: FieldId,
        src: Local,
    },
    /// (9) `v := C.f`.
    StaticFieldLoad { dst: Local, field: FieldId },
    /// (10) `C.f := x`.
    StaticFieldStore { field: FieldId, src: Local },
    /// (11) `v := u[_]`.
    ArrayLoad { dst: Local, base: Local },
    /// (12) `u[_] := x`.
    ArrayStore { base: Local, src: Local },
    /// (13) `[v :=] m(a0 .. an)`.
    Call(Call),
    /// (14) `return [v]`.
    Return(Option<Local>),
    /// (14) Conditional branch; successors are carried by the owning `BasicBlock`, not here.
    Branch { cond: Local },
    /// (14) Unconditional branch.
    Goto,
    /// (14) No-op, and the fallback for any statement shape the engine doesn't recognize.
    Nop,
}

impl Stmt {
    /// Returns `true` for the statement shapes that can introduce a fresh `Load` node
    /// (field/array loads), which is also when the node merger is invoked mid-transfer.
    #[must_use]
    pub fn is_field_or_array_load(&self) -> bool {
        matches!(
            self,
            Self::FieldLoad { .. } | Self::StaticFieldLoad { .. } | Self::ArrayLoad { .. }
        )
    }
}
