// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single method body: its statements, CFG, and the metadata §6.1 requires from the loader.

use crate::cfg::Cfg;
use crate::ids::{Local, MethodRef};
use crate::ir::Stmt;
use crate::types::Ty;

/// A fully normalized method body, as supplied by the (out-of-scope) bytecode loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    /// The method's own class/name, also used as the safe-method-registry lookup key.
    pub signature: MethodRef,
    /// `true` for `static` methods: there is no receiver, and parameter `k` binds to
    /// `Parameter(k)` rather than `Parameter(k+1)`.
    pub is_static: bool,
    /// Number of *declared* parameters, excluding the implicit receiver.
    pub param_count: u32,
    /// The statement list; `Cfg` block ranges index into this.
    pub statements: Vec<Stmt>,
    /// The control-flow graph over `statements`.
    pub cfg: Cfg,
    /// Type of each local that appears as an lvalue somewhere in `statements`, indexed by
    /// `Local::as_u32`. Locals with no recorded type are treated as primitive (the transfer
    /// rules then simply never dereference them).
    local_types: Vec<Ty>,
}

impl Method {
    /// Constructs a method body. `local_types` must be indexable by every `Local` that is
    /// ever a destination in `statements`; shorter vectors are treated as all-primitive past
    /// their end.
    #[must_use]
    pub fn new(
        signature: MethodRef,
        is_static: bool,
        param_count: u32,
        statements: Vec<Stmt>,
        cfg: Cfg,
        local_types: Vec<Ty>,
    ) -> Self {
        Self {
            signature,
            is_static,
            param_count,
            statements,
            cfg,
            local_types,
        }
    }

    /// Returns `true` if this method is a constructor (`<init>`), which the purity checker
    /// treats specially (§4.6).
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.signature.is_constructor()
    }

    /// Returns the type of `local`, or `Ty::Primitive` if it was never recorded (e.g. an
    /// unused or out-of-range local).
    #[must_use]
    pub fn local_type(&self, local: Local) -> Ty {
        self.local_types
            .get(local.as_u32() as usize)
            .copied()
            .unwrap_or(Ty::Primitive)
    }

    /// Returns `true` if `local` has reference type.
    #[must_use]
    pub fn is_reference(&self, local: Local) -> bool {
        self.local_type(local).is_reference()
    }
}
