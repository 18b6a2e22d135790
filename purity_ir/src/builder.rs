// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Programmatic construction of method bodies.
//!
//! There is no bytecode loader in this workspace (§1): it's an opaque external producer.
//! This builder is the stand-in used by tests, benchmarks, and the CLI's demo corpus to
//! construct [`Method`] values that satisfy the §6.1 contract directly, the same way
//! `execution_tape::asm::{Asm, ProgramBuilder}` lets callers build VM programs without a
//! compiler front end.

use crate::cfg::{BasicBlock, Cfg};
use crate::ids::{AllocSite, FieldId, Local, MethodRef};
use crate::ir::{Call, IdentitySource, Stmt};
use crate::method::Method;
use crate::types::Ty;

/// Builds one [`Method`] statement-by-statement.
///
/// By default every statement lands in a single implicit block (block 0). Call
/// [`MethodBuilder::start_block`] to cut a new block boundary at the current statement
/// count for tests that exercise multi-block CFGs (joins, branches); wire block
/// successors with [`MethodBuilder::set_succs`].
#[derive(Debug)]
pub struct MethodBuilder {
    signature: MethodRef,
    is_static: bool,
    param_count: u32,
    statements: Vec<Stmt>,
    local_types: Vec<Ty>,
    block_starts: Vec<usize>,
    succs: Vec<[Option<usize>; 2]>,
    next_alloc_site: u32,
    next_local: u32,
}

impl MethodBuilder {
    /// Starts building a method with the given signature, staticness, and declared
    /// parameter count (excluding the implicit receiver).
    #[must_use]
    pub fn new(signature: MethodRef, is_static: bool, param_count: u32) -> Self {
        Self {
            signature,
            is_static,
            param_count,
            statements: Vec::new(),
            local_types: Vec::new(),
            block_starts: vec![0],
            succs: vec![[None, None]],
            next_alloc_site: 0,
            next_local: 0,
        }
    }

    /// Allocates a fresh local without emitting a statement (used for temporaries whose
    /// type is set via a later def).
    pub fn fresh_local(&mut self) -> Local {
        let id = self.next_local;
        self.next_local += 1;
        Local::new(id)
    }

    fn set_type(&mut self, local: Local, ty: Ty) {
        let idx = local.as_u32() as usize;
        if self.local_types.len() <= idx {
            self.local_types.resize(idx + 1, Ty::Primitive);
        }
        self.local_types[idx] = ty;
    }

    fn push(&mut self, stmt: Stmt) -> usize {
        self.statements.push(stmt);
        self.statements.len() - 1
    }

    /// `v := @this`.
    pub fn identity_this(&mut self) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::Identity {
            dst,
            source: IdentitySource::This,
        });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `v := @param k`.
    pub fn identity_param(&mut self, k: u32, ty: Ty) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::Identity {
            dst,
            source: IdentitySource::Param(k),
        });
        self.set_type(dst, ty);
        dst
    }

    /// `v := new T`.
    pub fn alloc(&mut self, label: impl Into<Box<str>>) -> Local {
        let dst = self.fresh_local();
        let site = AllocSite::new(self.next_alloc_site);
        self.next_alloc_site += 1;
        self.push(Stmt::Alloc {
            dst,
            site,
            label: label.into(),
        });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `v := new T[n]`.
    pub fn array_alloc(&mut self, size: Option<Local>) -> Local {
        let dst = self.fresh_local();
        let site = AllocSite::new(self.next_alloc_site);
        self.next_alloc_site += 1;
        self.push(Stmt::ArrayAlloc { dst, site, size });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `v := u`.
    pub fn copy(&mut self, src: Local) -> Local {
        let dst = self.fresh_local();
        let ty = self.local_type_of(src);
        self.push(Stmt::Copy { dst, src });
        self.set_type(dst, ty);
        dst
    }

    /// `v := (T) u`.
    pub fn cast(&mut self, src: Local, ty: Ty) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::Cast { dst, src, ty });
        self.set_type(dst, ty);
        dst
    }

    /// `v := u.f`.
    pub fn field_load(&mut self, base: Local, field: impl Into<Box<str>>) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::FieldLoad {
            dst,
            base,
            field: FieldId::new(field),
        });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `u.f := x`.
    pub fn field_store(&mut self, base: Local, field: impl Into<Box<str>>, src: Local) {
        self.push(Stmt::FieldStore {
            base,
            field: FieldId::new(field),
            src,
        });
    }

    /// `v := C.f`.
    pub fn static_field_load(&mut self, field: impl Into<Box<str>>) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::StaticFieldLoad {
            dst,
            field: FieldId::new(field),
        });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `C.f := x`.
    pub fn static_field_store(&mut self, field: impl Into<Box<str>>, src: Local) {
        self.push(Stmt::StaticFieldStore {
            field: FieldId::new(field),
            src,
        });
    }

    /// `v := u[_]`.
    pub fn array_load(&mut self, base: Local) -> Local {
        let dst = self.fresh_local();
        self.push(Stmt::ArrayLoad { dst, base });
        self.set_type(dst, Ty::Reference);
        dst
    }

    /// `u[_] := x`.
    pub fn array_store(&mut self, base: Local, src: Local) {
        self.push(Stmt::ArrayStore { base, src });
    }

    /// `[v :=] m(a0 .. an)`. `ret_ty` is consulted only if the call's result is bound.
    pub fn call(
        &mut self,
        callee: MethodRef,
        receiver: Option<Local>,
        args: Vec<Local>,
        ret_ty: Option<Ty>,
    ) -> Option<Local> {
        let dst = ret_ty.map(|_| self.fresh_local());
        let call_site = AllocSite::new(self.next_alloc_site);
        self.next_alloc_site += 1;
        self.push(Stmt::Call(Call {
            dst,
            dst_ty: ret_ty.unwrap_or(Ty::Primitive),
            callee,
            receiver,
            args,
            call_site,
        }));
        if let (Some(dst), Some(ty)) = (dst, ret_ty) {
            self.set_type(dst, ty);
        }
        dst
    }

    /// `return [v]`.
    pub fn ret(&mut self, value: Option<Local>) {
        self.push(Stmt::Return(value));
    }

    /// A conditional branch statement. Successors must be wired with [`Self::set_succs`].
    pub fn branch(&mut self, cond: Local) {
        self.push(Stmt::Branch { cond });
    }

    /// An unconditional branch statement. Its (single) successor must be wired with
    /// [`Self::set_succs`].
    pub fn goto(&mut self) {
        self.push(Stmt::Goto);
    }

    /// A no-op statement.
    pub fn nop(&mut self) {
        self.push(Stmt::Nop);
    }

    /// Returns `self.local_type(local)`, or `Primitive` if never recorded.
    fn local_type_of(&self, local: Local) -> Ty {
        self.local_types
            .get(local.as_u32() as usize)
            .copied()
            .unwrap_or(Ty::Primitive)
    }

    /// Cuts a new basic-block boundary at the current statement count, returning the new
    /// block's index. The previous block falls through to it by default (patch with
    /// [`Self::set_succs`] if that's not what's wanted).
    pub fn start_block(&mut self) -> usize {
        let start = self.statements.len();
        let new_index = self.block_starts.len();
        self.block_starts.push(start);
        self.succs.push([None, None]);
        let prev = new_index - 1;
        if self.succs[prev] == [None, None] {
            self.succs[prev][0] = Some(new_index);
        }
        new_index
    }

    /// Overrides a block's successor list (e.g. to wire a branch's taken/fall-through
    /// targets, or to cut a fall-through edge `start_block` guessed wrong).
    pub fn set_succs(&mut self, block: usize, succs: [Option<usize>; 2]) {
        self.succs[block] = succs;
    }

    /// Finishes the method body, computing the CFG from the recorded block boundaries.
    #[must_use]
    pub fn build(self) -> Method {
        let mut bounds = self.block_starts.clone();
        bounds.push(self.statements.len());
        let blocks = (0..self.block_starts.len())
            .map(|i| {
                let mut b = BasicBlock::new(bounds[i], bounds[i + 1]);
                b.succs = self.succs[i];
                b
            })
            .collect();
        Method::new(
            self.signature,
            self.is_static,
            self.param_count,
            self.statements,
            Cfg::new(blocks),
            self.local_types,
        )
    }
}
