// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The JSON interchange format standing in for a real bytecode loader (§1 NEW).
//!
//! Every statement that would bind a fresh local (identity, allocation, copy, cast, a
//! field/array load, or a call with a reference-typed result) is replayed through
//! [`purity_ir::builder::MethodBuilder`] in file order; its local ids are recorded in the
//! same order so later statements can refer back to them by index. This mirrors exactly how
//! `MethodBuilder`'s own counter advances, so the file format never needs to carry explicit
//! local ids.

use std::path::Path;

use serde::Deserialize;

use purity_ir::builder::MethodBuilder;
use purity_ir::{Local, Method, MethodRef, Program, Ty};

use crate::error::CliError;

#[derive(Debug, Deserialize)]
pub struct ProgramFile {
    classes: Vec<ClassFileJson>,
}

#[derive(Debug, Deserialize)]
struct ClassFileJson {
    name: String,
    methods: Vec<MethodFileJson>,
}

#[derive(Debug, Deserialize)]
struct MethodFileJson {
    name: String,
    is_static: bool,
    param_count: u32,
    statements: Vec<StmtJson>,
    /// Block boundaries as statement-index ranges; block 0 is implicit and always starts at
    /// statement 0, so this lists only blocks 1..n. An empty list means "one block".
    #[serde(default)]
    block_starts: Vec<usize>,
    /// Successor indices per block (block 0 first), `null` for "no successor".
    #[serde(default)]
    succs: Vec<[Option<usize>; 2]>,
}

#[derive(Copy, Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TyJson {
    Primitive,
    Reference,
}

impl From<TyJson> for Ty {
    fn from(ty: TyJson) -> Self {
        match ty {
            TyJson::Primitive => Ty::Primitive,
            TyJson::Reference => Ty::Reference,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum StmtJson {
    IdentityThis,
    IdentityParam { k: u32, ty: TyJson },
    Alloc { label: String },
    ArrayAlloc { size: Option<usize> },
    Copy { src: usize },
    Cast { src: usize, ty: TyJson },
    FieldLoad { base: usize, field: String },
    FieldStore { base: usize, field: String, src: usize },
    StaticFieldLoad { field: String },
    StaticFieldStore { field: String, src: usize },
    ArrayLoad { base: usize },
    ArrayStore { base: usize, src: usize },
    Call {
        callee_class: String,
        callee_method: String,
        receiver: Option<usize>,
        #[serde(default)]
        args: Vec<usize>,
        ret_ty: Option<TyJson>,
    },
    Return { value: Option<usize> },
    Branch { cond: usize },
    Goto,
    Nop,
}

/// Parses and converts a JSON corpus file into a [`Program`] the driver can analyze.
pub fn load(path: &Path) -> Result<Program, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_owned(),
        source,
    })?;
    let file: ProgramFile = serde_json::from_str(&text).map_err(|source| CliError::ParseInput {
        path: path.to_owned(),
        source,
    })?;
    Ok(convert(file))
}

fn convert(file: ProgramFile) -> Program {
    let mut program = Program::new();
    for class in file.classes {
        let class_name = class.name.clone();
        let methods = class
            .methods
            .into_iter()
            .map(|m| convert_method(&class_name, m))
            .collect();
        program.push(purity_ir::ClassFile::new(class.name, methods));
    }
    program
}

fn convert_method(class_name: &str, file: MethodFileJson) -> Method {
    let signature = MethodRef::new(class_name, file.name.clone());
    let mut builder = MethodBuilder::new(signature, file.is_static, file.param_count);

    let mut locals: Vec<Local> = Vec::new();
    let mut next_boundary = file.block_starts.iter().copied().peekable();

    for (idx, stmt) in file.statements.iter().enumerate() {
        if next_boundary.peek() == Some(&idx) {
            builder.start_block();
            next_boundary.next();
        }
        if let Some(local) = emit(&mut builder, stmt, &locals) {
            locals.push(local);
        }
    }

    for (block, succ) in file.succs.iter().enumerate() {
        builder.set_succs(block, *succ);
    }

    builder.build()
}

/// Emits one statement, returning the fresh local it bound (if any).
fn emit(builder: &mut MethodBuilder, stmt: &StmtJson, locals: &[Local]) -> Option<Local> {
    match stmt {
        StmtJson::IdentityThis => Some(builder.identity_this()),
        StmtJson::IdentityParam { k, ty } => Some(builder.identity_param(*k, (*ty).into())),
        StmtJson::Alloc { label } => Some(builder.alloc(label.clone())),
        StmtJson::ArrayAlloc { size } => Some(builder.array_alloc(size.map(|i| locals[i]))),
        StmtJson::Copy { src } => Some(builder.copy(locals[*src])),
        StmtJson::Cast { src, ty } => Some(builder.cast(locals[*src], (*ty).into())),
        StmtJson::FieldLoad { base, field } => {
            Some(builder.field_load(locals[*base], field.clone()))
        }
        StmtJson::FieldStore { base, field, src } => {
            builder.field_store(locals[*base], field.clone(), locals[*src]);
            None
        }
        StmtJson::StaticFieldLoad { field } => Some(builder.static_field_load(field.clone())),
        StmtJson::StaticFieldStore { field, src } => {
            builder.static_field_store(field.clone(), locals[*src]);
            None
        }
        StmtJson::ArrayLoad { base } => Some(builder.array_load(locals[*base])),
        StmtJson::ArrayStore { base, src } => {
            builder.array_store(locals[*base], locals[*src]);
            None
        }
        StmtJson::Call {
            callee_class,
            callee_method,
            receiver,
            args,
            ret_ty,
        } => builder.call(
            MethodRef::new(callee_class.clone(), callee_method.clone()),
            receiver.map(|i| locals[i]),
            args.iter().map(|i| locals[*i]).collect(),
            ret_ty.map(Into::into),
        ),
        StmtJson::Return { value } => {
            builder.ret(value.map(|i| locals[i]));
            None
        }
        StmtJson::Branch { cond } => {
            builder.branch(locals[*cond]);
            None
        }
        StmtJson::Goto => {
            builder.goto();
            None
        }
        StmtJson::Nop => {
            builder.nop();
            None
        }
    }
}
