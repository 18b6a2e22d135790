// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Class and program aggregates above a single [`crate::method::Method`].

use crate::method::Method;

/// A loaded class: its fully qualified name and its concrete methods.
///
/// Abstract methods and interfaces are out of scope for C8 (there is no body to analyze);
/// a loader should simply omit them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFile {
    /// Fully qualified, dotted class name.
    pub name: Box<str>,
    /// The class's concrete methods, in declaration order.
    pub methods: Vec<Method>,
}

impl ClassFile {
    /// Constructs a class file from its name and methods.
    #[must_use]
    pub fn new(name: impl Into<Box<str>>, methods: Vec<Method>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }
}

/// A loaded program: every class the driver (C8) should analyze.
///
/// This is the concrete shape the (out-of-scope) bytecode loader is expected to produce.
/// `purity_ir` never constructs one itself from bytes; see `purity_ir::builder` for the
/// programmatic construction API used by tests and `purity_cli::loader` for the JSON
/// interchange format used by the CLI.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    /// The loaded classes, in load order.
    pub classes: Vec<ClassFile>,
}

impl Program {
    /// Constructs an empty program.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a class to the program.
    pub fn push(&mut self, class: ClassFile) {
        self.classes.push(class);
    }

    /// Iterates over every method of every class, in load order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.classes.iter().flat_map(|c| c.methods.iter())
    }
}
