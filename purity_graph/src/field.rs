// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field keys for graph edges and the mutation set, including the array-element sentinel.

use std::fmt;

use purity_ir::FieldId;

/// A field key, as used by `I`/`O` edges and by the mutated-field set `W`.
///
/// `W ⊆ Node × (Field ∪ {⟂})`: array writes have no per-index precision (§3.2, §4.3 rule
/// 12), so they're recorded against the sentinel [`FieldOrElem::Elem`] rather than a real
/// field name. Edges (`I`/`O`) never use the sentinel — only loads/stores of *named* fields
/// create edges; array stores record a mutation with no corresponding edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldOrElem {
    /// A named instance or static field.
    Field(FieldId),
    /// `⟂`: an unindexed array element.
    Elem,
}

impl FieldOrElem {
    /// Constructs a named-field key.
    #[must_use]
    pub fn field(id: FieldId) -> Self {
        Self::Field(id)
    }
}

impl fmt::Display for FieldOrElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(id) => fmt::Display::fmt(id, f),
            Self::Elem => f.write_str("\u{22a5}"),
        }
    }
}

impl From<FieldId> for FieldOrElem {
    fn from(id: FieldId) -> Self {
        Self::Field(id)
    }
}
