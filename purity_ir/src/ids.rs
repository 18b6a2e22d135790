// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable newtype identifiers used across the IR contract.

use std::fmt;

/// A local variable (virtual register) within a single method body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Local(pub u32);

impl Local {
    /// Creates a new local id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer backing this id.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Local {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// An allocation-site index, assigned in program order within a method.
///
/// Used to key `Inside` nodes so that identity is stable across re-analysis of the
/// same method body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AllocSite(pub u32);

impl AllocSite {
    /// Creates a new allocation-site id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identifies a declared instance or static field by fully-qualified name.
///
/// Fields are interned as owned strings rather than a small integer space: unlike
/// locals and allocation sites, field identity must be stable across methods and
/// classes (the field-load transfer key is `(node, field)`), and the loader has no
/// opportunity to intern them ahead of time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(Box<str>);

impl FieldId {
    /// Constructs a field id from its declared name (e.g. `"balance"` or `"Counter.count"`
    /// for a static field qualified by its declaring class).
    #[inline]
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the field's declared name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reference to a method, used as a call target and as a key into the safe-method
/// registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodRef {
    /// Fully qualified declaring class name (dotted), e.g. `"java.util.ArrayList"`.
    pub class: Box<str>,
    /// Method name, e.g. `"add"` or `"<init>"` for constructors.
    pub method: Box<str>,
}

impl MethodRef {
    /// Constructs a method reference.
    #[inline]
    pub fn new(class: impl Into<Box<str>>, method: impl Into<Box<str>>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Returns `true` if this reference names a constructor (`<init>`).
    #[inline]
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        &*self.method == "<init>"
    }

    /// Returns the `"<class>#<method>"` key used by exact safe-method lookups.
    #[must_use]
    pub fn signature_key(&self) -> String {
        format!("{}#{}", self.class, self.method)
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.class, self.method)
    }
}
