// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The safe-method registry (C3, §4.3 rule 9, §6.3): which call targets the analysis may
//! trust to behave as if they were analyzed and found pure, without actually analyzing them.

use hashbrown::HashSet;
use serde::Deserialize;

use purity_ir::MethodRef;

/// A set of call targets the analysis treats as pure without inspecting their bodies.
///
/// Constructors and non-constructors are looked up through disjoint parts of the registry
/// (§6.3), since a class with a trusted constructor says nothing about whether its other
/// methods are safe, and vice versa:
/// - a constructor callee is trusted only if its declaring class is in
///   `safe_constructor_classes`;
/// - a non-constructor callee is trusted if its declaring class's name starts with a
///   registered prefix (e.g. a whole package), else by an exact `"class#method"` signature
///   match.
///
/// This mirrors why an opaque loader boundary needs an escape hatch at all: a callee outside
/// the analyzed program (a standard-library method, say) can never be analyzed directly, so
/// unless it is registered here rule 9's "unknown callee" fallback applies and the call is
/// always treated conservatively impure.
#[derive(Clone, Debug, Default)]
pub struct SafeMethodRegistry {
    safe_constructor_classes: HashSet<Box<str>>,
    safe_class_prefixes: Vec<Box<str>>,
    safe_method_signatures: HashSet<Box<str>>,
}

impl SafeMethodRegistry {
    /// An empty registry: every call is treated conservatively (nothing is trusted).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the baked-in default registry (§6.3): a conservative starting point naming a
    /// handful of well-known allocation-only constructors, safe enough to ship without a
    /// configuration file.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for class in ["java.lang.Object", "java.lang.StringBuilder"] {
            registry.safe_constructor_classes.insert(class.into());
        }
        for signature in [
            "java.lang.Math#abs",
            "java.lang.Math#max",
            "java.lang.Math#min",
            "java.lang.String#length",
            "java.lang.String#charAt",
        ] {
            registry.safe_method_signatures.insert(signature.into());
        }
        registry
    }

    /// Registers `class`'s constructor as safe. Consulted only for constructor callees; it
    /// says nothing about `class`'s other methods (register those by prefix or signature).
    pub fn trust_class(&mut self, class: impl Into<Box<str>>) {
        self.safe_constructor_classes.insert(class.into());
    }

    /// Registers every class whose fully-qualified name starts with `prefix` as safe.
    pub fn trust_prefix(&mut self, prefix: impl Into<Box<str>>) {
        self.safe_class_prefixes.push(prefix.into());
    }

    /// Registers one exact `"class#method"` signature as safe.
    pub fn trust_signature(&mut self, signature: impl Into<Box<str>>) {
        self.safe_method_signatures.insert(signature.into());
    }

    /// Merges `other`'s entries into `self`, e.g. layering a user-supplied registry file on
    /// top of [`Self::builtin`].
    pub fn merge(&mut self, other: Self) {
        self.safe_constructor_classes.extend(other.safe_constructor_classes);
        self.safe_class_prefixes.extend(other.safe_class_prefixes);
        self.safe_method_signatures.extend(other.safe_method_signatures);
    }

    /// Returns `true` if `callee` should be trusted as pure without being analyzed.
    ///
    /// Constructors and non-constructors consult disjoint parts of the registry (§6.3):
    /// a constructor is trusted only if its class is in `safe_constructor_classes`, while a
    /// non-constructor is trusted by class-prefix or exact signature, never by
    /// `safe_constructor_classes` alone.
    #[must_use]
    pub fn is_safe(&self, callee: &MethodRef) -> bool {
        if callee.is_constructor() {
            return self.safe_constructor_classes.contains(&*callee.class);
        }
        if self
            .safe_class_prefixes
            .iter()
            .any(|prefix| callee.class.starts_with(&**prefix))
        {
            return true;
        }
        self.safe_method_signatures.contains(callee.signature_key().as_str())
    }
}

/// The serde-deserializable shape of a TOML safe-method registry file (§6.3).
///
/// ```toml
/// safe_classes = ["java.lang.Object"]
/// safe_prefixes = ["java.lang.Math"]
/// safe_signatures = ["java.lang.String#length"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile {
    #[serde(default)]
    safe_classes: Vec<String>,
    #[serde(default)]
    safe_prefixes: Vec<String>,
    #[serde(default)]
    safe_signatures: Vec<String>,
}

impl From<RegistryFile> for SafeMethodRegistry {
    fn from(file: RegistryFile) -> Self {
        let mut registry = SafeMethodRegistry::empty();
        for class in file.safe_classes {
            registry.trust_class(class);
        }
        for prefix in file.safe_prefixes {
            registry.trust_prefix(prefix);
        }
        for signature in file.safe_signatures {
            registry.trust_signature(signature);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_signature_match_is_safe() {
        let mut registry = SafeMethodRegistry::empty();
        registry.trust_signature("com.example.Util#noop");
        assert!(registry.is_safe(&MethodRef::new("com.example.Util", "noop")));
        assert!(!registry.is_safe(&MethodRef::new("com.example.Util", "other")));
    }

    #[test]
    fn whole_class_trust_covers_constructors() {
        let mut registry = SafeMethodRegistry::empty();
        registry.trust_class("java.lang.Object");
        assert!(registry.is_safe(&MethodRef::new("java.lang.Object", "<init>")));
    }

    #[test]
    fn prefix_trust_matches_any_method_in_the_package() {
        let mut registry = SafeMethodRegistry::empty();
        registry.trust_prefix("java.lang.Math");
        assert!(registry.is_safe(&MethodRef::new("java.lang.Math", "sqrt")));
        assert!(!registry.is_safe(&MethodRef::new("java.util.Math", "sqrt")));
    }

    #[test]
    fn builtin_registry_trusts_known_allocation_only_constructors() {
        let registry = SafeMethodRegistry::builtin();
        assert!(registry.is_safe(&MethodRef::new("java.lang.Object", "<init>")));
        assert!(registry.is_safe(&MethodRef::new("java.lang.Math", "abs")));
        assert!(!registry.is_safe(&MethodRef::new("com.example.Widget", "paint")));
    }

    #[test]
    fn registry_file_round_trips_into_a_registry() {
        let file = RegistryFile {
            safe_classes: vec!["a.B".to_owned()],
            safe_prefixes: vec!["a.pkg".to_owned()],
            safe_signatures: vec!["a.B#m".to_owned()],
        };
        let registry: SafeMethodRegistry = file.into();
        assert!(registry.is_safe(&MethodRef::new("a.B", "<init>")));
        assert!(registry.is_safe(&MethodRef::new("a.pkg.Thing", "x")));
        assert!(registry.is_safe(&MethodRef::new("a.B", "m")));
    }
}
