// Copyright 2026 the Execution Tape Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The eight concrete scenarios documented for the purity decision rule.

use purity_graph::{analyze_method, check, MergeMode, PurityResult, SafeMethodRegistry};
use purity_ir::builder::MethodBuilder;
use purity_ir::{Method, MethodRef, Ty};

fn analyze(method: &Method, registry: &SafeMethodRegistry) -> PurityResult {
    let exit = analyze_method(method, registry, MergeMode::Enabled);
    check(&exit, method.is_constructor())
}

fn assert_pure(result: &PurityResult) {
    assert!(matches!(result, PurityResult::Pure), "expected Pure, got {result:?}");
}

fn assert_impure(result: &PurityResult) {
    assert!(matches!(result, PurityResult::Impure(_)), "expected Impure, got {result:?}");
}

/// 1. `static int add(int a, int b) { return a+b; }` → Pure.
#[test]
fn pure_arithmetic() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Arith", "add"), true, 2);
    b.identity_param(0, Ty::Primitive);
    b.identity_param(1, Ty::Primitive);
    b.ret(None);
    let method = b.build();
    assert_pure(&analyze(&method, &SafeMethodRegistry::empty()));
}

/// 2. `static void setX(int[] arr, int v) { arr[0] = v; }` → Impure.
#[test]
fn mutate_parameter_array() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Arrays", "setX"), true, 2);
    let arr = b.identity_param(0, Ty::Reference);
    let v = b.identity_param(1, Ty::Primitive);
    b.array_store(arr, v);
    b.ret(None);
    let method = b.build();
    assert_impure(&analyze(&method, &SafeMethodRegistry::empty()));
}

/// 3. `static int c; static void inc(){ c = c+1; }` → Impure ("writes to static field c").
#[test]
fn static_field_write() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Counter", "inc"), true, 0);
    let loaded = b.static_field_load("c");
    b.static_field_store("c", loaded);
    b.ret(None);
    let method = b.build();
    let result = analyze(&method, &SafeMethodRegistry::empty());
    match result {
        PurityResult::Impure(reason) => assert!(reason.contains("static field c")),
        other => panic!("expected Impure, got {other:?}"),
    }
}

/// 4. `static int[] createArray(int n){ int[] a = new int[n]; a[0]=42; return a; }` → Pure.
#[test]
fn fresh_allocation_mutated_and_returned() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Arrays", "createArray"), true, 1);
    let n = b.identity_param(0, Ty::Primitive);
    let a = b.array_alloc(Some(n));
    let literal = b.alloc("int-literal");
    b.array_store(a, literal);
    b.ret(Some(a));
    let method = b.build();
    assert_pure(&analyze(&method, &SafeMethodRegistry::empty()));
}

/// 5. `class Point { float x,y; Point(float a, float b){ this.x=a; this.y=b; } }` → Pure.
#[test]
fn constructor_initializing_fields() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Point", "<init>"), false, 2);
    let this = b.identity_this();
    let a = b.identity_param(0, Ty::Primitive);
    let bb = b.identity_param(1, Ty::Primitive);
    b.field_store(this, "x", a);
    b.field_store(this, "y", bb);
    b.ret(None);
    let method = b.build();
    assert_pure(&analyze(&method, &SafeMethodRegistry::empty()));
}

/// 6. `class Wallet { BankAccount account; void addFunds(int n){ this.account.balance += n; } }`
///    → Impure.
#[test]
fn impure_method_chaining_through_parameter() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Wallet", "addFunds"), false, 1);
    let this = b.identity_this();
    let n = b.identity_param(0, Ty::Primitive);
    let account = b.field_load(this, "account");
    let balance = b.field_load(account, "balance");
    let _ = balance;
    b.field_store(account, "balance", n);
    b.ret(None);
    let method = b.build();
    assert_impure(&analyze(&method, &SafeMethodRegistry::empty()));
}

/// 7. `create()` allocates an `ArrayList`, calls `add`, returns it — both calls in the safe
///    registry → Pure.
#[test]
fn safe_callee_returning_fresh_object() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Factory", "create"), true, 0);
    let l = b
        .call(MethodRef::new("java.util.ArrayList", "<init>"), None, vec![], Some(Ty::Reference))
        .expect("constructor call binds a local");
    let literal = b.alloc("string-literal");
    b.call(
        MethodRef::new("java.util.ArrayList", "add"),
        Some(l),
        vec![literal],
        None,
    );
    b.ret(Some(l));
    let method = b.build();

    let mut registry = SafeMethodRegistry::empty();
    registry.trust_class("java.util.ArrayList");
    registry.trust_signature("java.util.ArrayList#add");
    assert_pure(&analyze(&method, &registry));
}

/// 8. Same as (7) but `ArrayList#add` is not registered safe → Impure.
#[test]
fn unknown_callee_is_conservative() {
    let mut b = MethodBuilder::new(MethodRef::new("demo.Factory", "create"), true, 0);
    let l = b
        .call(MethodRef::new("java.util.ArrayList", "<init>"), None, vec![], Some(Ty::Reference))
        .expect("constructor call binds a local");
    let literal = b.alloc("string-literal");
    b.call(
        MethodRef::new("java.util.ArrayList", "add"),
        Some(l),
        vec![literal],
        None,
    );
    b.ret(Some(l));
    let method = b.build();

    let mut registry = SafeMethodRegistry::empty();
    registry.trust_class("java.util.ArrayList");
    assert_impure(&analyze(&method, &registry));
}
