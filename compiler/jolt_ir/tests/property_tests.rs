//! Property-based tests for name decomposition.
//!
//! Generates package paths and class nests and checks that the structural
//! queries on the symbol table agree with how the names were built.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use jolt_ir::{Symbol, SymbolTable};
use proptest::prelude::*;

fn package_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("[a-z][a-z0-9]{0,6}").expect("valid regex"),
        0..4,
    )
}

fn class_nest_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::string::string_regex("[A-Z][a-zA-Z0-9]{0,6}").expect("valid regex"),
        1..4,
    )
}

fn build(table: &SymbolTable, package: &[String], nest: &[String]) -> Symbol {
    let mut sym = Symbol::EMPTY;
    for component in package {
        sym = table.qualify(sym, table.intern(component));
    }
    sym = table.qualify(sym, table.intern(&nest[0]));
    for component in &nest[1..] {
        sym = table.qualify_inner(sym, table.intern(component));
    }
    sym
}

proptest! {
    #[test]
    fn qualifier_is_package(package in package_strategy(), nest in class_nest_strategy()) {
        let table = SymbolTable::new();
        let sym = build(&table, &package, &nest);
        prop_assert_eq!(table.lookup(table.qualifier(sym)), package.join("."));
    }

    #[test]
    fn flat_name_joins_nest(package in package_strategy(), nest in class_nest_strategy()) {
        let table = SymbolTable::new();
        let sym = build(&table, &package, &nest);
        prop_assert_eq!(table.lookup(table.flat_name(sym)), nest.join("."));
        prop_assert_eq!(table.is_inner(sym), nest.len() > 1);
    }

    #[test]
    fn top_name_is_outermost(package in package_strategy(), nest in class_nest_strategy()) {
        let table = SymbolTable::new();
        let sym = build(&table, &package, &nest[..1]);
        let inner = build(&table, &package, &nest);
        prop_assert_eq!(table.top_name(inner), sym);
    }

    #[test]
    fn flatten_is_idempotent(package in package_strategy(), nest in class_nest_strategy()) {
        let table = SymbolTable::new();
        let sym = build(&table, &package, &nest);
        let flat = table.flatten(sym);
        prop_assert_eq!(table.flatten(flat), flat);
        prop_assert!(!table.is_inner(flat));
        prop_assert_eq!(table.qualifier(flat), table.qualifier(sym));
    }

    #[test]
    fn ambiguous_prefix_is_reversible(package in package_strategy(), nest in class_nest_strategy()) {
        let table = SymbolTable::new();
        let sym = build(&table, &package, &nest);
        let tagged = table.add_ambiguous_prefix(sym);
        prop_assert!(table.has_ambiguous_prefix(tagged));
        prop_assert_eq!(table.remove_ambiguous_prefix(tagged), sym);
    }
}
