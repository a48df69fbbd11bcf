use super::*;
use pretty_assertions::assert_eq;

fn text(table: &SymbolTable, sym: Symbol) -> &'static str {
    table.lookup(sym)
}

#[test]
fn intern_and_lookup() {
    let table = SymbolTable::new();

    let object = table.intern("java.lang.Object");
    let string = table.intern("java.lang.String");
    let object2 = table.intern("java.lang.Object");

    assert_eq!(object, object2);
    assert_ne!(object, string);
    assert_eq!(table.lookup(object), "java.lang.Object");
}

#[test]
fn empty_name_is_pre_interned() {
    let table = SymbolTable::new();
    assert_eq!(table.intern(""), Symbol::EMPTY);
    assert_eq!(table.lookup(Symbol::EMPTY), "");
    assert!(!table.is_empty());
}

#[test]
fn shared_table_handles_agree() {
    let table = SharedSymbolTable::new();
    let other = table.clone();
    assert_eq!(table.intern("p.Q"), other.intern("p.Q"));
}

#[test]
fn qualifier_and_name_of_package_qualified() {
    let table = SymbolTable::new();
    let map = table.intern("java.util.Map");

    assert!(table.is_qualified(map));
    assert_eq!(text(&table, table.qualifier(map)), "java.util");
    assert_eq!(text(&table, table.name(map)), "Map");
    assert_eq!(text(&table, table.head(map)), "java");
    assert_eq!(text(&table, table.tail(map)), "util.Map");
}

#[test]
fn unqualified_name_decomposes_to_itself() {
    let table = SymbolTable::new();
    let list = table.intern("List");

    assert!(!table.is_qualified(list));
    assert_eq!(table.qualifier(list), Symbol::EMPTY);
    assert_eq!(table.name(list), list);
    assert_eq!(table.head(list), list);
    assert_eq!(table.tail(list), Symbol::EMPTY);
    // second call goes through the cache
    assert_eq!(table.qualifier(list), Symbol::EMPTY);
}

#[test]
fn qualifier_of_inner_name_is_package() {
    let table = SymbolTable::new();
    let entry = table.intern("java.util.Map. Entry");

    assert!(table.is_inner(entry));
    assert_eq!(text(&table, table.qualifier(entry)), "java.util");
    assert_eq!(text(&table, table.name(entry)), "Map. Entry");
    assert_eq!(text(&table, table.flat_name(entry)), "Map.Entry");
    assert_eq!(text(&table, table.top_name(entry)), "java.util.Map");
}

#[test]
fn deeply_nested_inner_name() {
    let table = SymbolTable::new();
    let deep = table.intern("p.Outer. Mid.Deep");

    assert_eq!(text(&table, table.qualifier(deep)), "p");
    assert_eq!(text(&table, table.flat_name(deep)), "Outer.Mid.Deep");
    assert_eq!(text(&table, table.top_name(deep)), "p.Outer");
    assert_eq!(text(&table, table.flatten(deep)), "p.Outer$Mid$Deep");
}

#[test]
fn flat_name_of_bare_marker() {
    let table = SymbolTable::new();
    let on_demand = table.intern("p.Outer. ");
    assert_eq!(text(&table, table.flat_name(on_demand)), "Outer");
}

#[test]
fn qualify_builds_dotted_names() {
    let table = SymbolTable::new();
    let pkg = table.intern("java.util");
    let map = table.intern("Map");

    let qualified = table.qualify(pkg, map);
    assert_eq!(text(&table, qualified), "java.util.Map");
    assert_eq!(table.qualifier(qualified), pkg);
    assert_eq!(table.qualify(Symbol::EMPTY, map), map);
}

#[test]
fn qualify_after_bare_marker_extends_class_nest() {
    let table = SymbolTable::new();
    let on_demand = table.intern("p.Outer. ");
    let inner = table.intern("Inner");
    assert_eq!(text(&table, table.qualify(on_demand, inner)), "p.Outer. Inner");
}

#[test]
fn qualify_inner_uses_marker_once() {
    let table = SymbolTable::new();
    let outer = table.intern("p.Outer");
    let inner = table.intern("Inner");
    let deep = table.intern("Deep");

    let first = table.qualify_inner(outer, inner);
    assert_eq!(text(&table, first), "p.Outer. Inner");
    assert_eq!(text(&table, table.qualifier(first)), "p");

    let second = table.qualify_inner(first, deep);
    assert_eq!(text(&table, second), "p.Outer. Inner.Deep");
    assert_eq!(text(&table, table.qualifier(second)), "p");

    assert_eq!(table.qualify_inner(Symbol::EMPTY, inner), inner);
}

#[test]
fn qualify_inner_in_unnamed_package() {
    let table = SymbolTable::new();
    let outer = table.intern("Outer");
    let inner = table.intern("Inner");

    let nested = table.qualify_inner(outer, inner);
    assert_eq!(text(&table, nested), "Outer. Inner");
    assert!(!table.is_qualified(nested));
    assert_eq!(table.qualifier(nested), Symbol::EMPTY);
    assert_eq!(table.top_name(nested), outer);
}

#[test]
fn flatten_is_identity_for_top_level() {
    let table = SymbolTable::new();
    let map = table.intern("java.util.Map");
    assert_eq!(table.flatten(map), map);

    let entry = table.intern("java.util.Map. Entry");
    let flat = table.flatten(entry);
    assert_eq!(text(&table, flat), "java.util.Map$Entry");
    assert_eq!(table.flatten(flat), flat);
}

#[test]
fn display_name_hides_marker() {
    let table = SymbolTable::new();
    let entry = table.intern("java.util.Map. Entry");
    assert_eq!(table.display_name(entry), "java.util.Map.Entry");
}

#[test]
fn ambiguous_prefix_round_trip() {
    let table = SymbolTable::new();
    let list = table.intern("List");

    let tagged = table.add_ambiguous_prefix(list);
    assert_eq!(text(&table, tagged), "<List");
    assert!(table.has_ambiguous_prefix(tagged));
    assert_eq!(table.add_ambiguous_prefix(tagged), tagged);
    assert_eq!(table.remove_ambiguous_prefix(tagged), list);
    assert_eq!(table.remove_ambiguous_prefix(list), list);
}

#[test]
fn concurrent_interning_is_canonical() {
    use rayon::prelude::*;

    let table = SharedSymbolTable::new();
    let names: Vec<String> = (0..512).map(|i| format!("pkg{}.Class{}", i % 7, i)).collect();

    let first: Vec<Symbol> = names.par_iter().map(|n| table.intern(n)).collect();
    let second: Vec<Symbol> = names.par_iter().map(|n| table.intern(n)).collect();

    assert_eq!(first, second);
    for (name, sym) in names.iter().zip(&first) {
        assert_eq!(table.lookup(*sym), name.as_str());
    }
}

#[test]
fn concurrent_qualifier_queries_agree() {
    use rayon::prelude::*;

    let table = SharedSymbolTable::new();
    let entry = table.intern("a.b.Outer. Inner");
    let qualifiers: Vec<Symbol> = (0..64).into_par_iter().map(|_| table.qualifier(entry)).collect();
    let expected = table.intern("a.b");
    assert!(qualifiers.iter().all(|q| *q == expected));
}
