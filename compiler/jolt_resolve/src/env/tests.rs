use std::rc::Rc;

use jolt_diagnostic::{DiagnosticArg, ErrorCode, Subject};
use jolt_ir::{Modifiers, Span, Symbol};
use jolt_types::TypeId;
use pretty_assertions::assert_eq;

use crate::test_support::Fixture;
use crate::{ClassError, ClassInfo, ClassStatus, Environment, Imports, MemberInfo};

fn world() -> Fixture {
    let mut fx = Fixture::new();
    let outer = fx
        .info("p.Outer")
        .with_member(
            MemberInfo::inner_class(fx.sym("Inner"), fx.sym("p.Outer. Inner"))
                .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
        )
        .with_member(
            MemberInfo::inner_class(fx.sym("Secret"), fx.sym("p.Outer. Secret"))
                .with_modifiers(Modifiers::PRIVATE),
        )
        .with_local_class(fx.sym("1Local"), fx.sym("p.Outer. 1Local"));
    let inner = fx.info("p.Outer. Inner").nested_in(fx.sym("p.Outer"));
    let secret = fx
        .info("p.Outer. Secret")
        .with_modifiers(Modifiers::PRIVATE)
        .nested_in(fx.sym("p.Outer"));
    let local = ClassInfo::new(fx.sym("p.Outer. 1Local"))
        .with_modifiers(Modifiers::LOCAL)
        .nested_in(fx.sym("p.Outer"));
    let user = fx.info("p.User");
    let hidden = ClassInfo::new(fx.sym("q.Hidden"));
    let shapes = fx.info("shapes.Widget");
    let icons = fx.info("icons.Widget");
    fx.binary(outer)
        .binary(inner)
        .binary(secret)
        .binary(local)
        .binary(user)
        .binary(hidden)
        .binary(shapes)
        .binary(icons);
    fx
}

fn args(env: &Environment, names: &[&str]) -> Vec<DiagnosticArg> {
    names
        .iter()
        .map(|n| DiagnosticArg::Symbol(env.symbols().intern(n)))
        .collect()
}

#[test]
fn links_find_the_nearest_subject_and_imports() {
    let fx = Fixture::new();
    let (file, class) = (fx.sym("A.java"), fx.sym("p.A"));
    let (session, env) = fx.build();

    assert_eq!(env.subject(), None);
    assert!(env.imports().is_none());

    let imports = Rc::new(Imports::new(&env));
    let unit = env.with_subject(Subject::File(file)).with_imports(Rc::clone(&imports));
    let class_env = unit.with_subject(Subject::Class(class));
    assert_eq!(unit.subject(), Some(Subject::File(file)));
    assert_eq!(class_env.subject(), Some(Subject::Class(class)));
    assert!(Rc::ptr_eq(class_env.imports().unwrap(), &imports));

    class_env.error(Span::new(4, 9), ErrorCode::E1001, &[class.into()]);
    let diagnostics = session.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].subject, Some(Subject::Class(class)));
    assert_eq!(diagnostics[0].span, Span::new(4, 9));
}

#[test]
fn class_existence_does_not_load() {
    let fx = world();
    let names = ["p.Outer", "p.Outer. Nope", "p.Missing"].map(|n| fx.sym(n));
    let (_session, env) = fx.build();

    assert!(env.class_exists(names[0]));
    assert_eq!(env.class_declaration(names[0]).status(), ClassStatus::Undefined);
    // Inner names ask about their top-level class
    assert!(env.class_exists(names[1]));
    assert!(!env.class_exists(names[2]));

    env.class_definition(names[2]).unwrap_err();
    assert!(!env.class_exists(names[2]));
}

#[test]
fn package_qualified_names_split_at_the_longest_class() {
    let fx = world();
    let (session, env) = fx.build();
    let s = session.symbols();

    let cases = [
        ("p.Outer.Inner", "p.Outer. Inner"),
        ("p.Outer.Inner.Deep", "p.Outer. Inner.Deep"),
        ("p.Outer", "p.Outer"),
        ("java.util.List", "java.util.List"),
        ("Nowhere", "Nowhere"),
    ];
    for (input, expected) in cases {
        assert_eq!(
            s.lookup(env.resolve_package_qualified_name(s.intern(input))),
            expected,
            "{input}"
        );
    }
}

fn unit_env(env: &Environment, package: Symbol, imported: &[Symbol]) -> Environment {
    let imports = Imports::new(env);
    imports.set_current_package(package, Span::DUMMY).unwrap();
    for &package in imported {
        imports.add_package(package, Span::DUMMY).unwrap();
    }
    env.with_imports(Rc::new(imports))
}

#[test]
fn resolve_name_prefers_classes_over_packages() {
    let fx = world();
    let (p, outer_inner, list) = (fx.sym("p"), fx.sym("Outer.Inner"), fx.sym("java.util.List"));
    let (session, env) = fx.build();
    let env = unit_env(&env, p, &[]);

    assert_eq!(
        session.symbols().lookup(env.resolve_name(outer_inner).unwrap()),
        "p.Outer. Inner"
    );
    assert_eq!(env.resolve_name(list).unwrap(), list);
}

#[test]
fn resolve_name_marks_ambiguity_and_forces_the_rest() {
    let fx = world();
    let names = ["p", "shapes", "icons", "Widget", "Widget.Part", "Gadget"].map(|n| fx.sym(n));
    let [p, shapes, icons, widget, widget_part, gadget] = names;
    let (session, env) = fx.build();
    let env = unit_env(&env, p, &[shapes, icons]);
    let s = session.symbols();

    let marked = env.resolve_name(widget).unwrap();
    assert_eq!(s.lookup(marked), "<Widget");
    assert_eq!(env.resolve_name(marked).unwrap(), marked);
    assert_eq!(env.resolve_name(widget_part).unwrap(), marked);
    assert_eq!(
        env.resolve(widget),
        Err(ClassError::Ambiguous(
            s.intern("shapes.Widget"),
            s.intern("icons.Widget")
        ))
    );

    assert_eq!(s.lookup(env.resolve_name(gadget).unwrap()), "p.Gadget");
    assert!(!session.has_errors());
}

#[test]
fn qualified_lookup_checks_each_hop() {
    let fx = world();
    let names = ["p.Outer. Secret", "p.User", "p.Outer", "p.Outer. Nope"].map(|n| fx.sym(n));
    let [secret, user, outer, nope] = names;
    let (session, env) = fx.build();
    let user = env.class_definition(user).unwrap();
    let outer = env.class_definition(outer).unwrap();

    let found = env.resolve_qualified_name(Span::point(3), secret, Some(&user), false).unwrap();
    assert_eq!(found.name(), secret);
    let diagnostics = session.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, ErrorCode::E1006);
    assert_eq!(diagnostics[0].args.to_vec(), args(&env, &["Secret", "p.Outer", "p.User"]));

    // From inside the nest the hop is fine
    env.resolve_qualified_name(Span::point(3), secret, Some(&outer), false).unwrap();
    assert!(!session.has_errors());

    assert_eq!(
        env.resolve_qualified_name(Span::DUMMY, nope, Some(&user), false).unwrap_err(),
        ClassError::NotFound(nope)
    );
}

#[test]
fn qualified_lookup_finds_local_classes() {
    let fx = world();
    let (local, outer) = (fx.sym("p.Outer. 1Local"), fx.sym("p.Outer"));
    let (_session, env) = fx.build();
    let outer = env.class_definition(outer).unwrap();

    let found = env.resolve_qualified_name(Span::DUMMY, local, Some(&outer), false).unwrap();
    assert!(found.is_local());
    assert_eq!(found.name(), local);
}

#[test]
fn local_classes_are_found_in_the_named_class() {
    let mut fx = Fixture::new();
    let a = fx.info("p.A").with_local_class(fx.sym("1Local"), fx.sym("p.A. 1Local"));
    let b = fx.info("p.B").with_local_class(fx.sym("1Local"), fx.sym("p.B. 1Local"));
    let a_local = ClassInfo::new(fx.sym("p.A. 1Local"))
        .with_modifiers(Modifiers::LOCAL)
        .nested_in(fx.sym("p.A"));
    let b_local = ClassInfo::new(fx.sym("p.B. 1Local"))
        .with_modifiers(Modifiers::LOCAL)
        .nested_in(fx.sym("p.B"));
    fx.binary(a).binary(b).binary(a_local).binary(b_local);
    let (target, b) = (fx.sym("p.A. 1Local"), fx.sym("p.B"));
    let (_session, env) = fx.build();
    let b = env.class_definition(b).unwrap();

    let found = env.resolve_qualified_name(Span::DUMMY, target, Some(&b), false).unwrap();
    assert_eq!(found.name(), target);
}

#[test]
fn resolve_type_reports_missing_classes() {
    let fx = world();
    let missing = fx.class_type("p.Missing");
    let array = fx.types.array(fx.types.array(missing));
    let good = fx.method_type(TypeId::VOID, &[TypeId::INT, fx.class_type("p.Outer")]);
    let bad = fx.method_type(TypeId::VOID, &[TypeId::INT, missing]);
    let user = fx.sym("p.User");
    let (session, env) = fx.build();
    let user = env.class_definition(user).unwrap();

    assert!(env.resolve_type(Span::DUMMY, &user, good).unwrap());
    assert!(!session.has_errors());

    assert!(!env.resolve_type(Span::DUMMY, &user, array).unwrap());
    assert!(!env.resolve_type(Span::DUMMY, &user, bad).unwrap());
    let diagnostics = session.take_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(|d| d.code == ErrorCode::E1001));
    assert_eq!(
        diagnostics[0].args[1],
        DiagnosticArg::Text("type declaration")
    );
}

#[test]
fn resolve_type_reports_ambiguity_and_access() {
    let fx = world();
    let widget = fx.class_type("Widget");
    let hidden = fx.class_type("q.Hidden");
    let names = ["p", "shapes", "icons", "p.User"].map(|n| fx.sym(n));
    let (session, env) = fx.build();
    let env = unit_env(&env, names[0], &[names[1], names[2]]);
    let user = env.class_definition(names[3]).unwrap();

    assert!(!env.resolve_type(Span::DUMMY, &user, widget).unwrap());
    // Access violations are reported but the type still resolves
    assert!(env.resolve_type(Span::DUMMY, &user, hidden).unwrap());

    let codes: Vec<_> = session.take_diagnostics().iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E1002, ErrorCode::E1003]);
}

#[test]
fn resolve_type_reports_class_and_package_clash() {
    let mut fx = world();
    let package = fx.sym("p.Outer");
    fx.loader.add_package(package);
    let nope = fx.class_type("p.Outer. Nope");
    let user = fx.sym("p.User");
    let (session, env) = fx.build();
    let user = env.class_definition(user).unwrap();

    assert!(!env.resolve_type(Span::DUMMY, &user, nope).unwrap());
    let diagnostics = session.take_diagnostics();
    let codes: Vec<_> = diagnostics.iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E1004, ErrorCode::E1001]);
    assert_eq!(diagnostics[0].args.to_vec(), args(&env, &["p.Outer"]));
}
