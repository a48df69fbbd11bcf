use super::*;
use pretty_assertions::assert_eq;

fn pool() -> TypePool {
    TypePool::new(SharedSymbolTable::new())
}

#[test]
fn test_fixed_types_pre_interned() {
    let pool = pool();
    assert_eq!(pool.len(), TypeId::FIRST_DYNAMIC as usize);
    assert_eq!(pool.code(TypeId::INT), TypeCode::Int);
    assert_eq!(&*pool.signature(TypeId::LONG), "J");
    assert_eq!(&*pool.signature(TypeId::NULL), "*");
    assert_eq!(pool.from_signature("Z"), Ok(TypeId::BOOLEAN));
    assert_eq!(pool.from_signature("?"), Ok(TypeId::ERROR));
}

#[test]
fn test_arrays_are_canonical() {
    let pool = pool();
    let ints = pool.array(TypeId::INT);
    assert_eq!(pool.array(TypeId::INT), ints);
    assert_eq!(&*pool.signature(ints), "[I");
    assert_eq!(pool.element_type(ints), Some(TypeId::INT));
    assert_eq!(pool.element_type(TypeId::INT), None);

    let matrix = pool.array(ints);
    assert_eq!(&*pool.signature(matrix), "[[I");
    assert_eq!(pool.from_signature("[[I"), Ok(matrix));
}

#[test]
fn test_class_types() {
    let pool = pool();
    let name = pool.symbols().intern("java.lang.String");
    let string = pool.class_type(name);

    assert_eq!(pool.class_type(name), string);
    assert_eq!(&*pool.signature(string), "Ljava/lang/String;");
    assert_eq!(pool.class_name(string), Some(name));
    assert_eq!(pool.code(string), TypeCode::Class);
    assert_eq!(pool.from_signature("Ljava/lang/String;"), Ok(string));
}

#[test]
fn test_inner_class_renamed_to_source_spelling() {
    let pool = pool();
    let symbols = pool.symbols().clone();
    let mangled = symbols.intern("p.Outer$Inner");
    let source = symbols.intern("p.Outer. Inner");

    // seen first from a classfile
    let from_binary = pool.from_signature("Lp/Outer$Inner;").unwrap();
    assert_eq!(pool.class_name(from_binary), Some(mangled));

    // then under its source spelling: same type, new name
    let from_source = pool.class_type(source);
    assert_eq!(from_source, from_binary);
    assert_eq!(pool.class_name(from_binary), Some(source));
    assert_eq!(&*pool.signature(from_source), "Lp/Outer$Inner;");

    // the mangled spelling still finds it
    assert_eq!(pool.class_type(mangled), from_binary);
}

#[test]
fn test_methods() {
    let pool = pool();
    let string = pool.class_type(pool.symbols().intern("java.lang.String"));
    let m = pool.method(TypeId::VOID, &[TypeId::INT, string]);

    assert_eq!(&*pool.signature(m), "(ILjava/lang/String;)V");
    assert_eq!(pool.return_type(m), Some(TypeId::VOID));
    assert_eq!(
        pool.argument_types(m).as_deref(),
        Some(&[TypeId::INT, string][..])
    );
    assert_eq!(pool.from_signature("(ILjava/lang/String;)V"), Ok(m));
}

#[test]
fn test_equal_arguments_ignores_return() {
    let pool = pool();
    let a = pool.method(TypeId::INT, &[TypeId::LONG]);
    let b = pool.method(TypeId::VOID, &[TypeId::LONG]);
    let c = pool.method(TypeId::INT, &[TypeId::INT]);

    assert!(pool.equal_arguments(a, b));
    assert!(pool.equal_arguments(a, a));
    assert!(!pool.equal_arguments(a, c));
    assert!(!pool.equal_arguments(a, TypeId::INT));
}

#[test]
fn test_stack_size() {
    let pool = pool();
    assert_eq!(pool.stack_size(TypeId::VOID), 0);
    assert_eq!(pool.stack_size(TypeId::INT), 1);
    assert_eq!(pool.stack_size(TypeId::DOUBLE), 2);
    let m = pool.method(TypeId::VOID, &[TypeId::LONG, TypeId::INT, pool.array(TypeId::LONG)]);
    assert_eq!(pool.stack_size(m), 4);
}

#[test]
fn test_type_code_offset() {
    let pool = pool();
    assert_eq!(pool.type_code_offset(TypeId::CHAR), Some(0));
    assert_eq!(pool.type_code_offset(TypeId::LONG), Some(1));
    assert_eq!(pool.type_code_offset(TypeId::FLOAT), Some(2));
    assert_eq!(pool.type_code_offset(TypeId::DOUBLE), Some(3));
    assert_eq!(pool.type_code_offset(TypeId::NULL), Some(4));
    assert_eq!(pool.type_code_offset(pool.array(TypeId::INT)), Some(4));
    assert_eq!(pool.type_code_offset(TypeId::VOID), None);
}

#[test]
fn test_malformed_signatures() {
    let pool = pool();
    assert_eq!(pool.from_signature(""), Err(SignatureError::Empty));
    assert!(matches!(
        pool.from_signature("Q"),
        Err(SignatureError::InvalidCharacter { found: 'Q', offset: 0, .. })
    ));
    assert!(matches!(
        pool.from_signature("Ljava/lang/String"),
        Err(SignatureError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        pool.from_signature("II"),
        Err(SignatureError::TrailingCharacters { offset: 1, .. })
    ));
    assert!(matches!(
        pool.from_signature("(I"),
        Err(SignatureError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        pool.from_signature("(V)V"),
        Err(SignatureError::InvalidCharacter { found: 'V', .. })
    ));
    assert!(matches!(
        pool.from_signature("[V"),
        Err(SignatureError::InvalidCharacter { found: 'V', offset: 1, .. })
    ));
    assert!(matches!(
        pool.from_signature("([V)I"),
        Err(SignatureError::InvalidCharacter { found: 'V', offset: 2, .. })
    ));
    assert_eq!(pool.from_signature("V"), Ok(TypeId::VOID));
    assert!(matches!(
        pool.from_signature("[L;"),
        Err(SignatureError::InvalidCharacter { found: ';', .. })
    ));
}

#[test]
fn test_format_type() {
    let pool = pool();
    let symbols = pool.symbols().clone();
    let entry = pool.class_type(symbols.intern("java.util.Map. Entry"));
    let string = pool.class_type(symbols.intern("java.lang.String"));

    assert_eq!(pool.format_type(TypeId::INT), "int");
    assert_eq!(pool.format_type(pool.array(pool.array(TypeId::INT))), "int[][]");
    assert_eq!(pool.format_type(entry), "java.util.Map.Entry");
    assert_eq!(
        pool.format_type(pool.method(TypeId::VOID, &[TypeId::INT, string])),
        "void(int, java.lang.String)"
    );
}

#[test]
fn test_concurrent_interning() {
    use rayon::prelude::*;

    let pool = SharedTypePool::new(SharedSymbolTable::new());
    let names: Vec<String> = (0..200).map(|i| format!("p{}.C{}", i % 5, i)).collect();

    let first: Vec<TypeId> = names
        .par_iter()
        .map(|n| pool.array(pool.class_type(pool.symbols().intern(n))))
        .collect();
    let second: Vec<TypeId> = names
        .par_iter()
        .map(|n| {
            let sig = format!("[L{};", n.replace('.', "/"));
            pool.from_signature(&sig).unwrap()
        })
        .collect();

    assert_eq!(first, second);
    assert_eq!(pool.len(), TypeId::FIRST_DYNAMIC as usize + 400);
}
