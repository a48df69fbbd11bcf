use super::*;

#[test]
fn access_level_from_bits() {
    assert_eq!(Modifiers::PUBLIC.access_level(), AccessLevel::Public);
    assert_eq!(Modifiers::PROTECTED.access_level(), AccessLevel::Protected);
    assert_eq!(Modifiers::PRIVATE.access_level(), AccessLevel::Private);
    assert_eq!(Modifiers::STATIC.access_level(), AccessLevel::Package);
    assert_eq!(Modifiers::empty().access_level(), AccessLevel::Package);
}

#[test]
fn access_levels_are_ordered_by_openness() {
    assert!(AccessLevel::Private < AccessLevel::Package);
    assert!(AccessLevel::Package < AccessLevel::Protected);
    assert!(AccessLevel::Protected < AccessLevel::Public);
}

#[test]
fn predicates_read_their_bit() {
    let mods = Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
    assert!(mods.is_public());
    assert!(mods.is_static());
    assert!(mods.is_final());
    assert!(!mods.is_abstract());
    assert!(!mods.is_synthetic());
    assert_eq!(mods & Modifiers::ACCESS, Modifiers::PUBLIC);
}

#[test]
fn keywords() {
    assert_eq!(AccessLevel::Package.keyword(), "package-private");
    assert_eq!(AccessLevel::Public.keyword(), "public");
}
