use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E3007.as_str(), "E3007");
}

#[test]
fn test_message_keys() {
    assert_eq!(ErrorCode::E1001.key(), "class.not.found");
    assert_eq!(ErrorCode::E1002.key(), "ambig.class");
    assert_eq!(ErrorCode::E3003.key(), "override.final.method");
    assert_eq!(ErrorCode::E3007.key(), "meet.different.return");
    assert_eq!(ErrorCode::E3008.key(), "nontrivial.meet");
}

#[test]
fn test_all_variants_classified() {
    for code in ErrorCode::ALL {
        let areas = [
            code.is_resolution_error(),
            code.is_hierarchy_error(),
            code.is_override_error(),
            code.is_internal_error(),
        ];
        assert_eq!(
            areas.iter().filter(|&&a| a).count(),
            1,
            "{code} must belong to exactly one area"
        );
        assert!(code.as_str().starts_with('E'));
    }
}

#[test]
fn test_keys_are_unique() {
    let mut keys: Vec<_> = ErrorCode::ALL.iter().map(ErrorCode::key).collect();
    keys.sort_unstable();
    keys.dedup();
    assert_eq!(keys.len(), ErrorCode::ALL.len());
}

#[test]
fn test_from_str() {
    assert_eq!("e1002".parse::<ErrorCode>(), Ok(ErrorCode::E1002));
    assert_eq!("cyclic.inheritance".parse::<ErrorCode>(), Ok(ErrorCode::E2001));
    assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
}
