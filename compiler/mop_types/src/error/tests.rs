use super::*;
use pretty_assertions::assert_eq;

#[test]
fn missing_attribute_lists_every_name() {
    let err = InstantiationError::MissingAttribute {
        name: "Farm::Cow".to_owned(),
        missing: vec!["name".to_owned(), "age".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "missing required attributes for `Farm::Cow`: name, age"
    );
    assert_eq!(err.code(), ErrorCode::E2003);
}

#[test]
fn single_missing_attribute_is_singular() {
    let err = InstantiationError::MissingAttribute {
        name: "Cow".to_owned(),
        missing: vec!["name".to_owned()],
    };
    assert_eq!(err.to_string(), "missing required attribute for `Cow`: name");
}

#[test]
fn conflicting_roles_render_all_roles() {
    let err = DeclareError::ConflictingRoleMembers {
        class: "Cow".to_owned(),
        member: "sound".to_owned(),
        roles: vec!["Milkable".to_owned(), "Noisy".to_owned()],
    };
    assert_eq!(
        err.to_string(),
        "class `Cow` gets member `sound` from several roles (Milkable, Noisy); override it in the class"
    );
}

#[test]
fn invalid_name_is_transparent() {
    let err = DeclareError::from(NameError::NoEnclosingClass {
        written: "+Calf".to_owned(),
    });
    assert_eq!(err.code(), ErrorCode::E1012);
    assert_eq!(
        err.to_string(),
        "`+Calf` is relative to an enclosing class, but there is none"
    );
}

#[test]
fn codes_group_by_phase() {
    let declare = DeclareError::SealedType {
        name: "Cow".to_owned(),
    };
    assert!(declare.code().is_declaration_error());
    assert_eq!(declare.code().to_string(), "E1008");

    let inst = InstantiationError::RoleInstantiation {
        name: "Milkable".to_owned(),
    };
    assert!(!inst.code().is_declaration_error());

    assert_eq!(DispatchError::failed("boom").code(), ErrorCode::E3003);
}

#[test]
fn type_mismatch_names_expected_kind() {
    let err = DeclareError::TypeMismatch {
        name: "Animal".to_owned(),
        expected: ExpectedKind::Role,
    };
    assert_eq!(err.to_string(), "`Animal` is not a role");
}
