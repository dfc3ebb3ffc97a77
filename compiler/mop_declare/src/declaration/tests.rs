use super::*;
use pretty_assertions::assert_eq;

#[test]
fn trailing_question_mark_is_a_tag() {
    assert_eq!(RoleRef::parse("Milkable"), RoleRef::Named("Milkable".to_owned()));
    assert_eq!(RoleRef::parse("Milkable?"), RoleRef::Tag("Milkable".to_owned()));
    assert_eq!(RoleRef::parse("+Udder?"), RoleRef::Tag("+Udder".to_owned()));
}

#[test]
fn role_refs_display_as_written() {
    assert_eq!(RoleRef::from("::Farm::Milkable?").to_string(), "::Farm::Milkable?");
    assert_eq!(RoleRef::from("Grazing").to_string(), "Grazing");
}

#[test]
fn builder_collects_everything() {
    let decl = Declaration::class("Cow")
        .with_parent("Animal")
        .with_roles(["Milkable", "Grazing?"])
        .with_member(MemberDecl::required("name"))
        .with_member(MemberDecl::with_default("legs", 4_i64))
        .with_nested(Declaration::role("+Udder"));

    assert_eq!(decl.kind(), TypeKind::Class);
    assert_eq!(decl.name(), Some("Cow"));
    assert!(!decl.is_abstract());
    assert_eq!(decl.parent(), Some(&TypeRef::Named("Animal".to_owned())));
    assert_eq!(
        decl.roles(),
        &[
            RoleRef::Named("Milkable".to_owned()),
            RoleRef::Tag("Grazing".to_owned()),
        ]
    );
    let members: Vec<&str> = decl.members().iter().map(MemberDecl::name).collect();
    assert_eq!(members, vec!["name", "legs"]);
    assert_eq!(decl.nested().len(), 1);
}

#[test]
fn anonymous_blocks_have_no_name() {
    assert_eq!(Declaration::anonymous_role().name(), None);
    assert_eq!(Declaration::anonymous_role().kind(), TypeKind::Role);
    assert!(Declaration::abstract_class("Animal").is_abstract());
}

#[test]
fn handles_convert_into_refs() {
    let idx = TypeIdx::from_raw(7);
    assert_eq!(RoleRef::from(idx), RoleRef::Handle(idx));
    assert_eq!(TypeRef::from(idx), TypeRef::Handle(idx));
}
