use super::*;
use crate::value::Value;
use pretty_assertions::assert_eq;

/// Role `Milkable`, abstract `Animal`, `Cow extends Animal with Milkable`.
struct Farm {
    reg: Registry,
    milkable: TypeIdx,
    animal: TypeIdx,
    cow: TypeIdx,
}

fn farm() -> Farm {
    let mut reg = Registry::new();
    let sound = reg.intern("sound");
    let name = reg.intern("name");
    let milk = reg.intern("milk");

    let milkable = reg
        .declare_role(
            "Farm::Milkable",
            vec![
                MemberDef::method(sound, |_, _| Ok(Value::from("slosh"))),
                MemberDef::method(milk, |_, _| Ok(Value::from("milk"))),
            ],
        )
        .expect("role");
    let animal = reg
        .declare_class("Farm::Animal", None, true, vec![MemberDef::required(name)])
        .expect("animal");
    let cow = reg
        .declare_class(
            "Farm::Cow",
            Some(animal),
            false,
            vec![MemberDef::method(sound, |_, _| Ok(Value::from("moo")))],
        )
        .expect("cow");
    reg.consume(cow, milkable).expect("with Milkable");

    Farm {
        reg,
        milkable,
        animal,
        cow,
    }
}

#[test]
fn class_chain_is_nearest_first() {
    let f = farm();
    assert_eq!(f.reg.class_chain(f.cow), vec![f.cow, f.animal]);
    assert_eq!(f.reg.class_chain(f.milkable), vec![f.milkable]);
    assert!(f.reg.class_chain(TypeIdx::from_raw(77)).is_empty());
}

#[test]
fn ancestors_put_roles_after_classes() {
    let f = farm();
    assert_eq!(f.reg.ancestors(f.cow), vec![f.cow, f.animal, f.milkable]);
    assert_eq!(f.reg.role_closure(f.cow), vec![f.milkable]);
}

#[test]
fn roles_of_subclass_come_before_roles_of_parent() {
    let mut reg = Registry::new();
    let a = reg.declare_role("A", vec![]).expect("a");
    let b = reg.declare_role("B", vec![]).expect("b");
    let c = reg.declare_role("C", vec![]).expect("c");
    let parent = reg.declare_class("P", None, false, vec![]).expect("p");
    let child = reg
        .declare_class("K", Some(parent), false, vec![])
        .expect("k");

    reg.consume(parent, a).expect("p with a");
    reg.consume(child, b).expect("k with b");
    reg.consume(b, c).expect("b with c");
    reg.consume(b, a).expect("b with a");

    // K's closure (B, then C and A breadth-first) precedes P's; A is listed once.
    assert_eq!(reg.ancestors(child), vec![child, parent, b, c, a]);
}

#[test]
fn is_a_is_reflexive_and_follows_parents() {
    let f = farm();
    assert!(f.reg.is_a(f.cow, f.cow));
    assert!(f.reg.is_a(f.cow, f.animal));
    assert!(!f.reg.is_a(f.animal, f.cow));
    assert!(!f.reg.is_a(f.cow, f.milkable));
}

#[test]
fn does_follows_roles_and_ancestors() {
    let mut f = farm();
    let calf = f
        .reg
        .declare_class("Farm::Calf", Some(f.cow), false, vec![])
        .expect("calf");

    assert!(f.reg.does(f.cow, f.milkable));
    assert!(f.reg.does(calf, f.milkable));
    assert!(!f.reg.does(f.animal, f.milkable));
    // Reflexive over roles only.
    assert!(f.reg.does(f.milkable, f.milkable));
    assert!(!f.reg.does(f.cow, f.cow));
}

#[test]
fn class_member_shadows_role_member() {
    let f = farm();
    let sound = f.reg.resolve_member(f.cow, f.reg.intern("sound")).expect("sound");
    assert_eq!(sound.owner, f.cow);

    let milk = f.reg.find_member(f.cow, "milk").expect("milk");
    assert_eq!(milk.owner, f.milkable);

    let name = f.reg.find_member(f.cow, "name").expect("name");
    assert_eq!(name.owner, f.animal);

    assert!(f.reg.find_member(f.cow, "fly").is_none());
    assert!(f.reg.can(f.cow, "milk"));
    assert!(!f.reg.can(f.animal, "milk"));
}

#[test]
fn parent_member_shadows_role_member() {
    let mut reg = Registry::new();
    let speak = reg.intern("speak");
    let talker = reg
        .declare_role("Talker", vec![MemberDef::attribute(speak)])
        .expect("role");
    let parent = reg
        .declare_class("Parent", None, false, vec![MemberDef::required(speak)])
        .expect("parent");
    let child = reg
        .declare_class("Child", Some(parent), false, vec![])
        .expect("child");
    reg.consume(child, talker).expect("with Talker");

    assert_eq!(reg.resolve_member(child, speak).expect("speak").owner, parent);
}

#[test]
fn merged_members_are_unique_and_ordered() {
    let f = farm();
    let names: Vec<(&str, TypeIdx)> = f
        .reg
        .members(f.cow)
        .iter()
        .map(|r| (f.reg.interner().lookup(r.member.name), r.owner))
        .collect();
    assert_eq!(
        names,
        vec![
            ("sound", f.cow),
            ("name", f.animal),
            ("milk", f.milkable),
        ]
    );
}

#[test]
fn diamond_through_roles_is_not_a_conflict() {
    let mut reg = Registry::new();
    let greet = reg.intern("greet");
    let base = reg
        .declare_role("Base", vec![MemberDef::attribute(greet)])
        .expect("base");
    let left = reg.declare_role("Left", vec![]).expect("left");
    let right = reg.declare_role("Right", vec![]).expect("right");
    reg.consume(left, base).expect("left with base");
    reg.consume(right, base).expect("right with base");

    let class = reg.declare_class("Both", None, false, vec![]).expect("class");
    reg.consume(class, left).expect("left");
    reg.consume(class, right).expect("right: same provider");
    assert!(reg.role_conflicts(class).is_empty());
}

#[test]
fn composite_role_conflict_surfaces_in_class() {
    let mut reg = Registry::new();
    let greet = reg.intern("greet");
    let english = reg
        .declare_role("English", vec![MemberDef::attribute(greet)])
        .expect("english");
    let french = reg
        .declare_role("French", vec![MemberDef::attribute(greet)])
        .expect("french");
    let bilingual = reg.declare_role("Bilingual", vec![]).expect("bilingual");

    // Roles defer the conflict.
    reg.consume(bilingual, english).expect("english");
    reg.consume(bilingual, french).expect("french");
    assert!(reg.role_conflicts(bilingual).is_empty());

    let person = reg.declare_class("Person", None, false, vec![]).expect("person");
    let err = reg.consume(person, bilingual).expect_err("conflict surfaces");
    assert_eq!(
        err,
        DeclareError::ConflictingRoleMembers {
            class: "Person".to_owned(),
            member: "greet".to_owned(),
            roles: vec!["English".to_owned(), "French".to_owned()],
        }
    );
}

#[test]
fn composite_role_override_settles_its_own_conflict() {
    let mut reg = Registry::new();
    let greet = reg.intern("greet");
    let english = reg
        .declare_role("English", vec![MemberDef::attribute(greet)])
        .expect("english");
    let french = reg
        .declare_role("French", vec![MemberDef::attribute(greet)])
        .expect("french");
    let bilingual = reg
        .declare_role("Bilingual", vec![MemberDef::attribute(greet)])
        .expect("bilingual");
    reg.consume(bilingual, english).expect("english");
    reg.consume(bilingual, french).expect("french");

    let person = reg.declare_class("Person", None, false, vec![]).expect("person");
    reg.consume(person, bilingual).expect("no conflict");
    assert_eq!(reg.resolve_member(person, greet).expect("greet").owner, bilingual);
}

#[test]
fn foreign_handles_answer_false() {
    let f = farm();
    let bogus = TypeIdx::from_raw(500);
    assert!(!f.reg.is_a(bogus, f.cow));
    assert!(!f.reg.does(f.cow, bogus));
    assert!(f.reg.ancestors(bogus).is_empty());
    assert!(f.reg.members(bogus).is_empty());
}
