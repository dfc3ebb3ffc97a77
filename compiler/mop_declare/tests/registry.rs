//! End-to-end scenarios: declaration trees in, instances and predicates out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use mop_declare::{declare, declare_all, Declaration, MemberDecl, Scope};
use mop_types::{
    DeclareError, ErrorCode, InstantiationError, Predicate, PredicateTable, Registry,
    SharedRegistry, Value,
};
use pretty_assertions::assert_eq;
use rayon::prelude::*;

fn farm(reg: &mut Registry) {
    declare_all(
        reg,
        &Scope::new("Farm"),
        &[
            Declaration::role("Milkable").with_member(MemberDecl::method("sound", |_, _| {
                Ok(Value::from("slosh"))
            })),
            Declaration::abstract_class("Animal")
                .with_member(MemberDecl::required("name"))
                .with_member(MemberDecl::method("greet", |this, _| {
                    let name = this.get("name").and_then(Value::as_str).unwrap_or("?");
                    Ok(Value::from(format!("hello, {name}")))
                })),
            Declaration::class("Cow")
                .with_parent("Animal")
                .with_role("Milkable")
                .with_member(MemberDecl::method("sound", |_, _| Ok(Value::from("moo")))),
        ],
    )
    .expect("farm declares");
}

#[test]
fn farm_scenario() {
    mop_types::init_tracing();
    let mut reg = Registry::new();
    farm(&mut reg);

    let cow = reg.resolve("Farm::Cow").expect("Cow");
    let animal = reg.resolve("Farm::Animal").expect("Animal");
    let milkable = reg.resolve("Farm::Milkable").expect("Milkable");

    let daisy = reg
        .instantiate(cow, [("name", Value::from("Daisy"))])
        .expect("Daisy");
    assert!(reg.is_a(&daisy, cow));
    assert!(reg.is_a(&daisy, animal));
    assert!(reg.does(&daisy, milkable));
    assert!(!reg.does(&daisy, cow));

    assert_eq!(reg.invoke(&daisy, "sound", &[]), Ok(Value::from("moo")));
    assert_eq!(
        reg.invoke(&daisy, "greet", &[]),
        Ok(Value::from("hello, Daisy"))
    );

    let err = reg
        .instantiate(animal, Vec::<(&str, Value)>::new())
        .expect_err("abstract");
    assert_eq!(
        err,
        InstantiationError::AbstractInstantiation {
            name: "Farm::Animal".to_owned()
        }
    );
}

#[test]
fn unrelated_class_satisfies_nothing() {
    let mut reg = Registry::new();
    farm(&mut reg);
    let tractor = declare(&mut reg, &Scope::new("Farm"), &Declaration::class("Tractor"))
        .expect("Tractor");
    let machine = reg
        .instantiate(tractor, Vec::<(&str, Value)>::new())
        .expect("instantiates");

    let table = PredicateTable::build(&reg);
    assert_eq!(table.check(&reg, "is_Animal", &machine), Some(false));
    assert_eq!(table.check(&reg, "does_Milkable", &machine), Some(false));
    assert_eq!(table.check(&reg, "is_Tractor", &machine), Some(true));
}

#[test]
fn instantiation_seals_the_hierarchy() {
    let mut reg = Registry::new();
    farm(&mut reg);
    let scope = Scope::new("Farm");
    let cow = reg.resolve("Farm::Cow").expect("Cow");
    reg.instantiate(cow, [("name", Value::from("Daisy"))])
        .expect("Daisy");

    let grazing = declare(&mut reg, &scope, &Declaration::role("Grazing")).expect("role");
    assert_eq!(
        reg.consume(cow, grazing),
        Err(DeclareError::SealedType {
            name: "Farm::Cow".to_owned()
        })
    );

    // The parent is sealed too, but can still be subclassed.
    let animal = reg.resolve("Farm::Animal").expect("Animal");
    assert_eq!(
        reg.consume(animal, grazing).map_err(|e| e.code()),
        Err(ErrorCode::E1008)
    );
    let horse = declare(
        &mut reg,
        &scope,
        &Declaration::class("Horse").with_parent("Animal").with_role("Grazing"),
    )
    .expect("Horse");
    assert!(reg.is_a(horse, animal));
}

#[test]
fn anonymous_role_is_shared_by_reference() {
    let mut reg = Registry::new();
    let scope = Scope::new("Zoo");
    let striped = declare(
        &mut reg,
        &scope,
        &Declaration::anonymous_role().with_member(MemberDecl::attribute("stripes")),
    )
    .expect("anonymous role");

    let handles = declare_all(
        &mut reg,
        &scope,
        &[
            Declaration::class("Zebra").with_role(striped),
            Declaration::class("Tiger").with_role(striped),
        ],
    )
    .expect("classes");

    for &class in &handles {
        assert!(reg.does(class, striped));
        assert_eq!(reg.member_owner(class, "stripes"), Some(striped));
    }
    assert_eq!(reg.resolve("__ANON__::Role1"), None);
    assert_eq!(reg.len(), 3);
}

#[test]
fn name_and_handle_predicates_agree() {
    let mut reg = Registry::new();
    farm(&mut reg);
    let anon = declare(
        &mut reg,
        &Scope::new("Farm"),
        &Declaration::anonymous_class().with_parent("Cow"),
    )
    .expect("anonymous subclass");
    let calf = reg
        .instantiate(anon, [("name", Value::from("Calf"))])
        .expect("calf");

    let table = PredicateTable::build(&reg);
    for helper in table.names() {
        let by_name = table.check(&reg, helper, &calf);
        let predicate = table.get(helper).expect("helper");
        let by_handle = reg.predicate_for(predicate.target()).expect("target");
        assert_eq!(by_name, Some(by_handle.check(&reg, &calf)), "{helper}");
    }
    assert!(Predicate::is_a(anon).check(&reg, &calf));
    assert_eq!(table.len(), 3);
}

#[test]
fn frozen_registry_resolves_identically_across_threads() {
    let shared = SharedRegistry::default();
    shared
        .edit(|reg| {
            farm(reg);
            Ok(())
        })
        .expect("declares");
    let frozen = shared.freeze();

    let expected = frozen.resolve("Farm::Cow");
    let results: Vec<_> = (0..128)
        .into_par_iter()
        .map(|_| frozen.resolve("Farm::Cow"))
        .collect();
    assert!(results.iter().all(|r| *r == expected));

    let cow = expected.expect("Cow");
    let names: Vec<String> = (0..32)
        .into_par_iter()
        .map(|i| {
            let obj = frozen
                .instantiate(cow, [("name", Value::from(format!("cow-{i}")))])
                .expect("instantiates");
            obj.get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned()
        })
        .collect();
    assert_eq!(names[31], "cow-31");
}
