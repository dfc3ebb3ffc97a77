use super::*;

#[test]
fn register_and_resolve() {
    let mut table = SymbolTable::new();
    let name = Name::from_raw(10);
    let idx = TypeIdx::from_raw(0);

    assert_eq!(table.register(name, idx), Ok(()));
    assert_eq!(table.resolve(name), Some(idx));
    assert!(table.contains(name));
    assert_eq!(table.len(), 1);
}

#[test]
fn duplicate_reports_existing_binding() {
    let mut table = SymbolTable::new();
    let name = Name::from_raw(10);

    assert_eq!(table.register(name, TypeIdx::from_raw(0)), Ok(()));
    assert_eq!(
        table.register(name, TypeIdx::from_raw(1)),
        Err(DuplicateName {
            name,
            existing: TypeIdx::from_raw(0),
        })
    );
    // First binding survives.
    assert_eq!(table.resolve(name), Some(TypeIdx::from_raw(0)));
}

#[test]
fn remove_unbinds() {
    let mut table = SymbolTable::new();
    let name = Name::from_raw(3);
    assert_eq!(table.register(name, TypeIdx::from_raw(0)), Ok(()));
    table.remove(name);
    assert_eq!(table.resolve(name), None);
    assert!(table.is_empty());
}
