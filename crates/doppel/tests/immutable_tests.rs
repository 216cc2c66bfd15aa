//! Copy-on-write facade tests

use doppel::*;
use pretty_assertions::assert_eq;

/// `{ x: { y: 1 }, s: { t: 2 }, list: [ {}, {} ], m: Map { "k" => {} } }`
fn document() -> ObjectRef {
    let x = ObjectRef::ordinary();
    x.set("y", 1.0).unwrap();
    let s = ObjectRef::ordinary();
    s.set("t", 2.0).unwrap();
    let root = ObjectRef::ordinary();
    root.set("x", &x).unwrap();
    root.set("s", &s).unwrap();
    root.set("list", Value::array(vec![Value::object(), Value::object()]))
        .unwrap();
    root.set("m", ObjectRef::map(vec![(Value::from("k"), Value::object())]))
        .unwrap();
    root
}

fn facade_at(facade: &Facade, slot: impl Into<Slot>) -> Facade {
    facade
        .get(slot)
        .expect("read")
        .into_facade()
        .expect("nested facade")
}

fn number(read: Read) -> Option<f64> {
    read.as_value().and_then(Value::as_f64)
}

#[test]
fn test_reads_return_same_facade_until_mutation() -> anyhow::Result<()> {
    let root = Facade::wrap(document());
    let a = facade_at(&root, "x");
    let b = facade_at(&root, "x");
    assert!(a.ptr_eq(&b));

    root.set("x", Value::object())?;
    let c = facade_at(&root, "x");
    assert!(!c.ptr_eq(&a));
    Ok(())
}

#[test]
fn test_sibling_facade_unaffected_by_write() -> anyhow::Result<()> {
    let backing = document();
    let f1 = Facade::wrap(backing.clone());
    let sibling = facade_at(&f1, "s");
    let x = facade_at(&f1, "x");

    x.set("y", 5.0)?;

    assert_eq!(number(facade_at(&f1, "x").get("y")?), Some(5.0));
    assert_eq!(number(sibling.get("t")?), Some(2.0));
    assert!(!sibling.is_private());
    // Unmodified branch is still shared with the original backing
    assert!(sibling.backing().ptr_eq(backing.get("s")?.as_object().expect("object")));
    // Original backing never changed
    let original_x = backing.get("x")?;
    assert_eq!(original_x.as_object().expect("object").get("y")?.as_f64(), Some(1.0));
    Ok(())
}

#[test]
fn test_earlier_reads_of_other_wrap_unaffected() -> anyhow::Result<()> {
    let backing = document();
    let f1 = Facade::wrap(backing.clone());
    let f2 = Facade::wrap(backing);
    let x2 = facade_at(&f2, "x");

    facade_at(&f1, "x").set("y", 5.0)?;

    assert_eq!(number(x2.get("y")?), Some(1.0));
    assert_eq!(number(facade_at(&f2, "x").get("y")?), Some(1.0));
    Ok(())
}

#[test]
fn test_array_and_map_branches() -> anyhow::Result<()> {
    let backing = document();
    let root = Facade::wrap(backing.clone());

    let first = facade_at(&facade_at(&root, "list"), 0usize);
    first.set("tag", "changed")?;
    assert_eq!(first.path().to_string(), "list[0]");

    let entry = root.get("m")?.into_facade().expect("map").entry("k")?;
    let entry = entry.into_facade().expect("entry facade");
    entry.set("seen", true)?;
    assert_eq!(entry.path().to_string(), "m.<value#0>");

    // Both writes are visible through the root
    let list = facade_at(&root, "list");
    assert_eq!(
        facade_at(&list, 0usize).get("tag")?.as_value().and_then(Value::as_str),
        Some("changed")
    );
    let map = facade_at(&root, "m");
    assert_eq!(
        facade_at(&map, Slot::Entry("k".into())).get("seen")?.as_value(),
        Some(&Value::Bool(true))
    );

    // The untouched second element is still the original object
    let original_list = backing.get("list")?;
    let original_second = original_list.as_object().expect("array").element(1);
    let second = facade_at(&list, 1usize);
    assert!(original_second.is_some_and(|v| v.ptr_eq(&Value::Object(second.backing()))));
    Ok(())
}

#[test]
fn test_map_entry_mutation_and_delete() -> anyhow::Result<()> {
    let root = Facade::wrap(document());
    let map = facade_at(&root, "m");
    map.set_entry("new", 1.0)?;
    assert_eq!(number(map.entry("new")?), Some(1.0));
    assert!(map.delete(Slot::Entry("k".into()))?);
    assert_eq!(map.entry("k")?.as_value(), Some(&Value::Undefined));
    Ok(())
}

#[test]
fn test_materialize_snapshot() -> anyhow::Result<()> {
    let root = Facade::wrap(document());
    facade_at(&root, "x").set("y", 3.0)?;
    let snapshot = root.materialize()?;

    root.set("late", true)?;
    let snapshot = snapshot.as_object().expect("object");
    assert!(!snapshot.has_own(&PropertyKey::from("late")));
    let x = snapshot.get("x")?;
    assert_eq!(x.as_object().expect("object").get("y")?.as_f64(), Some(3.0));
    Ok(())
}

#[test]
fn test_keys_and_len() {
    let root = Facade::wrap(document());
    assert_eq!(
        root.keys(),
        vec![
            PropertyKey::from("x"),
            PropertyKey::from("s"),
            PropertyKey::from("list"),
            PropertyKey::from("m"),
        ]
    );
    assert_eq!(facade_at(&root, "list").len(), Some(2));
    assert_eq!(root.len(), None);
}
