//! End-to-end tests for the clone engine

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use doppel::*;
use pretty_assertions::assert_eq;

fn obj(value: &Value) -> &ObjectRef {
    value.as_object().expect("expected an object")
}

fn number(value: Value) -> f64 {
    value.as_f64().expect("expected a number")
}

// ═══════════════════════════════════════════════════════════════════════
// Identity and Independence
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_shared_reference_stays_shared() -> anyhow::Result<()> {
    let shared = ObjectRef::ordinary();
    shared.set("n", 1.0)?;
    let root = ObjectRef::ordinary();
    root.set("a", &shared)?;
    root.set("b", ObjectRef::array(vec![Value::Object(shared.clone())]))?;

    let copy = clone_value(&root.into())?;
    let a = obj(&copy).get("a")?;
    let b0 = obj(&obj(&copy).get("b")?).element(0).expect("element");

    assert!(a.ptr_eq(&b0));
    assert!(!obj(&a).ptr_eq(&shared));
    Ok(())
}

#[test]
fn test_cycle_points_at_clone() -> anyhow::Result<()> {
    let parent = ObjectRef::ordinary();
    let child = ObjectRef::ordinary();
    parent.set("child", &child)?;
    child.set("parent", &parent)?;

    let copy = clone_value(&Value::Object(parent.clone()))?;
    let parent_copy = obj(&copy);
    let child_copy = parent_copy.get("child")?;
    let back = obj(&child_copy).get("parent")?;

    assert!(obj(&back).ptr_eq(parent_copy));
    assert!(!parent_copy.ptr_eq(&parent));
    Ok(())
}

#[test]
fn test_independence_both_directions() -> anyhow::Result<()> {
    let inner = ObjectRef::ordinary();
    inner.set("v", 1.0)?;
    let list = ObjectRef::array(vec![Value::from(1.0)]);
    let map = ObjectRef::map(vec![(Value::from("k"), Value::from(1.0))]);
    let root = ObjectRef::ordinary();
    root.set("inner", &inner)?;
    root.set("list", &list)?;
    root.set("map", &map)?;

    let copy = clone_value(&Value::Object(root.clone()))?;
    let copy = obj(&copy);

    // Mutate the clone
    obj(&copy.get("inner")?).set("v", 2.0)?;
    obj(&copy.get("list")?).push(2.0)?;
    obj(&copy.get("map")?).map_insert("k", 2.0)?;
    assert_eq!(number(inner.get("v")?), 1.0);
    assert_eq!(list.len(), Some(1));
    assert_eq!(map.map_get(&Value::from("k")), Some(Value::Number(1.0)));

    // Mutate the source
    root.set("extra", true)?;
    inner.set("v", 3.0)?;
    assert!(!copy.has_own(&PropertyKey::from("extra")));
    assert_eq!(number(obj(&copy.get("inner")?).get("v")?), 2.0);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Descriptors and Shape
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_descriptor_round_trip() -> anyhow::Result<()> {
    let source = ObjectRef::ordinary();
    source.define_property(
        "locked",
        Property::data_with_attrs(
            1.0,
            PropertyAttributes {
                writable: false,
                enumerable: false,
                configurable: true,
            },
        ),
    )?;
    source.set("open", 2.0)?;

    let options = CloneOptions::new().extended_fidelity(true);
    let copy = deep_clone(&Value::Object(source), &options)?.into_value();
    let locked = obj(&copy)
        .own_property(&PropertyKey::from("locked"))
        .expect("locked property");

    assert_eq!(
        locked.attributes(),
        PropertyAttributes {
            writable: false,
            enumerable: false,
            configurable: true,
        }
    );
    assert_eq!(locked.value(), Some(&Value::Number(1.0)));
    assert!(matches!(
        obj(&copy).set("locked", 5.0),
        Err(ObjectError::ReadOnly { .. })
    ));
    Ok(())
}

#[test]
fn test_frozen_object_stays_frozen() -> anyhow::Result<()> {
    let source = ObjectRef::array(vec![Value::from(1.0)]);
    source.freeze();
    let copy = clone_value(&Value::Object(source))?;
    assert!(obj(&copy).is_frozen());
    assert!(obj(&copy).set_element(0, 2.0).is_err());
    Ok(())
}

#[test]
fn test_null_prototype_preserved() -> anyhow::Result<()> {
    let source = ObjectRef::null_prototype();
    source.set("k", 1.0)?;
    let copy = clone_value(&Value::Object(source))?;
    assert!(obj(&copy).class().is_none());
    Ok(())
}

#[test]
fn test_preserved_accessor_stays_live() -> anyhow::Result<()> {
    let getter = ObjectRef::function(Callable::new("doubled", 0, |this, _| {
        let Value::Object(this) = this else {
            return Err("no receiver".into());
        };
        let base = this.get("base").map_err(|e| e.to_string())?;
        Ok(Value::Number(base.as_f64().unwrap_or(0.0) * 2.0))
    }));
    let source = ObjectRef::ordinary();
    source.set("base", 20.0)?;
    source.define_property("doubled", Property::accessor(Some(getter.clone().into()), None))?;

    let copy = clone_value(&Value::Object(source.clone()))?;
    let copy = obj(&copy);
    copy.set("base", 5.0)?;

    assert_eq!(number(copy.get("doubled")?), 10.0);
    assert_eq!(number(source.get("doubled")?), 40.0);
    match copy.own_property(&PropertyKey::from("doubled")) {
        Some(Property::Accessor { get: Some(get), .. }) => {
            assert!(obj(&get).ptr_eq(&getter));
        }
        other => panic!("expected accessor, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_snapshot_getter_failure_is_structural() {
    let getter = ObjectRef::function(Callable::new("boom", 0, |_, _| Err("kaput".into())));
    let inner = ObjectRef::ordinary();
    inner
        .define_property("bad", Property::accessor(Some(getter.into()), None))
        .unwrap();
    let root = ObjectRef::ordinary();
    root.set("inner", &inner).unwrap();

    let options = CloneOptions::new().accessors(AccessorMode::Snapshot);
    match deep_clone(&Value::Object(root), &options) {
        Err(CloneError::Structural { path, cause }) => {
            assert_eq!(path.to_string(), "inner.bad");
            assert!(matches!(cause, ObjectError::Accessor { .. }));
        }
        other => panic!("expected structural error, got {:?}", other),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Built-ins
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_map_order_and_object_keys() -> anyhow::Result<()> {
    let key = ObjectRef::ordinary();
    let map = ObjectRef::map(vec![
        (Value::from("b"), Value::from(1.0)),
        (Value::from("a"), Value::from(2.0)),
        (Value::from("c"), Value::from(3.0)),
    ]);
    map.map_insert(&key, "object key")?;

    let copy = clone_value(&Value::Object(map))?;
    let entries = obj(&copy).map_entries().expect("map");
    let keys: Vec<String> = entries
        .iter()
        .take(3)
        .map(|(k, _)| k.as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(keys, vec!["b", "a", "c"]);

    let (cloned_key, value) = &entries[3];
    assert!(!obj(cloned_key).ptr_eq(&key));
    assert_eq!(value.as_str(), Some("object key"));
    Ok(())
}

#[test]
fn test_date_and_regexp_fidelity() -> anyhow::Result<()> {
    let date = ObjectRef::date(1_234_567.0);
    let re = ObjectRef::regexp("\\d+(?:px)?", "yigs");
    let root = Value::array(vec![Value::Object(date.clone()), Value::Object(re.clone())]);

    let copy = clone_value(&root)?;
    let date_copy = obj(&copy).element(0).expect("date");
    let re_copy = obj(&copy).element(1).expect("regexp");

    assert!(!obj(&date_copy).ptr_eq(&date));
    assert_eq!(obj(&date_copy).date_value(), Some(1_234_567.0));
    let (source, flags) = obj(&re_copy).regexp_parts().expect("regexp");
    assert_eq!((&*source, &*flags), ("\\d+(?:px)?", "yigs"));
    Ok(())
}

#[test]
fn test_views_share_one_cloned_buffer() -> anyhow::Result<()> {
    let buffer = ObjectRef::array_buffer(vec![0; 8]);
    let bytes = ObjectRef::typed_array(TypedArrayKind::Uint8, &buffer, 0, 8)?;
    let words = ObjectRef::typed_array(TypedArrayKind::Uint16, &buffer, 2, 2)?;
    let view = ObjectRef::data_view(&buffer, 4, 4)?;
    let root = Value::array(vec![bytes.into(), words.into(), view.into()]);

    let copy = clone_value(&root)?;
    let copy = obj(&copy);
    let bytes_copy = copy.element(0).expect("bytes");
    let words_copy = copy.element(1).expect("words");
    let view_copy = copy.element(2).expect("view");

    let b = obj(&bytes_copy).typed_view().expect("typed");
    let w = obj(&words_copy).typed_view().expect("typed");
    let d = obj(&view_copy).data_view_slots().expect("data view");
    assert!(b.buffer.ptr_eq(&w.buffer));
    assert!(b.buffer.ptr_eq(&d.buffer));
    assert!(!b.buffer.ptr_eq(&buffer));
    assert_eq!((w.kind, w.byte_offset, w.length), (TypedArrayKind::Uint16, 2, 2));

    // A write through one cloned view is visible through the other
    obj(&words_copy).typed_set(0, 0x0102 as f64)?;
    assert_eq!(obj(&bytes_copy).typed_get(2), Some(2.0));
    assert_eq!(buffer.buffer_bytes(), Some(vec![0; 8]));
    Ok(())
}

#[test]
fn test_set_deduplicates_equal_clones() -> anyhow::Result<()> {
    let set = ObjectRef::new_set(vec![Value::from(1.0), Value::from("x")]);
    let options = CloneOptions::new().transform(|value, _| {
        Ok(match value {
            Value::String(_) => Transformed::Replace(Value::from(1.0)),
            _ => Transformed::Continue,
        })
    });
    let copy = deep_clone(&Value::Object(set), &options)?.into_value();
    assert_eq!(obj(&copy).size(), Some(1));
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_atomic_constructor_shares_instances() -> anyhow::Result<()> {
    let money = Class::new("Money");
    let price = ObjectRef::instance(&money);
    price.set("cents", 100.0)?;
    let order = ObjectRef::ordinary();
    order.set("price", &price)?;

    let options = CloneOptions::new().atomic(&money);
    let copy = deep_clone(&Value::Object(order.clone()), &options)?.into_value();
    assert!(!obj(&copy).ptr_eq(&order));
    assert!(obj(&obj(&copy).get("price")?).ptr_eq(&price));
    Ok(())
}

#[test]
fn test_transform_doubles_numbers() -> anyhow::Result<()> {
    let source = ObjectRef::ordinary();
    source.set("a", 2.0)?;
    source.set("b", Value::array(vec![Value::from(3.0), Value::from(4.0)]))?;

    let options = CloneOptions::new().transform(|value, _| {
        Ok(match value {
            Value::Number(n) => Transformed::Replace(Value::Number(n * 2.0)),
            _ => Transformed::Continue,
        })
    });
    let copy = deep_clone(&Value::Object(source), &options)?.into_value();
    let copy = obj(&copy);
    let b = copy.get("b")?;

    assert_eq!(number(copy.get("a")?), 4.0);
    assert_eq!(obj(&b).element(0), Some(Value::Number(6.0)));
    assert_eq!(obj(&b).element(1), Some(Value::Number(8.0)));
    Ok(())
}

#[test]
fn test_transform_returning_input_means_default_clone() -> anyhow::Result<()> {
    let inner = ObjectRef::ordinary();
    let source = ObjectRef::ordinary();
    source.set("inner", &inner)?;
    let echo = |value: &Value, _: &Path| -> std::result::Result<Transformed, TransformAbort> {
        Ok(Transformed::Replace(value.clone()))
    };

    let options = CloneOptions::new().transform(echo).unchanged_continues(true);
    let copy = deep_clone(&Value::Object(source.clone()), &options)?.into_value();
    assert!(!obj(&copy).ptr_eq(&source));
    assert!(!obj(&obj(&copy).get("inner")?).ptr_eq(&inner));

    // Without the flag the input is taken as the replacement
    let options = CloneOptions::new().transform(echo);
    let shared = deep_clone(&Value::Object(source.clone()), &options)?.into_value();
    assert!(obj(&shared).ptr_eq(&source));
    Ok(())
}

#[test]
fn test_transform_sees_paths_and_skips_tracked() -> anyhow::Result<()> {
    let shared = ObjectRef::ordinary();
    let root = ObjectRef::ordinary();
    root.set("x", &shared)?;
    root.set("y", &shared)?;

    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let log = seen.clone();
    let options = CloneOptions::new().transform(move |_, path| {
        log.lock().push(path.to_string());
        Ok(Transformed::Continue)
    });
    deep_clone(&Value::Object(root), &options)?;

    assert_eq!(*seen.lock(), vec!["".to_string(), "x".to_string()]);
    Ok(())
}

#[test]
fn test_replacement_is_tracked() -> anyhow::Result<()> {
    let shared = ObjectRef::ordinary();
    let root = ObjectRef::ordinary();
    root.set("x", &shared)?;
    root.set("y", &shared)?;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let options = CloneOptions::new().transform(move |value, path| {
        if path.is_root() || !value.is_object() {
            return Ok(Transformed::Continue);
        }
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Transformed::Replace(Value::object()))
    });
    let copy = deep_clone(&Value::Object(root), &options)?.into_value();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(obj(&copy).get("x")?.ptr_eq(&obj(&copy).get("y")?));
    Ok(())
}

#[test]
fn test_transform_abort() {
    let root = ObjectRef::ordinary();
    root.set("ok", 1.0).unwrap();
    root.set("secret", "hunter2").unwrap();

    let options = CloneOptions::new().transform(|value, _| match value.as_str() {
        Some("hunter2") => Err(TransformAbort::new("refusing to copy secrets")),
        _ => Ok(Transformed::Continue),
    });
    match deep_clone(&Value::Object(root), &options) {
        Err(CloneError::Transform { path, payload }) => {
            assert_eq!(path.to_string(), "secret");
            assert_eq!(payload.as_str(), Some("refusing to copy secrets"));
        }
        other => panic!("expected transform error, got {:?}", other),
    }
}

#[test]
fn test_nested_clone_inside_hook_is_independent() -> anyhow::Result<()> {
    let shared = ObjectRef::ordinary();
    shared.set("v", 1.0)?;
    let root = ObjectRef::ordinary();
    root.set("first", &shared)?;
    root.set("second", &shared)?;

    let options = CloneOptions::new().transform(|value, path| {
        if path.to_string() == "first" {
            let nested = deep_clone(value, &CloneOptions::default())
                .map_err(|e| TransformAbort::new(e.to_string()))?;
            return Ok(Transformed::Replace(nested.into_value()));
        }
        Ok(Transformed::Continue)
    });
    let copy = deep_clone(&Value::Object(root), &options)?.into_value();
    let first = obj(&copy).get("first")?;
    let second = obj(&copy).get("second")?;

    assert!(first.ptr_eq(&second));
    assert!(!obj(&first).ptr_eq(&shared));
    assert_eq!(number(obj(&first).get("v")?), 1.0);
    Ok(())
}

#[test]
fn test_function_strategies() -> anyhow::Result<()> {
    let f = ObjectRef::function(Callable::new("f", 1, |_, args| {
        Ok(args.first().cloned().unwrap_or(Value::Undefined))
    }));
    f.set("meta", "tag")?;
    let root = Value::Object(f.clone());

    let kept = clone_value(&root)?;
    assert!(obj(&kept).ptr_eq(&f));

    let options = CloneOptions::new().clone_function(FunctionStrategy::DeepCopy);
    let copied = deep_clone(&root, &options)?.into_value();
    let copied = obj(&copied);
    assert!(!copied.ptr_eq(&f));
    assert!(copied.callable().expect("callable").same_body(&f.callable().expect("callable")));
    assert_eq!(copied.get("meta")?.as_str(), Some("tag"));
    assert_eq!(number(copied.call(&Value::Undefined, &[Value::from(7.0)])?), 7.0);

    let options = CloneOptions::new().function_factory(|_, _| Ok(Value::from("stub")));
    let custom = deep_clone(&root, &options)?.into_value();
    assert_eq!(custom.as_str(), Some("stub"));
    Ok(())
}

#[test]
fn test_function_factory_failure() {
    let root = ObjectRef::ordinary();
    root.set("handler", Value::function("handler", |_, _| Ok(Value::Undefined)))
        .unwrap();
    let options = CloneOptions::new().function_factory(|_, _| Err("no closures".to_string()));
    match deep_clone(&Value::Object(root), &options) {
        Err(CloneError::FunctionFactory { path, message }) => {
            assert_eq!(path.to_string(), "handler");
            assert_eq!(message, "no closures");
        }
        other => panic!("expected factory error, got {:?}", other),
    }
}

#[test]
fn test_lenient_shares_host_values() -> anyhow::Result<()> {
    let socket = ObjectRef::host(HostHandle::new("Socket", 8080u16));
    let root = ObjectRef::ordinary();
    root.set("conn", &socket)?;

    let strict = clone_value(&Value::Object(root.clone()));
    assert!(matches!(strict, Err(CloneError::Unsupported { .. })));

    let options = CloneOptions::new().lenient(true);
    let copy = deep_clone(&Value::Object(root), &options)?.into_value();
    let conn = obj(&copy).get("conn")?;
    assert!(obj(&conn).ptr_eq(&socket));
    assert_eq!(
        obj(&conn).host_handle().and_then(|h| h.downcast_ref::<u16>().copied()),
        Some(8080)
    );
    Ok(())
}

#[test]
fn test_max_depth_shares_below_limit() -> anyhow::Result<()> {
    let leaf = ObjectRef::ordinary();
    let mid = ObjectRef::ordinary();
    mid.set("leaf", &leaf)?;
    let root = ObjectRef::ordinary();
    root.set("mid", &mid)?;

    let shallow = deep_clone(&Value::Object(root.clone()), &CloneOptions::new().max_depth(1))?
        .into_value();
    assert!(obj(&obj(&shallow).get("mid")?).ptr_eq(&mid));

    let two = deep_clone(&Value::Object(root), &CloneOptions::new().max_depth(2))?.into_value();
    let mid_copy = obj(&two).get("mid")?;
    assert!(!obj(&mid_copy).ptr_eq(&mid));
    assert!(obj(&obj(&mid_copy).get("leaf")?).ptr_eq(&leaf));
    Ok(())
}

#[test]
fn test_immutable_option_returns_facade() -> anyhow::Result<()> {
    let root = ObjectRef::ordinary();
    root.set("n", 1.0)?;
    let cloned = deep_clone(&Value::Object(root.clone()), &CloneOptions::new().immutable(true))?;
    let facade = cloned.into_facade().expect("facade");
    assert!(!facade.backing().ptr_eq(&root));
    facade.set("n", 2.0)?;
    assert_eq!(number(root.get("n")?), 1.0);
    Ok(())
}
