//! Addressing a child of an object: property, element or map entry

use crate::error::ObjectError;
use crate::path::PathSegment;
use crate::value::{ObjectKind, ObjectRef, Property, PropertyKey, Value};

/// Where a child lives inside its parent
#[derive(Debug, Clone)]
pub enum Slot {
    /// Own property
    Key(PropertyKey),
    /// Array element
    Index(usize),
    /// Value stored under a map key
    Entry(Value),
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Key(a), Slot::Key(b)) => a == b,
            (Slot::Index(a), Slot::Index(b)) => a == b,
            (Slot::Entry(a), Slot::Entry(b)) => a.same_value_zero(b),
            _ => false,
        }
    }
}

impl From<&str> for Slot {
    fn from(key: &str) -> Self {
        Slot::Key(PropertyKey::from(key))
    }
}

impl From<PropertyKey> for Slot {
    fn from(key: PropertyKey) -> Self {
        Slot::Key(key)
    }
}

impl From<usize> for Slot {
    fn from(index: usize) -> Self {
        Slot::Index(index)
    }
}

/// Current content of `slot` (`undefined` when absent)
pub(super) fn read(obj: &ObjectRef, slot: &Slot) -> Result<Value, ObjectError> {
    match slot {
        Slot::Key(key) => obj.get(key.clone()),
        Slot::Index(index) => Ok(obj.element(*index).unwrap_or(Value::Undefined)),
        Slot::Entry(key) => Ok(obj.map_get(key).unwrap_or(Value::Undefined)),
    }
}

/// Assign through the object model
pub(super) fn write(obj: &ObjectRef, slot: &Slot, value: Value) -> Result<(), ObjectError> {
    match slot {
        Slot::Key(key) => obj.set(key.clone(), value),
        Slot::Index(index) => obj.set_element(*index, value),
        Slot::Entry(key) => obj.map_insert(key.clone(), value),
    }
}

/// Delete through the object model
pub(super) fn remove(obj: &ObjectRef, slot: &Slot) -> Result<bool, ObjectError> {
    match slot {
        Slot::Key(key) => obj.delete(key.clone()),
        Slot::Index(index) => obj.delete_element(*index),
        Slot::Entry(key) => obj.collection_remove(key),
    }
}

/// Swap `expected` for `replacement` in `slot` if the slot still holds it.
///
/// Bypasses `writable`: the replacement is a private copy of the same
/// content, not a new assignment.
pub(super) fn relink(
    obj: &ObjectRef,
    slot: &Slot,
    expected: &ObjectRef,
    replacement: &ObjectRef,
) -> bool {
    let holds = |v: &Value| matches!(v, Value::Object(o) if o.ptr_eq(expected));
    let mut guard = obj.write();
    let heap = &mut *guard;
    match (slot, &mut heap.kind) {
        (Slot::Key(key), _) => match heap.properties.get_mut(key) {
            Some(Property::Data { value, .. }) if holds(&*value) => {
                *value = Value::Object(replacement.clone());
                true
            }
            _ => false,
        },
        (Slot::Index(index), ObjectKind::Array(items)) => match items.get_mut(*index) {
            Some(Some(value)) if holds(&*value) => {
                *value = Value::Object(replacement.clone());
                true
            }
            _ => false,
        },
        (Slot::Entry(key), ObjectKind::Map(map)) => {
            if map.get(key).is_some_and(holds) {
                map.insert(key.clone(), Value::Object(replacement.clone()));
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Whether `slot` holds exactly `expected`, read without running accessors
pub(super) fn holds(obj: &ObjectRef, slot: &Slot, expected: &ObjectRef) -> bool {
    let is = |v: &Value| matches!(v, Value::Object(o) if o.ptr_eq(expected));
    let heap = obj.read();
    match (slot, &heap.kind) {
        (Slot::Key(key), _) => {
            matches!(heap.properties.get(key), Some(Property::Data { value, .. }) if is(value))
        }
        (Slot::Index(index), ObjectKind::Array(items)) => {
            matches!(items.get(*index), Some(Some(value)) if is(value))
        }
        (Slot::Entry(key), ObjectKind::Map(map)) => map.get(key).is_some_and(is),
        _ => false,
    }
}

/// Path segment for `slot` within `obj`
pub(super) fn segment(obj: &ObjectRef, slot: &Slot) -> PathSegment {
    match slot {
        Slot::Key(key) => PathSegment::Key(key.clone()),
        Slot::Index(index) => PathSegment::Index(*index),
        Slot::Entry(key) => obj
            .map_entries()
            .and_then(|pairs| pairs.iter().position(|(k, _)| k.same_value_zero(key)))
            .map(PathSegment::MapValue)
            .unwrap_or_else(|| PathSegment::MapValueOf(format!("{:?}", key))),
    }
}
