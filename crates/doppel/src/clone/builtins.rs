//! Per-type cloners for built-in kinds
//!
//! Each builds a fresh object with the source's class link, registers it,
//! fills its internal slots, and then copies own properties the structural
//! way so expando properties survive.

use super::{structural, Cloner, Kind};
use crate::error::{ObjectError, Result};
use crate::path::PathSegment;
use crate::value::{MapData, ObjectKind, ObjectRef, SetData, Value};

pub(super) fn clone_builtin(
    cloner: &mut Cloner<'_>,
    source: &ObjectRef,
    kind: Kind,
) -> Result<Value> {
    let class = source.class();
    let target = match kind {
        Kind::Date(t) => register(cloner, source, ObjectRef::new(ObjectKind::Date(t), class)),
        Kind::RegExp { source: text, flags } => register(
            cloner,
            source,
            ObjectRef::new(ObjectKind::RegExp { source: text, flags }, class),
        ),
        Kind::ArrayBuffer(bytes) => register(
            cloner,
            source,
            ObjectRef::new(ObjectKind::ArrayBuffer(bytes), class),
        ),
        Kind::Boxed(primitive) => register(
            cloner,
            source,
            ObjectRef::new(ObjectKind::Boxed(primitive), class),
        ),
        Kind::Map(pairs) => {
            let target = register(
                cloner,
                source,
                ObjectRef::new(ObjectKind::Map(MapData::new()), class),
            );
            for (i, (key, value)) in pairs.iter().enumerate() {
                let key = cloner.clone_at(PathSegment::MapKey(i), key)?;
                let value = cloner.clone_at(PathSegment::MapValue(i), value)?;
                target
                    .map_insert(key, value)
                    .map_err(|cause| cloner.structural(cause))?;
            }
            target
        }
        Kind::Set(values) => {
            let target = register(
                cloner,
                source,
                ObjectRef::new(ObjectKind::Set(SetData::new()), class),
            );
            for (i, value) in values.iter().enumerate() {
                let value = cloner.clone_at(PathSegment::SetEntry(i), value)?;
                target
                    .set_add(value)
                    .map_err(|cause| cloner.structural(cause))?;
            }
            target
        }
        Kind::TypedArray(view) => {
            let target = register(
                cloner,
                source,
                ObjectRef::new(ObjectKind::TypedArray(view.clone()), class),
            );
            let buffer = clone_buffer(cloner, &view.buffer)?;
            relink_buffer(&target, buffer);
            target
        }
        Kind::DataView(slots) => {
            let target = register(
                cloner,
                source,
                ObjectRef::new(ObjectKind::DataView(slots.clone()), class),
            );
            let buffer = clone_buffer(cloner, &slots.buffer)?;
            relink_buffer(&target, buffer);
            target
        }
        other => {
            let cause = ObjectError::type_error("built-in object", other.name());
            return Err(cloner.structural(cause));
        }
    };

    structural::copy_properties(cloner, source, &target)?;
    Ok(Value::Object(target))
}

fn register(cloner: &mut Cloner<'_>, source: &ObjectRef, target: ObjectRef) -> ObjectRef {
    cloner.register(source, &target);
    target
}

/// Point a registered view at its cloned buffer
fn relink_buffer(view: &ObjectRef, buffer: ObjectRef) {
    match &mut view.write().kind {
        ObjectKind::TypedArray(slots) => slots.buffer = buffer,
        ObjectKind::DataView(slots) => slots.buffer = buffer,
        _ => {}
    }
}

/// Clone the buffer behind a view. Views over one buffer end up over one
/// cloned buffer.
fn clone_buffer(cloner: &mut Cloner<'_>, buffer: &ObjectRef) -> Result<ObjectRef> {
    let clone = cloner.clone_slot(&Value::Object(buffer.clone()))?;
    match clone {
        Value::Object(obj) if obj.buffer_len().is_some() => Ok(obj),
        other => Err(cloner.structural(ObjectError::InvalidView(format!(
            "view buffer cloned to {}",
            crate::error::type_name(&other)
        )))),
    }
}
