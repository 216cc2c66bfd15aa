//! Structural cloning: plain objects, arrays, and the own-property copy
//! every other reference kind finishes with.

use super::Cloner;
use crate::error::Result;
use crate::options::AccessorMode;
use crate::path::PathSegment;
use crate::value::{ObjectKind, ObjectRef, Property, PropertyAttributes, PropertyKey, Value};

/// Clone a plain object, keeping its class link
pub(super) fn clone_ordinary(cloner: &mut Cloner<'_>, source: &ObjectRef) -> Result<Value> {
    let target = ObjectRef::new(ObjectKind::Ordinary, source.class());
    cloner.register(source, &target);
    copy_properties(cloner, source, &target)?;
    Ok(Value::Object(target))
}

/// Clone an array element by element; holes stay holes
pub(super) fn clone_array(
    cloner: &mut Cloner<'_>,
    source: &ObjectRef,
    elements: Vec<Option<Value>>,
) -> Result<Value> {
    let target = ObjectRef::new(
        ObjectKind::Array(vec![None; elements.len()]),
        source.class(),
    );
    cloner.register(source, &target);

    for (index, element) in elements.iter().enumerate() {
        let Some(element) = element else {
            continue;
        };
        let mut guard = cloner.enter(PathSegment::Index(index));
        let clone = guard.clone_value(element)?;
        target
            .set_element(index, clone)
            .map_err(|cause| guard.structural(cause))?;
    }

    copy_properties(cloner, source, &target)?;
    Ok(Value::Object(target))
}

/// Copy own properties from `source` onto the fresh `target`, then
/// reproduce the source's extensibility.
///
/// Without `extended_fidelity` only enumerable string-keyed properties are
/// visited. Attributes are carried over unchanged; accessors follow the
/// configured [`AccessorMode`].
pub(crate) fn copy_properties(
    cloner: &mut Cloner<'_>,
    source: &ObjectRef,
    target: &ObjectRef,
) -> Result<()> {
    let options = cloner.options();
    let properties: Vec<(PropertyKey, Property)> = source
        .own_properties()
        .into_iter()
        .filter(|(key, property)| {
            options.extended_fidelity || (!key.is_symbol() && property.is_enumerable())
        })
        .collect();

    for (key, property) in properties {
        let mut guard = cloner.enter(PathSegment::Key(key.clone()));
        let installed = match property {
            Property::Data { value, attributes } => Property::Data {
                value: guard.clone_value(&value)?,
                attributes,
            },
            Property::Accessor {
                get,
                set,
                attributes,
            } => match options.accessors {
                AccessorMode::Preserve => Property::Accessor {
                    get: get.map(|f| guard.clone_unhooked(&f)).transpose()?,
                    set: set.map(|f| guard.clone_unhooked(&f)).transpose()?,
                    attributes,
                },
                AccessorMode::Snapshot => {
                    let current = source
                        .get(key.clone())
                        .map_err(|cause| guard.structural(cause))?;
                    Property::Data {
                        value: guard.clone_value(&current)?,
                        attributes: PropertyAttributes {
                            writable: set.is_some(),
                            ..attributes
                        },
                    }
                }
            },
        };
        target
            .define_property(key, installed)
            .map_err(|cause| guard.structural(cause))?;
    }

    let (extensible, elements_frozen) = {
        let src = source.read();
        (src.extensible, src.elements_frozen)
    };
    let mut dst = target.write();
    dst.extensible = extensible;
    dst.elements_frozen = elements_frozen;
    Ok(())
}
