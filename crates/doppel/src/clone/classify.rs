//! Type classification
//!
//! A pure function from a value to the policy that clones it. The decision
//! is made on the object's runtime kind, never on its class name, so a
//! subclass of a built-in classifies like the built-in itself.

use std::sync::Arc;

use crate::options::CloneOptions;
use crate::value::{Callable, DataViewSlots, ObjectKind, Primitive, TypedView, Value};

/// Cloning policy for a value, with a snapshot of the slots it needs.
#[derive(Debug, Clone)]
pub enum Kind {
    /// Immutable value, returned as-is
    Primitive,
    /// Instance of an atomic constructor, shared by reference
    Atomic,
    /// Date with its epoch milliseconds
    Date(f64),
    /// Regular expression
    RegExp {
        /// Pattern text
        source: Arc<str>,
        /// Flags in original order
        flags: Arc<str>,
    },
    /// Map entries in insertion order
    Map(Vec<(Value, Value)>),
    /// Set values in insertion order
    Set(Vec<Value>),
    /// Buffer contents
    ArrayBuffer(Vec<u8>),
    /// Typed view slots
    TypedArray(TypedView),
    /// `DataView` slots
    DataView(DataViewSlots),
    /// Primitive wrapper
    Boxed(Primitive),
    /// Function object
    Callable(Callable),
    /// Array elements, holes included
    Array(Vec<Option<Value>>),
    /// Plain structure
    Ordinary,
    /// Nothing the engine knows how to copy
    Unsupported(String),
}

impl Kind {
    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Primitive => "primitive",
            Kind::Atomic => "atomic",
            Kind::Date(_) => "date",
            Kind::RegExp { .. } => "regexp",
            Kind::Map(_) => "map",
            Kind::Set(_) => "set",
            Kind::ArrayBuffer(_) => "array-buffer",
            Kind::TypedArray(_) => "typed-array",
            Kind::DataView(_) => "data-view",
            Kind::Boxed(_) => "boxed",
            Kind::Callable(_) => "callable",
            Kind::Array(_) => "array",
            Kind::Ordinary => "ordinary",
            Kind::Unsupported(_) => "unsupported",
        }
    }
}

/// Decide how `value` is cloned.
///
/// Tracker resolution happens before this in the dispatcher; the remaining
/// order is primitive, atomic constructor, built-in kind, callable, array,
/// ordinary, and finally unsupported.
pub fn classify(value: &Value, options: &CloneOptions) -> Kind {
    let Value::Object(obj) = value else {
        return Kind::Primitive;
    };
    let obj = obj.read();

    if let Some(class) = &obj.class {
        if options.is_atomic(class) {
            return Kind::Atomic;
        }
    }

    match &obj.kind {
        ObjectKind::Date(t) => Kind::Date(*t),
        ObjectKind::RegExp { source, flags } => Kind::RegExp {
            source: source.clone(),
            flags: flags.clone(),
        },
        ObjectKind::Map(map) => Kind::Map(map.to_pairs()),
        ObjectKind::Set(set) => Kind::Set(set.to_values()),
        ObjectKind::ArrayBuffer(bytes) => Kind::ArrayBuffer(bytes.clone()),
        ObjectKind::TypedArray(view) => Kind::TypedArray(view.clone()),
        ObjectKind::DataView(slots) => Kind::DataView(slots.clone()),
        ObjectKind::Boxed(p) => Kind::Boxed(p.clone()),
        ObjectKind::Function(callable) => Kind::Callable(callable.clone()),
        ObjectKind::Array(items) => Kind::Array(items.clone()),
        ObjectKind::Ordinary => Kind::Ordinary,
        ObjectKind::Host(handle) => Kind::Unsupported(handle.type_name().to_string()),
    }
}
