//! Heap objects: internal slots, own properties and prototype link

use std::sync::Arc;

use indexmap::IndexMap;

use super::{
    Builtin, Callable, Class, DataViewSlots, HostHandle, MapData, Property, PropertyKey, SetData,
    TypedView, Value,
};

/// The fundamental runtime kind of an object and its internal slots.
///
/// This is what the cloner dispatches on; the class name plays no part.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Plain structure: only own properties
    Ordinary,

    /// Ordered sequence; `None` is a hole
    Array(Vec<Option<Value>>),

    /// Instant in epoch milliseconds (`NaN` for an invalid date)
    Date(f64),

    /// Regular expression source text and flags, flags in original order
    RegExp {
        /// Pattern text
        source: Arc<str>,
        /// Flag characters
        flags: Arc<str>,
    },

    /// Insertion-ordered key/value collection
    Map(MapData),

    /// Insertion-ordered unique-value collection
    Set(SetData),

    /// Raw byte region
    ArrayBuffer(Vec<u8>),

    /// Typed numeric view over an `ArrayBuffer`
    TypedArray(TypedView),

    /// Untyped byte view over an `ArrayBuffer`
    DataView(DataViewSlots),

    /// Primitive wrapper object
    Boxed(Primitive),

    /// Callable behaviour
    Function(Callable),

    /// Opaque host resource
    Host(HostHandle),
}

impl ObjectKind {
    /// Human-readable name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array(_) => "Array",
            ObjectKind::Date(_) => "Date",
            ObjectKind::RegExp { .. } => "RegExp",
            ObjectKind::Map(_) => "Map",
            ObjectKind::Set(_) => "Set",
            ObjectKind::ArrayBuffer(_) => "ArrayBuffer",
            ObjectKind::TypedArray(view) => view.kind.name(),
            ObjectKind::DataView(_) => "DataView",
            ObjectKind::Boxed(p) => p.wrapper_name(),
            ObjectKind::Function(_) => "Function",
            ObjectKind::Host(_) => "HostObject",
        }
    }

    /// The class a fresh object of this kind gets by default
    pub fn default_class(&self) -> Option<Class> {
        let builtin = match self {
            ObjectKind::Ordinary => Builtin::Object,
            ObjectKind::Array(_) => Builtin::Array,
            ObjectKind::Date(_) => Builtin::Date,
            ObjectKind::RegExp { .. } => Builtin::RegExp,
            ObjectKind::Map(_) => Builtin::Map,
            ObjectKind::Set(_) => Builtin::Set,
            ObjectKind::ArrayBuffer(_) => Builtin::ArrayBuffer,
            ObjectKind::TypedArray(view) => Builtin::TypedArray(view.kind),
            ObjectKind::DataView(_) => Builtin::DataView,
            ObjectKind::Boxed(Primitive::Bool(_)) => Builtin::Boolean,
            ObjectKind::Boxed(Primitive::Number(_)) => Builtin::Number,
            ObjectKind::Boxed(Primitive::String(_)) => Builtin::String,
            ObjectKind::Function(_) => Builtin::Function,
            ObjectKind::Host(_) => return None,
        };
        Some(Class::builtin(builtin))
    }
}

/// Primitive payload of a wrapper object
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// `Boolean` wrapper
    Bool(bool),
    /// `Number` wrapper
    Number(f64),
    /// `String` wrapper
    String(Arc<str>),
}

impl Primitive {
    /// The wrapper constructor name
    pub fn wrapper_name(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "Boolean",
            Primitive::Number(_) => "Number",
            Primitive::String(_) => "String",
        }
    }

    /// The wrapped value
    pub fn to_value(&self) -> Value {
        match self {
            Primitive::Bool(b) => Value::Bool(*b),
            Primitive::Number(n) => Value::Number(*n),
            Primitive::String(s) => Value::String(s.clone()),
        }
    }
}

/// The contents of one heap allocation.
#[derive(Debug, Clone)]
pub struct HeapObject {
    /// Runtime kind and internal slots
    pub kind: ObjectKind,

    /// Prototype link (`None` for a null-prototype object)
    pub class: Option<Class>,

    /// Own properties in insertion order
    pub properties: IndexMap<PropertyKey, Property>,

    /// Whether new properties may be added
    pub extensible: bool,

    /// Whether array elements are read-only (set by `freeze`)
    pub elements_frozen: bool,
}

impl HeapObject {
    /// Create an extensible object with no own properties
    pub fn new(kind: ObjectKind, class: Option<Class>) -> Self {
        Self {
            kind,
            class,
            properties: IndexMap::new(),
            extensible: true,
            elements_frozen: false,
        }
    }
}
