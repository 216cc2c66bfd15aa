//! Classes: the prototype / behavioral-shape link of an object

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::TypedArrayKind;

/// A constructor handle.
///
/// Classes are compared by identity. An object's class is what capability
/// checks (`instance_of`) and atomic opt-outs look at; cloning never copies a
/// class, it only re-links the clone to the same one.
#[derive(Clone)]
pub struct Class(Arc<ClassData>);

struct ClassData {
    name: String,
    parent: Option<Class>,
}

impl Class {
    /// Create a root class (derives directly from `Object`)
    pub fn new(name: impl Into<String>) -> Self {
        Self::extends(name, &Class::builtin(Builtin::Object))
    }

    /// Create a class deriving from `parent`
    pub fn extends(name: impl Into<String>, parent: &Class) -> Self {
        Class(Arc::new(ClassData {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    /// The class name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The parent class, if any
    pub fn parent(&self) -> Option<&Class> {
        self.0.parent.as_ref()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Class) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// True if `self` is `other` or derives from it
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.ptr_eq(other) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// Get the shared class of a built-in kind
    pub fn builtin(which: Builtin) -> Class {
        builtins()
            .iter()
            .find(|(b, _)| *b == which)
            .map(|(_, class)| class.clone())
            // Every Builtin variant is registered in `builtins()`
            .unwrap_or_else(|| builtins()[0].1.clone())
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

/// The built-in classes of the object model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `Object`
    Object,
    /// `Array`
    Array,
    /// `Date`
    Date,
    /// `RegExp`
    RegExp,
    /// `Map`
    Map,
    /// `Set`
    Set,
    /// `ArrayBuffer`
    ArrayBuffer,
    /// One of the typed array constructors
    TypedArray(TypedArrayKind),
    /// `DataView`
    DataView,
    /// `Boolean` wrapper
    Boolean,
    /// `Number` wrapper
    Number,
    /// `String` wrapper
    String,
    /// `Function`
    Function,
}

impl Builtin {
    const ALL: [Builtin; 12] = [
        Builtin::Object,
        Builtin::Array,
        Builtin::Date,
        Builtin::RegExp,
        Builtin::Map,
        Builtin::Set,
        Builtin::ArrayBuffer,
        Builtin::DataView,
        Builtin::Boolean,
        Builtin::Number,
        Builtin::String,
        Builtin::Function,
    ];

    /// The constructor name
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Object => "Object",
            Builtin::Array => "Array",
            Builtin::Date => "Date",
            Builtin::RegExp => "RegExp",
            Builtin::Map => "Map",
            Builtin::Set => "Set",
            Builtin::ArrayBuffer => "ArrayBuffer",
            Builtin::TypedArray(kind) => kind.name(),
            Builtin::DataView => "DataView",
            Builtin::Boolean => "Boolean",
            Builtin::Number => "Number",
            Builtin::String => "String",
            Builtin::Function => "Function",
        }
    }
}

/// Immutable registry of built-in classes, created on first use.
fn builtins() -> &'static [(Builtin, Class)] {
    static REGISTRY: OnceLock<Vec<(Builtin, Class)>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let object = Class(Arc::new(ClassData {
            name: "Object".to_string(),
            parent: None,
        }));
        let derived = |name: &str| {
            Class(Arc::new(ClassData {
                name: name.to_string(),
                parent: Some(object.clone()),
            }))
        };

        let mut registry: Vec<(Builtin, Class)> = Builtin::ALL
            .iter()
            .skip(1)
            .map(|b| (*b, derived(b.name())))
            .collect();
        registry.extend(
            TypedArrayKind::ALL
                .iter()
                .map(|k| (Builtin::TypedArray(*k), derived(k.name()))),
        );
        registry.insert(0, (Builtin::Object, object.clone()));
        registry
    })
}
