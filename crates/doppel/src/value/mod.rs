//! Value representation for the dynamic object model

mod buffer;
mod callable;
mod class;
mod collections;
mod compound;
mod display;
mod hashable;
mod impls;
mod property;
mod refs;

pub use buffer::{DataViewSlots, TypedArrayKind, TypedView};
pub use callable::{Callable, HostHandle, NativeFnPtr};
pub use class::{Builtin, Class};
pub use collections::{MapData, SetData};
pub use compound::{HeapObject, ObjectKind, Primitive};
pub use hashable::MapKey;
pub use property::{Property, PropertyAttributes, PropertyKey};
pub use refs::{ObjectId, ObjectRef, WeakObjectRef};

use std::sync::Arc;

/// Runtime value of the object model.
///
/// Values are organized into two tiers:
/// - Tier 1: Primitives (immutable, identity-transparent except symbols)
/// - Tier 2: Reference types (shared handles with identity)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// The absent value
    Undefined,

    /// The explicit empty reference
    Null,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// IEEE-754 double, the only numeric type
    Number(f64),

    /// Immutable text
    String(Arc<str>),

    /// Unique symbolic atom
    Symbol(Symbol),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Reference Types
    // ═══════════════════════════════════════════════════════════════════
    /// Any object: plain structures, arrays, built-in containers and callables
    Object(ObjectRef),
}

/// A symbolic atom.
///
/// Two symbols are equal only if they are the same symbol; the description
/// is informational.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolData>);

struct SymbolData {
    description: Option<String>,
}

impl Symbol {
    /// Create a fresh symbol
    pub fn new(description: Option<&str>) -> Self {
        Symbol(Arc::new(SymbolData {
            description: description.map(str::to_string),
        }))
    }

    /// The symbol's description, if any
    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}
