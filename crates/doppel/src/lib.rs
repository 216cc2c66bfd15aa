//! # Doppel
//!
//! A deep-copy engine for dynamic object graphs.
//!
//! Given any value of the object model (primitives, plain objects, arrays,
//! and the built-in containers and wrappers), Doppel produces an independent
//! copy: no mutation of the copy is observable in the original and vice
//! versa, while object identity (shared references and cycles), class links
//! and property descriptors come out the same.
//!
//! ## Architecture
//!
//! - **Object model** (`value`): values, heap objects, descriptors, classes
//! - **Clone engine** (`clone`): identity tracker, classifier, per-type and
//!   structural cloners, transform hook
//! - **Copy-on-write facades** (`immutable`): share a clone, copy a branch
//!   only when it is first mutated
//!
//! ## Example
//!
//! ```
//! use doppel::{clone_value, ObjectRef, Value};
//!
//! let node = ObjectRef::ordinary();
//! node.set("self", &node).unwrap();
//!
//! let copy = clone_value(&Value::Object(node.clone())).unwrap();
//! let copy = copy.as_object().unwrap();
//! assert!(!copy.ptr_eq(&node));
//! assert!(copy.get("self").unwrap().as_object().unwrap().ptr_eq(copy));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clone;
pub mod error;
pub mod immutable;
pub mod options;
pub mod path;
pub mod value;

// Re-export main types
pub use clone::{
    classify, clone_value, deep_clone, Cloned, IdentityTracker, Kind, TransformAbort, Transformed,
};
pub use error::{type_name, CloneError, ObjectError, Result};
pub use immutable::{Facade, Read, Slot};
pub use options::{AccessorMode, CloneOptions, FunctionFactory, FunctionStrategy, TransformFn};
pub use path::{Path, PathSegment};
pub use value::{
    Builtin, Callable, Class, DataViewSlots, HeapObject, HostHandle, MapData, MapKey, ObjectId,
    ObjectKind, ObjectRef, Primitive, Property, PropertyAttributes, PropertyKey, SetData, Symbol,
    TypedArrayKind, TypedView, Value, WeakObjectRef,
};

/// Doppel version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
