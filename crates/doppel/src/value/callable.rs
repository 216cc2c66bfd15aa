//! Callable and opaque host values

use std::any::Any;
use std::sync::Arc;

use super::Value;

/// Type alias for native function pointers to reduce complexity.
///
/// Receives `this` and the argument list.
pub type NativeFnPtr = Arc<dyn Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync>;

/// Opaque behaviour attached to a function object.
///
/// The body is shared between a function and any deep copy of it: code is
/// immutable, only the function object's own properties are state.
#[derive(Clone)]
pub struct Callable {
    /// Function name (for display/debugging)
    pub name: String,

    /// Declared parameter count
    pub arity: usize,

    /// The actual function pointer
    pub func: NativeFnPtr,
}

impl Callable {
    /// Wrap a native closure
    pub fn new<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }

    /// Invoke with an explicit receiver
    pub fn invoke(&self, this: &Value, args: &[Value]) -> Result<Value, String> {
        (self.func)(this, args)
    }

    /// True if both callables run the same native body
    pub fn same_body(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callable({}/{})", self.name, self.arity)
    }
}

/// An opaque host resource (file handle, socket, native handle...).
///
/// The engine never looks inside; such values are shared or rejected.
#[derive(Clone)]
pub struct HostHandle {
    type_name: String,
    resource: Arc<dyn Any + Send + Sync>,
}

impl HostHandle {
    /// Wrap a host resource under a runtime type name
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<String>, resource: T) -> Self {
        Self {
            type_name: type_name.into(),
            resource: Arc::new(resource),
        }
    }

    /// Runtime type name used in diagnostics
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the resource as a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.resource.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostHandle({})", self.type_name)
    }
}
