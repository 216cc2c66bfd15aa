//! The clone engine
//!
//! A recursive walk over the source graph. Every node goes through the same
//! dispatcher:
//!
//! 1. references already seen resolve to their clone through the tracker
//! 2. nodes past `max_depth` are shared
//! 3. the transform hook may replace the node or abort the call
//! 4. the classifier picks a policy and the matching cloner runs
//!
//! Clones of reference values are registered before their contents are
//! visited, which is what makes cycles and shared subgraphs come out with
//! the same shape as the source.

mod builtins;
mod classify;
mod structural;
mod tracker;
mod transform;

pub use classify::{classify, Kind};
pub use tracker::IdentityTracker;
pub use transform::{TransformAbort, Transformed};

use tracing::{debug, trace, warn};

use crate::error::{type_name, CloneError, ObjectError, Result};
use crate::immutable::Facade;
use crate::options::{CloneOptions, FunctionStrategy};
use crate::path::{Path, PathSegment};
use crate::value::{Callable, ObjectKind, ObjectRef, Value};

/// Result of a top-level clone
#[derive(Debug, Clone)]
pub enum Cloned {
    /// Plain clone
    Value(Value),
    /// Clone wrapped in a copy-on-write facade (`immutable` option)
    Facade(Facade),
}

impl Cloned {
    /// The cloned value; a facade yields its current backing value
    pub fn into_value(self) -> Value {
        match self {
            Cloned::Value(v) => v,
            Cloned::Facade(f) => Value::Object(f.backing()),
        }
    }

    /// The plain clone, if no facade was requested
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Cloned::Value(v) => Some(v),
            Cloned::Facade(_) => None,
        }
    }

    /// The facade, if one was requested
    pub fn into_facade(self) -> Option<Facade> {
        match self {
            Cloned::Facade(f) => Some(f),
            Cloned::Value(_) => None,
        }
    }
}

/// Deep-clone `value`.
///
/// Each call gets its own identity tracker; nothing is cached between calls.
/// A failed call returns only the error.
///
/// # Example
///
/// ```
/// use doppel::{deep_clone, CloneOptions, ObjectRef, Value};
///
/// let inner = ObjectRef::ordinary();
/// let outer = ObjectRef::ordinary();
/// outer.set("a", &inner).unwrap();
/// outer.set("b", &inner).unwrap();
///
/// let copy = deep_clone(&Value::Object(outer.clone()), &CloneOptions::default())
///     .unwrap()
///     .into_value();
/// let copy = copy.as_object().unwrap();
///
/// let a = copy.get("a").unwrap();
/// let b = copy.get("b").unwrap();
/// assert!(a.ptr_eq(&b));
/// assert!(!a.ptr_eq(&Value::Object(inner)));
/// ```
pub fn deep_clone(value: &Value, options: &CloneOptions) -> Result<Cloned> {
    options.validate()?;
    debug!(
        root = %type_name(value),
        immutable = options.immutable,
        extended_fidelity = options.extended_fidelity,
        lenient = options.lenient,
        max_depth = ?options.max_depth,
        "deep clone"
    );

    let mut cloner = Cloner::new(options);
    let clone = cloner.clone_value(value)?;
    debug!(tracked = cloner.tracker.len(), "deep clone complete");

    match clone {
        Value::Object(obj) if options.immutable => Ok(Cloned::Facade(Facade::wrap(obj))),
        other => Ok(Cloned::Value(other)),
    }
}

/// Deep-clone `value` with default options.
pub fn clone_value(value: &Value) -> Result<Value> {
    deep_clone(value, &CloneOptions::default()).map(Cloned::into_value)
}

/// One-level copy used by the facade: own properties (all of them), elements
/// and entries are copied, everything below them is shared.
pub(crate) fn shallow_copy(source: &ObjectRef) -> Result<ObjectRef> {
    let options = CloneOptions::new()
        .max_depth(1)
        .extended_fidelity(true)
        .clone_function(FunctionStrategy::DeepCopy)
        .lenient(true);
    let mut cloner = Cloner::new(&options);
    match cloner.clone_value(&Value::Object(source.clone()))? {
        Value::Object(copy) => Ok(copy),
        other => Err(CloneError::Structural {
            path: Path::root(),
            cause: ObjectError::type_error("object", &type_name(&other)),
        }),
    }
}

/// Per-call clone state
pub(crate) struct Cloner<'o> {
    tracker: IdentityTracker,
    options: &'o CloneOptions,
    path: Path,
}

impl<'o> Cloner<'o> {
    pub(crate) fn new(options: &'o CloneOptions) -> Self {
        Self {
            tracker: IdentityTracker::new(),
            options,
            path: Path::root(),
        }
    }

    pub(crate) fn options(&self) -> &'o CloneOptions {
        self.options
    }

    /// Step into a child; the segment is popped when the guard drops
    pub(crate) fn enter(&mut self, segment: PathSegment) -> PathGuard<'_, 'o> {
        self.path.push(segment);
        PathGuard { cloner: self }
    }

    /// Clone a child value at `segment`
    pub(crate) fn clone_at(&mut self, segment: PathSegment, value: &Value) -> Result<Value> {
        self.enter(segment).clone_value(value)
    }

    /// Record a fresh clone before its contents are visited
    pub(crate) fn register(&mut self, source: &ObjectRef, clone: &ObjectRef) {
        self.tracker.register(source, Value::Object(clone.clone()));
    }

    /// Object-model failure at the current path
    pub(crate) fn structural(&self, cause: ObjectError) -> CloneError {
        CloneError::Structural {
            path: self.path.clone(),
            cause,
        }
    }

    /// Full dispatch: tracker, depth limit, transform hook, classifier.
    pub(crate) fn clone_value(&mut self, value: &Value) -> Result<Value> {
        if let Some(clone) = self.resolve(value) {
            return Ok(clone);
        }

        let options = self.options;
        if let Some(hook) = &options.transform {
            let outcome = transform::apply(hook, value, &self.path, options.unchanged_continues)?;
            if let Transformed::Replace(replacement) = outcome {
                trace!(path = %self.path, "transform replaced node");
                if let Value::Object(source) = value {
                    self.tracker.register(source, replacement.clone());
                }
                return Ok(replacement);
            }
        }

        self.dispatch(value)
    }

    /// Dispatch without the transform hook (accessor functions)
    pub(crate) fn clone_unhooked(&mut self, value: &Value) -> Result<Value> {
        match self.resolve(value) {
            Some(clone) => Ok(clone),
            None => self.dispatch(value),
        }
    }

    /// Dispatch for an internal slot: no hook and no depth limit
    pub(crate) fn clone_slot(&mut self, value: &Value) -> Result<Value> {
        if let Value::Object(source) = value {
            if let Some(clone) = self.tracker.lookup(source) {
                return Ok(clone);
            }
        }
        self.dispatch(value)
    }

    /// Tracker hit, or the value itself once past `max_depth`
    fn resolve(&self, value: &Value) -> Option<Value> {
        if let Value::Object(source) = value {
            if let Some(clone) = self.tracker.lookup(source) {
                trace!(path = %self.path, "resolved through tracker");
                return Some(clone);
            }
        }
        match self.options.max_depth {
            Some(limit) if self.path.depth() >= limit => Some(value.clone()),
            _ => None,
        }
    }

    fn dispatch(&mut self, value: &Value) -> Result<Value> {
        let Value::Object(source) = value else {
            return Ok(value.clone());
        };

        let kind = classify(value, self.options);
        trace!(path = %self.path, kind = kind.name(), "clone node");

        match kind {
            Kind::Primitive | Kind::Atomic => Ok(value.clone()),
            Kind::Callable(callable) => self.clone_function(source, callable),
            Kind::Array(elements) => structural::clone_array(self, source, elements),
            Kind::Ordinary => structural::clone_ordinary(self, source),
            Kind::Unsupported(type_name) => self.unsupported(value, type_name),
            builtin => builtins::clone_builtin(self, source, builtin),
        }
    }

    fn clone_function(&mut self, source: &ObjectRef, callable: Callable) -> Result<Value> {
        let options = self.options;
        match &options.clone_function {
            FunctionStrategy::KeepReference => Ok(Value::Object(source.clone())),
            FunctionStrategy::DeepCopy => {
                let copy = ObjectRef::new(ObjectKind::Function(callable), source.class());
                self.register(source, &copy);
                structural::copy_properties(self, source, &copy)?;
                Ok(Value::Object(copy))
            }
            FunctionStrategy::Custom(factory) => {
                let clone = factory(source, &self.path).map_err(|message| {
                    CloneError::FunctionFactory {
                        path: self.path.clone(),
                        message,
                    }
                })?;
                self.tracker.register(source, clone.clone());
                Ok(clone)
            }
        }
    }

    fn unsupported(&self, value: &Value, type_name: String) -> Result<Value> {
        if self.options.lenient {
            warn!(
                path = %self.path,
                type_name = %type_name,
                "sharing unsupported value by reference"
            );
            return Ok(value.clone());
        }
        Err(CloneError::Unsupported {
            path: self.path.clone(),
            type_name,
        })
    }
}

/// Pops the path segment pushed by [`Cloner::enter`] when dropped.
pub(crate) struct PathGuard<'a, 'o> {
    cloner: &'a mut Cloner<'o>,
}

impl Drop for PathGuard<'_, '_> {
    fn drop(&mut self) {
        self.cloner.path.pop();
    }
}

impl<'o> std::ops::Deref for PathGuard<'_, 'o> {
    type Target = Cloner<'o>;

    fn deref(&self) -> &Self::Target {
        self.cloner
    }
}

impl<'o> std::ops::DerefMut for PathGuard<'_, 'o> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.cloner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{HostHandle, PropertyKey};

    #[test]
    fn test_path_guard_pops_on_drop() {
        let options = CloneOptions::default();
        let mut cloner = Cloner::new(&options);
        {
            let mut guard = cloner.enter(PathSegment::Key(PropertyKey::from("a")));
            let inner = guard.enter(PathSegment::Index(2));
            assert_eq!(inner.path.to_string(), "a[2]");
        }
        assert!(cloner.path.is_root());
    }

    #[test]
    fn test_primitive_root() {
        let out = clone_value(&Value::from("text")).unwrap();
        assert_eq!(out.as_str(), Some("text"));
    }

    #[test]
    fn test_immutable_primitive_root_stays_plain() {
        let options = CloneOptions::new().immutable(true);
        let out = deep_clone(&Value::Number(3.0), &options).unwrap();
        assert!(matches!(out.as_value(), Some(Value::Number(n)) if *n == 3.0));
    }

    #[test]
    fn test_invalid_options_rejected_before_walk() {
        let options = CloneOptions::new().max_depth(0);
        let err = deep_clone(&Value::Null, &options).unwrap_err();
        assert!(matches!(err, CloneError::InvalidOptions(_)));
    }

    #[test]
    fn test_unsupported_reports_path() {
        let obj = ObjectRef::ordinary();
        obj.set("sock", ObjectRef::host(HostHandle::new("Socket", ())))
            .unwrap();
        let err = clone_value(&obj.into()).unwrap_err();
        match err {
            CloneError::Unsupported { path, type_name } => {
                assert_eq!(path.to_string(), "sock");
                assert_eq!(type_name, "Socket");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_shallow_copy_shares_children() {
        let child = ObjectRef::ordinary();
        let parent = ObjectRef::ordinary();
        parent.set("child", &child).unwrap();

        let copy = shallow_copy(&parent).unwrap();
        assert!(!copy.ptr_eq(&parent));
        let copied_child = copy.get("child").unwrap();
        assert!(copied_child.as_object().unwrap().ptr_eq(&child));
    }

    #[test]
    fn test_shallow_copy_self_cycle_points_at_copy() {
        let obj = ObjectRef::ordinary();
        obj.set("me", &obj).unwrap();
        let copy = shallow_copy(&obj).unwrap();
        let me = copy.get("me").unwrap();
        assert!(me.as_object().unwrap().ptr_eq(&copy));
    }
}
