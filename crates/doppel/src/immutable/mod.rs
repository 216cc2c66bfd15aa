//! Copy-on-write facades
//!
//! A [`Facade`] reads through to a backing object that may be shared with
//! other facades. Reads hand out nested facades for reference values and
//! cache them weakly, so reading the same path twice gives the same facade.
//! The first mutation through a facade makes its backing private: the
//! backing and every not-yet-private ancestor are shallow-copied, each copy
//! relinked into its (now private) parent, and only then is the mutation
//! applied. Other facades over the old backing never see it.
//!
//! Locks are taken parent first. A node's lock is never held while its
//! parent's is acquired.

mod slot;

pub use slot::Slot;

use std::sync::{Arc, Weak};

use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::clone::{clone_value, shallow_copy};
use crate::error::{CloneError, ObjectError, Result};
use crate::path::Path;
use crate::value::{ObjectRef, PropertyKey, Value};

/// What a read through a facade produced
#[derive(Debug, Clone)]
pub enum Read {
    /// A primitive (or `undefined` for an absent slot)
    Value(Value),
    /// A reference, wrapped in a nested facade
    Facade(Facade),
}

impl Read {
    /// The primitive, if this read produced one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Read::Value(v) => Some(v),
            Read::Facade(_) => None,
        }
    }

    /// The nested facade, if this read produced one
    pub fn into_facade(self) -> Option<Facade> {
        match self {
            Read::Facade(f) => Some(f),
            Read::Value(_) => None,
        }
    }

    /// Check for a nested facade
    pub fn is_facade(&self) -> bool {
        matches!(self, Read::Facade(_))
    }
}

/// Copy-on-write view of an object graph.
#[derive(Clone)]
pub struct Facade(Arc<FacadeNode>);

struct FacadeNode {
    state: Mutex<FacadeState>,
}

struct FacadeState {
    backing: ObjectRef,
    private: bool,
    /// What the private copy was made from
    origin: Option<ObjectRef>,
    parent: Option<(Facade, Slot)>,
    children: Vec<(Slot, Weak<FacadeNode>)>,
    path: Path,
}

impl Facade {
    /// Wrap `backing` without copying it.
    ///
    /// # Example
    ///
    /// ```
    /// use doppel::{Facade, ObjectRef};
    ///
    /// let point = ObjectRef::ordinary();
    /// point.set("x", 1.0).unwrap();
    ///
    /// let facade = Facade::wrap(point.clone());
    /// facade.set("x", 2.0).unwrap();
    ///
    /// assert_eq!(point.get("x").unwrap().as_f64(), Some(1.0));
    /// assert_eq!(facade.get("x").unwrap().as_value().and_then(|v| v.as_f64()), Some(2.0));
    /// ```
    pub fn wrap(backing: ObjectRef) -> Self {
        Self::node(backing, None, Path::root())
    }

    fn node(backing: ObjectRef, parent: Option<(Facade, Slot)>, path: Path) -> Self {
        Facade(Arc::new(FacadeNode {
            state: Mutex::new(FacadeState {
                backing,
                private: false,
                origin: None,
                parent,
                children: Vec::new(),
                path,
            }),
        }))
    }

    fn state(&self) -> MutexGuard<'_, FacadeState> {
        self.0.state.lock()
    }

    /// The object reads currently go to
    pub fn backing(&self) -> ObjectRef {
        self.state().backing.clone()
    }

    /// Path of this facade from the root it was read from
    pub fn path(&self) -> Path {
        self.state().path.clone()
    }

    /// Whether this facade already owns a private copy
    pub fn is_private(&self) -> bool {
        self.state().private
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &Facade) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Reads
    // ═══════════════════════════════════════════════════════════════════

    /// Read a child.
    pub fn get(&self, slot: impl Into<Slot>) -> Result<Read> {
        let slot = slot.into();
        let (backing, path) = {
            let state = self.state();
            (state.backing.clone(), state.path.clone())
        };
        let raw = slot::read(&backing, &slot)
            .map_err(|cause| structural(&path, &backing, &slot, cause))?;
        let Value::Object(obj) = raw else {
            return Ok(Read::Value(raw));
        };

        let mut state = self.state();
        let cached = state
            .children
            .iter()
            .find(|(s, _)| *s == slot)
            .and_then(|(_, weak)| weak.upgrade())
            .map(Facade);
        if let Some(child) = cached {
            if child.backing().ptr_eq(&obj) {
                return Ok(Read::Facade(child));
            }
        }

        let child_path = path.child(slot::segment(&backing, &slot));
        let child = Facade::node(obj, Some((self.clone(), slot.clone())), child_path);
        state
            .children
            .retain(|(s, weak)| *s != slot && weak.strong_count() > 0);
        state.children.push((slot, Arc::downgrade(&child.0)));
        Ok(Read::Facade(child))
    }

    /// Read an array element
    pub fn index(&self, index: usize) -> Result<Read> {
        self.get(Slot::Index(index))
    }

    /// Read the value stored under a map key
    pub fn entry(&self, key: impl Into<Value>) -> Result<Read> {
        self.get(Slot::Entry(key.into()))
    }

    /// Enumerable string keys of the backing object
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.backing().keys()
    }

    /// Array length (`None` for non-arrays)
    pub fn len(&self) -> Option<usize> {
        self.backing().len()
    }

    /// Check for an empty array (`false` for non-arrays)
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Mutations
    // ═══════════════════════════════════════════════════════════════════

    /// Assign a child on a private copy.
    pub fn set(&self, slot: impl Into<Slot>, value: impl Into<Value>) -> Result<()> {
        let slot = slot.into();
        let backing = self.make_private()?;
        slot::write(&backing, &slot, value.into())
            .map_err(|cause| structural(&self.path(), &backing, &slot, cause))?;
        self.forget(&slot);
        Ok(())
    }

    /// Insert or update a map entry on a private copy
    pub fn set_entry(&self, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        self.set(Slot::Entry(key.into()), value)
    }

    /// Delete a child on a private copy. Returns whether it existed.
    pub fn delete(&self, slot: impl Into<Slot>) -> Result<bool> {
        let slot = slot.into();
        let backing = self.make_private()?;
        let existed = slot::remove(&backing, &slot)
            .map_err(|cause| structural(&self.path(), &backing, &slot, cause))?;
        self.forget(&slot);
        Ok(existed)
    }

    /// Append to an array on a private copy
    pub fn push(&self, value: impl Into<Value>) -> Result<()> {
        let backing = self.make_private()?;
        backing.push(value).map_err(|cause| CloneError::Structural {
            path: self.path(),
            cause,
        })
    }

    /// Independent deep clone of the current state
    pub fn materialize(&self) -> Result<Value> {
        clone_value(&Value::Object(self.backing()))
    }

    /// Ensure this facade's backing is a private copy, copying ancestors
    /// first so the copy can be relinked into a private parent.
    ///
    /// A backing that an ancestor was copied from (a cycle) takes that
    /// ancestor's copy instead of a new one.
    fn make_private(&self) -> Result<ObjectRef> {
        let (backing, parent) = {
            let state = self.state();
            if state.private {
                return Ok(state.backing.clone());
            }
            (state.backing.clone(), state.parent.clone())
        };

        let Some((parent, slot)) = parent else {
            let copy = shallow_copy(&backing)?;
            return Ok(self.adopt(backing, copy, "copied"));
        };

        let parent_backing = parent.make_private()?;
        if let Some(copy) = parent.copy_of(&backing) {
            if slot::relink(&parent_backing, &slot, &backing, &copy)
                || slot::holds(&parent_backing, &slot, &copy)
            {
                return Ok(self.adopt(backing, copy, "cycle"));
            }
        }

        let copy = shallow_copy(&backing)?;
        let outcome = if slot::relink(&parent_backing, &slot, &backing, &copy) {
            "relinked"
        } else {
            "detached"
        };
        Ok(self.adopt(backing, copy, outcome))
    }

    fn adopt(&self, origin: ObjectRef, copy: ObjectRef, outcome: &'static str) -> ObjectRef {
        let mut state = self.state();
        state.backing = copy.clone();
        state.private = true;
        state.origin = Some(origin);
        debug!(path = %state.path, outcome, "copy-on-write");
        copy
    }

    /// Private copy of `origin` held by this facade or one of its ancestors
    fn copy_of(&self, origin: &ObjectRef) -> Option<ObjectRef> {
        let mut next = Some(self.clone());
        while let Some(facade) = next {
            let state = facade.state();
            if state.origin.as_ref().is_some_and(|o| o.ptr_eq(origin)) {
                return Some(state.backing.clone());
            }
            next = state.parent.as_ref().map(|(parent, _)| parent.clone());
        }
        None
    }

    fn forget(&self, slot: &Slot) {
        self.state().children.retain(|(s, _)| s != slot);
    }
}

fn structural(path: &Path, backing: &ObjectRef, slot: &Slot, cause: ObjectError) -> CloneError {
    CloneError::Structural {
        path: path.child(slot::segment(backing, slot)),
        cause,
    }
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Facade")
            .field("path", &state.path.to_string())
            .field("private", &state.private)
            .field("backing", &state.backing)
            .finish()
    }
}
