//! Shared object handles
//!
//! An `ObjectRef` is the identity of a reference-type value. Cloning the
//! handle (`Clone::clone`) shares the object; producing an independent object
//! is the job of the `clone` module.

use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    Callable, Class, DataViewSlots, HeapObject, HostHandle, ObjectKind, Primitive, Property,
    PropertyKey, TypedArrayKind, TypedView, Value,
};
use crate::error::ObjectError;

/// A shared, lockable handle to a heap object.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<HeapObject>>);

/// A non-owning handle; does not keep the object alive.
#[derive(Clone)]
pub struct WeakObjectRef(Weak<RwLock<HeapObject>>);

/// Stable identity of a live object (the address of its allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub(crate) usize);

impl WeakObjectRef {
    /// Get a strong handle if the object is still alive
    pub fn upgrade(&self) -> Option<ObjectRef> {
        self.0.upgrade().map(ObjectRef)
    }
}

impl ObjectRef {
    // ═══════════════════════════════════════════════════════════════════
    // Construction
    // ═══════════════════════════════════════════════════════════════════

    /// Create an object with explicit kind and class
    pub fn new(kind: ObjectKind, class: Option<Class>) -> Self {
        ObjectRef(Arc::new(RwLock::new(HeapObject::new(kind, class))))
    }

    /// Create an object whose class is the built-in class of its kind
    pub fn from_kind(kind: ObjectKind) -> Self {
        let class = kind.default_class();
        Self::new(kind, class)
    }

    /// Create an empty plain object
    pub fn ordinary() -> Self {
        Self::from_kind(ObjectKind::Ordinary)
    }

    /// Create an empty plain object linked to `class`
    pub fn instance(class: &Class) -> Self {
        Self::new(ObjectKind::Ordinary, Some(class.clone()))
    }

    /// Create an empty plain object with no prototype
    pub fn null_prototype() -> Self {
        Self::new(ObjectKind::Ordinary, None)
    }

    /// Create a dense array
    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::from_kind(ObjectKind::Array(items.into_iter().map(Some).collect()))
    }

    /// Create an array that may contain holes
    pub fn sparse_array(items: Vec<Option<Value>>) -> Self {
        Self::from_kind(ObjectKind::Array(items))
    }

    /// Create a date from epoch milliseconds
    pub fn date(epoch_ms: f64) -> Self {
        Self::from_kind(ObjectKind::Date(epoch_ms))
    }

    /// Create a regular expression
    pub fn regexp(source: &str, flags: &str) -> Self {
        Self::from_kind(ObjectKind::RegExp {
            source: Arc::from(source),
            flags: Arc::from(flags),
        })
    }

    /// Create a map from pairs (later duplicates overwrite earlier values)
    pub fn map(pairs: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Self::from_kind(ObjectKind::Map(pairs.into_iter().collect()))
    }

    /// Create a set from values
    pub fn new_set(values: impl IntoIterator<Item = Value>) -> Self {
        Self::from_kind(ObjectKind::Set(values.into_iter().collect()))
    }

    /// Create a byte buffer
    pub fn array_buffer(bytes: Vec<u8>) -> Self {
        Self::from_kind(ObjectKind::ArrayBuffer(bytes))
    }

    /// Create a typed view over `buffer`
    pub fn typed_array(
        kind: TypedArrayKind,
        buffer: &ObjectRef,
        byte_offset: usize,
        length: usize,
    ) -> Result<Self, ObjectError> {
        let buffer_len = buffer.buffer_len().ok_or_else(not_a_buffer)?;
        let size = kind.element_size();
        if byte_offset % size != 0 {
            return Err(ObjectError::InvalidView(format!(
                "start offset of {} should be a multiple of {}",
                kind.name(),
                size
            )));
        }
        let end = length
            .checked_mul(size)
            .and_then(|bytes| bytes.checked_add(byte_offset));
        if !matches!(end, Some(end) if end <= buffer_len) {
            return Err(ObjectError::InvalidView(format!(
                "{} of length {} at offset {} exceeds buffer of {} bytes",
                kind.name(),
                length,
                byte_offset,
                buffer_len
            )));
        }
        Ok(Self::from_kind(ObjectKind::TypedArray(TypedView {
            buffer: buffer.clone(),
            kind,
            byte_offset,
            length,
        })))
    }

    /// Create a `DataView` over `buffer`
    pub fn data_view(
        buffer: &ObjectRef,
        byte_offset: usize,
        byte_length: usize,
    ) -> Result<Self, ObjectError> {
        let buffer_len = buffer.buffer_len().ok_or_else(not_a_buffer)?;
        if !matches!(byte_offset.checked_add(byte_length), Some(end) if end <= buffer_len) {
            return Err(ObjectError::InvalidView(format!(
                "DataView of {} bytes at offset {} exceeds buffer of {} bytes",
                byte_length, byte_offset, buffer_len
            )));
        }
        Ok(Self::from_kind(ObjectKind::DataView(DataViewSlots {
            buffer: buffer.clone(),
            byte_offset,
            byte_length,
        })))
    }

    /// Create a primitive wrapper object
    pub fn boxed(primitive: Primitive) -> Self {
        Self::from_kind(ObjectKind::Boxed(primitive))
    }

    /// Create a function object
    pub fn function(callable: Callable) -> Self {
        Self::from_kind(ObjectKind::Function(callable))
    }

    /// Wrap an opaque host resource
    pub fn host(handle: HostHandle) -> Self {
        Self::from_kind(ObjectKind::Host(handle))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Identity
    // ═══════════════════════════════════════════════════════════════════

    /// Stable identity of this object
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Identity comparison
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Create a weak handle
    pub fn downgrade(&self) -> WeakObjectRef {
        WeakObjectRef(Arc::downgrade(&self.0))
    }

    /// Lock for reading
    pub fn read(&self) -> RwLockReadGuard<'_, HeapObject> {
        self.0.read()
    }

    /// Lock for writing
    pub fn write(&self) -> RwLockWriteGuard<'_, HeapObject> {
        self.0.write()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Shape
    // ═══════════════════════════════════════════════════════════════════

    /// Name of the fundamental kind
    pub fn kind_name(&self) -> &'static str {
        self.read().kind.name()
    }

    /// Class name, falling back to the kind name for null-prototype objects
    pub fn class_name(&self) -> String {
        let obj = self.read();
        match &obj.class {
            Some(class) => class.name().to_string(),
            None => obj.kind.name().to_string(),
        }
    }

    /// The prototype link
    pub fn class(&self) -> Option<Class> {
        self.read().class.clone()
    }

    /// Replace the prototype link
    pub fn set_class(&self, class: Option<Class>) {
        self.write().class = class;
    }

    /// Capability check: is this object's class `class` or a subclass of it?
    pub fn instance_of(&self, class: &Class) -> bool {
        self.class().is_some_and(|c| c.is_subclass_of(class))
    }

    /// Check if this is an array
    pub fn is_array(&self) -> bool {
        matches!(self.read().kind, ObjectKind::Array(_))
    }

    /// Check if this object is callable
    pub fn is_callable(&self) -> bool {
        matches!(self.read().kind, ObjectKind::Function(_))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Own Properties
    // ═══════════════════════════════════════════════════════════════════

    /// Own property keys in insertion order
    pub fn own_keys(&self) -> Vec<PropertyKey> {
        self.read().properties.keys().cloned().collect()
    }

    /// Own enumerable string keys in insertion order
    pub fn keys(&self) -> Vec<PropertyKey> {
        self.read()
            .properties
            .iter()
            .filter(|(k, p)| !k.is_symbol() && p.is_enumerable())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Snapshot of all own properties, in insertion order
    pub fn own_properties(&self) -> Vec<(PropertyKey, Property)> {
        self.read()
            .properties
            .iter()
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect()
    }

    /// Get an own property descriptor
    pub fn own_property(&self, key: &PropertyKey) -> Option<Property> {
        self.read().properties.get(key).cloned()
    }

    /// Check for an own property
    pub fn has_own(&self, key: &PropertyKey) -> bool {
        self.read().properties.contains_key(key)
    }

    /// Define (or redefine) an own property, enforcing descriptor rules.
    pub fn define_property(
        &self,
        key: impl Into<PropertyKey>,
        property: Property,
    ) -> Result<(), ObjectError> {
        let key = key.into();
        let mut obj = self.write();
        match obj.properties.get(&key) {
            Some(existing) if !existing.is_configurable() => {
                if !existing.allows_redefinition(&property) {
                    return Err(ObjectError::NonConfigurable {
                        key: key.to_string(),
                    });
                }
            }
            Some(_) => {}
            None if !obj.extensible => {
                return Err(ObjectError::NotExtensible {
                    key: key.to_string(),
                });
            }
            None => {}
        }
        obj.properties.insert(key, property);
        Ok(())
    }

    /// Read a property, running its getter if it is an accessor.
    ///
    /// Missing properties read as `undefined`.
    pub fn get(&self, key: impl Into<PropertyKey>) -> Result<Value, ObjectError> {
        let key = key.into();
        match self.own_property(&key) {
            None | Some(Property::Accessor { get: None, .. }) => Ok(Value::Undefined),
            Some(Property::Data { value, .. }) => Ok(value),
            Some(Property::Accessor {
                get: Some(getter), ..
            }) => self.invoke_accessor(&key, &getter, &[]),
        }
    }

    /// Assign a property, honouring `writable`, setters and extensibility.
    pub fn set(
        &self,
        key: impl Into<PropertyKey>,
        value: impl Into<Value>,
    ) -> Result<(), ObjectError> {
        let key = key.into();
        let value = value.into();
        match self.own_property(&key) {
            Some(Property::Data { attributes, .. }) => {
                if !attributes.writable {
                    return Err(ObjectError::ReadOnly {
                        key: key.to_string(),
                    });
                }
                if let Some(Property::Data { value: slot, .. }) =
                    self.write().properties.get_mut(&key)
                {
                    *slot = value;
                }
                Ok(())
            }
            Some(Property::Accessor {
                set: Some(setter), ..
            }) => self.invoke_accessor(&key, &setter, &[value]).map(|_| ()),
            Some(Property::Accessor { set: None, .. }) => Err(ObjectError::ReadOnly {
                key: key.to_string(),
            }),
            None => {
                let mut obj = self.write();
                if !obj.extensible {
                    return Err(ObjectError::NotExtensible {
                        key: key.to_string(),
                    });
                }
                obj.properties.insert(key, Property::data(value));
                Ok(())
            }
        }
    }

    /// Delete an own property. Returns whether it existed.
    pub fn delete(&self, key: impl Into<PropertyKey>) -> Result<bool, ObjectError> {
        let key = key.into();
        let mut obj = self.write();
        match obj.properties.get(&key).map(Property::is_configurable) {
            None => Ok(false),
            Some(false) => Err(ObjectError::NonConfigurable {
                key: key.to_string(),
            }),
            Some(true) => Ok(obj.properties.shift_remove(&key).is_some()),
        }
    }

    fn invoke_accessor(
        &self,
        key: &PropertyKey,
        function: &Value,
        args: &[Value],
    ) -> Result<Value, ObjectError> {
        let Value::Object(function) = function else {
            return Err(ObjectError::NotCallable(format!("accessor for '{}'", key)));
        };
        function
            .call(&Value::Object(self.clone()), args)
            .map_err(|e| ObjectError::Accessor {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    // ═══════════════════════════════════════════════════════════════════
    // Integrity
    // ═══════════════════════════════════════════════════════════════════

    /// Check if new properties may be added
    pub fn is_extensible(&self) -> bool {
        self.read().extensible
    }

    /// Forbid adding new properties
    pub fn prevent_extensions(&self) {
        self.write().extensible = false;
    }

    /// Make every own property and element read-only and non-configurable
    pub fn freeze(&self) {
        let mut obj = self.write();
        obj.extensible = false;
        obj.elements_frozen = true;
        for property in obj.properties.values_mut() {
            match property {
                Property::Data { attributes, .. } => {
                    attributes.writable = false;
                    attributes.configurable = false;
                }
                Property::Accessor { attributes, .. } => attributes.configurable = false,
            }
        }
    }

    /// Check if the object is frozen
    pub fn is_frozen(&self) -> bool {
        let obj = self.read();
        let elements_ok = match &obj.kind {
            ObjectKind::Array(items) => obj.elements_frozen || items.is_empty(),
            _ => true,
        };
        !obj.extensible
            && elements_ok
            && obj
                .properties
                .values()
                .all(|p| !p.is_configurable() && !p.is_writable())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Array Elements
    // ═══════════════════════════════════════════════════════════════════

    /// Array length (`None` for non-arrays)
    pub fn len(&self) -> Option<usize> {
        match &self.read().kind {
            ObjectKind::Array(items) => Some(items.len()),
            _ => None,
        }
    }

    /// Check for an empty array (`false` for non-arrays)
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Element at `index` (`None` for holes, out-of-range and non-arrays)
    pub fn element(&self, index: usize) -> Option<Value> {
        match &self.read().kind {
            ObjectKind::Array(items) => items.get(index).cloned().flatten(),
            _ => None,
        }
    }

    /// Snapshot of all elements, holes included
    pub fn elements(&self) -> Option<Vec<Option<Value>>> {
        match &self.read().kind {
            ObjectKind::Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    /// Write an element, growing the array with holes if needed
    pub fn set_element(&self, index: usize, value: impl Into<Value>) -> Result<(), ObjectError> {
        let mut obj = self.write();
        let extensible = obj.extensible;
        let frozen = obj.elements_frozen;
        match &mut obj.kind {
            ObjectKind::Array(items) => {
                if frozen {
                    return Err(ObjectError::ReadOnly {
                        key: index.to_string(),
                    });
                }
                if index >= items.len() {
                    if !extensible {
                        return Err(ObjectError::NotExtensible {
                            key: index.to_string(),
                        });
                    }
                    items.resize(index + 1, None);
                }
                items[index] = Some(value.into());
                Ok(())
            }
            other => Err(ObjectError::type_error("Array", other.name())),
        }
    }

    /// Append an element
    pub fn push(&self, value: impl Into<Value>) -> Result<(), ObjectError> {
        let index = self
            .len()
            .ok_or_else(|| ObjectError::type_error("Array", self.kind_name()))?;
        self.set_element(index, value)
    }

    /// Turn an element into a hole. Returns whether it held a value.
    pub fn delete_element(&self, index: usize) -> Result<bool, ObjectError> {
        let mut obj = self.write();
        let frozen = obj.elements_frozen;
        match &mut obj.kind {
            ObjectKind::Array(items) => {
                if frozen {
                    return Err(ObjectError::NonConfigurable {
                        key: index.to_string(),
                    });
                }
                Ok(items.get_mut(index).and_then(Option::take).is_some())
            }
            other => Err(ObjectError::type_error("Array", other.name())),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Built-in Slots
    // ═══════════════════════════════════════════════════════════════════

    /// Epoch milliseconds of a date
    pub fn date_value(&self) -> Option<f64> {
        match self.read().kind {
            ObjectKind::Date(t) => Some(t),
            _ => None,
        }
    }

    /// Source text and flags of a regular expression
    pub fn regexp_parts(&self) -> Option<(Arc<str>, Arc<str>)> {
        match &self.read().kind {
            ObjectKind::RegExp { source, flags } => Some((source.clone(), flags.clone())),
            _ => None,
        }
    }

    /// Entry count of a map or set
    pub fn size(&self) -> Option<usize> {
        match &self.read().kind {
            ObjectKind::Map(map) => Some(map.len()),
            ObjectKind::Set(set) => Some(set.len()),
            _ => None,
        }
    }

    /// Map entries in insertion order
    pub fn map_entries(&self) -> Option<Vec<(Value, Value)>> {
        match &self.read().kind {
            ObjectKind::Map(map) => Some(map.to_pairs()),
            _ => None,
        }
    }

    /// Look up a map entry
    pub fn map_get(&self, key: &Value) -> Option<Value> {
        match &self.read().kind {
            ObjectKind::Map(map) => map.get(key).cloned(),
            _ => None,
        }
    }

    /// Insert or update a map entry
    pub fn map_insert(
        &self,
        key: impl Into<Value>,
        value: impl Into<Value>,
    ) -> Result<(), ObjectError> {
        match &mut self.write().kind {
            ObjectKind::Map(map) => {
                map.insert(key.into(), value.into());
                Ok(())
            }
            other => Err(ObjectError::type_error("Map", other.name())),
        }
    }

    /// Set values in insertion order
    pub fn set_values(&self) -> Option<Vec<Value>> {
        match &self.read().kind {
            ObjectKind::Set(set) => Some(set.to_values()),
            _ => None,
        }
    }

    /// Add a value to a set. Returns false if already present.
    pub fn set_add(&self, value: impl Into<Value>) -> Result<bool, ObjectError> {
        match &mut self.write().kind {
            ObjectKind::Set(set) => Ok(set.add(value.into())),
            other => Err(ObjectError::type_error("Set", other.name())),
        }
    }

    /// Membership test for maps (by key) and sets
    pub fn collection_has(&self, key: &Value) -> Option<bool> {
        match &self.read().kind {
            ObjectKind::Map(map) => Some(map.contains(key)),
            ObjectKind::Set(set) => Some(set.contains(key)),
            _ => None,
        }
    }

    /// Remove a map key or set value. Returns whether it was present.
    pub fn collection_remove(&self, key: &Value) -> Result<bool, ObjectError> {
        match &mut self.write().kind {
            ObjectKind::Map(map) => Ok(map.remove(key).is_some()),
            ObjectKind::Set(set) => Ok(set.remove(key)),
            other => Err(ObjectError::type_error("Map or Set", other.name())),
        }
    }

    /// Byte length of an `ArrayBuffer`
    pub fn buffer_len(&self) -> Option<usize> {
        match &self.read().kind {
            ObjectKind::ArrayBuffer(bytes) => Some(bytes.len()),
            _ => None,
        }
    }

    /// Copy of an `ArrayBuffer`'s bytes
    pub fn buffer_bytes(&self) -> Option<Vec<u8>> {
        match &self.read().kind {
            ObjectKind::ArrayBuffer(bytes) => Some(bytes.clone()),
            _ => None,
        }
    }

    /// Overwrite bytes of an `ArrayBuffer` starting at `offset`
    pub fn write_bytes(&self, offset: usize, data: &[u8]) -> Result<(), ObjectError> {
        match &mut self.write().kind {
            ObjectKind::ArrayBuffer(bytes) => {
                let target = bytes.get_mut(offset..offset + data.len()).ok_or_else(|| {
                    ObjectError::InvalidView(format!(
                        "write of {} bytes at offset {} is out of range",
                        data.len(),
                        offset
                    ))
                })?;
                target.copy_from_slice(data);
                Ok(())
            }
            other => Err(ObjectError::type_error("ArrayBuffer", other.name())),
        }
    }

    /// Internal slots of a typed view
    pub fn typed_view(&self) -> Option<TypedView> {
        match &self.read().kind {
            ObjectKind::TypedArray(view) => Some(view.clone()),
            _ => None,
        }
    }

    /// Internal slots of a `DataView`
    pub fn data_view_slots(&self) -> Option<DataViewSlots> {
        match &self.read().kind {
            ObjectKind::DataView(slots) => Some(slots.clone()),
            _ => None,
        }
    }

    /// The bytes visible through a typed view or `DataView`
    pub fn view_bytes(&self) -> Option<Vec<u8>> {
        let (buffer, start, len) = match &self.read().kind {
            ObjectKind::TypedArray(view) => {
                (view.buffer.clone(), view.byte_offset, view.byte_length())
            }
            ObjectKind::DataView(slots) => {
                (slots.buffer.clone(), slots.byte_offset, slots.byte_length)
            }
            _ => return None,
        };
        let bytes = buffer.buffer_bytes()?;
        bytes.get(start..start.checked_add(len)?).map(<[u8]>::to_vec)
    }

    /// Read element `index` of a typed view
    pub fn typed_get(&self, index: usize) -> Option<f64> {
        let view = self.typed_view()?;
        if index >= view.length {
            return None;
        }
        let size = view.kind.element_size();
        let start = view.byte_offset + index * size;
        let obj = view.buffer.read();
        match &obj.kind {
            ObjectKind::ArrayBuffer(bytes) => {
                bytes.get(start..start + size).map(|b| view.kind.decode(b))
            }
            _ => None,
        }
    }

    /// Write element `index` of a typed view
    pub fn typed_set(&self, index: usize, value: f64) -> Result<(), ObjectError> {
        let view = self
            .typed_view()
            .ok_or_else(|| ObjectError::type_error("typed array", self.kind_name()))?;
        if index >= view.length {
            return Err(ObjectError::InvalidView(format!(
                "index {} out of range for {} of length {}",
                index,
                view.kind.name(),
                view.length
            )));
        }
        let offset = view.byte_offset + index * view.kind.element_size();
        view.buffer.write_bytes(offset, &view.kind.encode(value))
    }

    /// The primitive inside a wrapper object
    pub fn boxed_value(&self) -> Option<Value> {
        match &self.read().kind {
            ObjectKind::Boxed(p) => Some(p.to_value()),
            _ => None,
        }
    }

    /// The behaviour of a function object
    pub fn callable(&self) -> Option<Callable> {
        match &self.read().kind {
            ObjectKind::Function(c) => Some(c.clone()),
            _ => None,
        }
    }

    /// The resource inside a host object
    pub fn host_handle(&self) -> Option<HostHandle> {
        match &self.read().kind {
            ObjectKind::Host(h) => Some(h.clone()),
            _ => None,
        }
    }

    /// Call a function object
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, ObjectError> {
        let callable = self
            .callable()
            .ok_or_else(|| ObjectError::NotCallable(self.class_name()))?;
        callable
            .invoke(this, args)
            .map_err(|message| ObjectError::Thrown {
                name: callable.name.clone(),
                message,
            })
    }
}

fn not_a_buffer() -> ObjectError {
    ObjectError::InvalidView("backing object is not an ArrayBuffer".into())
}
