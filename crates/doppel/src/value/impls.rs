//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::from(s.into()))
    }

    /// Create a fresh symbol value
    pub fn symbol(description: &str) -> Self {
        Value::Symbol(Symbol::new(Some(description)))
    }

    /// Create an empty plain object
    pub fn object() -> Self {
        Value::Object(ObjectRef::ordinary())
    }

    /// Create a dense array
    pub fn array(items: Vec<Value>) -> Self {
        Value::Object(ObjectRef::array(items))
    }

    /// Create a date from epoch milliseconds
    pub fn date(epoch_ms: f64) -> Self {
        Value::Object(ObjectRef::date(epoch_ms))
    }

    /// Create a regular expression
    pub fn regexp(source: &str, flags: &str) -> Self {
        Value::Object(ObjectRef::regexp(source, flags))
    }

    /// Create a function object
    pub fn function<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, String> + Send + Sync + 'static,
    {
        Value::Object(ObjectRef::function(Callable::new(name, 0, func)))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check for `undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check for `undefined` or `null`
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Check if value is a primitive (anything but an object)
    pub fn is_primitive(&self) -> bool {
        !self.is_object()
    }

    /// Check if value is a reference type
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Check if value is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Object(obj) if obj.is_callable())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract object handle
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Equality Algorithms
    // ═══════════════════════════════════════════════════════════════════

    /// Identity test for reference types (always false for primitives)
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// SameValue: like `==` but `NaN` equals `NaN` and `+0` differs from `-0`
    pub fn same_value(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                (a.is_nan() && b.is_nan())
                    || (a == b && a.is_sign_negative() == b.is_sign_negative())
            }
            _ => self == other,
        }
    }

    /// SameValueZero: collection key equality (`NaN` equals `NaN`, `+0` equals `-0`)
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => (a.is_nan() && b.is_nan()) || a == b,
            _ => self == other,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,

            // IEEE comparison: NaN != NaN
            (Value::Number(a), Value::Number(b)) => a == b,

            (Value::String(a), Value::String(b)) => a == b,

            // Symbols and objects compare by identity
            (Value::Symbol(a), Value::Symbol(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),

            // Different types are never equal
            _ => false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Trait Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

impl From<&ObjectRef> for Value {
    fn from(obj: &ObjectRef) -> Self {
        Value::Object(obj.clone())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_constructor() {
        let v = Value::string("hello");
        assert_eq!(v.as_str(), Some("hello"));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = Value::object();
        let b = Value::object();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.ptr_eq(&a.clone()));
    }

    #[test]
    fn test_symbols_compare_by_identity() {
        let a = Value::symbol("tag");
        let b = Value::symbol("tag");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_value_variants() {
        let nan = Value::Number(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert!(nan.same_value(&nan));
        assert!(nan.same_value_zero(&nan));

        let pos = Value::Number(0.0);
        let neg = Value::Number(-0.0);
        assert!(!pos.same_value(&neg));
        assert!(pos.same_value_zero(&neg));
    }

    #[test]
    fn test_predicates() {
        assert!(Value::Undefined.is_nil());
        assert!(Value::Null.is_nil());
        assert!(Value::from(1).is_primitive());
        assert!(Value::object().is_object());
        assert!(Value::function("f", |_, _| Ok(Value::Undefined)).is_callable());
        assert!(!Value::object().is_callable());
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(2), Value::Number(2.0));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i32>), Value::Undefined);
        let arr = Value::from(vec![1, 2]);
        assert_eq!(arr.as_object().and_then(|o| o.len()), Some(2));
    }
}
