//! Hashable wrapper for Value to enable use as collection keys

use std::hash::{Hash, Hasher};

use super::Value;

/// A wrapper for Value that implements Hash and Eq with SameValueZero
/// semantics.
///
/// Every value is hashable: `NaN` equals `NaN`, `+0` equals `-0`, strings
/// compare by content, symbols and objects by identity.
#[derive(Debug, Clone)]
pub struct MapKey(pub Value);

impl MapKey {
    /// Borrow the wrapped value
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl Hash for MapKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash the discriminant first
        std::mem::discriminant(&self.0).hash(state);

        match &self.0 {
            Value::Undefined | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => {
                let canonical = if n.is_nan() {
                    f64::NAN.to_bits()
                } else if *n == 0.0 {
                    0.0f64.to_bits()
                } else {
                    n.to_bits()
                };
                canonical.hash(state)
            }
            Value::String(s) => s.hash(state),
            Value::Symbol(sym) => sym.hash(state),
            Value::Object(obj) => obj.id().hash(state),
        }
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.same_value_zero(&other.0)
    }
}

impl Eq for MapKey {}

impl From<Value> for MapKey {
    fn from(value: Value) -> Self {
        MapKey(value)
    }
}
