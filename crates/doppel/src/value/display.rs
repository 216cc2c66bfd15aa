//! Display and Debug implementations for Value
//!
//! Objects print shallowly (class name and identity) so that cyclic graphs
//! can always be formatted.

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s.as_ref()),
            Value::Symbol(sym) => write!(f, "{:?}", sym),
            Value::Object(obj) => write!(f, "{:?}", obj),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Object(obj) => write!(f, "[object {}]", obj.class_name()),
            other => write!(f, "{:?}", other),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or(""))
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let obj = self.read();
        let class = obj
            .class
            .as_ref()
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| "null".to_string());
        match &obj.kind {
            ObjectKind::Date(t) => write!(f, "{}({})", class, t)?,
            ObjectKind::RegExp { source, flags } => write!(f, "/{}/{}", source, flags)?,
            ObjectKind::Array(items) => write!(f, "{}[{}]", class, items.len())?,
            ObjectKind::Map(map) => write!(f, "{}{{{}}}", class, map.len())?,
            ObjectKind::Set(set) => write!(f, "{}{{{}}}", class, set.len())?,
            ObjectKind::ArrayBuffer(bytes) => write!(f, "{}({} bytes)", class, bytes.len())?,
            ObjectKind::Function(c) => write!(f, "[Function {}]", c.name)?,
            ObjectKind::Host(h) => write!(f, "[{}]", h.type_name())?,
            _ => write!(f, "{}", class)?,
        }
        write!(f, "@{:x}", self.id().0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:x}", self.0)
    }
}
