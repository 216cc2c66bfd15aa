//! Property keys and descriptors

use std::fmt;
use std::sync::Arc;

use super::{Symbol, Value};

/// Own property key (string or symbol)
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// String property key
    String(Arc<str>),
    /// Symbol property key
    Symbol(Symbol),
}

impl PropertyKey {
    /// Create a string property key
    pub fn string(s: &str) -> Self {
        Self::String(Arc::from(s))
    }

    /// Check if this key is a symbol
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// Get the key text (for string keys)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Symbol(_) => None,
        }
    }
}

impl From<&str> for PropertyKey {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for PropertyKey {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<Symbol> for PropertyKey {
    fn from(s: Symbol) -> Self {
        Self::Symbol(s)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Symbol(sym) => write!(f, "Symbol({})", sym.description().unwrap_or("")),
        }
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s.as_ref()),
            Self::Symbol(_) => write!(f, "[{}]", self),
        }
    }
}

/// Property attributes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyAttributes {
    /// Property value may be changed (ignored for accessors)
    pub writable: bool,
    /// Property shows up in enumeration
    pub enumerable: bool,
    /// Property may be deleted or redefined
    pub configurable: bool,
}

impl Default for PropertyAttributes {
    fn default() -> Self {
        Self::data()
    }
}

impl PropertyAttributes {
    /// Default data property attributes
    pub const fn data() -> Self {
        Self {
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Non-writable, non-enumerable, non-configurable
    pub const fn frozen() -> Self {
        Self {
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Non-enumerable but otherwise open (the shape of "hidden" fields)
    pub const fn hidden() -> Self {
        Self {
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }
}

/// Property descriptor
#[derive(Clone, Debug)]
pub enum Property {
    /// Data property
    Data {
        /// The value
        value: Value,
        /// Attributes
        attributes: PropertyAttributes,
    },
    /// Accessor property
    Accessor {
        /// Getter function
        get: Option<Value>,
        /// Setter function
        set: Option<Value>,
        /// Attributes (`writable` is ignored)
        attributes: PropertyAttributes,
    },
}

impl Property {
    /// Create a data property with default attributes
    pub fn data(value: impl Into<Value>) -> Self {
        Self::Data {
            value: value.into(),
            attributes: PropertyAttributes::data(),
        }
    }

    /// Create a data property with specific attributes
    pub fn data_with_attrs(value: impl Into<Value>, attributes: PropertyAttributes) -> Self {
        Self::Data {
            value: value.into(),
            attributes,
        }
    }

    /// Create an enumerable, configurable accessor property
    pub fn accessor(get: Option<Value>, set: Option<Value>) -> Self {
        Self::Accessor {
            get,
            set,
            attributes: PropertyAttributes::data(),
        }
    }

    /// Get the attributes
    pub fn attributes(&self) -> PropertyAttributes {
        match self {
            Self::Data { attributes, .. } | Self::Accessor { attributes, .. } => *attributes,
        }
    }

    /// Get the value (for data properties)
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Data { value, .. } => Some(value),
            Self::Accessor { .. } => None,
        }
    }

    /// Check if this is an accessor property
    pub fn is_accessor(&self) -> bool {
        matches!(self, Self::Accessor { .. })
    }

    /// Check if enumerable
    pub fn is_enumerable(&self) -> bool {
        self.attributes().enumerable
    }

    /// Check if configurable
    pub fn is_configurable(&self) -> bool {
        self.attributes().configurable
    }

    /// Check if writable
    pub fn is_writable(&self) -> bool {
        match self {
            Self::Data { attributes, .. } => attributes.writable,
            Self::Accessor { .. } => false,
        }
    }

    /// Whether `other` could replace `self` on a non-configurable slot.
    ///
    /// Only a writable data property may change its value (and drop
    /// writability); everything else must be identical.
    pub(crate) fn allows_redefinition(&self, other: &Property) -> bool {
        match (self, other) {
            (
                Self::Data {
                    value: old,
                    attributes: a,
                },
                Self::Data {
                    value: new,
                    attributes: b,
                },
            ) => {
                if a.enumerable != b.enumerable || b.configurable {
                    return false;
                }
                if a.writable {
                    true
                } else {
                    !b.writable && old.same_value(new)
                }
            }
            (
                Self::Accessor {
                    get: g1,
                    set: s1,
                    attributes: a,
                },
                Self::Accessor {
                    get: g2,
                    set: s2,
                    attributes: b,
                },
            ) => {
                a.enumerable == b.enumerable
                    && !b.configurable
                    && same_slot(g1, g2)
                    && same_slot(s1, s2)
            }
            _ => false,
        }
    }
}

fn same_slot(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => x.same_value(y),
        _ => false,
    }
}
