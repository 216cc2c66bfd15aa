//! Error types for the object model and the clone engine

use thiserror::Error;

use crate::path::Path;
use crate::value::{ObjectKind, Value};

/// Errors raised by object-model operations (descriptor rules, slots, calls)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectError {
    /// Redefinition or deletion of a non-configurable property
    #[error("Cannot redefine non-configurable property '{key}'")]
    NonConfigurable {
        /// Offending key
        key: String,
    },

    /// New property on a non-extensible object
    #[error("Cannot add property '{key}': object is not extensible")]
    NotExtensible {
        /// Offending key
        key: String,
    },

    /// Assignment to a non-writable property or a getter-only accessor
    #[error("Cannot assign to read-only property '{key}'")]
    ReadOnly {
        /// Offending key
        key: String,
    },

    /// A getter or setter failed
    #[error("Accessor for '{key}' failed: {message}")]
    Accessor {
        /// Property whose accessor ran
        key: String,
        /// Failure reported by the accessor
        message: String,
    },

    /// Call of something that is not a function
    #[error("{0} is not a function")]
    NotCallable(String),

    /// A native function reported an error
    #[error("{name} threw: {message}")]
    Thrown {
        /// Function name
        name: String,
        /// Failure message
        message: String,
    },

    /// Type mismatch error
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected kind
        expected: String,
        /// Actual kind received
        got: String,
    },

    /// Out-of-range or misaligned buffer view
    #[error("Invalid view: {0}")]
    InvalidView(String),
}

impl ObjectError {
    pub(crate) fn type_error(expected: &str, got: &str) -> Self {
        ObjectError::TypeError {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

/// Errors surfaced by a clone call. A failed call never yields a partial clone.
#[derive(Error, Debug)]
pub enum CloneError {
    /// The object model rejected a descriptor or prototype operation
    #[error("Structural clone error at '{path}': {cause}")]
    Structural {
        /// Where the failure happened
        path: Path,
        /// What the object model reported
        #[source]
        cause: ObjectError,
    },

    /// The transform hook aborted the call
    #[error("Transform aborted at '{path}': {payload:?}")]
    Transform {
        /// Node being transformed
        path: Path,
        /// Payload supplied by the hook
        payload: Value,
    },

    /// A reference value matched no recognized kind
    #[error("Unsupported type at '{path}': {type_name}")]
    Unsupported {
        /// Where the value was found
        path: Path,
        /// Runtime type name of the value
        type_name: String,
    },

    /// A custom function factory failed
    #[error("Function factory failed at '{path}': {message}")]
    FunctionFactory {
        /// Where the function was found
        path: Path,
        /// Failure reported by the factory
        message: String,
    },

    /// Options failed validation
    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl CloneError {
    /// The path the error is attached to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            CloneError::Structural { path, .. }
            | CloneError::Transform { path, .. }
            | CloneError::Unsupported { path, .. }
            | CloneError::FunctionFactory { path, .. } => Some(path),
            CloneError::InvalidOptions(_) => None,
        }
    }
}

/// Result type alias for clone operations
pub type Result<T> = std::result::Result<T, CloneError>;

/// Runtime type name of a value, for diagnostics.
///
/// Primitives report their `typeof` name; objects report their fundamental
/// kind, except host objects which report their own type name.
pub fn type_name(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Symbol(_) => "symbol".to_string(),
        Value::Object(obj) => match &obj.read().kind {
            ObjectKind::Host(handle) => handle.type_name().to_string(),
            kind => kind.name().to_string(),
        },
    }
}
