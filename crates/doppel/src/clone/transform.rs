//! Transform hook dispatch

use crate::error::{CloneError, Result};
use crate::options::TransformFn;
use crate::path::Path;
use crate::value::Value;

/// Outcome of a transform hook for one node
#[derive(Debug, Clone)]
pub enum Transformed {
    /// No override: clone the node the default way
    Continue,
    /// Use this value as the node's clone
    Replace(Value),
}

/// Signal raised by a hook to abort the whole clone call
#[derive(Debug, Clone)]
pub struct TransformAbort {
    /// Caller-defined payload, surfaced in `CloneError::Transform`
    pub payload: Value,
}

impl TransformAbort {
    /// Abort with a payload
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

/// Run the hook at `path`, turning an abort into a clone error.
///
/// With `unchanged_continues`, a replacement that is the input itself
/// (SameValue for primitives, identity for objects) means `Continue`.
pub(crate) fn apply(
    hook: &TransformFn,
    value: &Value,
    path: &Path,
    unchanged_continues: bool,
) -> Result<Transformed> {
    let outcome = hook(value, path).map_err(|abort| CloneError::Transform {
        path: path.clone(),
        payload: abort.payload,
    })?;
    match outcome {
        Transformed::Replace(replacement)
            if unchanged_continues && replacement.same_value(value) =>
        {
            Ok(Transformed::Continue)
        }
        other => Ok(other),
    }
}
