//! Clone configuration

use std::fmt;
use std::sync::Arc;

use crate::clone::{TransformAbort, Transformed};
use crate::error::{CloneError, Result};
use crate::path::Path;
use crate::value::{Class, ObjectRef, Value};

/// Transform hook: `(value, path) -> Transformed`, or abort the whole call
pub type TransformFn =
    Arc<dyn Fn(&Value, &Path) -> std::result::Result<Transformed, TransformAbort> + Send + Sync>;

/// Custom function factory: builds the clone of a function object
pub type FunctionFactory =
    Arc<dyn Fn(&ObjectRef, &Path) -> std::result::Result<Value, String> + Send + Sync>;

/// How callables are cloned
#[derive(Clone, Default)]
pub enum FunctionStrategy {
    /// Share the function object (the clone holds the same reference)
    #[default]
    KeepReference,
    /// New function object over the same native body, own properties cloned
    DeepCopy,
    /// Caller-supplied factory
    Custom(FunctionFactory),
}

impl fmt::Debug for FunctionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionStrategy::KeepReference => write!(f, "KeepReference"),
            FunctionStrategy::DeepCopy => write!(f, "DeepCopy"),
            FunctionStrategy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// How accessor properties are cloned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessorMode {
    /// Copy the getter/setter pair; the clone keeps computing live
    #[default]
    Preserve,
    /// Run the getter once and store the result as a data property
    Snapshot,
}

/// Configuration for one clone call.
///
/// # Example
///
/// ```
/// use doppel::{CloneOptions, FunctionStrategy};
///
/// let options = CloneOptions::new()
///     .extended_fidelity(true)
///     .clone_function(FunctionStrategy::DeepCopy);
/// assert!(options.extended_fidelity);
/// assert!(!options.immutable);
/// ```
#[derive(Clone, Default)]
pub struct CloneOptions {
    /// Wrap the result in a copy-on-write facade
    pub immutable: bool,

    /// Classes whose instances are shared instead of cloned
    pub atomic_constructors: Vec<Class>,

    /// Hook run at every node before default cloning
    pub transform: Option<TransformFn>,

    /// Treat a hook that returns its input unchanged as `Continue`
    pub unchanged_continues: bool,

    /// Strategy for callables
    pub clone_function: FunctionStrategy,

    /// Also copy non-enumerable and symbol-keyed properties
    pub extended_fidelity: bool,

    /// Strategy for accessor properties
    pub accessors: AccessorMode,

    /// Share unsupported values by reference (with a warning) instead of failing
    pub lenient: bool,

    /// Depth past which values are shared; `Some(1)` is a shallow copy
    pub max_depth: Option<usize>,
}

impl CloneOptions {
    /// Create options with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the copy-on-write facade
    pub fn immutable(mut self, on: bool) -> Self {
        self.immutable = on;
        self
    }

    /// Share instances of `class` instead of cloning them
    pub fn atomic(mut self, class: &Class) -> Self {
        self.atomic_constructors.push(class.clone());
        self
    }

    /// Install a transform hook
    pub fn transform<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value, &Path) -> std::result::Result<Transformed, TransformAbort>
            + Send
            + Sync
            + 'static,
    {
        self.transform = Some(Arc::new(hook));
        self
    }

    /// Let the hook signal default cloning by returning its input
    pub fn unchanged_continues(mut self, on: bool) -> Self {
        self.unchanged_continues = on;
        self
    }

    /// Choose the function strategy
    pub fn clone_function(mut self, strategy: FunctionStrategy) -> Self {
        self.clone_function = strategy;
        self
    }

    /// Install a custom function factory
    pub fn function_factory<F>(self, factory: F) -> Self
    where
        F: Fn(&ObjectRef, &Path) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.clone_function(FunctionStrategy::Custom(Arc::new(factory)))
    }

    /// Include non-enumerable and symbol-keyed properties
    pub fn extended_fidelity(mut self, on: bool) -> Self {
        self.extended_fidelity = on;
        self
    }

    /// Choose the accessor strategy
    pub fn accessors(mut self, mode: AccessorMode) -> Self {
        self.accessors = mode;
        self
    }

    /// Share unsupported values instead of failing
    pub fn lenient(mut self, on: bool) -> Self {
        self.lenient = on;
        self
    }

    /// Limit the copy depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Check the options for contradictions.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(CloneError::InvalidOptions(
                "max_depth must be at least 1 (0 would not copy anything)".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether instances of `class` are shared by reference
    pub fn is_atomic(&self, class: &Class) -> bool {
        self.atomic_constructors.iter().any(|c| c.ptr_eq(class))
    }
}

impl fmt::Debug for CloneOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneOptions")
            .field("immutable", &self.immutable)
            .field("atomic_constructors", &self.atomic_constructors)
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .field("unchanged_continues", &self.unchanged_continues)
            .field("clone_function", &self.clone_function)
            .field("extended_fidelity", &self.extended_fidelity)
            .field("accessors", &self.accessors)
            .field("lenient", &self.lenient)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CloneOptions::default();
        assert!(!options.immutable);
        assert!(options.atomic_constructors.is_empty());
        assert!(options.transform.is_none());
        assert!(!options.unchanged_continues);
        assert!(matches!(options.clone_function, FunctionStrategy::KeepReference));
        assert!(!options.extended_fidelity);
        assert_eq!(options.accessors, AccessorMode::Preserve);
        assert!(!options.lenient);
        assert_eq!(options.max_depth, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let options = CloneOptions::new().max_depth(0);
        assert!(matches!(options.validate(), Err(CloneError::InvalidOptions(_))));
    }

    #[test]
    fn test_atomic_is_exact_class() {
        let base = Class::new("Base");
        let derived = Class::extends("Derived", &base);
        let options = CloneOptions::new().atomic(&base);
        assert!(options.is_atomic(&base));
        assert!(!options.is_atomic(&derived));
    }

    #[test]
    fn test_debug_hides_closures() {
        let options = CloneOptions::new().transform(|_, _| Ok(Transformed::Continue));
        let text = format!("{:?}", options);
        assert!(text.contains("transform: Some(\"..\")"));
    }
}
