//! Host Module - Bridging callables from a dynamically typed host.
//!
//! A scripting layer can inject callables into the state tree (for example a
//! key binding override). Components read state through typed
//! [`StateVar`](crate::state::StateVar)s, so when a state variable is declared
//! with a function type ([`Func`]) and the stored value is a host callable,
//! the read synthesizes a native function that:
//!
//! 1. encodes the native arguments as [`Value`]s,
//! 2. calls the host callable through the [`HostFrame`] (which annotates
//!    failures with a traceback entry),
//! 3. checks the number of outputs and decodes them back.
//!
//! All of this lives in the single generic bridge [`adapt`]; every
//! function-typed state variable goes through it.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use imtui::host::{adapt, HostFn, HostFrame, Func};
//! use imtui::state::Value;
//!
//! let double = HostFn::new("double", |args: Vec<Value>| match args.as_slice() {
//!     [Value::Int(i)] => Ok(vec![Value::Int(i * 2)]),
//!     _ => Err(imtui::HostError::failed("bad args")),
//! });
//! let f: Func<(i64,), i64> = adapt(Arc::new(double), HostFrame::new("example"));
//! assert_eq!(f.call((21,)).unwrap(), 42);
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ConvertError, HostError};
use crate::state::convert::{native, StateValue};
use crate::state::Value;

// =============================================================================
// Host callables
// =============================================================================

/// A callable supplied by the host.
pub trait HostCallable: Send + Sync {
    /// Name used in tracebacks and debug output.
    fn name(&self) -> &str;

    /// Call with positional arguments, returning all outputs.
    fn call(&self, frame: &HostFrame, args: Vec<Value>) -> Result<Vec<Value>, HostError>;
}

/// A host callable backed by a Rust closure. Useful for embedding and tests.
pub struct HostFn {
    name: String,
    f: Box<dyn Fn(Vec<Value>) -> Result<Vec<Value>, HostError> + Send + Sync>,
}

impl HostFn {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Vec<Value>, HostError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }

    /// Wrap into a state value.
    pub fn into_value(self) -> Value {
        Value::Host(Arc::new(self))
    }
}

impl HostCallable for HostFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, _: &HostFrame, args: Vec<Value>) -> Result<Vec<Value>, HostError> {
        (self.f)(args)
    }
}

impl fmt::Debug for HostFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFn").field("name", &self.name).finish()
    }
}

// =============================================================================
// Host frame
// =============================================================================

/// The host-side call context used when invoking host callables.
///
/// Failures crossing a frame are annotated with the frame's name and the
/// callable's name.
#[derive(Debug, Clone)]
pub struct HostFrame {
    name: Arc<str>,
}

impl Default for HostFrame {
    fn default() -> Self {
        Self::new("imtui")
    }
}

impl HostFrame {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Call a host callable, annotating failures with this call site.
    pub fn call(&self, callable: &dyn HostCallable, args: Vec<Value>) -> Result<Vec<Value>, HostError> {
        callable
            .call(self, args)
            .map_err(|err| err.at(format!("{} (called from {})", callable.name(), self.name)))
    }
}

// =============================================================================
// Native function type
// =============================================================================

/// Argument tuples a [`Func`] can be called with.
pub trait HostArgs: Send + 'static {
    fn into_values(self) -> Vec<Value>;
}

impl HostArgs for () {
    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

macro_rules! impl_host_args {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: StateValue),+> HostArgs for ($($name,)+) {
            fn into_values(self) -> Vec<Value> {
                vec![$(self.$idx.into_value()),+]
            }
        }
    };
}

impl_host_args!(A 0);
impl_host_args!(A 0, B 1);
impl_host_args!(A 0, B 1, C 2);

/// A native function stored in state: takes an argument tuple `A`, returns
/// `R` or the error of a failed host call.
pub struct Func<A, R> {
    f: Arc<dyn Fn(A) -> Result<R, HostError> + Send + Sync>,
    _marker: PhantomData<fn(A) -> R>,
}

impl<A, R> Clone for Func<A, R> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<A, R> fmt::Debug for Func<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Func")
    }
}

impl<A, R> Func<A, R> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) -> Result<R, HostError> + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            _marker: PhantomData,
        }
    }

    pub fn call(&self, args: A) -> Result<R, HostError> {
        (self.f)(args)
    }
}

/// Adapt a host callable into a native function of the requested shape.
///
/// Output arity and types are checked on every call; mismatches come back as
/// errors through the function's result.
pub fn adapt<A: HostArgs, R: StateValue>(callable: Arc<dyn HostCallable>, frame: HostFrame) -> Func<A, R> {
    Func::new(move |args: A| {
        let outputs = frame.call(callable.as_ref(), args.into_values())?;
        R::from_outputs(outputs, &frame).map_err(|err| err.at(format!("outputs of {}", callable.name())))
    })
}

impl<A: HostArgs, R: StateValue> StateValue for Func<A, R> {
    fn from_value(value: &Value, frame: &HostFrame) -> Result<Self, ConvertError> {
        match value {
            Value::Host(callable) => Ok(adapt(callable.clone(), frame.clone())),
            other => native(other, "fn"),
        }
    }

    fn into_value(self) -> Value {
        Value::native(self)
    }
}
