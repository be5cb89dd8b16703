//! State Module - The managed state tree and typed access to it
//!
//! - **Value** - Persistent tree of [`Value`]s rooted at a [`StateMap`]
//! - **Convert** - [`StateValue`], the typed view of stored values
//! - **Var** - [`StateVar`] and [`StateSubTreeVar`], path-bound accessors

pub mod convert;
mod value;
mod var;

pub use convert::StateValue;
pub use value::{join_path, StateMap, Value};
pub use var::{StateSubTreeVar, StateVar};
