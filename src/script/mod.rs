//! Snippet-to-script text pipeline: split, render bindings, assemble.

pub mod assemble;
pub mod literal;
pub mod names;
pub mod split;

pub use assemble::{assemble, Script};
pub use literal::{render, Binding, Scalar, Value, VariablePrefix};
pub use split::{split, Split};
