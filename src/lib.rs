//! Run annotated TypeScript code blocks through Deno.
//!
//! A block is a snippet plus a bag of parameters (bindings, permissions,
//! result type). [`execution::expand`] turns it into a script:
//! imports are lifted out with a grammar-aware [`script::split()`], bindings are
//! rendered as declarations, and the body is optionally wrapped so its value
//! is printed. [`execution::execute`] runs that script and hands the output to
//! [`decode::decode()`].

pub mod config;
pub mod decode;
pub mod error;
pub mod execution;
pub mod process;
pub mod script;

pub use error::{Error, Result};
