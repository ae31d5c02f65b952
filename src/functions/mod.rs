//! Functions to approximate.

pub mod builtins;
pub mod elementary;

pub use builtins::Builtin;
