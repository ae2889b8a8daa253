//! Built-in Forthic modules
//!
//! Groups the standard library modules that ship with the interpreter.

pub mod standard;
