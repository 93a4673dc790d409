//! The operation catalogue (spec.md §4.4): one module per family of pure
//! behaviour. `engine::Op` wires these into the tagged-variant dispatcher;
//! the functions here know nothing about pipelines, modifiers, or named
//! sets.

pub mod extract;
pub mod filter;
pub mod listlevel;
pub mod transform;
