//! Symbol model and name resolution.
//!
//! - `symbols`: type, variable, function and label descriptors, and the
//!   `SymbolTable` arena that hands out their handles
//! - `scope`: the parent-linked `Scope` chain used by the binder

pub mod scope;
pub mod symbols;

#[cfg(test)]
mod tests;
