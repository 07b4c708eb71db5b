//! Semantic analysis: turns the raw syntax tree into a bound tree.
//!
//! - `bound_tree`: typed, name-resolved statements and expressions
//! - `operators`: the static unary and binary operator tables
//! - `conversion`: conversion classification between types
//! - `binder`: the `Binder`, `bind_global_scope` and `bind_program`
//! - `printer`: text rendering of bound trees
//!
//! Problems are reported into a `DiagnosticBag`; binding always continues
//! with a substitute node so one pass surfaces every independent error.

pub mod binder;
pub mod bound_tree;
pub mod conversion;
pub mod operators;
pub mod printer;

#[cfg(test)]
mod tests;
