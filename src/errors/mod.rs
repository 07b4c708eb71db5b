//! Error types and error handling for the compiler.
//!
//! This module defines the two error channels used throughout the
//! compilation process:
//!
//! - Front-end errors (`Error`) carrying a source position, raised by the
//!   lexer and parser at the first problem
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`) accumulated by the binder
//!   so one submission reports every independent problem

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
