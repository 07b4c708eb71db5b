//! Lowering: rewrites structured control flow into labels and jumps.
//!
//! - `rewriter`: the `BoundTreeRewriter` trait, a by-value tree rebuild
//! - `lowerer`: the `Lowerer`, which desugars `if`, loops and compound
//!   assignment and flattens the result into one statement list

pub mod lowerer;
pub mod rewriter;

#[cfg(test)]
mod tests;
