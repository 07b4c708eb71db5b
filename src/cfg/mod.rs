//! Control flow graph
//!
//! Builds the graph of a lowered body, used to check that a function
//! returns on every path and to render the program for debugging.

pub mod graph;

#[cfg(test)]
mod tests;
