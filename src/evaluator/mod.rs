//! Tree-walking evaluation of bound programs.
//!
//! - `value`: runtime values
//! - `host`: the `Host` trait behind `print`, `input` and `rnd`
//! - `evaluator`: the `Evaluator`, which runs both structured and lowered
//!   trees

pub mod evaluator;
pub mod host;
pub mod value;
