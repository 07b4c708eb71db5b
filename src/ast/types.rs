//! Type annotations as written in source.
//!
//! The parser only records the name; the binder resolves it to a
//! `TypeSymbol` and reports unknown names.

use crate::Span;

/// A `: type` or `-> type` annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeClause {
    pub name: String,
    pub span: Span,
}
