use crate::{lexer::tokens::Token, Span};

use super::ast::Expr;

// LITERALS

/// Number Expression
/// Represents an integer literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: i32,
    pub span: Span,
}

/// String Expression
/// Represents a string literal in the AST, escapes already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

/// Boolean Expression
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

/// Symbol Expression
/// A bare identifier, either a variable reference or the callee of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COMPLEX

/// Binary Expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Prefix Expression
/// Unary operators: `!`, `-`, `+` and `~`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// Assignment Expression
///
/// `operator` is either `=` or one of the compound assignment tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub assignee: SymbolExpr,
    pub operator: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Call Expression
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: SymbolExpr,
    pub arguments: Vec<Expr>,
    pub span: Span,
}
