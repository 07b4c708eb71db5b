//! Static operator tables.
//!
//! Resolution is a linear scan for an exact match on the operator token and
//! operand types. No coercion is attempted, so `any` only supports the
//! operators listed for it explicitly.

use crate::{lexer::tokens::TokenKind, symbols::symbols::TypeSymbol};

use self::{BoundBinaryOperatorKind as B, BoundUnaryOperatorKind as U};
use TypeSymbol as T;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundUnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub token: TokenKind,
    pub kind: BoundUnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundUnaryOperator {
    const fn new(
        token: TokenKind,
        kind: BoundUnaryOperatorKind,
        operand_type: TypeSymbol,
        result_type: TypeSymbol,
    ) -> Self {
        BoundUnaryOperator {
            token,
            kind,
            operand_type,
            result_type,
        }
    }

    pub fn bind(token: TokenKind, operand_type: TypeSymbol) -> Option<BoundUnaryOperator> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.token == token && op.operand_type == operand_type)
            .copied()
    }

    pub fn all() -> &'static [BoundUnaryOperator] {
        &UNARY_OPERATORS
    }
}

#[rustfmt::skip]
static UNARY_OPERATORS: [BoundUnaryOperator; 4] = [
    BoundUnaryOperator::new(TokenKind::Not, U::LogicalNegation, T::Boolean, T::Boolean),
    BoundUnaryOperator::new(TokenKind::Plus, U::Identity, T::Int, T::Int),
    BoundUnaryOperator::new(TokenKind::Dash, U::Negation, T::Int, T::Int),
    BoundUnaryOperator::new(TokenKind::Tilde, U::OnesComplement, T::Int, T::Int),
];

/// `!` on booleans, used when the lowerer or CFG builder negates a condition.
pub const LOGICAL_NEGATION: BoundUnaryOperator = BoundUnaryOperator::new(
    TokenKind::Not,
    BoundUnaryOperatorKind::LogicalNegation,
    TypeSymbol::Boolean,
    TypeSymbol::Boolean,
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundBinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub token: TokenKind,
    pub kind: BoundBinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub result_type: TypeSymbol,
}

impl BoundBinaryOperator {
    const fn new(
        token: TokenKind,
        kind: BoundBinaryOperatorKind,
        operand_type: TypeSymbol,
        result_type: TypeSymbol,
    ) -> Self {
        BoundBinaryOperator {
            token,
            kind,
            left_type: operand_type,
            right_type: operand_type,
            result_type,
        }
    }

    pub fn bind(
        token: TokenKind,
        left_type: TypeSymbol,
        right_type: TypeSymbol,
    ) -> Option<BoundBinaryOperator> {
        BINARY_OPERATORS
            .iter()
            .find(|op| {
                op.token == token && op.left_type == left_type && op.right_type == right_type
            })
            .copied()
    }

    pub fn all() -> &'static [BoundBinaryOperator] {
        &BINARY_OPERATORS
    }
}

#[rustfmt::skip]
static BINARY_OPERATORS: [BoundBinaryOperator; 26] = [
    // int
    BoundBinaryOperator::new(TokenKind::Plus, B::Addition, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Dash, B::Subtraction, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Star, B::Multiplication, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Slash, B::Division, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Percent, B::Modulo, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Ampersand, B::BitwiseAnd, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Pipe, B::BitwiseOr, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Hat, B::BitwiseXor, T::Int, T::Int),
    BoundBinaryOperator::new(TokenKind::Equals, B::Equals, T::Int, T::Boolean),
    BoundBinaryOperator::new(TokenKind::NotEquals, B::NotEquals, T::Int, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Less, B::Less, T::Int, T::Boolean),
    BoundBinaryOperator::new(TokenKind::LessEquals, B::LessOrEquals, T::Int, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Greater, B::Greater, T::Int, T::Boolean),
    BoundBinaryOperator::new(TokenKind::GreaterEquals, B::GreaterOrEquals, T::Int, T::Boolean),
    // boolean
    BoundBinaryOperator::new(TokenKind::And, B::LogicalAnd, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Or, B::LogicalOr, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Ampersand, B::BitwiseAnd, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Pipe, B::BitwiseOr, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Hat, B::BitwiseXor, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::Equals, B::Equals, T::Boolean, T::Boolean),
    BoundBinaryOperator::new(TokenKind::NotEquals, B::NotEquals, T::Boolean, T::Boolean),
    // string
    BoundBinaryOperator::new(TokenKind::Plus, B::Addition, T::String, T::String),
    BoundBinaryOperator::new(TokenKind::Equals, B::Equals, T::String, T::Boolean),
    BoundBinaryOperator::new(TokenKind::NotEquals, B::NotEquals, T::String, T::Boolean),
    // any
    BoundBinaryOperator::new(TokenKind::Equals, B::Equals, T::Any, T::Boolean),
    BoundBinaryOperator::new(TokenKind::NotEquals, B::NotEquals, T::Any, T::Boolean),
];
