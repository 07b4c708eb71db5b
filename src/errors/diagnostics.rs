//! Diagnostics reported by the binder and the front end.
//!
//! Diagnostics are accumulated rather than returned as `Err`: a single
//! submission surfaces every independent problem in one pass, in the order
//! they were detected.

use std::{fmt::Display, slice::Iter, vec::IntoIter};

use thiserror::Error;

use crate::Span;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("{message}")]
    Syntax { message: String },
    #[error("Variable '{name}' doesn't exist.")]
    UndefinedVariable { name: String },
    #[error("Variable '{name}' is already declared.")]
    VariableAlreadyDeclared { name: String },
    #[error("Variable '{name}' is read-only and cannot be assigned to.")]
    ReadOnlyAssignment { name: String },
    #[error("Unary operator '{operator}' is not defined for type '{operand}'.")]
    UndefinedUnaryOperator { operator: String, operand: String },
    #[error("Binary operator '{operator}' is not defined for types '{left}' and '{right}'.")]
    UndefinedBinaryOperator {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Function '{signature}' doesn't exist.")]
    UndefinedFunction { signature: String },
    #[error("Function '{signature}' is already declared.")]
    FunctionAlreadyDeclared { signature: String },
    #[error("A parameter with the name '{name}' already exists.")]
    ParameterAlreadyDeclared { name: String },
    #[error("Type '{name}' doesn't exist.")]
    UndefinedType { name: String },
    #[error("Cannot convert type '{from}' to '{to}'.")]
    CannotConvert { from: String, to: String },
    #[error("Cannot convert type '{from}' to '{to}'. An explicit conversion exists (are you missing a cast?)")]
    CannotConvertImplicitly { from: String, to: String },
    #[error("Expression must have a value.")]
    ExpressionMustHaveValue,
    #[error("The keyword '{keyword}' can only be used inside of loops.")]
    InvalidBreakOrContinue { keyword: String },
    #[error("The 'return' keyword can only be used inside of functions.")]
    InvalidReturn,
    #[error("Since the function '{function}' does not return a value the 'return' keyword cannot be followed by an expression.")]
    InvalidReturnExpression { function: String },
    #[error("An expression of type '{ty}' is expected.")]
    MissingReturnExpression { ty: String },
    #[error("Not all code paths return a value.")]
    AllPathsMustReturn,
    #[error("Only assignment and call expressions can be used as a statement.")]
    InvalidExpressionStatement,
    #[error("Functions can only be declared at the global level.")]
    FunctionNotGlobal,
    #[error("Nesting exceeds the maximum depth of {limit}.")]
    NestingTooDeep { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(span: Span, kind: DiagnosticKind) -> Self {
        Diagnostic { span, kind }
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.span.start.1, self.span.start.0, self.kind)
    }
}

/// Append-only, insertion-ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag { diagnostics: vec![] }
    }

    pub fn report(&mut self, span: Span, kind: DiagnosticKind) {
        log::trace!("diagnostic at {}: {}", span.start.0, kind);
        self.diagnostics.push(Diagnostic::new(span, kind));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Appends `other` after the diagnostics already in the bag.
    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn iter(&self) -> Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl IntoIterator for DiagnosticBag {
    type Item = Diagnostic;
    type IntoIter = IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
