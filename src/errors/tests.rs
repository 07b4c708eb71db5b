//! Unit tests for error handling.
//!
//! This module contains tests for front-end errors and diagnostic bags.

use crate::errors::diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind};
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::{Position, Span};
use std::rc::Rc;

fn span(start: u32, end: u32) -> Span {
    let file = Rc::new("test.lang".to_string());
    Span {
        start: Position(start, file.clone()),
        end: Position(end, file),
    }
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(10, Rc::new("test.lang".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_error_position() {
    let pos = Position(42, Rc::new("test.lang".to_string()));
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position(), &pos);
}

#[test]
fn test_unexpected_token_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        Position(0, Rc::new("test.lang".to_string())),
    );

    assert_eq!(error.get_error_name(), "UnexpectedToken");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("did you miss a semicolon?")),
        ErrorTip::None => panic!("expected a suggestion"),
    }
}

#[test]
fn test_unrecognised_token_has_no_tip() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        Position(0, Rc::new("test.lang".to_string())),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_to_diagnostic() {
    let error = Error::new(
        ErrorImpl::NumberParseError {
            token: "99999999999".to_string(),
        },
        Position(7, Rc::new("test.lang".to_string())),
    );

    let diagnostic = error.to_diagnostic();
    assert_eq!(diagnostic.span.start.0, 7);
    assert_eq!(diagnostic.span.length(), 0);
    assert!(matches!(diagnostic.kind, DiagnosticKind::Syntax { .. }));
    assert!(diagnostic.message().contains("99999999999"));
}

#[test]
fn test_diagnostic_messages() {
    let kind = DiagnosticKind::UndefinedBinaryOperator {
        operator: "+".to_string(),
        left: "boolean".to_string(),
        right: "int".to_string(),
    };
    assert_eq!(
        kind.to_string(),
        "Binary operator '+' is not defined for types 'boolean' and 'int'."
    );

    let kind = DiagnosticKind::ReadOnlyAssignment {
        name: "a".to_string(),
    };
    assert_eq!(
        kind.to_string(),
        "Variable 'a' is read-only and cannot be assigned to."
    );

    let kind = DiagnosticKind::UndefinedVariable {
        name: "x".to_string(),
    };
    assert_eq!(kind.to_string(), "Variable 'x' doesn't exist.");
}

#[test]
fn test_diagnostic_bag_preserves_order() {
    let mut first = DiagnosticBag::new();
    first.report(
        span(0, 1),
        DiagnosticKind::UndefinedVariable {
            name: "a".to_string(),
        },
    );

    let mut second = DiagnosticBag::new();
    second.report(span(5, 6), DiagnosticKind::ExpressionMustHaveValue);
    second.report(span(8, 9), DiagnosticKind::AllPathsMustReturn);

    first.extend(second);

    assert_eq!(first.len(), 3);
    let starts: Vec<u32> = first.iter().map(|d| d.span.start.0).collect();
    assert_eq!(starts, vec![0, 5, 8]);

    let kinds: Vec<DiagnosticKind> = first.into_iter().map(|d| d.kind).collect();
    assert_eq!(kinds[2], DiagnosticKind::AllPathsMustReturn);
}

#[test]
fn test_empty_diagnostic_bag() {
    let bag = DiagnosticBag::default();
    assert!(bag.is_empty());
    assert_eq!(bag.len(), 0);
    assert!(bag.into_vec().is_empty());
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic::new(span(3, 4), DiagnosticKind::InvalidReturn);
    assert_eq!(
        diagnostic.to_string(),
        "test.lang:3: The 'return' keyword can only be used inside of functions."
    );
}
