use std::rc::Rc;

use crate::{
    ast::statements::BlockStmt,
    errors::diagnostics::DiagnosticKind,
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::symbols::{SymbolTable, TypeSymbol, VariableKind},
};

use super::{
    binder::{bind_global_scope, bind_program, BinderOptions, BoundGlobalScope, BoundProgram},
    bound_tree::{BoundExpr, BoundStmt},
    conversion::Conversion,
    operators::{BoundBinaryOperator, BoundUnaryOperator},
};

fn parse_source(source: &str) -> BlockStmt {
    let tokens = tokenize(source.to_string(), Some("test.sc".to_string())).unwrap();
    let (_, block) = parse(tokens, Rc::new("test.sc".to_string()));
    block.unwrap()
}

fn bind_with(source: &str, options: BinderOptions) -> (BoundGlobalScope, BoundProgram, SymbolTable) {
    let syntax = parse_source(source);
    let mut symbols = SymbolTable::new();
    let global = bind_global_scope(None, &mut symbols, options, &syntax);
    let program = bind_program(None, &global, &mut symbols, options);
    (global, program, symbols)
}

fn diagnostics_with(source: &str, options: BinderOptions) -> Vec<DiagnosticKind> {
    let (_, program, _) = bind_with(source, options);
    program.diagnostics.iter().map(|d| d.kind.clone()).collect()
}

fn diagnostics(source: &str) -> Vec<DiagnosticKind> {
    diagnostics_with(source, BinderOptions::default())
}

fn sample(ty: TypeSymbol) -> &'static str {
    match ty {
        TypeSymbol::Int => "1",
        TypeSymbol::Boolean => "true",
        TypeSymbol::String => "\"s\"",
        TypeSymbol::Any => "any(1)",
        _ => unreachable!(),
    }
}

const OPERAND_TYPES: [TypeSymbol; 4] = [
    TypeSymbol::Int,
    TypeSymbol::Boolean,
    TypeSymbol::String,
    TypeSymbol::Any,
];

#[test]
fn test_reassigning_a_variable() {
    assert!(diagnostics("var a = 10; a = 20;").is_empty());
}

#[test]
fn test_read_only_assignment() {
    assert_eq!(
        diagnostics("let a = 10; a = 20;"),
        vec![DiagnosticKind::ReadOnlyAssignment { name: "a".to_string() }]
    );
}

#[test]
fn test_undefined_binary_operator() {
    let found = diagnostics("true + 1");
    assert_eq!(
        found,
        vec![DiagnosticKind::UndefinedBinaryOperator {
            operator: "+".to_string(),
            left: "boolean".to_string(),
            right: "int".to_string(),
        }]
    );
    assert_eq!(
        found[0].to_string(),
        "Binary operator '+' is not defined for types 'boolean' and 'int'."
    );
}

#[test]
fn test_failed_operator_keeps_left_operand() {
    let (global, _, _) = bind_with("true + 1", BinderOptions::default());

    match &global.statement.statements[0] {
        BoundStmt::Expression(expression) => assert_eq!(expression.ty(), TypeSymbol::Boolean),
        other => panic!("expected expression statement, got {:?}", other),
    }
}

#[test]
fn test_failed_operator_is_reported_once() {
    let binary = DiagnosticKind::UndefinedBinaryOperator {
        operator: "+".to_string(),
        left: "boolean".to_string(),
        right: "int".to_string(),
    };
    let unary = DiagnosticKind::UndefinedUnaryOperator {
        operator: "-".to_string(),
        operand: "string".to_string(),
    };

    assert_eq!(diagnostics("(true + 1) + 1"), vec![binary.clone()]);
    assert_eq!(diagnostics("1 + (true + 1) * 2 == 3"), vec![binary.clone()]);
    assert_eq!(diagnostics("-\"a\" + 1"), vec![unary.clone()]);
    assert_eq!(diagnostics("-(-\"a\")"), vec![unary.clone()]);

    // Conversions, calls and assignments that consume the stand-in stay quiet
    assert_eq!(diagnostics("var i: int = true + 1;"), vec![binary.clone()]);
    assert_eq!(diagnostics("print(true + 1);"), vec![binary.clone()]);
    assert_eq!(diagnostics("int(true + 1)"), vec![binary.clone()]);
    assert_eq!(diagnostics("while -\"x\" { }"), vec![unary.clone()]);
    assert_eq!(diagnostics("var n = 1; n += -\"a\";"), vec![unary.clone()]);
    assert_eq!(diagnostics("var n = 1; n = true + 1;"), vec![binary.clone()]);
    assert_eq!(
        diagnostics("fn f() -> int { return true + 1; }"),
        vec![binary]
    );
}

#[test]
fn test_errors_are_not_reported_twice() {
    assert_eq!(
        diagnostics("undefined + 1"),
        vec![DiagnosticKind::UndefinedVariable { name: "undefined".to_string() }]
    );
    assert_eq!(
        diagnostics("var x = -(undefined * 2) == 3; x = !x;").len(),
        1
    );
    assert_eq!(diagnostics("print(missing)").len(), 1);
}

#[test]
fn test_nested_scope_shadows() {
    let (global, program, symbols) =
        bind_with("var x = 1; { var x = true; x = false; }", BinderOptions::default());
    assert!(program.diagnostics.is_empty());

    let outer = match &global.statement.statements[0] {
        BoundStmt::VarDecl(decl) => decl.variable,
        other => panic!("expected declaration, got {:?}", other),
    };
    let BoundStmt::Block(block) = &global.statement.statements[1] else {
        panic!("expected block");
    };
    let assigned = match &block.statements[1] {
        BoundStmt::Expression(BoundExpr::Assignment { variable, .. }) => *variable,
        other => panic!("expected assignment, got {:?}", other),
    };

    assert_ne!(outer, assigned);
    assert_eq!(symbols.variable(assigned).ty, TypeSymbol::Boolean);
}

#[test]
fn test_duplicate_declaration_in_same_block() {
    assert_eq!(
        diagnostics("var x = 1; var x = 2;"),
        vec![DiagnosticKind::VariableAlreadyDeclared { name: "x".to_string() }]
    );
    assert!(diagnostics("var x = 1; { var x = 2; }").is_empty());
}

#[test]
fn test_every_listed_binary_operator_binds() {
    for operator in BoundBinaryOperator::all() {
        let source = format!(
            "{} {} {}",
            sample(operator.left_type),
            operator.token,
            sample(operator.right_type)
        );
        assert!(diagnostics(&source).is_empty(), "{}", source);
    }
}

#[test]
fn test_every_unlisted_binary_operator_reports_once() {
    let mut tokens: Vec<_> = BoundBinaryOperator::all().iter().map(|op| op.token).collect();
    tokens.dedup();

    for token in tokens {
        for left in OPERAND_TYPES {
            for right in OPERAND_TYPES {
                if BoundBinaryOperator::bind(token, left, right).is_some() {
                    continue;
                }

                let source = format!("{} {} {}", sample(left), token, sample(right));
                let found = diagnostics(&source);
                assert_eq!(found.len(), 1, "{}", source);
                assert!(
                    matches!(found[0], DiagnosticKind::UndefinedBinaryOperator { .. }),
                    "{}",
                    source
                );
            }
        }
    }
}

#[test]
fn test_unary_operator_table() {
    for operand in OPERAND_TYPES {
        for operator in BoundUnaryOperator::all() {
            let source = format!("{}{}", operator.token, sample(operand));
            let found = diagnostics(&source);

            if BoundUnaryOperator::bind(operator.token, operand).is_some() {
                assert!(found.is_empty(), "{}", source);
            } else {
                assert_eq!(found.len(), 1, "{}", source);
                assert!(matches!(found[0], DiagnosticKind::UndefinedUnaryOperator { .. }));
            }
        }
    }
}

#[test]
fn test_implicit_declaration_can_be_disabled() {
    let (global, program, symbols) = bind_with("x = 5;", BinderOptions::default());
    assert!(program.diagnostics.is_empty());
    assert_eq!(global.variables.len(), 1);
    assert_eq!(symbols.variable(global.variables[0]).kind, VariableKind::Global);

    let strict = BinderOptions {
        implicit_declarations: false,
        ..BinderOptions::default()
    };
    assert_eq!(
        diagnostics_with("x = 5;", strict),
        vec![DiagnosticKind::UndefinedVariable { name: "x".to_string() }]
    );
}

#[test]
fn test_compound_assignment() {
    assert!(diagnostics("var x = 1; x += 2; x ^= 3;").is_empty());
    assert_eq!(
        diagnostics("y += 1;"),
        vec![DiagnosticKind::UndefinedVariable { name: "y".to_string() }]
    );
    assert_eq!(
        diagnostics("var s = \"a\"; s -= 1;"),
        vec![DiagnosticKind::UndefinedBinaryOperator {
            operator: "-".to_string(),
            left: "string".to_string(),
            right: "int".to_string(),
        }]
    );
}

#[test]
fn test_break_and_continue_outside_loop() {
    assert_eq!(
        diagnostics("break;"),
        vec![DiagnosticKind::InvalidBreakOrContinue { keyword: "break".to_string() }]
    );
    assert_eq!(
        diagnostics("continue;"),
        vec![DiagnosticKind::InvalidBreakOrContinue { keyword: "continue".to_string() }]
    );
    assert!(diagnostics("while true { break; }").is_empty());
}

#[test]
fn test_return_misuse() {
    assert_eq!(diagnostics("return 1;"), vec![DiagnosticKind::InvalidReturn]);
    assert_eq!(
        diagnostics("fn f() { return 1; }"),
        vec![DiagnosticKind::InvalidReturnExpression { function: "f".to_string() }]
    );
    assert_eq!(
        diagnostics("fn g() -> int { return; }"),
        vec![DiagnosticKind::MissingReturnExpression { ty: "int".to_string() }]
    );
    assert!(diagnostics("fn h() -> any { return 1; }").is_empty());
}

#[test]
fn test_function_declarations() {
    assert_eq!(
        diagnostics("fn f() {} fn f() {}"),
        vec![DiagnosticKind::FunctionAlreadyDeclared { signature: "f()".to_string() }]
    );
    assert!(diagnostics("fn f() {} fn f(x: int) {}").is_empty());
    assert_eq!(
        diagnostics("fn f(a: int, a: int) {}"),
        vec![DiagnosticKind::ParameterAlreadyDeclared { name: "a".to_string() }]
    );
    assert_eq!(diagnostics("{ fn g() {} }"), vec![DiagnosticKind::FunctionNotGlobal]);
}

#[test]
fn test_parameters_are_read_only() {
    assert_eq!(
        diagnostics("fn f(a: int) { a = 2; }"),
        vec![DiagnosticKind::ReadOnlyAssignment { name: "a".to_string() }]
    );
}

#[test]
fn test_calls_match_exact_signature() {
    assert!(diagnostics("print(\"hello\")").is_empty());
    assert_eq!(
        diagnostics("print(1)"),
        vec![DiagnosticKind::UndefinedFunction { signature: "print(int)".to_string() }]
    );
    assert_eq!(
        diagnostics("foo(1, true)"),
        vec![DiagnosticKind::UndefinedFunction { signature: "foo(int, boolean)".to_string() }]
    );
}

#[test]
fn test_conversions() {
    assert!(diagnostics("var a: any = 1; var s: string = string(a);").is_empty());
    assert_eq!(
        diagnostics("var s: string = 1;"),
        vec![DiagnosticKind::CannotConvertImplicitly {
            from: "int".to_string(),
            to: "string".to_string(),
        }]
    );
    assert_eq!(
        diagnostics("var b: bool = 1;"),
        vec![DiagnosticKind::CannotConvert {
            from: "int".to_string(),
            to: "boolean".to_string(),
        }]
    );
    assert_eq!(
        diagnostics("var x: float = 1;"),
        vec![DiagnosticKind::UndefinedType { name: "float".to_string() }]
    );
}

#[test]
fn test_conversion_classification() {
    assert_eq!(Conversion::classify(TypeSymbol::Int, TypeSymbol::Int), Conversion::Identity);
    assert_eq!(Conversion::classify(TypeSymbol::Int, TypeSymbol::Any), Conversion::Implicit);
    assert_eq!(Conversion::classify(TypeSymbol::Any, TypeSymbol::Int), Conversion::Explicit);
    assert_eq!(Conversion::classify(TypeSymbol::String, TypeSymbol::Int), Conversion::Explicit);
    assert_eq!(Conversion::classify(TypeSymbol::Int, TypeSymbol::Boolean), Conversion::None);
}

#[test]
fn test_expression_statements_in_functions() {
    assert_eq!(
        diagnostics("fn f() { 1 + 2; }"),
        vec![DiagnosticKind::InvalidExpressionStatement]
    );
    assert!(diagnostics("1 + 2").is_empty());
    assert_eq!(
        diagnostics("var x = print(\"a\");"),
        vec![DiagnosticKind::ExpressionMustHaveValue]
    );
}

#[test]
fn test_not_all_paths_return() {
    assert_eq!(
        diagnostics("fn f(c: bool) -> int { if c { return 1; } }"),
        vec![DiagnosticKind::AllPathsMustReturn]
    );
    assert!(diagnostics("fn f(c: bool) -> int { if c { return 1; } else { return 0; } }").is_empty());
}

#[test]
fn test_nesting_limit_reports_once() {
    let options = BinderOptions {
        max_depth: 8,
        ..BinderOptions::default()
    };
    let source = format!("{}1", "- ".repeat(20));

    assert_eq!(
        diagnostics_with(&source, options),
        vec![DiagnosticKind::NestingTooDeep { limit: 8 }]
    );
    assert!(diagnostics(&source).is_empty());
}

#[test]
fn test_diagnostics_are_deterministic() {
    let source = "let a = 1; a = 2; true + 1; b += 3;";
    let first = diagnostics(source);
    let second = diagnostics(source);

    assert_eq!(first, second);
    assert!(matches!(first[0], DiagnosticKind::ReadOnlyAssignment { .. }));
    assert!(matches!(first[1], DiagnosticKind::UndefinedBinaryOperator { .. }));
    assert!(matches!(first[2], DiagnosticKind::UndefinedVariable { .. }));
}

#[test]
fn test_later_submission_sees_earlier_globals() {
    let mut symbols = SymbolTable::new();
    let options = BinderOptions::default();

    let first = bind_global_scope(None, &mut symbols, options, &parse_source("var x = 1; fn double(n: int) -> int { return n * 2; }"));
    assert!(first.diagnostics.is_empty());
    let first = Rc::new(first);

    let second = bind_global_scope(Some(first.clone()), &mut symbols, options, &parse_source("double(x) + 1"));
    assert!(second.diagnostics.is_empty());

    let third = bind_global_scope(Some(first), &mut symbols, options, &parse_source("var x = true; x"));
    assert!(third.diagnostics.is_empty());
}
