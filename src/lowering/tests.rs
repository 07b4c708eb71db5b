use std::rc::Rc;

use crate::{
    binder::{
        binder::{bind_global_scope, BinderOptions},
        bound_tree::{BoundBlockStmt, BoundExpr, BoundStmt},
        operators::BoundBinaryOperatorKind,
    },
    evaluator::value::Value,
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::symbols::{LabelSymbol, SymbolTable, TypeSymbol},
};

use super::lowerer::Lowerer;

fn lower_source(source: &str) -> BoundBlockStmt {
    let tokens = tokenize(source.to_string(), Some("test.sc".to_string())).unwrap();
    let (_, block) = parse(tokens, Rc::new("test.sc".to_string()));
    let block = block.unwrap();

    let mut symbols = SymbolTable::new();
    let global = bind_global_scope(None, &mut symbols, BinderOptions::default(), &block);
    assert!(global.diagnostics.is_empty(), "{:?}", global.diagnostics);

    Lowerer::lower(BoundStmt::Block(global.statement))
}

fn label(name: &str) -> LabelSymbol {
    LabelSymbol::new(name)
}

fn is_structured(stmt: &BoundStmt) -> bool {
    matches!(
        stmt,
        BoundStmt::Block(_)
            | BoundStmt::If(_)
            | BoundStmt::While(_)
            | BoundStmt::DoWhile(_)
            | BoundStmt::For(_)
    )
}

#[test]
fn test_nested_blocks_are_flattened_in_order() {
    let one = BoundStmt::Expression(BoundExpr::literal(Value::Integer(1)));
    let two = BoundStmt::Expression(BoundExpr::literal(Value::Integer(2)));
    let three = BoundStmt::Expression(BoundExpr::literal(Value::Integer(3)));

    let tree = BoundStmt::block(vec![
        BoundStmt::block(vec![one.clone(), BoundStmt::block(vec![two.clone()])]),
        three.clone(),
    ]);

    let lowered = Lowerer::lower(tree);
    assert_eq!(lowered.statements, vec![one, two, three]);
}

#[test]
fn test_while_lowering() {
    let lowered = lower_source("var x = 0; while x < 3 { x += 1; }");
    let statements = &lowered.statements;

    assert_eq!(statements.len(), 6);
    assert!(matches!(statements[0], BoundStmt::VarDecl(_)));
    assert_eq!(statements[1], BoundStmt::Label(label("continue1")));
    match &statements[2] {
        BoundStmt::ConditionalJumpTo(jump) => {
            assert_eq!(jump.label, label("break1"));
            assert!(!jump.jump_if_true);
        }
        other => panic!("expected conditional jump, got {:?}", other),
    }
    assert!(matches!(statements[3], BoundStmt::Expression(BoundExpr::Assignment { .. })));
    assert_eq!(statements[4], BoundStmt::JumpTo(label("continue1")));
    assert_eq!(statements[5], BoundStmt::Label(label("break1")));
}

#[test]
fn test_if_else_lowering() {
    let lowered = lower_source("var c = true; if c { c = false; } else { c = true; }");
    let statements = &lowered.statements;

    assert_eq!(statements.len(), 7);
    match &statements[1] {
        BoundStmt::ConditionalJumpTo(jump) => {
            assert_eq!(jump.label, label("Label1"));
            assert!(!jump.jump_if_true);
        }
        other => panic!("expected conditional jump, got {:?}", other),
    }
    assert_eq!(statements[3], BoundStmt::JumpTo(label("Label2")));
    assert_eq!(statements[4], BoundStmt::Label(label("Label1")));
    assert_eq!(statements[6], BoundStmt::Label(label("Label2")));
}

#[test]
fn test_constant_true_condition_drops_the_jump() {
    let lowered = lower_source("if true { print(\"a\"); }");
    let statements = &lowered.statements;

    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0], BoundStmt::Expression(BoundExpr::Call { .. })));
    assert_eq!(statements[1], BoundStmt::Label(label("Label1")));
}

#[test]
fn test_constant_false_condition_becomes_unconditional_jump() {
    let lowered = lower_source("if false { print(\"a\"); }");
    assert_eq!(lowered.statements[0], BoundStmt::JumpTo(label("Label1")));
}

#[test]
fn test_do_while_lowering() {
    let lowered = lower_source("var n = 0; do { n += 1; } while n < 3;");
    let statements = &lowered.statements;

    assert_eq!(statements.len(), 6);
    assert_eq!(statements[1], BoundStmt::Label(label("Label1")));
    assert_eq!(statements[3], BoundStmt::Label(label("continue1")));
    match &statements[4] {
        BoundStmt::ConditionalJumpTo(jump) => {
            assert_eq!(jump.label, label("Label1"));
            assert!(jump.jump_if_true);
        }
        other => panic!("expected conditional jump, got {:?}", other),
    }
    assert_eq!(statements[5], BoundStmt::Label(label("break1")));
}

#[test]
fn test_for_places_continue_before_increment() {
    let lowered = lower_source("for (var i = 0; i < 3; i += 1) { }");
    let statements = &lowered.statements;

    assert_eq!(statements.len(), 7);
    assert!(matches!(statements[0], BoundStmt::VarDecl(_)));
    assert_eq!(statements[1], BoundStmt::Label(label("Label1")));
    assert_eq!(statements[3], BoundStmt::Label(label("continue1")));
    assert!(matches!(statements[4], BoundStmt::Expression(BoundExpr::Assignment { .. })));
    assert_eq!(statements[5], BoundStmt::JumpTo(label("Label1")));
    assert_eq!(statements[6], BoundStmt::Label(label("break1")));
}

#[test]
fn test_compound_assignment_is_expanded() {
    let lowered = lower_source("var x = 1; x *= 5;");

    match &lowered.statements[1] {
        BoundStmt::Expression(BoundExpr::Assignment { value, ty, .. }) => {
            assert_eq!(*ty, TypeSymbol::Int);
            match value.as_ref() {
                BoundExpr::Binary { left, operator, .. } => {
                    assert!(matches!(left.as_ref(), BoundExpr::Variable { .. }));
                    assert_eq!(operator.kind, BoundBinaryOperatorKind::Multiplication);
                }
                other => panic!("expected binary, got {:?}", other),
            }
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}

#[test]
fn test_lowered_output_has_no_structured_statements() {
    let lowered = lower_source(
        "var total = 0;
         for (var i = 0; i < 10; i += 1) {
             if i % 2 == 0 { continue; }
             do { total += i; } while false;
             while total > 100 { break; }
         }",
    );

    assert!(!lowered.statements.iter().any(is_structured));
    assert!(!lowered.statements.iter().any(|stmt| matches!(
        stmt,
        BoundStmt::Expression(BoundExpr::CompoundAssignment { .. })
    )));
}

#[test]
fn test_lowering_is_idempotent() {
    let lowered = lower_source("var x = 0; while x < 3 { if x == 1 { x = 5; } else { x += 1; } }");
    let again = Lowerer::lower(BoundStmt::Block(lowered.clone()));

    assert_eq!(again, lowered);
}

#[test]
fn test_void_function_gets_trailing_return() {
    let body = BoundStmt::block(vec![BoundStmt::Expression(BoundExpr::literal(Value::Integer(1)))]);
    let lowered = Lowerer::lower_function(TypeSymbol::Void, body.clone());

    assert_eq!(lowered.statements.last(), Some(&BoundStmt::Return(None)));

    let lowered = Lowerer::lower_function(TypeSymbol::Int, body);
    assert_eq!(lowered.statements.len(), 1);
}

#[test]
fn test_existing_return_is_not_duplicated() {
    let body = BoundStmt::block(vec![BoundStmt::Return(None)]);
    let lowered = Lowerer::lower_function(TypeSymbol::Void, body);

    assert_eq!(lowered.statements, vec![BoundStmt::Return(None)]);
}
