use std::rc::Rc;

use crate::{
    binder::{
        binder::{bind_global_scope, bind_program, BinderOptions, BoundProgram},
        bound_tree::{BoundBlockStmt, BoundExpr, BoundStmt},
    },
    errors::diagnostics::DiagnosticKind,
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::symbols::SymbolTable,
};

use super::graph::ControlFlowGraph;

fn bind_source(source: &str) -> (BoundProgram, SymbolTable) {
    let tokens = tokenize(source.to_string(), Some("test.sc".to_string())).unwrap();
    let (_, block) = parse(tokens, Rc::new("test.sc".to_string()));
    let block = block.unwrap();

    let mut symbols = SymbolTable::new();
    let options = BinderOptions::default();
    let global = bind_global_scope(None, &mut symbols, options, &block);
    let program = bind_program(None, &global, &mut symbols, options);

    (program, symbols)
}

fn first_function_body(program: &BoundProgram) -> &BoundBlockStmt {
    program.functions.values().next().unwrap()
}

fn contains_assignment(statements: &[BoundStmt]) -> bool {
    statements
        .iter()
        .any(|stmt| matches!(stmt, BoundStmt::Expression(BoundExpr::Assignment { .. })))
}

#[test]
fn test_empty_body_connects_start_to_end() {
    let graph = ControlFlowGraph::create(&BoundBlockStmt::default());

    assert_eq!(graph.blocks().count(), 2);
    assert_eq!(graph.edges().count(), 1);

    let edge = graph.edges().next().unwrap();
    assert_eq!(edge.from, graph.start().id);
    assert_eq!(edge.to, graph.end().id);
    assert!(!ControlFlowGraph::all_paths_return(&BoundBlockStmt::default()));
}

#[test]
fn test_infinite_loop_has_entry_and_back_edge() {
    let (program, _) = bind_source("while true { x = 1; }");
    let graph = ControlFlowGraph::create(&program.statement);

    let loops: Vec<_> = graph.basic_blocks().collect();
    assert_eq!(loops.len(), 1);

    let block = loops[0];
    let sources: Vec<usize> = block
        .incoming
        .iter()
        .map(|edge| graph.edge(*edge).unwrap().from)
        .collect();

    assert_eq!(sources.len(), 2);
    assert!(sources.contains(&graph.start().id));
    assert!(sources.contains(&block.id));
    assert!(graph.end().incoming.is_empty());
}

#[test]
fn test_while_false_body_is_pruned() {
    let (program, _) = bind_source("var x = 0; while false { x = 1; }");
    let graph = ControlFlowGraph::create(&program.statement);

    for block in graph.basic_blocks() {
        assert!(!block.incoming.is_empty());
        assert!(!contains_assignment(&block.statements));
    }
}

#[test]
fn test_while_false_body_is_pruned_in_function() {
    let (program, _) = bind_source("fn f() { var x = 0; while false { x = 1; } }");
    let graph = ControlFlowGraph::create(first_function_body(&program));

    assert!(graph.basic_blocks().next().is_some());
    for block in graph.basic_blocks() {
        assert!(!block.incoming.is_empty());
        assert!(!contains_assignment(&block.statements));
    }
    assert!(!graph.end().incoming.is_empty());
}

#[test]
fn test_pruning_reaches_fixpoint() {
    let (program, _) = bind_source(
        "var x = 0;
         while false {
             x = 1;
             if x == 1 { x = 2; }
         }",
    );
    let graph = ControlFlowGraph::create(&program.statement);

    for block in graph.basic_blocks() {
        assert!(!block.incoming.is_empty(), "orphan block {:?}", block);
        assert!(!contains_assignment(&block.statements));
    }

    // Every remaining edge joins two remaining blocks
    for edge in graph.edges() {
        assert!(graph.block(edge.from).is_some());
        assert!(graph.block(edge.to).is_some());
    }
}

#[test]
fn test_conditional_jump_has_complementary_edges() {
    let (program, _) = bind_source("var c = true; if c { c = false; }");
    let graph = ControlFlowGraph::create(&program.statement);

    let conditional: Vec<_> = graph.edges().filter(|edge| edge.condition.is_some()).collect();
    assert_eq!(conditional.len(), 2);
    assert_eq!(conditional[0].from, conditional[1].from);
    assert_ne!(conditional[0].to, conditional[1].to);

    let negated = conditional
        .iter()
        .filter(|edge| matches!(edge.condition, Some(BoundExpr::Unary { .. })))
        .count();
    assert_eq!(negated, 1);
}

#[test]
fn test_if_without_else_does_not_return_on_all_paths() {
    let (program, _) = bind_source("fn f(c: bool) -> int { if c { return 1; } }");

    assert!(!ControlFlowGraph::all_paths_return(first_function_body(&program)));
    assert_eq!(program.diagnostics.len(), 1);
    assert_eq!(
        program.diagnostics.iter().next().unwrap().kind,
        DiagnosticKind::AllPathsMustReturn
    );
}

#[test]
fn test_if_with_else_returns_on_all_paths() {
    let (program, _) = bind_source("fn f(c: bool) -> int { if c { return 1; } else { return 0; } }");

    assert!(ControlFlowGraph::all_paths_return(first_function_body(&program)));
    assert!(program.diagnostics.is_empty());
}

#[test]
fn test_void_function_returns_on_all_paths() {
    let (program, _) = bind_source("fn f(c: bool) { if c { print(\"yes\"); } }");

    assert!(ControlFlowGraph::all_paths_return(first_function_body(&program)));
    assert!(program.diagnostics.is_empty());
}

#[test]
fn test_dot_output_lists_each_block_and_edge_once() {
    let (program, symbols) = bind_source("var i = 0; while i < 3 { i += 1; }");
    let graph = ControlFlowGraph::create(&program.statement);

    let mut out = String::new();
    graph.write_dot(&mut out, &symbols).unwrap();

    assert!(out.starts_with("digraph G {"));
    assert!(out.trim_end().ends_with('}'));
    assert_eq!(out.matches("shape = box").count(), graph.blocks().count());
    assert_eq!(out.matches(" -> ").count(), graph.edges().count());
    assert!(out.contains("<Start>"));
    assert!(out.contains("<End>"));
}

#[test]
#[should_panic(expected = "unlowered statement")]
fn test_structured_statement_is_rejected() {
    let body = BoundBlockStmt {
        statements: vec![BoundStmt::block(vec![])],
    };
    let _ = ControlFlowGraph::create(&body);
}
