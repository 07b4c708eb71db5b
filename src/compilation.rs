//! The compilation session: one submission bound on top of the ones before
//! it.

use std::{
    cell::{Ref, RefCell},
    fmt,
    rc::Rc,
};

use crate::{
    ast::statements::BlockStmt,
    binder::{
        binder::{bind_global_scope, bind_program, BinderOptions, BoundGlobalScope, BoundProgram},
        printer::write_statement,
    },
    cfg::graph::ControlFlowGraph,
    errors::{diagnostics::DiagnosticBag, errors::Error},
    evaluator::{
        evaluator::{EvaluationError, Evaluator, Variables},
        host::{Host, StdHost},
        value::Value,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    symbols::symbols::SymbolTable,
    Position, Span,
};

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub diagnostics: DiagnosticBag,
    /// `Ok(None)` when evaluation was skipped because of diagnostics, or the
    /// last statement produced no value.
    pub value: Result<Option<Value>, EvaluationError>,
}

/// A bound and lowered submission.
///
/// Every submission of a session shares one `SymbolTable`, so symbol handles
/// stay valid when a later submission refers to an earlier one's globals.
pub struct Compilation {
    options: BinderOptions,
    symbols: Rc<RefCell<SymbolTable>>,
    syntax_diagnostics: DiagnosticBag,
    global_scope: Rc<BoundGlobalScope>,
    program: Rc<BoundProgram>,
}

impl Compilation {
    /// Compiles `source` as the first submission of a new session.
    pub fn compile(source: &str, file: &str, options: BinderOptions) -> Compilation {
        let symbols = Rc::new(RefCell::new(SymbolTable::new()));
        Compilation::build(source, file, options, symbols, None, None)
    }

    /// Compiles `source` as the next submission after `self`. Its globals
    /// may shadow those of earlier submissions.
    pub fn continue_with(&self, source: &str, file: &str) -> Compilation {
        Compilation::build(
            source,
            file,
            self.options,
            self.symbols.clone(),
            Some(self.global_scope.clone()),
            Some(self.program.clone()),
        )
    }

    fn build(
        source: &str,
        file: &str,
        options: BinderOptions,
        symbols: Rc<RefCell<SymbolTable>>,
        previous_scope: Option<Rc<BoundGlobalScope>>,
        previous_program: Option<Rc<BoundProgram>>,
    ) -> Compilation {
        let file_name = Rc::new(file.to_string());
        let mut syntax_diagnostics = DiagnosticBag::new();

        let syntax = match parse_source(source, &file_name) {
            Ok(syntax) => syntax,
            Err(error) => {
                log::debug!("front end rejected {}: {}", file, error.get_error_name());
                syntax_diagnostics.push(error.to_diagnostic());
                BlockStmt {
                    body: vec![],
                    span: Span::at(Position(0, file_name)),
                }
            }
        };

        let (global_scope, program) = {
            let mut table = symbols.borrow_mut();
            let global_scope = bind_global_scope(previous_scope, &mut table, options, &syntax);
            let program = bind_program(previous_program, &global_scope, &mut table, options);
            (global_scope, program)
        };

        log::debug!(
            "compiled {}: {} syntax and {} binding diagnostics",
            file,
            syntax_diagnostics.len(),
            program.diagnostics.len()
        );

        Compilation {
            options,
            symbols,
            syntax_diagnostics,
            global_scope: Rc::new(global_scope),
            program: Rc::new(program),
        }
    }

    /// Front-end diagnostics followed by binding diagnostics.
    pub fn diagnostics(&self) -> DiagnosticBag {
        let mut diagnostics = self.syntax_diagnostics.clone();
        diagnostics.extend(self.program.diagnostics.clone());
        diagnostics
    }

    pub fn options(&self) -> BinderOptions {
        self.options
    }

    pub fn symbols(&self) -> Ref<'_, SymbolTable> {
        self.symbols.borrow()
    }

    pub fn global_scope(&self) -> &BoundGlobalScope {
        &self.global_scope
    }

    pub fn program(&self) -> &BoundProgram {
        &self.program
    }

    /// Runs the submission against `variables` with the standard streams.
    pub fn evaluate(&self, variables: &mut Variables) -> EvaluationResult {
        self.evaluate_with(variables, &mut StdHost::new())
    }

    /// Runs the submission unless it has diagnostics.
    pub fn evaluate_with<H: Host + ?Sized>(&self, variables: &mut Variables, host: &mut H) -> EvaluationResult {
        let diagnostics = self.diagnostics();
        if !diagnostics.is_empty() {
            return EvaluationResult {
                diagnostics,
                value: Ok(None),
            };
        }

        let symbols = self.symbols.borrow();
        let value = Evaluator::new(&self.program, &symbols, variables, host).evaluate();

        EvaluationResult { diagnostics, value }
    }

    /// Writes the lowered program: each function declared by this
    /// submission, then the global code.
    pub fn emit_tree(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let symbols = self.symbols.borrow();

        for (function, body) in &self.program.functions {
            let symbol = symbols.function(*function);
            writeln!(out, "fn {} -> {}", symbol.signature(), symbol.return_type)?;
            writeln!(out, "{{")?;
            for statement in &body.statements {
                write_statement(out, statement, &symbols, 1)?;
            }
            writeln!(out, "}}")?;
        }

        for statement in &self.program.statement.statements {
            write_statement(out, statement, &symbols, 0)?;
        }

        Ok(())
    }

    /// Writes the control flow graph of the global code, then one graph per
    /// function, in DOT format.
    pub fn write_control_flow_graph(&self, out: &mut impl fmt::Write) -> fmt::Result {
        let symbols = self.symbols.borrow();

        ControlFlowGraph::create(&self.program.statement).write_dot(out, &symbols)?;
        for body in self.program.functions.values() {
            ControlFlowGraph::create(body).write_dot(out, &symbols)?;
        }

        Ok(())
    }
}

fn parse_source(source: &str, file: &Rc<String>) -> Result<BlockStmt, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()))?;
    let (_, syntax) = parse(tokens, file.clone());
    syntax
}
