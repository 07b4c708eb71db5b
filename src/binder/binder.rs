use std::{collections::HashSet, mem, rc::Rc};

use indexmap::IndexMap;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::{AssignmentExpr, BinaryExpr, CallExpr, PrefixExpr, SymbolExpr},
        statements::{
            BlockStmt, DoWhileStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, ReturnStmt,
            VarDeclStmt, WhileStmt,
        },
        types::TypeClause,
    },
    cfg::graph::ControlFlowGraph,
    errors::diagnostics::{DiagnosticBag, DiagnosticKind},
    evaluator::value::Value,
    lowering::lowerer::Lowerer,
    symbols::{
        scope::Scope,
        symbols::{
            format_signature, FunctionId, FunctionSymbol, LabelSymbol, ParameterSymbol,
            SymbolTable, TypeSymbol, VariableId, VariableKind, VariableSymbol,
        },
    },
    Span,
};

use super::{
    bound_tree::{
        BoundBlockStmt, BoundDoWhileStmt, BoundExpr, BoundForStmt, BoundIfStmt, BoundStmt,
        BoundVarDeclStmt, BoundWhileStmt,
    },
    conversion::Conversion,
    operators::{BoundBinaryOperator, BoundUnaryOperator},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinderOptions {
    /// Assigning to an undeclared name declares it, typed by the value.
    pub implicit_declarations: bool,
    /// Deepest statement/expression nesting bound before giving up.
    pub max_depth: usize,
}

impl Default for BinderOptions {
    fn default() -> Self {
        BinderOptions {
            implicit_declarations: true,
            max_depth: 256,
        }
    }
}

/// The result of binding one submission's global code.
#[derive(Debug, Clone)]
pub struct BoundGlobalScope {
    pub previous: Option<Rc<BoundGlobalScope>>,
    pub diagnostics: DiagnosticBag,
    pub functions: Vec<FunctionId>,
    pub variables: Vec<VariableId>,
    pub statement: BoundBlockStmt,
}

/// A bound, lowered submission: global code plus every function body it
/// declared.
#[derive(Debug, Clone)]
pub struct BoundProgram {
    pub previous: Option<Rc<BoundProgram>>,
    pub diagnostics: DiagnosticBag,
    pub functions: IndexMap<FunctionId, BoundBlockStmt>,
    pub statement: BoundBlockStmt,
}

impl BoundProgram {
    /// Looks `function` up in this program, then in earlier submissions.
    pub fn function_body(&self, function: FunctionId) -> Option<&BoundBlockStmt> {
        let mut program = Some(self);
        while let Some(current) = program {
            if let Some(body) = current.functions.get(&function) {
                return Some(body);
            }
            program = current.previous.as_deref();
        }
        None
    }
}

pub struct Binder<'a> {
    symbols: &'a mut SymbolTable,
    options: BinderOptions,
    scope: Scope,
    function: Option<FunctionId>,
    /// (break, continue) labels of the enclosing loops, innermost last.
    loop_stack: Vec<(LabelSymbol, LabelSymbol)>,
    label_count: usize,
    depth: usize,
    depth_reported: bool,
    /// Set when the expression bound last is a stand-in for a failed
    /// operator lookup. Its consumers must not report it again.
    recovered: bool,
    diagnostics: DiagnosticBag,
}

impl<'a> Binder<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        options: BinderOptions,
        parent: Scope,
        function: Option<FunctionId>,
    ) -> Self {
        let mut scope = Scope::new(Some(parent));

        if let Some(function) = function {
            for parameter in &symbols.function(function).parameters {
                scope.try_declare_variable(&parameter.name, parameter.variable);
            }
        }

        Binder {
            symbols,
            options,
            scope,
            function,
            loop_stack: vec![],
            label_count: 0,
            depth: 0,
            depth_reported: false,
            recovered: false,
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    fn push_scope(&mut self) {
        let parent = mem::take(&mut self.scope);
        self.scope = Scope::new(Some(parent));
    }

    fn pop_scope(&mut self) {
        let scope = mem::take(&mut self.scope);
        self.scope = scope.into_parent().unwrap_or_default();
    }

    /// Tracks nesting depth. Past the limit the node is skipped and the
    /// problem reported once for the whole unit.
    fn enter(&mut self, span: &Span) -> bool {
        if self.depth >= self.options.max_depth {
            if !self.depth_reported {
                self.depth_reported = true;
                self.diagnostics.report(
                    span.clone(),
                    DiagnosticKind::NestingTooDeep { limit: self.options.max_depth },
                );
            }
            return false;
        }

        self.depth += 1;
        true
    }

    // STATEMENTS

    pub fn bind_statement(&mut self, stmt: &Stmt) -> BoundStmt {
        if !self.enter(stmt.get_span()) {
            return BoundStmt::Expression(BoundExpr::Error);
        }

        let result = match stmt {
            Stmt::Block(block) => self.bind_block(block),
            Stmt::Expression(stmt) => self.bind_expression_statement(stmt),
            Stmt::VarDecl(stmt) => self.bind_variable_declaration(stmt),
            Stmt::If(stmt) => self.bind_if_statement(stmt),
            Stmt::While(stmt) => self.bind_while_statement(stmt),
            Stmt::DoWhile(stmt) => self.bind_do_while_statement(stmt),
            Stmt::For(stmt) => self.bind_for_statement(stmt),
            Stmt::Break(stmt) => self.bind_loop_jump("break", &stmt.span),
            Stmt::Continue(stmt) => self.bind_loop_jump("continue", &stmt.span),
            Stmt::Return(stmt) => self.bind_return_statement(stmt),
            Stmt::FnDecl(decl) => {
                self.diagnostics
                    .report(decl.identifier_span.clone(), DiagnosticKind::FunctionNotGlobal);
                BoundStmt::block(vec![])
            }
        };

        self.depth -= 1;
        result
    }

    pub fn bind_block(&mut self, block: &BlockStmt) -> BoundStmt {
        self.push_scope();

        let mut statements = Vec::with_capacity(block.body.len());
        for stmt in block.iter() {
            statements.push(self.bind_statement(stmt));
        }

        self.pop_scope();
        BoundStmt::block(statements)
    }

    fn bind_expression_statement(&mut self, stmt: &ExpressionStmt) -> BoundStmt {
        let expression = self.bind_expression_allow_void(&stmt.expression);

        // Scripts may evaluate any expression; function bodies may not
        if self.function.is_some() {
            let allowed = matches!(
                expression,
                BoundExpr::Assignment { .. }
                    | BoundExpr::CompoundAssignment { .. }
                    | BoundExpr::Call { .. }
                    | BoundExpr::Error
            );
            if !allowed {
                self.diagnostics
                    .report(stmt.span.clone(), DiagnosticKind::InvalidExpressionStatement);
            }
        }

        BoundStmt::Expression(expression)
    }

    fn bind_variable_declaration(&mut self, stmt: &VarDeclStmt) -> BoundStmt {
        let explicit_type = stmt
            .explicit_type
            .as_ref()
            .map(|clause| self.bind_type_clause(clause));
        let (initializer, recovered) = self.bind_operand(&stmt.assigned_value);
        let variable_type = explicit_type.unwrap_or_else(|| initializer.ty());

        let variable = self.declare_variable(
            &stmt.identifier,
            &stmt.identifier_span,
            stmt.is_constant,
            variable_type,
        );
        let initializer = self.convert(
            stmt.assigned_value.get_span(),
            initializer,
            variable_type,
            false,
            recovered,
        );

        BoundStmt::VarDecl(BoundVarDeclStmt { variable, initializer })
    }

    fn declare_variable(
        &mut self,
        name: &str,
        span: &Span,
        is_read_only: bool,
        ty: TypeSymbol,
    ) -> VariableId {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };

        let variable = self.symbols.add_variable(VariableSymbol {
            name: name.to_string(),
            ty,
            is_read_only,
            kind,
        });

        if !self.scope.try_declare_variable(name, variable) {
            self.diagnostics.report(
                span.clone(),
                DiagnosticKind::VariableAlreadyDeclared { name: name.to_string() },
            );
        }

        variable
    }

    fn bind_type_clause(&mut self, clause: &TypeClause) -> TypeSymbol {
        match TypeSymbol::lookup(&clause.name) {
            Some(ty) => ty,
            None => {
                self.diagnostics.report(
                    clause.span.clone(),
                    DiagnosticKind::UndefinedType { name: clause.name.clone() },
                );
                TypeSymbol::Error
            }
        }
    }

    fn bind_if_statement(&mut self, stmt: &IfStmt) -> BoundStmt {
        let condition = self.bind_conversion(&stmt.condition, TypeSymbol::Boolean, false);
        let then_stmt = self.bind_statement(&stmt.then_body);
        let else_stmt = match &stmt.else_body {
            Some(else_body) => Some(Box::new(self.bind_statement(else_body))),
            None => None,
        };

        BoundStmt::If(BoundIfStmt {
            condition,
            then_stmt: Box::new(then_stmt),
            else_stmt,
        })
    }

    fn bind_while_statement(&mut self, stmt: &WhileStmt) -> BoundStmt {
        let condition = self.bind_conversion(&stmt.condition, TypeSymbol::Boolean, false);
        let (body, break_label, continue_label) = self.bind_loop_body(&stmt.body);

        BoundStmt::While(BoundWhileStmt {
            condition,
            body: Box::new(body),
            break_label,
            continue_label,
        })
    }

    fn bind_do_while_statement(&mut self, stmt: &DoWhileStmt) -> BoundStmt {
        let (body, break_label, continue_label) = self.bind_loop_body(&stmt.body);
        let condition = self.bind_conversion(&stmt.condition, TypeSymbol::Boolean, false);

        BoundStmt::DoWhile(BoundDoWhileStmt {
            body: Box::new(body),
            condition,
            break_label,
            continue_label,
        })
    }

    fn bind_for_statement(&mut self, stmt: &ForStmt) -> BoundStmt {
        // The initializer's variables are only visible inside the loop
        self.push_scope();

        let initializer = self.bind_statement(&stmt.initializer);
        let condition = self.bind_conversion(&stmt.condition, TypeSymbol::Boolean, false);
        let increment = self.bind_expression_allow_void(&stmt.increment);
        let (body, break_label, continue_label) = self.bind_loop_body(&stmt.body);

        self.pop_scope();

        BoundStmt::For(BoundForStmt {
            initializer: Box::new(initializer),
            condition,
            increment,
            body: Box::new(body),
            break_label,
            continue_label,
        })
    }

    fn bind_loop_body(&mut self, body: &Stmt) -> (BoundStmt, LabelSymbol, LabelSymbol) {
        self.label_count += 1;
        let break_label = LabelSymbol::new(format!("break{}", self.label_count));
        let continue_label = LabelSymbol::new(format!("continue{}", self.label_count));

        self.loop_stack.push((break_label.clone(), continue_label.clone()));
        let body = self.bind_statement(body);
        self.loop_stack.pop();

        (body, break_label, continue_label)
    }

    fn bind_loop_jump(&mut self, keyword: &str, span: &Span) -> BoundStmt {
        match self.loop_stack.last() {
            Some((break_label, continue_label)) => {
                let label = if keyword == "break" { break_label } else { continue_label };
                BoundStmt::JumpTo(label.clone())
            }
            None => {
                self.diagnostics.report(
                    span.clone(),
                    DiagnosticKind::InvalidBreakOrContinue { keyword: keyword.to_string() },
                );
                BoundStmt::Expression(BoundExpr::Error)
            }
        }
    }

    fn bind_return_statement(&mut self, stmt: &ReturnStmt) -> BoundStmt {
        let expression = match &stmt.value {
            Some(value) => Some(self.bind_operand(value)),
            None => None,
        };
        let (expression, recovered) = match expression {
            Some((expression, recovered)) => (Some(expression), recovered),
            None => (None, false),
        };

        let function = match self.function {
            Some(function) => function,
            None => {
                self.diagnostics.report(stmt.span.clone(), DiagnosticKind::InvalidReturn);
                return BoundStmt::Return(expression);
            }
        };

        let (name, return_type) = {
            let symbol = self.symbols.function(function);
            (symbol.name.clone(), symbol.return_type)
        };

        match (expression, &stmt.value) {
            (Some(_), Some(value)) if return_type == TypeSymbol::Void => {
                self.diagnostics.report(
                    value.get_span().clone(),
                    DiagnosticKind::InvalidReturnExpression { function: name },
                );
                BoundStmt::Return(None)
            }
            (Some(expression), Some(value)) => {
                let expression =
                    self.convert(value.get_span(), expression, return_type, false, recovered);
                BoundStmt::Return(Some(expression))
            }
            _ => {
                if return_type != TypeSymbol::Void && return_type != TypeSymbol::Error {
                    self.diagnostics.report(
                        stmt.span.clone(),
                        DiagnosticKind::MissingReturnExpression {
                            ty: return_type.name().to_string(),
                        },
                    );
                }
                BoundStmt::Return(None)
            }
        }
    }

    /// Declares a global function's signature. Bodies are bound later by
    /// `bind_program`, once every signature of the unit is known.
    pub fn bind_function_declaration(&mut self, decl: &FnDeclStmt) {
        let mut parameters = Vec::with_capacity(decl.parameters.len());
        let mut seen = HashSet::new();

        for parameter in &decl.parameters {
            let ty = self.bind_type_clause(&parameter.type_clause);

            if !seen.insert(parameter.name.as_str()) {
                self.diagnostics.report(
                    parameter.span.clone(),
                    DiagnosticKind::ParameterAlreadyDeclared { name: parameter.name.clone() },
                );
                continue;
            }

            let variable = self.symbols.add_variable(VariableSymbol {
                name: parameter.name.clone(),
                ty,
                is_read_only: true,
                kind: VariableKind::Parameter,
            });
            parameters.push(ParameterSymbol {
                name: parameter.name.clone(),
                ty,
                variable,
            });
        }

        let return_type = match &decl.return_type {
            None => TypeSymbol::Void,
            Some(clause) if clause.name == "void" => TypeSymbol::Void,
            Some(clause) => self.bind_type_clause(clause),
        };

        let function = self.symbols.add_function(FunctionSymbol {
            name: decl.identifier.clone(),
            parameters,
            return_type,
            declaration: Some(decl.clone()),
            builtin: None,
        });

        if !self.scope.try_declare_function(self.symbols, function) {
            let signature = self.symbols.function(function).signature();
            self.diagnostics.report(
                decl.identifier_span.clone(),
                DiagnosticKind::FunctionAlreadyDeclared { signature },
            );
        }
    }

    // EXPRESSIONS

    /// Binds an expression that must produce a value.
    pub fn bind_expression(&mut self, expr: &Expr) -> BoundExpr {
        let result = self.bind_expression_allow_void(expr);

        if result.ty() == TypeSymbol::Void {
            self.diagnostics
                .report(expr.get_span().clone(), DiagnosticKind::ExpressionMustHaveValue);
            return BoundExpr::Error;
        }

        result
    }

    fn bind_expression_allow_void(&mut self, expr: &Expr) -> BoundExpr {
        if !self.enter(expr.get_span()) {
            self.recovered = false;
            return BoundExpr::Error;
        }

        let (result, recovered) = match expr {
            Expr::Number(number) => (BoundExpr::literal(Value::Integer(number.value)), false),
            Expr::String(string) => {
                (BoundExpr::literal(Value::String(string.value.clone())), false)
            }
            Expr::Boolean(boolean) => (BoundExpr::literal(Value::Boolean(boolean.value)), false),
            Expr::Symbol(symbol) => (self.bind_name(symbol), false),
            Expr::Binary(binary) => self.bind_binary(binary),
            Expr::Prefix(prefix) => self.bind_unary(prefix),
            Expr::Assignment(assignment) => (self.bind_assignment(assignment), false),
            Expr::Call(call) => (self.bind_call(call), false),
        };

        self.recovered = recovered;
        self.depth -= 1;
        result
    }

    /// Binds an operand and tells whether it stands in for a failed operator.
    fn bind_operand(&mut self, expr: &Expr) -> (BoundExpr, bool) {
        let operand = self.bind_expression(expr);
        (operand, std::mem::take(&mut self.recovered))
    }

    fn bind_name(&mut self, symbol: &SymbolExpr) -> BoundExpr {
        match self.scope.try_lookup_variable(&symbol.value) {
            Some(variable) => BoundExpr::Variable {
                variable,
                ty: self.symbols.variable(variable).ty,
            },
            None => {
                self.diagnostics.report(
                    symbol.span.clone(),
                    DiagnosticKind::UndefinedVariable { name: symbol.value.clone() },
                );
                BoundExpr::Error
            }
        }
    }

    fn bind_assignment(&mut self, assignment: &AssignmentExpr) -> BoundExpr {
        let (value, recovered) = self.bind_operand(&assignment.value);
        let name = &assignment.assignee.value;
        let compound = assignment.operator.kind.compound_operator();

        let variable = match self.scope.try_lookup_variable(name) {
            Some(variable) => variable,
            None if compound.is_none() && self.options.implicit_declarations => {
                let ty = value.ty();
                let variable = self.declare_variable(name, &assignment.assignee.span, false, ty);
                return BoundExpr::Assignment {
                    variable,
                    value: Box::new(value),
                    ty,
                };
            }
            None => {
                self.diagnostics.report(
                    assignment.assignee.span.clone(),
                    DiagnosticKind::UndefinedVariable { name: name.clone() },
                );
                return BoundExpr::Error;
            }
        };

        let symbol = self.symbols.variable(variable).clone();

        if symbol.is_read_only {
            self.diagnostics.report(
                assignment.assignee.span.clone(),
                DiagnosticKind::ReadOnlyAssignment { name: name.clone() },
            );
        }

        let Some(operator_token) = compound else {
            let value =
                self.convert(assignment.value.get_span(), value, symbol.ty, false, recovered);
            return BoundExpr::Assignment {
                variable,
                value: Box::new(value),
                ty: symbol.ty,
            };
        };

        if recovered || value.ty() == TypeSymbol::Error || symbol.ty == TypeSymbol::Error {
            return BoundExpr::Error;
        }

        match BoundBinaryOperator::bind(operator_token, symbol.ty, value.ty()) {
            Some(operator) => BoundExpr::CompoundAssignment {
                variable,
                operator,
                value: Box::new(value),
                ty: symbol.ty,
            },
            None => {
                self.diagnostics.report(
                    assignment.operator.span.clone(),
                    DiagnosticKind::UndefinedBinaryOperator {
                        operator: operator_token.to_string(),
                        left: symbol.ty.name().to_string(),
                        right: value.ty().name().to_string(),
                    },
                );
                BoundExpr::Error
            }
        }
    }

    /// On a failed lookup the operand is kept as the result, flagged as
    /// recovered.
    fn bind_unary(&mut self, prefix: &PrefixExpr) -> (BoundExpr, bool) {
        let (operand, recovered) = self.bind_operand(&prefix.right_expr);

        if operand.ty() == TypeSymbol::Error {
            return (BoundExpr::Error, false);
        }
        if recovered {
            return (operand, true);
        }

        match BoundUnaryOperator::bind(prefix.operator.kind, operand.ty()) {
            Some(operator) => (
                BoundExpr::Unary {
                    operator,
                    operand: Box::new(operand),
                },
                false,
            ),
            None => {
                self.diagnostics.report(
                    prefix.operator.span.clone(),
                    DiagnosticKind::UndefinedUnaryOperator {
                        operator: prefix.operator.value.clone(),
                        operand: operand.ty().name().to_string(),
                    },
                );
                (operand, true)
            }
        }
    }

    /// On a failed lookup the left operand is kept as the result, flagged as
    /// recovered.
    fn bind_binary(&mut self, binary: &BinaryExpr) -> (BoundExpr, bool) {
        let (left, left_recovered) = self.bind_operand(&binary.left);
        let (right, right_recovered) = self.bind_operand(&binary.right);

        if left.ty() == TypeSymbol::Error || right.ty() == TypeSymbol::Error {
            return (BoundExpr::Error, false);
        }
        if left_recovered || right_recovered {
            return (left, true);
        }

        match BoundBinaryOperator::bind(binary.operator.kind, left.ty(), right.ty()) {
            Some(operator) => (
                BoundExpr::Binary {
                    left: Box::new(left),
                    operator,
                    right: Box::new(right),
                },
                false,
            ),
            None => {
                self.diagnostics.report(
                    binary.operator.span.clone(),
                    DiagnosticKind::UndefinedBinaryOperator {
                        operator: binary.operator.value.clone(),
                        left: left.ty().name().to_string(),
                        right: right.ty().name().to_string(),
                    },
                );
                (left, true)
            }
        }
    }

    fn bind_call(&mut self, call: &CallExpr) -> BoundExpr {
        // `int(x)`, `string(x)` and friends are conversions, not calls
        if call.arguments.len() == 1 {
            if let Some(ty) = TypeSymbol::lookup(&call.callee.value) {
                return self.bind_conversion(&call.arguments[0], ty, true);
            }
        }

        let mut arguments = Vec::with_capacity(call.arguments.len());
        let mut recovered = false;
        for argument in &call.arguments {
            let (argument, argument_recovered) = self.bind_operand(argument);
            recovered |= argument_recovered;
            arguments.push(argument);
        }

        if recovered || arguments.iter().any(|argument| argument.ty() == TypeSymbol::Error) {
            return BoundExpr::Error;
        }

        let types: Vec<TypeSymbol> = arguments.iter().map(BoundExpr::ty).collect();

        match self.scope.try_lookup_function(self.symbols, &call.callee.value, &types) {
            Some(function) => BoundExpr::Call {
                function,
                arguments,
                ty: self.symbols.function(function).return_type,
            },
            None => {
                self.diagnostics.report(
                    call.callee.span.clone(),
                    DiagnosticKind::UndefinedFunction {
                        signature: format_signature(&call.callee.value, &types),
                    },
                );
                BoundExpr::Error
            }
        }
    }

    fn bind_conversion(&mut self, expr: &Expr, ty: TypeSymbol, allow_explicit: bool) -> BoundExpr {
        let (expression, recovered) = self.bind_operand(expr);
        self.convert(expr.get_span(), expression, ty, allow_explicit, recovered)
    }

    /// Wraps `expression` in a conversion to `ty` when one is allowed here.
    /// A `recovered` expression was already reported and fails silently.
    fn convert(
        &mut self,
        span: &Span,
        expression: BoundExpr,
        ty: TypeSymbol,
        allow_explicit: bool,
        recovered: bool,
    ) -> BoundExpr {
        let from = expression.ty();
        let conversion = Conversion::classify(from, ty);
        let silent = recovered || from == TypeSymbol::Error || ty == TypeSymbol::Error;

        if !conversion.exists() {
            if !silent {
                self.diagnostics.report(
                    span.clone(),
                    DiagnosticKind::CannotConvert {
                        from: from.name().to_string(),
                        to: ty.name().to_string(),
                    },
                );
            }
            return BoundExpr::Error;
        }

        if !allow_explicit && !conversion.is_implicit() {
            if !silent {
                self.diagnostics.report(
                    span.clone(),
                    DiagnosticKind::CannotConvertImplicitly {
                        from: from.name().to_string(),
                        to: ty.name().to_string(),
                    },
                );
            }
            return BoundExpr::Error;
        }

        if conversion == Conversion::Identity {
            return expression;
        }

        BoundExpr::Conversion {
            ty,
            expression: Box::new(expression),
        }
    }
}

fn create_root_scope(symbols: &SymbolTable) -> Scope {
    let mut scope = Scope::new(None);
    for builtin in symbols.builtins() {
        scope.try_declare_function(symbols, *builtin);
    }
    scope
}

/// Rebuilds the name-resolution chain for a new submission: the builtins,
/// then one scope per earlier submission, oldest outermost.
fn create_parent_scope(previous: Option<&BoundGlobalScope>, symbols: &SymbolTable) -> Scope {
    let mut chain = vec![];
    let mut current = previous;
    while let Some(global) = current {
        chain.push(global);
        current = global.previous.as_deref();
    }

    let mut parent = create_root_scope(symbols);

    for global in chain.into_iter().rev() {
        let mut scope = Scope::new(Some(parent));

        for function in &global.functions {
            scope.try_declare_function(symbols, *function);
        }
        for variable in &global.variables {
            scope.try_declare_variable(&symbols.variable(*variable).name, *variable);
        }

        parent = scope;
    }

    parent
}

/// Binds the global code of one submission.
///
/// Function signatures are declared first so calls may appear before the
/// declaration; their bodies are left to `bind_program`.
pub fn bind_global_scope(
    previous: Option<Rc<BoundGlobalScope>>,
    symbols: &mut SymbolTable,
    options: BinderOptions,
    syntax: &BlockStmt,
) -> BoundGlobalScope {
    let parent = create_parent_scope(previous.as_deref(), symbols);
    let mut binder = Binder::new(symbols, options, parent, None);

    for stmt in syntax.iter() {
        if let Stmt::FnDecl(decl) = stmt {
            binder.bind_function_declaration(decl);
        }
    }

    let mut statements = vec![];
    for stmt in syntax.iter() {
        if !matches!(stmt, Stmt::FnDecl(_)) {
            statements.push(binder.bind_statement(stmt));
        }
    }

    let functions: Vec<FunctionId> = binder.scope.functions().collect();
    let variables: Vec<VariableId> = binder.scope.variables().collect();

    log::debug!(
        "bound global scope: {} statements, {} functions, {} variables, {} diagnostics",
        statements.len(),
        functions.len(),
        variables.len(),
        binder.diagnostics.len()
    );

    BoundGlobalScope {
        previous,
        diagnostics: binder.into_diagnostics(),
        functions,
        variables,
        statement: BoundBlockStmt { statements },
    }
}

/// Binds and lowers every function body declared by `global_scope`, checks
/// that non-void functions return on all paths, and lowers the global code.
pub fn bind_program(
    previous: Option<Rc<BoundProgram>>,
    global_scope: &BoundGlobalScope,
    symbols: &mut SymbolTable,
    options: BinderOptions,
) -> BoundProgram {
    let parent = create_parent_scope(Some(global_scope), symbols);

    let mut diagnostics = DiagnosticBag::new();
    diagnostics.extend(global_scope.diagnostics.clone());

    let mut functions = IndexMap::new();

    for &function in &global_scope.functions {
        let (declaration, return_type) = {
            let symbol = symbols.function(function);
            (symbol.declaration.clone(), symbol.return_type)
        };
        let Some(declaration) = declaration else {
            continue;
        };

        let mut binder = Binder::new(symbols, options, parent.clone(), Some(function));
        let body = binder.bind_block(&declaration.body);
        let mut function_diagnostics = binder.into_diagnostics();

        let lowered = Lowerer::lower_function(return_type, body);

        if return_type != TypeSymbol::Void
            && return_type != TypeSymbol::Error
            && !ControlFlowGraph::all_paths_return(&lowered)
        {
            function_diagnostics.report(
                declaration.identifier_span.clone(),
                DiagnosticKind::AllPathsMustReturn,
            );
        }

        log::debug!(
            "bound function {}: {} lowered statements",
            declaration.identifier,
            lowered.statements.len()
        );

        diagnostics.extend(function_diagnostics);
        functions.insert(function, lowered);
    }

    let statement = Lowerer::lower(BoundStmt::Block(global_scope.statement.clone()));

    BoundProgram {
        previous,
        diagnostics,
        functions,
        statement,
    }
}
