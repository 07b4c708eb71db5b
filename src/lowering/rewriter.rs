use crate::{
    binder::{
        bound_tree::{
            BoundBlockStmt, BoundConditionalJump, BoundDoWhileStmt, BoundExpr, BoundForStmt,
            BoundIfStmt, BoundStmt, BoundVarDeclStmt, BoundWhileStmt,
        },
        operators::BoundBinaryOperator,
    },
    symbols::symbols::{TypeSymbol, VariableId},
};

/// Bottom-up rebuilding of a bound tree.
///
/// Every method takes its node by value and returns the replacement. The
/// defaults rebuild the node from rewritten children; implementors override
/// only the node kinds they change.
pub trait BoundTreeRewriter {
    fn rewrite_statement(&mut self, stmt: BoundStmt) -> BoundStmt {
        match stmt {
            BoundStmt::Block(block) => self.rewrite_block(block),
            BoundStmt::Expression(expression) => {
                BoundStmt::Expression(self.rewrite_expression(expression))
            }
            BoundStmt::VarDecl(decl) => self.rewrite_variable_declaration(decl),
            BoundStmt::If(stmt) => self.rewrite_if(stmt),
            BoundStmt::While(stmt) => self.rewrite_while(stmt),
            BoundStmt::DoWhile(stmt) => self.rewrite_do_while(stmt),
            BoundStmt::For(stmt) => self.rewrite_for(stmt),
            BoundStmt::Return(expression) => {
                BoundStmt::Return(expression.map(|e| self.rewrite_expression(e)))
            }
            BoundStmt::Label(label) => BoundStmt::Label(label),
            BoundStmt::JumpTo(label) => BoundStmt::JumpTo(label),
            BoundStmt::ConditionalJumpTo(jump) => self.rewrite_conditional_jump(jump),
        }
    }

    fn rewrite_block(&mut self, block: BoundBlockStmt) -> BoundStmt {
        let statements = block
            .statements
            .into_iter()
            .map(|stmt| self.rewrite_statement(stmt))
            .collect();
        BoundStmt::Block(BoundBlockStmt { statements })
    }

    fn rewrite_variable_declaration(&mut self, decl: BoundVarDeclStmt) -> BoundStmt {
        BoundStmt::VarDecl(BoundVarDeclStmt {
            variable: decl.variable,
            initializer: self.rewrite_expression(decl.initializer),
        })
    }

    fn rewrite_if(&mut self, stmt: BoundIfStmt) -> BoundStmt {
        BoundStmt::If(BoundIfStmt {
            condition: self.rewrite_expression(stmt.condition),
            then_stmt: Box::new(self.rewrite_statement(*stmt.then_stmt)),
            else_stmt: stmt.else_stmt.map(|s| Box::new(self.rewrite_statement(*s))),
        })
    }

    fn rewrite_while(&mut self, stmt: BoundWhileStmt) -> BoundStmt {
        BoundStmt::While(BoundWhileStmt {
            condition: self.rewrite_expression(stmt.condition),
            body: Box::new(self.rewrite_statement(*stmt.body)),
            break_label: stmt.break_label,
            continue_label: stmt.continue_label,
        })
    }

    fn rewrite_do_while(&mut self, stmt: BoundDoWhileStmt) -> BoundStmt {
        BoundStmt::DoWhile(BoundDoWhileStmt {
            body: Box::new(self.rewrite_statement(*stmt.body)),
            condition: self.rewrite_expression(stmt.condition),
            break_label: stmt.break_label,
            continue_label: stmt.continue_label,
        })
    }

    fn rewrite_for(&mut self, stmt: BoundForStmt) -> BoundStmt {
        BoundStmt::For(BoundForStmt {
            initializer: Box::new(self.rewrite_statement(*stmt.initializer)),
            condition: self.rewrite_expression(stmt.condition),
            increment: self.rewrite_expression(stmt.increment),
            body: Box::new(self.rewrite_statement(*stmt.body)),
            break_label: stmt.break_label,
            continue_label: stmt.continue_label,
        })
    }

    fn rewrite_conditional_jump(&mut self, jump: BoundConditionalJump) -> BoundStmt {
        BoundStmt::ConditionalJumpTo(BoundConditionalJump {
            label: jump.label,
            condition: self.rewrite_expression(jump.condition),
            jump_if_true: jump.jump_if_true,
        })
    }

    fn rewrite_expression(&mut self, expr: BoundExpr) -> BoundExpr {
        match expr {
            BoundExpr::Literal { .. } | BoundExpr::Variable { .. } | BoundExpr::Error => expr,
            BoundExpr::Assignment { variable, value, ty } => BoundExpr::Assignment {
                variable,
                value: Box::new(self.rewrite_expression(*value)),
                ty,
            },
            BoundExpr::CompoundAssignment { variable, operator, value, ty } => {
                let value = self.rewrite_expression(*value);
                self.rewrite_compound_assignment(variable, operator, value, ty)
            }
            BoundExpr::Unary { operator, operand } => BoundExpr::Unary {
                operator,
                operand: Box::new(self.rewrite_expression(*operand)),
            },
            BoundExpr::Binary { left, operator, right } => BoundExpr::Binary {
                left: Box::new(self.rewrite_expression(*left)),
                operator,
                right: Box::new(self.rewrite_expression(*right)),
            },
            BoundExpr::Conversion { ty, expression } => BoundExpr::Conversion {
                ty,
                expression: Box::new(self.rewrite_expression(*expression)),
            },
            BoundExpr::Call { function, arguments, ty } => BoundExpr::Call {
                function,
                arguments: arguments
                    .into_iter()
                    .map(|argument| self.rewrite_expression(argument))
                    .collect(),
                ty,
            },
        }
    }

    /// Called with the already rewritten `value`.
    fn rewrite_compound_assignment(
        &mut self,
        variable: VariableId,
        operator: BoundBinaryOperator,
        value: BoundExpr,
        ty: TypeSymbol,
    ) -> BoundExpr {
        BoundExpr::CompoundAssignment {
            variable,
            operator,
            value: Box::new(value),
            ty,
        }
    }
}
