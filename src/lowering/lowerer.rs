use crate::{
    binder::{
        bound_tree::{
            BoundBlockStmt, BoundConditionalJump, BoundDoWhileStmt, BoundExpr, BoundForStmt,
            BoundIfStmt, BoundStmt, BoundWhileStmt,
        },
        operators::BoundBinaryOperator,
    },
    symbols::symbols::{LabelSymbol, TypeSymbol, VariableId},
};

use super::rewriter::BoundTreeRewriter;

/// Rewrites structured control flow into labels and jumps, then flattens
/// the result into a single statement list.
#[derive(Debug, Default)]
pub struct Lowerer {
    label_count: usize,
}

impl Lowerer {
    fn generate_label(&mut self) -> LabelSymbol {
        self.label_count += 1;
        LabelSymbol::new(format!("Label{}", self.label_count))
    }

    pub fn lower(statement: BoundStmt) -> BoundBlockStmt {
        let mut lowerer = Lowerer::default();
        let result = lowerer.rewrite_statement(statement);
        let block = flatten(result);

        log::debug!("lowered to {} statements using {} labels", block.statements.len(), lowerer.label_count);

        block
    }

    /// Lowers a function body. A void function that can run off its end gets
    /// an explicit trailing `return`.
    pub fn lower_function(return_type: TypeSymbol, body: BoundStmt) -> BoundBlockStmt {
        let mut block = Lowerer::lower(body);

        if return_type == TypeSymbol::Void && can_fall_through(&block) {
            block.statements.push(BoundStmt::Return(None));
        }

        block
    }
}

fn can_fall_through(block: &BoundBlockStmt) -> bool {
    !matches!(
        block.statements.last(),
        Some(BoundStmt::Return(_)) | Some(BoundStmt::JumpTo(_))
    )
}

/// Splices nested blocks into one list, preserving order.
fn flatten(statement: BoundStmt) -> BoundBlockStmt {
    let mut statements = vec![];
    let mut stack = vec![statement];

    while let Some(current) = stack.pop() {
        match current {
            BoundStmt::Block(block) => stack.extend(block.statements.into_iter().rev()),
            other => statements.push(other),
        }
    }

    BoundBlockStmt { statements }
}

fn conditional_jump(label: &LabelSymbol, condition: BoundExpr, jump_if_true: bool) -> BoundStmt {
    BoundStmt::ConditionalJumpTo(BoundConditionalJump {
        label: label.clone(),
        condition,
        jump_if_true,
    })
}

impl BoundTreeRewriter for Lowerer {
    fn rewrite_if(&mut self, stmt: BoundIfStmt) -> BoundStmt {
        let result = match stmt.else_stmt {
            // goto end unless <condition>
            // <then>
            // end:
            None => {
                let end_label = self.generate_label();
                BoundStmt::block(vec![
                    conditional_jump(&end_label, stmt.condition, false),
                    *stmt.then_stmt,
                    BoundStmt::Label(end_label),
                ])
            }
            // goto else unless <condition>
            // <then>
            // goto end
            // else:
            // <else>
            // end:
            Some(else_stmt) => {
                let else_label = self.generate_label();
                let end_label = self.generate_label();
                BoundStmt::block(vec![
                    conditional_jump(&else_label, stmt.condition, false),
                    *stmt.then_stmt,
                    BoundStmt::JumpTo(end_label.clone()),
                    BoundStmt::Label(else_label),
                    *else_stmt,
                    BoundStmt::Label(end_label),
                ])
            }
        };

        self.rewrite_statement(result)
    }

    // continue:
    // goto break unless <condition>
    // <body>
    // goto continue
    // break:
    fn rewrite_while(&mut self, stmt: BoundWhileStmt) -> BoundStmt {
        let result = BoundStmt::block(vec![
            BoundStmt::Label(stmt.continue_label.clone()),
            conditional_jump(&stmt.break_label, stmt.condition, false),
            *stmt.body,
            BoundStmt::JumpTo(stmt.continue_label),
            BoundStmt::Label(stmt.break_label),
        ]);

        self.rewrite_statement(result)
    }

    // body:
    // <body>
    // continue:
    // goto body if <condition>
    // break:
    fn rewrite_do_while(&mut self, stmt: BoundDoWhileStmt) -> BoundStmt {
        let body_label = self.generate_label();
        let result = BoundStmt::block(vec![
            BoundStmt::Label(body_label.clone()),
            *stmt.body,
            BoundStmt::Label(stmt.continue_label),
            conditional_jump(&body_label, stmt.condition, true),
            BoundStmt::Label(stmt.break_label),
        ]);

        self.rewrite_statement(result)
    }

    // <initializer>
    // while <condition>
    // {
    //     <body>
    //     continue:
    //     <increment>
    // }
    fn rewrite_for(&mut self, stmt: BoundForStmt) -> BoundStmt {
        let body = BoundStmt::block(vec![
            *stmt.body,
            BoundStmt::Label(stmt.continue_label),
            BoundStmt::Expression(stmt.increment),
        ]);

        let while_stmt = BoundStmt::While(BoundWhileStmt {
            condition: stmt.condition,
            body: Box::new(body),
            break_label: stmt.break_label,
            continue_label: self.generate_label(),
        });

        let result = BoundStmt::block(vec![*stmt.initializer, while_stmt]);
        self.rewrite_statement(result)
    }

    /// Constant conditions become an unconditional jump or nothing at all.
    fn rewrite_conditional_jump(&mut self, jump: BoundConditionalJump) -> BoundStmt {
        let condition = self.rewrite_expression(jump.condition);

        match condition.as_boolean_constant() {
            Some(value) if value == jump.jump_if_true => BoundStmt::JumpTo(jump.label),
            Some(_) => BoundStmt::block(vec![]),
            None => BoundStmt::ConditionalJumpTo(BoundConditionalJump {
                label: jump.label,
                condition,
                jump_if_true: jump.jump_if_true,
            }),
        }
    }

    /// `x op= value` becomes `x = x op value`.
    fn rewrite_compound_assignment(
        &mut self,
        variable: VariableId,
        operator: BoundBinaryOperator,
        value: BoundExpr,
        ty: TypeSymbol,
    ) -> BoundExpr {
        BoundExpr::Assignment {
            variable,
            value: Box::new(BoundExpr::Binary {
                left: Box::new(BoundExpr::Variable { variable, ty }),
                operator,
                right: Box::new(value),
            }),
            ty,
        }
    }
}
