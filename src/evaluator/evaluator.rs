use std::collections::HashMap;

use thiserror::Error;

use crate::{
    binder::{
        binder::BoundProgram,
        bound_tree::{BoundExpr, BoundStmt},
        operators::{BoundBinaryOperator, BoundBinaryOperatorKind, BoundUnaryOperatorKind},
    },
    symbols::symbols::{
        BuiltinFunction, FunctionId, LabelSymbol, SymbolTable, TypeSymbol, VariableId,
        VariableKind,
    },
};

use super::{host::Host, value::Value};

/// Values of global variables, keyed by symbol handle. A REPL session keeps
/// one of these alive across submissions.
pub type Variables = HashMap<VariableId, Value>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Cannot convert '{value}' to type '{ty}'.")]
    InvalidConversion { value: String, ty: TypeSymbol },
    /// The variable is declared but its assignment never ran, e.g. it sits
    /// in a branch that was not taken.
    #[error("Variable '{name}' is read before it is assigned.")]
    UnassignedVariable { name: String },
}

/// How a statement hands control back to the list it belongs to.
#[derive(Debug, Clone, PartialEq)]
enum Flow {
    Normal,
    /// Continue at the given label, which may belong to an enclosing list.
    Jump(LabelSymbol),
    Return(Option<Value>),
}

pub struct Evaluator<'a, H: Host + ?Sized> {
    program: &'a BoundProgram,
    symbols: &'a SymbolTable,
    globals: &'a mut Variables,
    /// One frame per active function call.
    locals: Vec<Variables>,
    host: &'a mut H,
    last_value: Option<Value>,
}

impl<'a, H: Host + ?Sized> Evaluator<'a, H> {
    pub fn new(
        program: &'a BoundProgram,
        symbols: &'a SymbolTable,
        globals: &'a mut Variables,
        host: &'a mut H,
    ) -> Self {
        Evaluator {
            program,
            symbols,
            globals,
            locals: vec![],
            host,
            last_value: None,
        }
    }

    /// Runs the program's global code and returns the value of the last
    /// expression statement or variable declaration.
    pub fn evaluate(mut self) -> Result<Option<Value>, EvaluationError> {
        let program = self.program;

        match self.execute_block(&program.statement.statements)? {
            Flow::Jump(label) => panic!("jump to undeclared label '{}'", label),
            Flow::Normal | Flow::Return(_) => Ok(self.last_value),
        }
    }

    fn execute_block(&mut self, statements: &[BoundStmt]) -> Result<Flow, EvaluationError> {
        let labels: HashMap<&LabelSymbol, usize> = statements
            .iter()
            .enumerate()
            .filter_map(|(i, stmt)| match stmt {
                BoundStmt::Label(label) => Some((label, i)),
                _ => None,
            })
            .collect();

        let mut index = 0;
        while index < statements.len() {
            match self.execute_statement(&statements[index])? {
                Flow::Normal => index += 1,
                Flow::Jump(label) => match labels.get(&label) {
                    Some(target) => index = target + 1,
                    None => return Ok(Flow::Jump(label)),
                },
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    fn execute_statement(&mut self, stmt: &BoundStmt) -> Result<Flow, EvaluationError> {
        match stmt {
            BoundStmt::Block(block) => self.execute_block(&block.statements),
            BoundStmt::Expression(expression) => {
                self.last_value = self.evaluate_expression(expression)?;
                Ok(Flow::Normal)
            }
            BoundStmt::VarDecl(decl) => {
                let value = self.value_of(&decl.initializer)?;
                self.assign(decl.variable, value.clone());
                self.last_value = Some(value);
                Ok(Flow::Normal)
            }
            BoundStmt::If(stmt) => {
                if self.value_of(&stmt.condition)?.as_boolean() {
                    self.execute_statement(&stmt.then_stmt)
                } else if let Some(else_stmt) = &stmt.else_stmt {
                    self.execute_statement(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }
            BoundStmt::While(stmt) => {
                while self.value_of(&stmt.condition)?.as_boolean() {
                    if let Some(flow) =
                        self.run_iteration(&stmt.body, &stmt.break_label, &stmt.continue_label)?
                    {
                        return Ok(flow);
                    }
                }
                Ok(Flow::Normal)
            }
            BoundStmt::DoWhile(stmt) => {
                loop {
                    if let Some(flow) =
                        self.run_iteration(&stmt.body, &stmt.break_label, &stmt.continue_label)?
                    {
                        return Ok(flow);
                    }
                    if !self.value_of(&stmt.condition)?.as_boolean() {
                        return Ok(Flow::Normal);
                    }
                }
            }
            BoundStmt::For(stmt) => {
                if let flow @ (Flow::Jump(_) | Flow::Return(_)) =
                    self.execute_statement(&stmt.initializer)?
                {
                    return Ok(flow);
                }

                while self.value_of(&stmt.condition)?.as_boolean() {
                    if let Some(flow) =
                        self.run_iteration(&stmt.body, &stmt.break_label, &stmt.continue_label)?
                    {
                        return Ok(flow);
                    }
                    self.evaluate_expression(&stmt.increment)?;
                }
                Ok(Flow::Normal)
            }
            BoundStmt::Return(expression) => {
                let value = match expression {
                    Some(expression) => self.evaluate_expression(expression)?,
                    None => None,
                };
                Ok(Flow::Return(value))
            }
            BoundStmt::Label(_) => Ok(Flow::Normal),
            BoundStmt::JumpTo(label) => Ok(Flow::Jump(label.clone())),
            BoundStmt::ConditionalJumpTo(jump) => {
                let condition = self.value_of(&jump.condition)?.as_boolean();
                if condition == jump.jump_if_true {
                    Ok(Flow::Jump(jump.label.clone()))
                } else {
                    Ok(Flow::Normal)
                }
            }
        }
    }

    /// Runs one pass of a structured loop body. `None` means the loop goes
    /// on; `Some` is the flow to leave the loop with.
    fn run_iteration(
        &mut self,
        body: &BoundStmt,
        break_label: &LabelSymbol,
        continue_label: &LabelSymbol,
    ) -> Result<Option<Flow>, EvaluationError> {
        Ok(match self.execute_statement(body)? {
            Flow::Normal => None,
            Flow::Jump(label) if &label == continue_label => None,
            Flow::Jump(label) if &label == break_label => Some(Flow::Normal),
            flow => Some(flow),
        })
    }

    // VARIABLES

    fn assign(&mut self, variable: VariableId, value: Value) {
        match self.symbols.variable(variable).kind {
            VariableKind::Global => {
                self.globals.insert(variable, value);
            }
            VariableKind::Local | VariableKind::Parameter => match self.locals.last_mut() {
                Some(frame) => {
                    frame.insert(variable, value);
                }
                None => panic!("local variable assigned outside of a function"),
            },
        }
    }

    fn lookup(&self, variable: VariableId) -> Result<Value, EvaluationError> {
        let value = match self.symbols.variable(variable).kind {
            VariableKind::Global => self.globals.get(&variable),
            VariableKind::Local | VariableKind::Parameter => {
                self.locals.last().and_then(|frame| frame.get(&variable))
            }
        };

        value.cloned().ok_or_else(|| EvaluationError::UnassignedVariable {
            name: self.symbols.variable(variable).name.clone(),
        })
    }

    // EXPRESSIONS

    /// Evaluates an expression the binder typed as non-void.
    fn value_of(&mut self, expr: &BoundExpr) -> Result<Value, EvaluationError> {
        match self.evaluate_expression(expr)? {
            Some(value) => Ok(value),
            None => panic!("void expression used as a value: {:?}", expr),
        }
    }

    /// `None` only for calls to void functions.
    fn evaluate_expression(&mut self, expr: &BoundExpr) -> Result<Option<Value>, EvaluationError> {
        let value = match expr {
            BoundExpr::Literal { value } => value.clone(),
            BoundExpr::Variable { variable, .. } => self.lookup(*variable)?,
            BoundExpr::Assignment { variable, value, .. } => {
                let value = self.value_of(value)?;
                self.assign(*variable, value.clone());
                value
            }
            BoundExpr::CompoundAssignment { variable, operator, value, .. } => {
                let current = self.lookup(*variable)?;
                let right = self.value_of(value)?;
                let value = binary_operation(operator, current, right)?;
                self.assign(*variable, value.clone());
                value
            }
            BoundExpr::Unary { operator, operand } => {
                let operand = self.value_of(operand)?;
                match operator.kind {
                    BoundUnaryOperatorKind::Identity => Value::Integer(operand.as_integer()),
                    BoundUnaryOperatorKind::Negation => Value::Integer(operand.as_integer().wrapping_neg()),
                    BoundUnaryOperatorKind::LogicalNegation => Value::Boolean(!operand.as_boolean()),
                    BoundUnaryOperatorKind::OnesComplement => Value::Integer(!operand.as_integer()),
                }
            }
            BoundExpr::Binary { left, operator, right } => {
                let left = self.value_of(left)?;

                // The right operand is only evaluated when it decides the result
                match operator.kind {
                    BoundBinaryOperatorKind::LogicalAnd if !left.as_boolean() => Value::Boolean(false),
                    BoundBinaryOperatorKind::LogicalOr if left.as_boolean() => Value::Boolean(true),
                    _ => {
                        let right = self.value_of(right)?;
                        binary_operation(operator, left, right)?
                    }
                }
            }
            BoundExpr::Conversion { ty, expression } => {
                let value = self.value_of(expression)?;
                convert(value, *ty)?
            }
            BoundExpr::Call { function, arguments, .. } => {
                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.value_of(argument)?);
                }
                return self.call(*function, values);
            }
            BoundExpr::Error => panic!("error expression reached the evaluator"),
        };

        Ok(Some(value))
    }

    fn call(&mut self, id: FunctionId, arguments: Vec<Value>) -> Result<Option<Value>, EvaluationError> {
        let symbols = self.symbols;
        let program = self.program;
        let function = symbols.function(id);

        log::trace!("calling {}", function.signature());

        if let Some(builtin) = function.builtin {
            return Ok(self.call_builtin(builtin, &arguments));
        }

        let Some(body) = program.function_body(id) else {
            panic!("function '{}' has no body", function.signature());
        };

        let frame: Variables = function
            .parameters
            .iter()
            .map(|parameter| parameter.variable)
            .zip(arguments)
            .collect();

        self.locals.push(frame);
        let result = self.execute_block(&body.statements);
        self.locals.pop();

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(None),
            Flow::Jump(label) => panic!("jump to undeclared label '{}'", label),
        }
    }

    fn call_builtin(&mut self, builtin: BuiltinFunction, arguments: &[Value]) -> Option<Value> {
        match builtin {
            BuiltinFunction::Print => {
                self.host.print(arguments[0].as_str());
                None
            }
            BuiltinFunction::Input => Some(Value::String(self.host.input())),
            BuiltinFunction::Rnd => Some(Value::Integer(self.host.random(arguments[0].as_integer()))),
        }
    }
}

fn binary_operation(
    operator: &BoundBinaryOperator,
    left: Value,
    right: Value,
) -> Result<Value, EvaluationError> {
    use BoundBinaryOperatorKind as B;

    let value = match operator.kind {
        B::Addition => match (left, right) {
            (Value::String(left), Value::String(right)) => Value::String(left + &right),
            (left, right) => Value::Integer(left.as_integer().wrapping_add(right.as_integer())),
        },
        B::Subtraction => Value::Integer(left.as_integer().wrapping_sub(right.as_integer())),
        B::Multiplication => Value::Integer(left.as_integer().wrapping_mul(right.as_integer())),
        B::Division => {
            let divisor = right.as_integer();
            if divisor == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Value::Integer(left.as_integer().wrapping_div(divisor))
        }
        B::Modulo => {
            let divisor = right.as_integer();
            if divisor == 0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Value::Integer(left.as_integer().wrapping_rem(divisor))
        }
        B::BitwiseAnd => match (left, right) {
            (Value::Boolean(left), Value::Boolean(right)) => Value::Boolean(left & right),
            (left, right) => Value::Integer(left.as_integer() & right.as_integer()),
        },
        B::BitwiseOr => match (left, right) {
            (Value::Boolean(left), Value::Boolean(right)) => Value::Boolean(left | right),
            (left, right) => Value::Integer(left.as_integer() | right.as_integer()),
        },
        B::BitwiseXor => match (left, right) {
            (Value::Boolean(left), Value::Boolean(right)) => Value::Boolean(left ^ right),
            (left, right) => Value::Integer(left.as_integer() ^ right.as_integer()),
        },
        B::LogicalAnd => Value::Boolean(left.as_boolean() && right.as_boolean()),
        B::LogicalOr => Value::Boolean(left.as_boolean() || right.as_boolean()),
        B::Equals => Value::Boolean(left == right),
        B::NotEquals => Value::Boolean(left != right),
        B::Less => Value::Boolean(left.as_integer() < right.as_integer()),
        B::LessOrEquals => Value::Boolean(left.as_integer() <= right.as_integer()),
        B::Greater => Value::Boolean(left.as_integer() > right.as_integer()),
        B::GreaterOrEquals => Value::Boolean(left.as_integer() >= right.as_integer()),
    };

    Ok(value)
}

fn convert(value: Value, ty: TypeSymbol) -> Result<Value, EvaluationError> {
    match (ty, value) {
        (TypeSymbol::Any, value) => Ok(value),
        (TypeSymbol::String, value) => Ok(Value::String(value.to_string())),
        (TypeSymbol::Boolean, value @ Value::Boolean(_)) | (TypeSymbol::Int, value @ Value::Integer(_)) => {
            Ok(value)
        }
        (TypeSymbol::Boolean, Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(EvaluationError::InvalidConversion { value: text, ty })
            }
        }
        (TypeSymbol::Int, Value::String(text)) => match text.trim().parse::<i32>() {
            Ok(number) => Ok(Value::Integer(number)),
            Err(_) => Err(EvaluationError::InvalidConversion { value: text, ty }),
        },
        (ty, value) => Err(EvaluationError::InvalidConversion {
            value: value.to_string(),
            ty,
        }),
    }
}
