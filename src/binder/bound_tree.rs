//! The bound tree: the typed, name-resolved form of a program.
//!
//! Nodes refer to symbols by handle and carry no source spans; every
//! diagnostic has already been reported by the time a node exists.

use crate::{
    evaluator::value::Value,
    symbols::symbols::{FunctionId, LabelSymbol, TypeSymbol, VariableId},
};

use super::operators::{BoundBinaryOperator, BoundUnaryOperator, LOGICAL_NEGATION};

#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Literal {
        value: Value,
    },
    Variable {
        variable: VariableId,
        ty: TypeSymbol,
    },
    Assignment {
        variable: VariableId,
        value: Box<BoundExpr>,
        ty: TypeSymbol,
    },
    /// `x op= value`, removed by lowering.
    CompoundAssignment {
        variable: VariableId,
        operator: BoundBinaryOperator,
        value: Box<BoundExpr>,
        ty: TypeSymbol,
    },
    Unary {
        operator: BoundUnaryOperator,
        operand: Box<BoundExpr>,
    },
    Binary {
        left: Box<BoundExpr>,
        operator: BoundBinaryOperator,
        right: Box<BoundExpr>,
    },
    Conversion {
        ty: TypeSymbol,
        expression: Box<BoundExpr>,
    },
    Call {
        function: FunctionId,
        arguments: Vec<BoundExpr>,
        ty: TypeSymbol,
    },
    /// Placeholder for an expression that already produced a diagnostic.
    Error,
}

impl BoundExpr {
    pub fn literal(value: Value) -> Self {
        BoundExpr::Literal { value }
    }

    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpr::Literal { value } => value.ty(),
            BoundExpr::Variable { ty, .. }
            | BoundExpr::Assignment { ty, .. }
            | BoundExpr::CompoundAssignment { ty, .. }
            | BoundExpr::Conversion { ty, .. }
            | BoundExpr::Call { ty, .. } => *ty,
            BoundExpr::Unary { operator, .. } => operator.result_type,
            BoundExpr::Binary { operator, .. } => operator.result_type,
            BoundExpr::Error => TypeSymbol::Error,
        }
    }

    /// The value of a `true`/`false` literal, used to fold constant
    /// conditions.
    pub fn as_boolean_constant(&self) -> Option<bool> {
        match self {
            BoundExpr::Literal { value: Value::Boolean(value) } => Some(*value),
            _ => None,
        }
    }

    /// Logical negation of a boolean condition. Literals are folded instead
    /// of being wrapped in a `!` node.
    pub fn negate(self) -> BoundExpr {
        match self.as_boolean_constant() {
            Some(value) => BoundExpr::literal(Value::Boolean(!value)),
            None => BoundExpr::Unary {
                operator: LOGICAL_NEGATION,
                operand: Box::new(self),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundBlockStmt {
    pub statements: Vec<BoundStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundVarDeclStmt {
    pub variable: VariableId,
    pub initializer: BoundExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundIfStmt {
    pub condition: BoundExpr,
    pub then_stmt: Box<BoundStmt>,
    pub else_stmt: Option<Box<BoundStmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundWhileStmt {
    pub condition: BoundExpr,
    pub body: Box<BoundStmt>,
    pub break_label: LabelSymbol,
    pub continue_label: LabelSymbol,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundDoWhileStmt {
    pub body: Box<BoundStmt>,
    pub condition: BoundExpr,
    pub break_label: LabelSymbol,
    pub continue_label: LabelSymbol,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundForStmt {
    pub initializer: Box<BoundStmt>,
    pub condition: BoundExpr,
    pub increment: BoundExpr,
    pub body: Box<BoundStmt>,
    pub break_label: LabelSymbol,
    pub continue_label: LabelSymbol,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundConditionalJump {
    pub label: LabelSymbol,
    pub condition: BoundExpr,
    pub jump_if_true: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundStmt {
    Block(BoundBlockStmt),
    Expression(BoundExpr),
    VarDecl(BoundVarDeclStmt),
    If(BoundIfStmt),
    While(BoundWhileStmt),
    DoWhile(BoundDoWhileStmt),
    For(BoundForStmt),
    Return(Option<BoundExpr>),
    Label(LabelSymbol),
    JumpTo(LabelSymbol),
    ConditionalJumpTo(BoundConditionalJump),
}

impl BoundStmt {
    pub fn block(statements: Vec<BoundStmt>) -> Self {
        BoundStmt::Block(BoundBlockStmt { statements })
    }
}
