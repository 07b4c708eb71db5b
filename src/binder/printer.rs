//! Text rendering of bound trees, used by `emit_tree` and the graph writer.

use std::fmt::{self, Write};

use crate::{evaluator::value::Value, symbols::symbols::SymbolTable};

use super::bound_tree::{BoundExpr, BoundStmt};

const INDENT: &str = "    ";

pub fn write_statement(out: &mut impl Write, stmt: &BoundStmt, symbols: &SymbolTable, indent: usize) -> fmt::Result {
    let pad = INDENT.repeat(indent);

    match stmt {
        BoundStmt::Block(block) => {
            writeln!(out, "{pad}{{")?;
            for statement in &block.statements {
                write_statement(out, statement, symbols, indent + 1)?;
            }
            writeln!(out, "{pad}}}")
        }
        BoundStmt::Expression(expression) => {
            writeln!(out, "{pad}{}", expression_to_string(expression, symbols))
        }
        BoundStmt::VarDecl(decl) => {
            let variable = symbols.variable(decl.variable);
            let keyword = if variable.is_read_only { "let" } else { "var" };
            writeln!(
                out,
                "{pad}{keyword} {}: {} = {}",
                variable.name,
                variable.ty,
                expression_to_string(&decl.initializer, symbols)
            )
        }
        BoundStmt::If(stmt) => {
            writeln!(out, "{pad}if {}", expression_to_string(&stmt.condition, symbols))?;
            write_statement(out, &stmt.then_stmt, symbols, indent + 1)?;
            if let Some(else_stmt) = &stmt.else_stmt {
                writeln!(out, "{pad}else")?;
                write_statement(out, else_stmt, symbols, indent + 1)?;
            }
            Ok(())
        }
        BoundStmt::While(stmt) => {
            writeln!(out, "{pad}while {}", expression_to_string(&stmt.condition, symbols))?;
            write_statement(out, &stmt.body, symbols, indent + 1)
        }
        BoundStmt::DoWhile(stmt) => {
            writeln!(out, "{pad}do")?;
            write_statement(out, &stmt.body, symbols, indent + 1)?;
            writeln!(out, "{pad}while {}", expression_to_string(&stmt.condition, symbols))
        }
        BoundStmt::For(stmt) => {
            writeln!(out, "{pad}for")?;
            write_statement(out, &stmt.initializer, symbols, indent + 1)?;
            writeln!(out, "{pad}{}{}", INDENT, expression_to_string(&stmt.condition, symbols))?;
            writeln!(out, "{pad}{}{}", INDENT, expression_to_string(&stmt.increment, symbols))?;
            write_statement(out, &stmt.body, symbols, indent + 1)
        }
        BoundStmt::Return(expression) => match expression {
            Some(expression) => writeln!(out, "{pad}return {}", expression_to_string(expression, symbols)),
            None => writeln!(out, "{pad}return"),
        },
        BoundStmt::Label(label) => writeln!(out, "{label}:"),
        BoundStmt::JumpTo(label) => writeln!(out, "{pad}goto {label}"),
        BoundStmt::ConditionalJumpTo(jump) => {
            let keyword = if jump.jump_if_true { "if" } else { "unless" };
            writeln!(
                out,
                "{pad}goto {} {keyword} {}",
                jump.label,
                expression_to_string(&jump.condition, symbols)
            )
        }
    }
}

pub fn statement_to_string(stmt: &BoundStmt, symbols: &SymbolTable) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_statement(&mut out, stmt, symbols, 0);
    out
}

pub fn expression_to_string(expr: &BoundExpr, symbols: &SymbolTable) -> String {
    match expr {
        BoundExpr::Literal { value: Value::String(value) } => format!("{:?}", value),
        BoundExpr::Literal { value } => value.to_string(),
        BoundExpr::Variable { variable, .. } => symbols.variable(*variable).name.clone(),
        BoundExpr::Assignment { variable, value, .. } => format!(
            "{} = {}",
            symbols.variable(*variable).name,
            expression_to_string(value, symbols)
        ),
        BoundExpr::CompoundAssignment { variable, operator, value, .. } => format!(
            "{} {}= {}",
            symbols.variable(*variable).name,
            operator.token,
            expression_to_string(value, symbols)
        ),
        BoundExpr::Unary { operator, operand } => {
            format!("{}{}", operator.token, operand_to_string(operand, symbols))
        }
        BoundExpr::Binary { left, operator, right } => format!(
            "{} {} {}",
            operand_to_string(left, symbols),
            operator.token,
            operand_to_string(right, symbols)
        ),
        BoundExpr::Conversion { ty, expression } => {
            format!("{}({})", ty, expression_to_string(expression, symbols))
        }
        BoundExpr::Call { function, arguments, .. } => {
            let arguments: Vec<String> = arguments
                .iter()
                .map(|argument| expression_to_string(argument, symbols))
                .collect();
            format!("{}({})", symbols.function(*function).name, arguments.join(", "))
        }
        BoundExpr::Error => String::from("?"),
    }
}

/// Nested operators are parenthesised so the printed text keeps the tree's
/// grouping.
fn operand_to_string(expr: &BoundExpr, symbols: &SymbolTable) -> String {
    match expr {
        BoundExpr::Binary { .. } | BoundExpr::Assignment { .. } | BoundExpr::CompoundAssignment { .. } => {
            format!("({})", expression_to_string(expr, symbols))
        }
        _ => expression_to_string(expr, symbols),
    }
}
