/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the raw syntax tree
///
/// Submodules:
/// - ast: The `Stmt` and `Expr` enums
/// - expressions: Definitions for various expression types
/// - statements: Definitions for various statement types
/// - types: Type annotations as written in source
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
