use std::fmt::Display;

use crate::ast::statements::FnDeclStmt;

/// The closed set of types a bound expression can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSymbol {
    Boolean,
    Int,
    String,
    Void,
    Any,
    /// Type of an expression that already produced a diagnostic.
    Error,
}

impl TypeSymbol {
    pub fn name(&self) -> &'static str {
        match self {
            TypeSymbol::Boolean => "boolean",
            TypeSymbol::Int => "int",
            TypeSymbol::String => "string",
            TypeSymbol::Void => "void",
            TypeSymbol::Any => "any",
            TypeSymbol::Error => "?",
        }
    }

    /// Resolves a type name usable in declarations and conversions.
    /// `void` is only valid as a return type and is handled by the binder.
    pub fn lookup(name: &str) -> Option<TypeSymbol> {
        match name {
            "boolean" | "bool" => Some(TypeSymbol::Boolean),
            "int" => Some(TypeSymbol::Int),
            "string" => Some(TypeSymbol::String),
            "any" => Some(TypeSymbol::Any),
            _ => None,
        }
    }
}

impl Display for TypeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Handle of a variable in the `SymbolTable`. Two variables with the same
/// name in different scopes have different handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

/// Handle of a function in the `SymbolTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: TypeSymbol,
    pub is_read_only: bool,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSymbol {
    pub name: String,
    pub ty: TypeSymbol,
    /// The variable the argument is stored in while the body runs.
    pub variable: VariableId,
}

/// Functions provided by the host rather than declared in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    Print,
    Input,
    Rnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    pub parameters: Vec<ParameterSymbol>,
    pub return_type: TypeSymbol,
    pub declaration: Option<FnDeclStmt>,
    pub builtin: Option<BuiltinFunction>,
}

impl FunctionSymbol {
    pub fn parameter_types(&self) -> Vec<TypeSymbol> {
        self.parameters.iter().map(|p| p.ty).collect()
    }

    /// `name(type, type)`, as echoed in diagnostics.
    pub fn signature(&self) -> String {
        format_signature(&self.name, &self.parameter_types())
    }
}

pub fn format_signature(name: &str, types: &[TypeSymbol]) -> String {
    let types: Vec<&str> = types.iter().map(|ty| ty.name()).collect();
    format!("{}({})", name, types.join(", "))
}

/// A jump target. Only the name matters; the binder and lowerer make every
/// name unique within one body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LabelSymbol {
    pub name: String,
}

impl LabelSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        LabelSymbol { name: name.into() }
    }
}

impl Display for LabelSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Arena owning every variable and function symbol of a session.
///
/// Symbols are addressed by handle so they can be used as map keys by
/// identity. One table is shared by all submissions of a REPL session, so
/// handles stay unique across the whole chain.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    variables: Vec<VariableSymbol>,
    functions: Vec<FunctionSymbol>,
    builtins: Vec<FunctionId>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable {
            variables: vec![],
            functions: vec![],
            builtins: vec![],
        };

        table.add_builtin(BuiltinFunction::Print, "print", &[("text", TypeSymbol::String)], TypeSymbol::Void);
        table.add_builtin(BuiltinFunction::Input, "input", &[], TypeSymbol::String);
        table.add_builtin(BuiltinFunction::Rnd, "rnd", &[("max", TypeSymbol::Int)], TypeSymbol::Int);

        table
    }

    fn add_builtin(
        &mut self,
        builtin: BuiltinFunction,
        name: &str,
        parameters: &[(&str, TypeSymbol)],
        return_type: TypeSymbol,
    ) {
        let mut bound_parameters = vec![];
        for (parameter, ty) in parameters {
            let variable = self.add_variable(VariableSymbol {
                name: parameter.to_string(),
                ty: *ty,
                is_read_only: true,
                kind: VariableKind::Parameter,
            });
            bound_parameters.push(ParameterSymbol {
                name: parameter.to_string(),
                ty: *ty,
                variable,
            });
        }

        let id = self.add_function(FunctionSymbol {
            name: name.to_string(),
            parameters: bound_parameters,
            return_type,
            declaration: None,
            builtin: Some(builtin),
        });
        self.builtins.push(id);
    }

    pub fn add_variable(&mut self, symbol: VariableSymbol) -> VariableId {
        self.variables.push(symbol);
        VariableId((self.variables.len() - 1) as u32)
    }

    pub fn add_function(&mut self, symbol: FunctionSymbol) -> FunctionId {
        self.functions.push(symbol);
        FunctionId((self.functions.len() - 1) as u32)
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this table.
    pub fn variable(&self, id: VariableId) -> &VariableSymbol {
        &self.variables[id.0 as usize]
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this table.
    pub fn function(&self, id: FunctionId) -> &FunctionSymbol {
        &self.functions[id.0 as usize]
    }

    pub fn builtins(&self) -> &[FunctionId] {
        &self.builtins
    }
}
