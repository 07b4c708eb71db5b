use indexmap::IndexMap;

use super::symbols::{FunctionId, SymbolTable, TypeSymbol, VariableId};

/// A parent-linked table of names.
///
/// Declaring fails only when the name already exists in this scope, so an
/// inner scope may shadow its parents. Lookups walk outwards.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: IndexMap<String, VariableId>,
    functions: IndexMap<String, Vec<FunctionId>>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new(parent: Option<Scope>) -> Self {
        Scope {
            variables: IndexMap::new(),
            functions: IndexMap::new(),
            parent: parent.map(Box::new),
        }
    }

    /// Consumes the scope and hands back its parent.
    pub fn into_parent(self) -> Option<Scope> {
        self.parent.map(|parent| *parent)
    }

    pub fn try_declare_variable(&mut self, name: &str, variable: VariableId) -> bool {
        if self.variables.contains_key(name) {
            return false;
        }

        self.variables.insert(name.to_string(), variable);
        true
    }

    pub fn try_lookup_variable(&self, name: &str) -> Option<VariableId> {
        match self.variables.get(name) {
            Some(variable) => Some(*variable),
            None => self.parent.as_ref()?.try_lookup_variable(name),
        }
    }

    /// Declares `function` unless a function with the same name and
    /// parameter types already exists in this scope.
    pub fn try_declare_function(&mut self, symbols: &SymbolTable, function: FunctionId) -> bool {
        let symbol = symbols.function(function);
        let parameter_types = symbol.parameter_types();

        let overloads = self.functions.entry(symbol.name.clone()).or_default();
        if overloads
            .iter()
            .any(|existing| symbols.function(*existing).parameter_types() == parameter_types)
        {
            return false;
        }

        overloads.push(function);
        true
    }

    /// Finds a function whose parameter types match `argument_types` exactly.
    pub fn try_lookup_function(
        &self,
        symbols: &SymbolTable,
        name: &str,
        argument_types: &[TypeSymbol],
    ) -> Option<FunctionId> {
        let found = self.functions.get(name).and_then(|overloads| {
            overloads
                .iter()
                .copied()
                .find(|f| symbols.function(*f).parameter_types() == argument_types)
        });

        match found {
            Some(function) => Some(function),
            None => self.parent.as_ref()?.try_lookup_function(symbols, name, argument_types),
        }
    }

    /// Variables declared directly in this scope, in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.variables.values().copied()
    }

    /// Functions declared directly in this scope, in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.functions.values().flatten().copied()
    }
}
