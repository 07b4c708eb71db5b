use super::{
    scope::Scope,
    symbols::{
        FunctionSymbol, ParameterSymbol, SymbolTable, TypeSymbol, VariableKind, VariableSymbol,
    },
};

fn variable(symbols: &mut SymbolTable, name: &str, ty: TypeSymbol) -> super::symbols::VariableId {
    symbols.add_variable(VariableSymbol {
        name: name.to_string(),
        ty,
        is_read_only: false,
        kind: VariableKind::Local,
    })
}

fn function(symbols: &mut SymbolTable, name: &str, types: &[TypeSymbol]) -> super::symbols::FunctionId {
    let parameters = types
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            let name = format!("p{}", i);
            ParameterSymbol {
                variable: variable(symbols, &name, *ty),
                name,
                ty: *ty,
            }
        })
        .collect();

    symbols.add_function(FunctionSymbol {
        name: name.to_string(),
        parameters,
        return_type: TypeSymbol::Void,
        declaration: None,
        builtin: None,
    })
}

#[test]
fn test_type_lookup() {
    assert_eq!(TypeSymbol::lookup("bool"), Some(TypeSymbol::Boolean));
    assert_eq!(TypeSymbol::lookup("boolean"), Some(TypeSymbol::Boolean));
    assert_eq!(TypeSymbol::lookup("int"), Some(TypeSymbol::Int));
    assert_eq!(TypeSymbol::lookup("void"), None);
    assert_eq!(TypeSymbol::lookup("float"), None);
    assert_eq!(TypeSymbol::Error.to_string(), "?");
}

#[test]
fn test_variables_are_distinct_by_handle() {
    let mut symbols = SymbolTable::new();
    let outer = variable(&mut symbols, "x", TypeSymbol::Int);
    let inner = variable(&mut symbols, "x", TypeSymbol::Int);

    assert_ne!(outer, inner);
    assert_eq!(symbols.variable(outer), symbols.variable(inner));
}

#[test]
fn test_declare_once_per_scope() {
    let mut symbols = SymbolTable::new();
    let first = variable(&mut symbols, "x", TypeSymbol::Int);
    let second = variable(&mut symbols, "x", TypeSymbol::String);

    let mut scope = Scope::new(None);
    assert!(scope.try_declare_variable("x", first));
    assert!(!scope.try_declare_variable("x", second));
    assert_eq!(scope.try_lookup_variable("x"), Some(first));
}

#[test]
fn test_shadowing_and_chained_lookup() {
    let mut symbols = SymbolTable::new();
    let outer = variable(&mut symbols, "x", TypeSymbol::Int);
    let other = variable(&mut symbols, "y", TypeSymbol::Int);
    let inner = variable(&mut symbols, "x", TypeSymbol::Boolean);

    let mut parent = Scope::new(None);
    parent.try_declare_variable("x", outer);
    parent.try_declare_variable("y", other);

    let mut child = Scope::new(Some(parent));
    assert!(child.try_declare_variable("x", inner));
    assert_eq!(child.try_lookup_variable("x"), Some(inner));
    assert_eq!(child.try_lookup_variable("y"), Some(other));
    assert_eq!(child.try_lookup_variable("z"), None);

    let parent = child.into_parent().unwrap();
    assert_eq!(parent.try_lookup_variable("x"), Some(outer));
}

#[test]
fn test_function_lookup_is_exact() {
    let mut symbols = SymbolTable::new();
    let add_ints = function(&mut symbols, "add", &[TypeSymbol::Int, TypeSymbol::Int]);
    let add_strings = function(&mut symbols, "add", &[TypeSymbol::String, TypeSymbol::String]);
    let duplicate = function(&mut symbols, "add", &[TypeSymbol::Int, TypeSymbol::Int]);

    let mut scope = Scope::new(None);
    assert!(scope.try_declare_function(&symbols, add_ints));
    assert!(scope.try_declare_function(&symbols, add_strings));
    assert!(!scope.try_declare_function(&symbols, duplicate));

    assert_eq!(
        scope.try_lookup_function(&symbols, "add", &[TypeSymbol::String, TypeSymbol::String]),
        Some(add_strings)
    );
    assert_eq!(scope.try_lookup_function(&symbols, "add", &[TypeSymbol::Int]), None);
    assert_eq!(
        scope.try_lookup_function(&symbols, "add", &[TypeSymbol::Any, TypeSymbol::Int]),
        None
    );
    assert_eq!(scope.functions().count(), 2);
}

#[test]
fn test_builtins_are_registered() {
    let symbols = SymbolTable::new();
    let names: Vec<String> = symbols
        .builtins()
        .iter()
        .map(|id| symbols.function(*id).signature())
        .collect();

    assert_eq!(names, vec!["print(string)", "input()", "rnd(int)"]);
}
