use crate::symbols::symbols::TypeSymbol;

/// How a value of one type may be used where another is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Incompatible types.
    None,
    /// Same type, no node is inserted.
    Identity,
    /// Always legal.
    Implicit,
    /// Legal only when written as `type(expr)`.
    Explicit,
}

impl Conversion {
    pub fn classify(from: TypeSymbol, to: TypeSymbol) -> Conversion {
        if from == to {
            return Conversion::Identity;
        }

        if from != TypeSymbol::Void && to == TypeSymbol::Any {
            return Conversion::Implicit;
        }

        if from == TypeSymbol::Any && to != TypeSymbol::Void {
            return Conversion::Explicit;
        }

        match (from, to) {
            (TypeSymbol::Boolean | TypeSymbol::Int, TypeSymbol::String) => Conversion::Explicit,
            (TypeSymbol::String, TypeSymbol::Boolean | TypeSymbol::Int) => Conversion::Explicit,
            _ => Conversion::None,
        }
    }

    pub fn exists(&self) -> bool {
        *self != Conversion::None
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, Conversion::Identity | Conversion::Implicit)
    }
}
