use std::fmt;

use nova_types::{ExecutableId, Type};

/// Where a node's raw type came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSource {
    /// The node was built directly from a raw type.
    Type(Type),
    /// A method or constructor parameter; index `-1` is the return type.
    Parameter {
        executable: ExecutableId,
        parameter_index: i32,
    },
}

/// Supplies the raw type for a node and remembers where it was obtained.
///
/// Providers take part in node identity only through [`TypeProvider::ty`]; they are never
/// consulted during resolution.
pub trait TypeProvider: fmt::Debug + Send + Sync {
    fn ty(&self) -> Option<Type>;

    fn source(&self) -> TypeSource;
}

/// Provider for a declaration site that only knows its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTypeProvider(pub Type);

impl TypeProvider for FixedTypeProvider {
    fn ty(&self) -> Option<Type> {
        Some(self.0.clone())
    }

    fn source(&self) -> TypeSource {
        TypeSource::Type(self.0.clone())
    }
}

/// Provider backing nodes built from a method or constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTypeProvider {
    executable: ExecutableId,
    parameter_index: i32,
    ty: Type,
}

impl ParameterTypeProvider {
    pub fn new(executable: ExecutableId, parameter_index: i32, ty: Type) -> Self {
        Self {
            executable,
            parameter_index,
            ty,
        }
    }
}

impl TypeProvider for ParameterTypeProvider {
    fn ty(&self) -> Option<Type> {
        Some(self.ty.clone())
    }

    fn source(&self) -> TypeSource {
        TypeSource::Parameter {
            executable: self.executable,
            parameter_index: self.parameter_index,
        }
    }
}
