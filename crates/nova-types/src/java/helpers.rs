use std::collections::HashSet;

use crate::{ClassId, ClassKind, ClassRef, Type, TypeEnv, TypeVarId};

/// Erase `ty` to the class a JVM would report for it.
///
/// Type variables and wildcards erase to their first (upper) bound, or `Object` when they have
/// none. Never panics: malformed bounds simply erase to `Object`.
///
/// Example: `List<String>` erases to `List`, `T[]` with `T extends Number` erases to `Number[]`.
pub fn erasure(env: &dyn TypeEnv, ty: &Type) -> ClassRef {
    fn inner(env: &dyn TypeEnv, ty: &Type, seen_type_vars: &mut HashSet<TypeVarId>) -> ClassRef {
        let object = ClassRef::Declared(env.well_known().object);
        match ty {
            Type::Class(class) => class.clone(),
            Type::Parameterized(p) => ClassRef::Declared(p.raw),
            Type::GenericArray(component) => {
                ClassRef::array_of(inner(env, component, seen_type_vars))
            }
            Type::Wildcard(w) => match w.upper_bounds.first() {
                Some(bound) => inner(env, bound, seen_type_vars),
                None => object,
            },
            Type::TypeVar(id) => {
                if !seen_type_vars.insert(*id) {
                    return object;
                }
                let erased = env
                    .type_param(*id)
                    .and_then(|tp| tp.upper_bounds.first())
                    .map(|bound| inner(env, bound, seen_type_vars))
                    .unwrap_or(object);
                seen_type_vars.remove(id);
                erased
            }
        }
    }

    let mut seen_type_vars = HashSet::new();
    inner(env, ty, &mut seen_type_vars)
}

/// The generic superclass of `class`, as the JVM reports it.
///
/// `None` for interfaces, primitives and `java.lang.Object`. Array classes report `Object`.
pub fn generic_superclass(env: &dyn TypeEnv, class: &ClassRef) -> Option<Type> {
    match class {
        ClassRef::Array(_) => Some(Type::class(env.well_known().object)),
        ClassRef::Declared(id) => {
            let def = env.class(*id)?;
            match def.kind {
                ClassKind::Class => def.super_class.clone(),
                ClassKind::Interface | ClassKind::Primitive(_) => None,
            }
        }
    }
}

/// The directly implemented (or, for interfaces, extended) generic interfaces of `class`, in
/// declaration order. Array classes report `Cloneable` and `Serializable`.
pub fn generic_interfaces(env: &dyn TypeEnv, class: &ClassRef) -> Vec<Type> {
    match class {
        ClassRef::Array(_) => {
            let wk = env.well_known();
            vec![Type::class(wk.cloneable), Type::class(wk.serializable)]
        }
        ClassRef::Declared(id) => env
            .class(*id)
            .map(|def| def.interfaces.clone())
            .unwrap_or_default(),
    }
}

/// Formal type parameters declared by `class`. Arrays and primitives declare none.
pub fn type_parameters(env: &dyn TypeEnv, class: &ClassRef) -> Vec<TypeVarId> {
    match class {
        ClassRef::Array(_) => Vec::new(),
        ClassRef::Declared(id) => env
            .class(*id)
            .map(|def| def.type_params.clone())
            .unwrap_or_default(),
    }
}

pub(crate) fn primitive_kind(env: &dyn TypeEnv, class: &ClassRef) -> Option<ClassId> {
    let id = class.declared()?;
    match env.class(id)?.kind {
        ClassKind::Primitive(_) => Some(id),
        _ => None,
    }
}
