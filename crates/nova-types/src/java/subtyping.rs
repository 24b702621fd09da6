use std::collections::{HashSet, VecDeque};

use crate::java::helpers::{erasure, generic_interfaces, generic_superclass, primitive_kind};
use crate::{ClassId, ClassRef, TypeEnv};

/// Class-level assignability: can a value of class `source` be assigned to `target`?
///
/// Follows the JVM's reflective rules (identity, superclass/interface walk, array covariance for
/// reference components, arrays to `Object`/`Cloneable`/`Serializable`) and additionally accepts
/// boxing and unboxing between a primitive and its wrapper. Primitive widening is not applied.
pub fn is_assignable(env: &dyn TypeEnv, target: &ClassRef, source: &ClassRef) -> bool {
    if is_assignable_from(env, target, source) {
        return true;
    }

    let wk = env.well_known();
    if let Some(target_primitive) = primitive_kind(env, target) {
        // `int <- Integer`
        return source
            .declared()
            .and_then(|wrapper| wk.primitive_for_wrapper(wrapper))
            == Some(target_primitive);
    }

    // `Number <- int` via `Integer`.
    match primitive_kind(env, source).and_then(|p| wk.wrapper_for_primitive(p)) {
        Some(wrapper) => is_assignable_from(env, target, &ClassRef::Declared(wrapper)),
        None => false,
    }
}

/// Pure reflective `target.isAssignableFrom(source)` without boxing.
fn is_assignable_from(env: &dyn TypeEnv, target: &ClassRef, source: &ClassRef) -> bool {
    if target == source {
        return true;
    }
    if primitive_kind(env, source).is_some() || primitive_kind(env, target).is_some() {
        return false;
    }

    let wk = env.well_known();
    match (target, source) {
        (ClassRef::Declared(t), _) if *t == wk.object => true,
        (ClassRef::Array(t), ClassRef::Array(s)) => {
            if primitive_kind(env, t).is_some() || primitive_kind(env, s).is_some() {
                return t == s;
            }
            is_assignable_from(env, t, s)
        }
        (ClassRef::Array(_), ClassRef::Declared(_)) => false,
        (ClassRef::Declared(t), ClassRef::Array(_)) => *t == wk.cloneable || *t == wk.serializable,
        (ClassRef::Declared(t), ClassRef::Declared(s)) => is_declared_subclass(env, *t, *s),
    }
}

fn is_declared_subclass(env: &dyn TypeEnv, target: ClassId, source: ClassId) -> bool {
    let mut queue: VecDeque<ClassRef> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(ClassRef::Declared(source));

    while let Some(current) = queue.pop_front() {
        let Some(id) = current.declared() else {
            continue;
        };
        if !seen.insert(id) {
            continue;
        }
        if id == target {
            return true;
        }

        if let Some(sc) = generic_superclass(env, &current) {
            queue.push_back(erasure(env, &sc));
        }
        for iface in generic_interfaces(env, &current) {
            queue.push_back(erasure(env, &iface));
        }
    }

    false
}
