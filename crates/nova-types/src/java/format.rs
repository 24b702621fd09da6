use crate::{ClassKind, ClassRef, TypeEnv};

/// The JVM name of `class`.
///
/// Declared classes use their binary name (`java.util.Map$Entry`, `int`); array classes use the
/// descriptor form (`[I`, `[[Ljava.lang.String;`). Unknown ids render as `<unknown#N>`.
pub fn class_name(env: &dyn TypeEnv, class: &ClassRef) -> String {
    match class {
        ClassRef::Declared(id) => match env.class(*id) {
            Some(def) => def.name.clone(),
            None => format!("<unknown#{}>", id.to_raw()),
        },
        ClassRef::Array(_) => {
            let mut out = String::new();
            push_descriptor(env, class, &mut out);
            out
        }
    }
}

/// Source-style simple name: `Entry` for `java.util.Map$Entry`, `String[]` for arrays.
pub fn simple_name(env: &dyn TypeEnv, class: &ClassRef) -> String {
    match class {
        ClassRef::Array(component) => format!("{}[]", simple_name(env, component)),
        ClassRef::Declared(_) => {
            let name = class_name(env, class);
            match name.rsplit(['.', '$']).next() {
                Some(simple) => simple.to_string(),
                None => name,
            }
        }
    }
}

fn push_descriptor(env: &dyn TypeEnv, class: &ClassRef, out: &mut String) {
    match class {
        ClassRef::Array(component) => {
            out.push('[');
            push_descriptor(env, component, out);
        }
        ClassRef::Declared(id) => match env.class(*id) {
            Some(def) => match def.kind {
                ClassKind::Primitive(p) => out.push(p.descriptor()),
                ClassKind::Class | ClassKind::Interface => {
                    out.push('L');
                    out.push_str(&def.name);
                    out.push(';');
                }
            },
            None => out.push_str(&format!("L<unknown#{}>;", id.to_raw())),
        },
    }
}
