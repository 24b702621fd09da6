use std::fmt::{self, Write as _};

use nova_types::{class_name, Type};

use crate::node::TypeNode;

/// `java.util.Map<java.lang.String, java.util.List<?>>`, `java.lang.String[]`, `?` for unknowns.
///
/// Type variables the node's context cannot bind print as `?` rather than expanding their
/// bounds, which would recurse forever on `E extends Enum<E>`.
impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(data) = &self.data else {
            return f.write_char('?');
        };
        if self.is_array() {
            return write!(f, "{}[]", self.component_type());
        }
        let Some(resolved) = &data.resolved else {
            return f.write_char('?');
        };
        if let Type::TypeVar(var) = &data.ty {
            let bound = data
                .context
                .as_ref()
                .and_then(|context| context.resolve_variable(*var));
            if bound.is_none() {
                return f.write_char('?');
            }
        }

        f.write_str(&class_name(data.engine.env(), resolved))?;
        let generics = self.generics();
        if !generics.is_empty() {
            f.write_char('<')?;
            for (i, generic) in generics.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{generic}")?;
            }
            f.write_char('>')?;
        }
        Ok(())
    }
}
