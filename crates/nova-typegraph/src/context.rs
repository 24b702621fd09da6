use std::fmt;
use std::sync::Arc;

use nova_types::{type_parameters, Type, TypeVarId};

use crate::node::{NodeData, NodeIdentity, TypeNode};

/// Resolves type variables by name against an owning node.
///
/// For an owner `Map<String, Integer>`, the variable `V` declared by `Map` resolves to
/// `Integer`. Variables the owner cannot bind are passed on to the owner's own context.
#[derive(Clone)]
pub struct VariableContext {
    owner: Arc<NodeData>,
}

impl VariableContext {
    pub(crate) fn new(owner: Arc<NodeData>) -> Self {
        Self { owner }
    }

    pub(crate) fn identity(&self) -> &Arc<NodeIdentity> {
        &self.owner.identity
    }

    /// The raw type of the node this context resolves against.
    pub fn owner_type(&self) -> &Type {
        &self.owner.ty
    }

    pub fn resolve_variable(&self, var: TypeVarId) -> Option<TypeNode> {
        TypeNode {
            data: Some(Arc::clone(&self.owner)),
        }
        .resolve_variable(var)
    }
}

impl PartialEq for VariableContext {
    fn eq(&self, other: &Self) -> bool {
        self.owner.identity == other.owner.identity
    }
}

impl Eq for VariableContext {}

impl fmt::Debug for VariableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableContext")
            .field("owner", &self.owner.ty)
            .finish()
    }
}

impl TypeNode {
    pub(crate) fn resolve_variable(&self, var: TypeVarId) -> Option<TypeNode> {
        let data = self.data.as_ref()?;
        match &data.ty {
            Type::TypeVar(_) => return self.resolve_type().resolve_variable(var),
            Type::Parameterized(p) => {
                let resolved = data.resolved.as_ref()?;
                let env = data.engine.env();
                let name = env.type_param_name(var)?;
                let position = type_parameters(env, resolved)
                    .into_iter()
                    .position(|param| env.type_param_name(param) == Some(name));
                if let Some(position) = position {
                    let arg = p.args.get(position)?.clone();
                    return Some(data.engine.build(Some(arg), None, data.context.clone()));
                }
                if let Some(owner) = &p.owner {
                    return data
                        .engine
                        .build(Some(owner.clone()), None, data.context.clone())
                        .resolve_variable(var);
                }
            }
            _ => {}
        }
        data.context.as_ref()?.resolve_variable(var)
    }
}
