use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use nova_types::{generic_interfaces, generic_superclass, type_parameters, ClassRef, Type};

use crate::context::VariableContext;
use crate::engine::TypeEngine;
use crate::provider::{TypeProvider, TypeSource};

/// Structural key of a node: raw type, provider type, context owner and component override.
///
/// Identities are plain data and never point back at an engine, so the cache can hold them
/// without keeping any node alive.
#[derive(Debug)]
pub(crate) struct NodeIdentity {
    ty: Type,
    provider: Option<Option<Type>>,
    context: Option<Arc<NodeIdentity>>,
    component: Option<Arc<NodeIdentity>>,
    hash: u64,
}

impl NodeIdentity {
    pub(crate) fn new(
        ty: &Type,
        provider: Option<&dyn TypeProvider>,
        context: Option<&VariableContext>,
        component: Option<&TypeNode>,
    ) -> Self {
        let provider = provider.map(|provider| provider.ty());
        let context = context.map(|context| Arc::clone(context.identity()));
        let component = component.and_then(|component| component.identity().cloned());

        let mut hasher = DefaultHasher::new();
        ty.hash(&mut hasher);
        provider.hash(&mut hasher);
        context.as_ref().map(|c| c.hash).hash(&mut hasher);
        component.as_ref().map(|c| c.hash).hash(&mut hasher);

        Self {
            ty: ty.clone(),
            provider,
            context,
            component,
            hash: hasher.finish(),
        }
    }
}

impl PartialEq for NodeIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.ty == other.ty
            && self.provider == other.provider
            && self.context == other.context
            && self.component == other.component
    }
}

impl Eq for NodeIdentity {}

impl Hash for NodeIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

pub(crate) struct NodeData {
    pub(crate) engine: TypeEngine,
    pub(crate) ty: Type,
    pub(crate) provider: Option<Arc<dyn TypeProvider>>,
    pub(crate) context: Option<VariableContext>,
    pub(crate) component: Option<TypeNode>,
    pub(crate) identity: Arc<NodeIdentity>,
    pub(crate) resolved: Option<ClassRef>,
    super_type: OnceLock<TypeNode>,
    interfaces: OnceLock<Box<[TypeNode]>>,
    generics: OnceLock<Box<[TypeNode]>>,
}

impl NodeData {
    pub(crate) fn new(
        engine: TypeEngine,
        ty: Type,
        provider: Option<Arc<dyn TypeProvider>>,
        context: Option<VariableContext>,
        component: Option<TypeNode>,
        identity: Arc<NodeIdentity>,
        resolved: Option<ClassRef>,
    ) -> Self {
        Self {
            engine,
            ty,
            provider,
            context,
            component,
            identity,
            resolved,
            super_type: OnceLock::new(),
            interfaces: OnceLock::new(),
            generics: OnceLock::new(),
        }
    }
}

/// A resolvable view of one raw [`Type`], plus the context it was declared in.
///
/// The default value is the empty node: every navigation on it returns the empty node or an
/// empty slice, so calls can be chained without checks. Cloning is cheap.
///
/// Two nodes are equal when their structural keys are equal, regardless of which call built
/// them.
#[derive(Clone, Default)]
pub struct TypeNode {
    pub(crate) data: Option<Arc<NodeData>>,
}

impl TypeNode {
    pub fn none() -> Self {
        Self { data: None }
    }

    pub fn is_none(&self) -> bool {
        self.data.is_none()
    }

    pub(crate) fn from_data(data: NodeData) -> Self {
        Self {
            data: Some(Arc::new(data)),
        }
    }

    pub(crate) fn identity(&self) -> Option<&Arc<NodeIdentity>> {
        self.data.as_ref().map(|data| &data.identity)
    }

    pub(crate) fn engine(&self) -> Option<&TypeEngine> {
        self.data.as_ref().map(|data| &data.engine)
    }

    pub(crate) fn context(&self) -> Option<&VariableContext> {
        self.data.as_ref()?.context.as_ref()
    }

    /// The wrapped raw type.
    pub fn ty(&self) -> Option<&Type> {
        self.data.as_ref().map(|data| &data.ty)
    }

    /// The declaration site this node describes: its provider's source when it has one,
    /// otherwise the raw type.
    pub fn source(&self) -> Option<TypeSource> {
        let data = self.data.as_ref()?;
        Some(match &data.provider {
            Some(provider) => provider.source(),
            None => TypeSource::Type(data.ty.clone()),
        })
    }

    /// The concrete class this node resolves to. Computed when the node is built.
    pub fn resolve(&self) -> Option<ClassRef> {
        self.data.as_ref()?.resolved.clone()
    }

    pub fn resolve_or(&self, fallback: ClassRef) -> ClassRef {
        self.resolve().unwrap_or(fallback)
    }

    /// The class named directly by the raw type, without resolving variables or bounds.
    pub fn raw_class(&self) -> Option<ClassRef> {
        match self.ty()? {
            Type::Class(class) => Some(class.clone()),
            Type::Parameterized(p) => Some(ClassRef::Declared(p.raw)),
            _ => None,
        }
    }

    /// One resolution step: parameterized type to its raw class, variable to its binding or
    /// bound, wildcard to its bound. Empty for classes and arrays.
    pub(crate) fn resolve_type(&self) -> TypeNode {
        match &self.data {
            Some(data) => data.engine.resolve_step(&data.ty, data.context.as_ref()),
            None => TypeNode::none(),
        }
    }

    pub fn is_array(&self) -> bool {
        let Some(data) = &self.data else {
            return false;
        };
        match &data.ty {
            Type::Class(class) => class.is_array(),
            Type::GenericArray(_) => true,
            _ => self.resolve_type().is_array(),
        }
    }

    pub fn component_type(&self) -> TypeNode {
        let Some(data) = &self.data else {
            return TypeNode::none();
        };
        if let Some(component) = &data.component {
            return component.clone();
        }
        match &data.ty {
            Type::Class(class) => data.engine.build(
                class.component().cloned().map(Type::Class),
                None,
                data.context.clone(),
            ),
            Type::GenericArray(component) => {
                data.engine
                    .build(Some((**component).clone()), None, data.context.clone())
            }
            _ => self.resolve_type().component_type(),
        }
    }

    /// The generic superclass, with variables resolved against this node.
    pub fn super_type(&self) -> TypeNode {
        let Some(data) = &self.data else {
            return TypeNode::none();
        };
        let Some(resolved) = &data.resolved else {
            return TypeNode::none();
        };
        data.super_type
            .get_or_init(|| {
                let env = data.engine.env();
                data.engine
                    .build(generic_superclass(env, resolved), None, self.as_variable_context())
            })
            .clone()
    }

    /// Directly implemented interfaces in declaration order, with variables resolved against
    /// this node.
    pub fn interfaces(&self) -> &[TypeNode] {
        let Some(data) = &self.data else {
            return &[];
        };
        let Some(resolved) = &data.resolved else {
            return &[];
        };
        data.interfaces.get_or_init(|| {
            let env = data.engine.env();
            let context = self.as_variable_context();
            generic_interfaces(env, resolved)
                .into_iter()
                .map(|iface| data.engine.build(Some(iface), None, context.clone()))
                .collect()
        })
    }

    /// This type viewed as `target`, found by walking interfaces (in declaration order) before
    /// the superclass. First match wins; empty when nothing in the hierarchy matches.
    pub fn as_class(&self, target: &ClassRef) -> TypeNode {
        let Some(data) = &self.data else {
            return TypeNode::none();
        };
        if data.resolved.as_ref() == Some(target) {
            return self.clone();
        }
        for iface in self.interfaces() {
            let found = iface.as_class(target);
            if !found.is_none() {
                return found;
            }
        }
        self.super_type().as_class(target)
    }

    pub fn has_generics(&self) -> bool {
        !self.generics().is_empty()
    }

    /// Generic arguments. A bare class reports its own type parameters as unresolved variables.
    pub fn generics(&self) -> &[TypeNode] {
        let Some(data) = &self.data else {
            return &[];
        };
        data.generics.get_or_init(|| match &data.ty {
            Type::Class(class) => type_parameters(data.engine.env(), class)
                .into_iter()
                .map(|var| data.engine.build(Some(Type::TypeVar(var)), None, data.context.clone()))
                .collect(),
            Type::Parameterized(p) => p
                .args
                .iter()
                .map(|arg| data.engine.build(Some(arg.clone()), None, data.context.clone()))
                .collect(),
            _ => self.resolve_type().generics().to_vec().into_boxed_slice(),
        })
    }

    /// Walk `indexes` through nested generics; `[]` means the first generic.
    pub fn generic(&self, indexes: &[usize]) -> TypeNode {
        if indexes.is_empty() {
            return self.generics().first().cloned().unwrap_or_default();
        }
        let mut current = self.clone();
        for &index in indexes {
            let next = match current.generics().get(index) {
                Some(next) => next.clone(),
                None => return TypeNode::none(),
            };
            current = next;
        }
        current
    }

    /// The type at nesting `level` (1 is this node).
    ///
    /// Arrays descend into their component. Otherwise the superclass chain is walked until a
    /// node with generics is found, and the generic selected by `type_indexes_per_level` is taken,
    /// defaulting to the last one.
    pub fn nested(
        &self,
        level: u32,
        type_indexes_per_level: Option<&BTreeMap<u32, usize>>,
    ) -> TypeNode {
        let mut result = self.clone();
        for i in 2..=level {
            if result.is_array() {
                result = result.component_type();
                continue;
            }
            while !result.is_none() && !result.has_generics() {
                result = result.super_type();
            }
            let index = type_indexes_per_level
                .and_then(|indexes| indexes.get(&i).copied())
                .or_else(|| result.generics().len().checked_sub(1));
            result = match index {
                Some(index) => result.generic(&[index]),
                None => TypeNode::none(),
            };
        }
        result
    }

    /// Context that resolves type variables against this node's generic arguments.
    pub fn as_variable_context(&self) -> Option<VariableContext> {
        self.detached()
            .and_then(|owner| owner.data)
            .map(VariableContext::new)
    }

    /// A copy with the same key and resolution but none of the memoized children.
    ///
    /// Contexts hold detached copies so that a child never keeps its parent's memo tables alive.
    fn detached(&self) -> Option<TypeNode> {
        let data = self.data.as_ref()?;
        Some(TypeNode::from_data(NodeData::new(
            data.engine.clone(),
            data.ty.clone(),
            data.provider.clone(),
            data.context.clone(),
            data.component.clone(),
            Arc::clone(&data.identity),
            data.resolved.clone(),
        )))
    }
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        match (&self.data, &other.data) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.identity == b.identity,
            _ => false,
        }
    }
}

impl Eq for TypeNode {}

impl Hash for TypeNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            None => f.write_str("TypeNode(none)"),
            Some(data) => f
                .debug_struct("TypeNode")
                .field("ty", &data.ty)
                .field("resolved", &data.resolved)
                .field("context", &data.context)
                .finish(),
        }
    }
}
