use std::fmt;
use std::sync::Arc;

use nova_types::{ClassId, ClassRef, ExecutableId, Type, TypeEnv};

use crate::cache::{CacheStats, StructuralCache};
use crate::config::EngineConfig;
use crate::context::VariableContext;
use crate::error::Result;
use crate::node::{NodeData, NodeIdentity, TypeNode};
use crate::parameter::{ParameterDescriptor, ParameterSite};
use crate::provider::{ParameterTypeProvider, TypeProvider};

struct EngineShared {
    env: Arc<dyn TypeEnv + Send + Sync>,
    cache: StructuralCache<Arc<NodeIdentity>, Option<ClassRef>>,
}

/// Factory for [`TypeNode`]s over one host type model.
///
/// Cloning is cheap and clones share the structural cache. Every node keeps a handle to the
/// engine that built it, so navigation needs no extra arguments.
#[derive(Clone)]
pub struct TypeEngine {
    shared: Arc<EngineShared>,
}

impl TypeEngine {
    pub fn new(env: Arc<dyn TypeEnv + Send + Sync>) -> Self {
        Self::with_config(env, &EngineConfig::default())
    }

    pub fn with_config(env: Arc<dyn TypeEnv + Send + Sync>, config: &EngineConfig) -> Self {
        tracing::debug!(
            target: "nova.typegraph",
            cache_capacity = config.cache.capacity,
            "creating type engine"
        );
        Self {
            shared: Arc::new(EngineShared {
                env,
                cache: StructuralCache::new(config.cache.capacity),
            }),
        }
    }

    pub fn env(&self) -> &(dyn TypeEnv + Send + Sync) {
        &*self.shared.env
    }

    pub(crate) fn env_handle(&self) -> Arc<dyn TypeEnv + Send + Sync> {
        Arc::clone(&self.shared.env)
    }

    pub fn for_class(&self, class: impl Into<ClassRef>) -> TypeNode {
        self.build(Some(Type::Class(class.into())), None, None)
    }

    /// Look up a class by binary name; the empty node if it is unknown.
    pub fn for_class_name(&self, name: &str) -> TypeNode {
        match self.env().lookup_class(name) {
            Some(id) => self.for_class(id),
            None => TypeNode::none(),
        }
    }

    pub fn for_type(&self, ty: Type) -> TypeNode {
        self.build(Some(ty), None, None)
    }

    /// A node for `ty` whose variables resolve against `owner`.
    pub fn for_type_in(&self, ty: Type, owner: &TypeNode) -> TypeNode {
        self.build(Some(ty), None, owner.as_variable_context())
    }

    /// A node for the provider's type that remembers the provider as its source.
    pub fn for_type_with_provider(&self, provider: Arc<dyn TypeProvider>) -> TypeNode {
        self.build(None, Some(provider), None)
    }

    /// The array class whose component is `component`; empty if `component` does not resolve.
    pub fn for_array_component(&self, component: &TypeNode) -> TypeNode {
        let Some(resolved) = component.resolve() else {
            return TypeNode::none();
        };
        let array = ClassRef::array_of(resolved);
        let ty = Type::Class(array.clone());
        let identity = Arc::new(NodeIdentity::new(&ty, None, None, Some(component)));
        TypeNode::from_data(NodeData::new(
            self.clone(),
            ty,
            None,
            None,
            Some(component.clone()),
            identity,
            Some(array),
        ))
    }

    /// The declared type of a parameter, resolved against its containing class and narrowed
    /// to the parameter's nesting level.
    pub fn for_parameter(&self, site: &impl ParameterSite) -> TypeNode {
        self.parameter_node(site, None)
    }

    /// Like [`TypeEngine::for_parameter`], but with `target` standing in for the declared type.
    pub fn for_parameter_with_target(&self, site: &impl ParameterSite, target: Type) -> TypeNode {
        self.parameter_node(site, Some(target))
    }

    fn parameter_node(&self, site: &impl ParameterSite, target: Option<Type>) -> TypeNode {
        let owner = self
            .for_class(site.containing_class())
            .as_class(&ClassRef::Declared(site.declaring_class()));
        let provider: Arc<dyn TypeProvider> = Arc::new(ParameterTypeProvider::new(
            site.executable(),
            site.parameter_index(),
            site.generic_parameter_type(),
        ));
        self.build(target, Some(provider), owner.as_variable_context())
            .nested(site.nesting_level(), site.type_indexes_per_level())
    }

    /// Parameter `index` of `executable`, with class variables bound by `implementation`.
    pub fn for_method_parameter(
        &self,
        executable: ExecutableId,
        index: i32,
        implementation: ClassId,
    ) -> Result<TypeNode> {
        let parameter = self
            .parameter(executable, index)?
            .with_containing_class(implementation);
        Ok(self.for_parameter(&parameter))
    }

    pub fn for_method_return_type(&self, executable: ExecutableId) -> Result<TypeNode> {
        Ok(self.for_parameter(&self.parameter(executable, -1)?))
    }

    /// A [`ParameterDescriptor`] over this engine's type model.
    pub fn parameter(&self, executable: ExecutableId, index: i32) -> Result<ParameterDescriptor> {
        ParameterDescriptor::new(self.env_handle(), executable, index)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.shared.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.shared.cache.clear();
        tracing::debug!(target: "nova.typegraph.cache", "cleared structural type cache");
    }

    pub(crate) fn build(
        &self,
        ty: Option<Type>,
        provider: Option<Arc<dyn TypeProvider>>,
        context: Option<VariableContext>,
    ) -> TypeNode {
        let Some(ty) = ty.or_else(|| provider.as_ref().and_then(|provider| provider.ty())) else {
            return TypeNode::none();
        };
        let identity = Arc::new(NodeIdentity::new(
            &ty,
            provider.as_deref(),
            context.as_ref(),
            None,
        ));

        let resolved = match &ty {
            Type::Class(class) => Some(class.clone()),
            _ => self.cached_resolution(&ty, &identity, context.as_ref()),
        };
        TypeNode::from_data(NodeData::new(
            self.clone(),
            ty,
            provider,
            context,
            None,
            identity,
            resolved,
        ))
    }

    fn cached_resolution(
        &self,
        ty: &Type,
        identity: &Arc<NodeIdentity>,
        context: Option<&VariableContext>,
    ) -> Option<ClassRef> {
        let cache = &self.shared.cache;
        if let Some(resolved) = cache.get(identity) {
            tracing::trace!(target: "nova.typegraph.cache", ?ty, "structural cache hit");
            return resolved;
        }

        let resolved = self.resolve_class(ty, context);
        if cache.is_enabled() {
            tracing::trace!(target: "nova.typegraph.cache", ?ty, ?resolved, "structural cache miss");
            cache.insert(Arc::clone(identity), resolved.clone());
        }
        resolved
    }

    fn resolve_class(&self, ty: &Type, context: Option<&VariableContext>) -> Option<ClassRef> {
        match ty {
            Type::Class(class) => Some(class.clone()),
            Type::GenericArray(component) => self
                .build(Some((**component).clone()), None, context.cloned())
                .resolve()
                .map(ClassRef::array_of),
            _ => self.resolve_step(ty, context).resolve(),
        }
    }

    pub(crate) fn resolve_step(&self, ty: &Type, context: Option<&VariableContext>) -> TypeNode {
        match ty {
            Type::Parameterized(p) => self.build(Some(Type::class(p.raw)), None, context.cloned()),
            Type::Wildcard(w) => {
                let upper = self.resolve_bounds(&w.upper_bounds, context);
                if upper.is_none() {
                    self.resolve_bounds(&w.lower_bounds, context)
                } else {
                    upper
                }
            }
            Type::TypeVar(var) => {
                if let Some(bound) = context.and_then(|context| context.resolve_variable(*var)) {
                    return bound;
                }
                match self.env().type_param(*var) {
                    Some(def) => self.resolve_bounds(&def.upper_bounds, context),
                    None => TypeNode::none(),
                }
            }
            Type::Class(_) | Type::GenericArray(_) => TypeNode::none(),
        }
    }

    /// The first bound, unless it is `Object` (which says nothing).
    fn resolve_bounds(&self, bounds: &[Type], context: Option<&VariableContext>) -> TypeNode {
        match bounds.first() {
            None => TypeNode::none(),
            Some(Type::Class(ClassRef::Declared(id))) if *id == self.env().well_known().object => {
                TypeNode::none()
            }
            Some(bound) => self.build(Some(bound.clone()), None, context.cloned()),
        }
    }
}

impl fmt::Debug for TypeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEngine")
            .field("cache", &self.cache_stats())
            .finish_non_exhaustive()
    }
}
