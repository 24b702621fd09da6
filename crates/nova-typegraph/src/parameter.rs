//! Method and constructor parameters as inputs to the type graph.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use nova_types::{
    erasure, Annotation, ClassId, ClassRef, ExecutableDef, ExecutableId, ExecutableKind,
    PrimitiveType, Type, TypeEnv,
};

use crate::error::{Result, TypeGraphError};

/// What [`crate::TypeEngine::for_parameter`] needs to know about a parameter.
pub trait ParameterSite {
    fn executable(&self) -> ExecutableId;

    /// `-1` selects the return type.
    fn parameter_index(&self) -> i32;

    /// `1` is the parameter's own type; each further level selects a generic argument.
    fn nesting_level(&self) -> u32;

    /// Generic argument index per nesting level. Missing levels use the last argument.
    fn type_indexes_per_level(&self) -> Option<&BTreeMap<u32, usize>>;

    fn declaring_class(&self) -> ClassId;

    /// The class the executable is viewed from; a subclass of the declaring class that binds
    /// its type variables.
    fn containing_class(&self) -> ClassId;

    fn generic_parameter_type(&self) -> Type;
}

/// Supplies parameter names for an executable, in declaration order.
pub trait ParameterNameDiscoverer: fmt::Debug + Send + Sync {
    fn parameter_names(&self, env: &dyn TypeEnv, executable: ExecutableId) -> Option<Vec<String>>;
}

/// Reads the names recorded on the executable's parameters. Answers nothing unless every
/// parameter has a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredNameDiscoverer;

impl ParameterNameDiscoverer for DeclaredNameDiscoverer {
    fn parameter_names(&self, env: &dyn TypeEnv, executable: ExecutableId) -> Option<Vec<String>> {
        env.executable(executable)?
            .params
            .iter()
            .map(|param| param.name.clone())
            .collect()
    }
}

/// Host-specific knowledge of whether a parameter may be absent, beyond `Optional` and
/// `@Nullable`.
pub trait OptionalityProbe: fmt::Debug + Send + Sync {
    fn is_optional(&self, parameter: &ParameterDescriptor) -> bool;
}

/// One parameter (or the return type) of a method or constructor.
///
/// Equality and hashing only consider the executable and the index, so descriptors for the
/// same parameter at different nesting levels compare equal.
#[derive(Clone)]
pub struct ParameterDescriptor {
    env: Arc<dyn TypeEnv + Send + Sync>,
    executable: ExecutableId,
    declaring_class: ClassId,
    parameter_index: i32,
    nesting_level: u32,
    type_indexes_per_level: Option<BTreeMap<u32, usize>>,
    containing_class: Option<ClassId>,
    name_discoverer: Option<Arc<dyn ParameterNameDiscoverer>>,
    optionality_probe: Option<Arc<dyn OptionalityProbe>>,
    parameter_type: OnceLock<ClassRef>,
    generic_parameter_type: OnceLock<Type>,
    parameter_annotations: OnceLock<Box<[Annotation]>>,
    parameter_name: OnceLock<Option<String>>,
}

impl ParameterDescriptor {
    /// Fails with [`TypeGraphError::InvalidIndex`] unless `-1 <= parameter_index < count`.
    pub fn new(
        env: Arc<dyn TypeEnv + Send + Sync>,
        executable: ExecutableId,
        parameter_index: i32,
    ) -> Result<Self> {
        let def = env
            .executable(executable)
            .ok_or(TypeGraphError::UnknownExecutable(executable))?;
        let max = i32::try_from(def.parameter_count())
            .unwrap_or(i32::MAX)
            .saturating_sub(1);
        if parameter_index < -1 || parameter_index > max {
            return Err(TypeGraphError::InvalidIndex {
                index: parameter_index,
                max,
            });
        }
        let declaring_class = def.declaring_class;

        Ok(Self {
            env,
            executable,
            declaring_class,
            parameter_index,
            nesting_level: 1,
            type_indexes_per_level: None,
            containing_class: None,
            name_discoverer: None,
            optionality_probe: None,
            parameter_type: OnceLock::new(),
            generic_parameter_type: OnceLock::new(),
            parameter_annotations: OnceLock::new(),
            parameter_name: OnceLock::new(),
        })
    }

    pub fn for_method(
        env: Arc<dyn TypeEnv + Send + Sync>,
        executable: ExecutableId,
        parameter_index: i32,
    ) -> Result<Self> {
        Self::of_kind(env, executable, parameter_index, false)
    }

    pub fn for_constructor(
        env: Arc<dyn TypeEnv + Send + Sync>,
        executable: ExecutableId,
        parameter_index: i32,
    ) -> Result<Self> {
        Self::of_kind(env, executable, parameter_index, true)
    }

    fn of_kind(
        env: Arc<dyn TypeEnv + Send + Sync>,
        executable: ExecutableId,
        parameter_index: i32,
        constructor: bool,
    ) -> Result<Self> {
        let is_constructor = env
            .executable(executable)
            .map(ExecutableDef::is_constructor)
            .ok_or(TypeGraphError::UnknownExecutable(executable))?;
        if is_constructor != constructor {
            return Err(TypeGraphError::ExecutableKindMismatch {
                executable,
                expected: if constructor { "constructor" } else { "method" },
            });
        }
        Self::new(env, executable, parameter_index)
    }

    /// The same parameter one generic level deeper.
    pub fn nested(&self) -> Self {
        self.with_nesting_level(self.nesting_level + 1)
    }

    pub fn with_nesting_level(&self, nesting_level: u32) -> Self {
        let mut copy = self.clone();
        copy.nesting_level = nesting_level;
        copy
    }

    pub fn with_containing_class(&self, containing_class: ClassId) -> Self {
        let mut copy = self.clone();
        copy.containing_class = Some(containing_class);
        copy
    }

    pub fn with_name_discoverer(mut self, discoverer: Arc<dyn ParameterNameDiscoverer>) -> Self {
        self.name_discoverer = Some(discoverer);
        self.parameter_name = OnceLock::new();
        self
    }

    pub fn with_optionality_probe(mut self, probe: Arc<dyn OptionalityProbe>) -> Self {
        self.optionality_probe = Some(probe);
        self
    }

    pub fn executable(&self) -> ExecutableId {
        self.executable
    }

    fn def(&self) -> Option<&ExecutableDef> {
        self.env.executable(self.executable)
    }

    pub fn is_constructor(&self) -> bool {
        self.def().is_some_and(ExecutableDef::is_constructor)
    }

    pub fn method_name(&self) -> Option<&str> {
        self.def()?.name()
    }

    pub fn parameter_index(&self) -> i32 {
        self.parameter_index
    }

    pub fn is_return_type(&self) -> bool {
        self.parameter_index < 0
    }

    pub fn nesting_level(&self) -> u32 {
        self.nesting_level
    }

    pub fn set_type_index_for_current_level(&mut self, type_index: usize) {
        self.type_indexes_per_level
            .get_or_insert_with(BTreeMap::new)
            .insert(self.nesting_level, type_index);
    }

    pub fn type_index_for_current_level(&self) -> Option<usize> {
        self.type_index_for_level(self.nesting_level)
    }

    pub fn type_index_for_level(&self, nesting_level: u32) -> Option<usize> {
        self.type_indexes_per_level
            .as_ref()?
            .get(&nesting_level)
            .copied()
    }

    pub fn type_indexes_per_level(&self) -> Option<&BTreeMap<u32, usize>> {
        self.type_indexes_per_level.as_ref()
    }

    pub fn declaring_class(&self) -> ClassId {
        self.declaring_class
    }

    pub fn containing_class(&self) -> ClassId {
        self.containing_class.unwrap_or(self.declaring_class)
    }

    /// The declared generic type; for the return type of a constructor, `void`.
    pub fn generic_parameter_type(&self) -> &Type {
        self.generic_parameter_type.get_or_init(|| {
            let declared = self.def().and_then(|def| match usize::try_from(self.parameter_index) {
                Ok(index) => def.params.get(index).map(|param| param.ty.clone()),
                Err(_) => match &def.kind {
                    ExecutableKind::Method { return_type, .. } => Some(return_type.clone()),
                    ExecutableKind::Constructor => None,
                },
            });
            declared.unwrap_or_else(|| Type::Class(self.void_class()))
        })
    }

    /// The erased type of the parameter.
    pub fn parameter_type(&self) -> &ClassRef {
        self.parameter_type
            .get_or_init(|| erasure(&*self.env, self.generic_parameter_type()))
    }

    /// The raw type at this descriptor's nesting level.
    ///
    /// Levels are walked through parameterized arguments only; the result is the class of the
    /// argument reached, or `Object` if it is not a class.
    pub fn nested_parameter_type(&self) -> ClassRef {
        if self.nesting_level <= 1 {
            return self.parameter_type().clone();
        }
        match self.nested_generic_parameter_type() {
            Type::Class(class) => class,
            Type::Parameterized(p) => ClassRef::Declared(p.raw),
            _ => ClassRef::Declared(self.env.well_known().object),
        }
    }

    /// The generic type at this descriptor's nesting level.
    pub fn nested_generic_parameter_type(&self) -> Type {
        let mut ty = self.generic_parameter_type().clone();
        for level in 2..=self.nesting_level {
            let next = match &ty {
                Type::Parameterized(p) => {
                    let index = self
                        .type_index_for_level(level)
                        .or_else(|| p.args.len().checked_sub(1));
                    index.and_then(|index| p.args.get(index)).cloned()
                }
                _ => None,
            };
            if let Some(next) = next {
                ty = next;
            }
        }
        ty
    }

    /// Annotations on the method or constructor itself.
    pub fn method_annotations(&self) -> &[Annotation] {
        match self.def() {
            Some(def) => &def.annotations,
            None => &[],
        }
    }

    /// Annotations on this parameter; empty for the return type.
    pub fn parameter_annotations(&self) -> &[Annotation] {
        self.parameter_annotations.get_or_init(|| {
            let Ok(index) = usize::try_from(self.parameter_index) else {
                return Box::default();
            };
            self.def()
                .and_then(|def| def.params.get(index))
                .map(|param| param.annotations.clone().into_boxed_slice())
                .unwrap_or_default()
        })
    }

    pub fn has_parameter_annotations(&self) -> bool {
        !self.parameter_annotations().is_empty()
    }

    /// Any annotation whose simple name is `Nullable`, whatever its package.
    pub fn has_nullable_annotation(&self) -> bool {
        self.parameter_annotations()
            .iter()
            .any(|annotation| annotation.simple_name() == "Nullable")
    }

    /// `Optional`-typed, `@Nullable`, or reported optional by the configured probe.
    pub fn is_optional(&self) -> bool {
        let optional = ClassRef::Declared(self.env.well_known().optional);
        *self.parameter_type() == optional
            || self.has_nullable_annotation()
            || self
                .optionality_probe
                .as_ref()
                .is_some_and(|probe| probe.is_optional(self))
    }

    /// The parameter's name, if a discoverer is configured and knows it.
    pub fn parameter_name(&self) -> Option<&str> {
        self.parameter_name
            .get_or_init(|| {
                let index = usize::try_from(self.parameter_index).ok()?;
                let discoverer = self.name_discoverer.as_ref()?;
                discoverer
                    .parameter_names(&*self.env, self.executable)?
                    .into_iter()
                    .nth(index)
            })
            .as_deref()
    }

    fn void_class(&self) -> ClassRef {
        let wk = self.env.well_known();
        ClassRef::Declared(wk.primitive(PrimitiveType::Void).unwrap_or(wk.object))
    }
}

impl ParameterSite for ParameterDescriptor {
    fn executable(&self) -> ExecutableId {
        self.executable
    }

    fn parameter_index(&self) -> i32 {
        self.parameter_index
    }

    fn nesting_level(&self) -> u32 {
        self.nesting_level
    }

    fn type_indexes_per_level(&self) -> Option<&BTreeMap<u32, usize>> {
        self.type_indexes_per_level.as_ref()
    }

    fn declaring_class(&self) -> ClassId {
        self.declaring_class
    }

    fn containing_class(&self) -> ClassId {
        self.containing_class.unwrap_or(self.declaring_class)
    }

    fn generic_parameter_type(&self) -> Type {
        ParameterDescriptor::generic_parameter_type(self).clone()
    }
}

impl PartialEq for ParameterDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.executable == other.executable && self.parameter_index == other.parameter_index
    }
}

impl Eq for ParameterDescriptor {}

impl Hash for ParameterDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.executable.hash(state);
        self.parameter_index.hash(state);
    }
}

impl fmt::Display for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.method_name() {
            Some(name) => write!(f, "method '{name}'")?,
            None => f.write_str("constructor")?,
        }
        write!(f, " parameter {}", self.parameter_index)
    }
}

impl fmt::Debug for ParameterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterDescriptor")
            .field("executable", &self.executable)
            .field("parameter_index", &self.parameter_index)
            .field("nesting_level", &self.nesting_level)
            .field("type_indexes_per_level", &self.type_indexes_per_level)
            .field("containing_class", &self.containing_class)
            .finish_non_exhaustive()
    }
}
