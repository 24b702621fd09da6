//! Host type model for Nova's generic type graph.
//!
//! This crate describes types the way a JVM reflection layer reports them: concrete classes,
//! parameterized types, generic arrays, wildcards and type variables. Everything that refers to
//! another declaration does so through a copyable id into a [`TypeStore`] arena, so
//! self-referential declarations like `class A<T extends B<T>>` never need reference cycles.
//!
//! The store is populated once (by a classfile loader, a source model, or tests) and is then
//! read-only; consumers access it through the [`TypeEnv`] trait.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod java;

pub use crate::java::env::TypeEnv;
pub use crate::java::format::{class_name, simple_name};
pub use crate::java::helpers::{erasure, generic_interfaces, generic_superclass, type_parameters};
pub use crate::java::subtyping::is_assignable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

/// Identifies a method or constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExecutableId(u32);

impl ExecutableId {
    pub fn to_raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
        PrimitiveType::Void,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
            PrimitiveType::Void => "void",
        }
    }

    /// JVM descriptor character (`I` for `int`, ...).
    pub fn descriptor(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
            PrimitiveType::Void => 'V',
        }
    }

    pub fn wrapper_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
            PrimitiveType::Void => "java.lang.Void",
        }
    }
}

/// A concrete, fully erased class: either a declared class or an array class over a component.
///
/// Array classes are not stored in the [`TypeStore`]; they are fabricated on demand and compare
/// structurally, so two `String[]` built independently are the same class.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum ClassRef {
    Declared(ClassId),
    Array(Arc<ClassRef>),
}

impl ClassRef {
    pub fn array_of(component: ClassRef) -> Self {
        ClassRef::Array(Arc::new(component))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, ClassRef::Array(_))
    }

    pub fn component(&self) -> Option<&ClassRef> {
        match self {
            ClassRef::Array(component) => Some(component),
            ClassRef::Declared(_) => None,
        }
    }

    pub fn declared(&self) -> Option<ClassId> {
        match self {
            ClassRef::Declared(id) => Some(*id),
            ClassRef::Array(_) => None,
        }
    }
}

impl From<ClassId> for ClassRef {
    fn from(id: ClassId) -> Self {
        ClassRef::Declared(id)
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassRef::Declared(id) => write!(f, "Class({})", id.0),
            ClassRef::Array(component) => write!(f, "{component:?}[]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterizedType {
    pub raw: ClassId,
    pub args: Vec<Type>,
    /// Enclosing type for member classes (`Outer<T>.Inner<U>`).
    pub owner: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WildcardType {
    pub upper_bounds: Vec<Type>,
    pub lower_bounds: Vec<Type>,
}

/// An unresolved type as reported at a declaration site.
///
/// Cloning is cheap: compound variants share their payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Class(ClassRef),
    Parameterized(Arc<ParameterizedType>),
    GenericArray(Arc<Type>),
    Wildcard(Arc<WildcardType>),
    TypeVar(TypeVarId),
}

impl Type {
    pub fn class(id: ClassId) -> Self {
        Type::Class(ClassRef::Declared(id))
    }

    pub fn array_class(component: ClassRef) -> Self {
        Type::Class(ClassRef::array_of(component))
    }

    pub fn parameterized(raw: ClassId, args: Vec<Type>) -> Self {
        Type::Parameterized(Arc::new(ParameterizedType {
            raw,
            args,
            owner: None,
        }))
    }

    pub fn parameterized_with_owner(raw: ClassId, args: Vec<Type>, owner: Type) -> Self {
        Type::Parameterized(Arc::new(ParameterizedType {
            raw,
            args,
            owner: Some(owner),
        }))
    }

    pub fn generic_array(component: Type) -> Self {
        Type::GenericArray(Arc::new(component))
    }

    /// `? extends bound`
    pub fn wildcard_extends(bound: Type) -> Self {
        Type::Wildcard(Arc::new(WildcardType {
            upper_bounds: vec![bound],
            lower_bounds: Vec::new(),
        }))
    }

    /// `? super bound`; the implicit upper bound is `object`.
    pub fn wildcard_super(bound: Type, object: ClassId) -> Self {
        Type::Wildcard(Arc::new(WildcardType {
            upper_bounds: vec![Type::class(object)],
            lower_bounds: vec![bound],
        }))
    }

    /// `?`
    pub fn unbounded_wildcard(object: ClassId) -> Self {
        Type::Wildcard(Arc::new(WildcardType {
            upper_bounds: vec![Type::class(object)],
            lower_bounds: Vec::new(),
        }))
    }

    pub fn as_class(&self) -> Option<&ClassRef> {
        match self {
            Type::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl From<ClassRef> for Type {
    fn from(class: ClassRef) -> Self {
        Type::Class(class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Primitive(PrimitiveType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    /// Generic superclass. `None` for interfaces, primitives and `java.lang.Object`.
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    /// Filled in by [`TypeStore::add_method`].
    pub methods: Vec<ExecutableId>,
    /// Filled in by [`TypeStore::add_constructor`].
    pub constructors: Vec<ExecutableId>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamDef {
    pub name: String,
    /// Declared bounds; an unbounded variable reports `[Object]`.
    pub upper_bounds: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    /// Fully-qualified annotation type name, e.g. `javax.annotation.Nullable`.
    pub type_name: String,
}

impl Annotation {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }

    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.type_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub ty: Type,
    /// Name recorded in the compiled symbol table, if any.
    pub name: Option<String>,
    pub annotations: Vec<Annotation>,
}

impl ParamDef {
    pub fn new(ty: Type) -> Self {
        Self {
            ty,
            name: None,
            annotations: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<ParamDef>,
    pub return_type: Type,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDef {
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<ParamDef>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutableKind {
    Method { name: String, return_type: Type },
    Constructor,
}

/// A method or constructor as stored in the [`TypeStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutableDef {
    pub declaring_class: ClassId,
    pub kind: ExecutableKind,
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<ParamDef>,
    pub annotations: Vec<Annotation>,
}

impl ExecutableDef {
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ExecutableKind::Method { name, .. } => Some(name),
            ExecutableKind::Constructor => None,
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self.kind, ExecutableKind::Constructor)
    }

    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }
}

/// Ids for classes the type algebra needs to know about by identity.
#[derive(Debug, Clone, PartialEq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub serializable: ClassId,
    pub cloneable: ClassId,
    pub comparable: ClassId,
    pub char_sequence: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub integer: ClassId,
    pub optional: ClassId,
    /// `(primitive, primitive class, wrapper class)` triples.
    pub primitives: Vec<(PrimitiveType, ClassId, ClassId)>,
}

impl WellKnownTypes {
    /// Placeholder used only while the core classes are being defined.
    fn unset() -> Self {
        let id = ClassId(0);
        Self {
            object: id,
            serializable: id,
            cloneable: id,
            comparable: id,
            char_sequence: id,
            string: id,
            number: id,
            integer: id,
            optional: id,
            primitives: Vec::new(),
        }
    }

    pub fn primitive(&self, ty: PrimitiveType) -> Option<ClassId> {
        self.primitives
            .iter()
            .find(|(p, _, _)| *p == ty)
            .map(|(_, class, _)| *class)
    }

    pub fn wrapper_for_primitive(&self, primitive: ClassId) -> Option<ClassId> {
        self.primitives
            .iter()
            .find(|(_, class, _)| *class == primitive)
            .map(|(_, _, wrapper)| *wrapper)
    }

    pub fn primitive_for_wrapper(&self, wrapper: ClassId) -> Option<ClassId> {
        self.primitives
            .iter()
            .find(|(_, _, w)| *w == wrapper)
            .map(|(_, class, _)| *class)
    }
}

/// Arena-backed registry of classes, type variables and executables.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    executables: Vec<ExecutableDef>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    /// A store with the core `java.lang` classes defined.
    fn default() -> Self {
        let mut store = Self::empty();
        crate::java::jdk::define_core(&mut store);
        store
    }
}

impl TypeStore {
    fn empty() -> Self {
        Self {
            classes: Vec::new(),
            class_by_name: HashMap::new(),
            type_params: Vec::new(),
            executables: Vec::new(),
            well_known: WellKnownTypes::unset(),
        }
    }

    /// The core `java.lang` classes plus the commonly used `java.util` collections.
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();
        crate::java::jdk::define_collections(&mut store);
        store
    }

    /// Return the id for `name`, allocating a placeholder class if it is not defined yet.
    ///
    /// Placeholders let self-referential declarations (`Integer implements Comparable<Integer>`)
    /// mention a class before [`TypeStore::define_class`] fills it in.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }
        let id = ClassId(self.next_index(self.classes.len()));
        self.classes.push(ClassDef::new(name, ClassKind::Class));
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    /// Replace the definition behind `id`. Executables already attached to the class are kept.
    pub fn define_class(&mut self, id: ClassId, mut def: ClassDef) {
        let idx = id.0 as usize;
        let previous = &self.classes[idx];
        if def.methods.is_empty() {
            def.methods = previous.methods.clone();
        }
        if def.constructors.is_empty() {
            def.constructors = previous.constructors.clone();
        }
        if previous.name != def.name {
            self.class_by_name.remove(&previous.name);
            self.class_by_name.insert(def.name.clone(), id);
        }
        self.classes[idx] = def;
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        self.upsert_class(def)
    }

    /// Define `def`, reusing the id of an existing class with the same name.
    pub fn upsert_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    pub fn add_type_param(&mut self, name: impl Into<String>, upper_bounds: Vec<Type>) -> TypeVarId {
        let id = TypeVarId(self.next_index(self.type_params.len()));
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        id
    }

    /// Overwrite a type parameter; used for the second pass of self-referential bounds.
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        self.type_params[id.0 as usize] = def;
    }

    pub fn add_method(&mut self, class: ClassId, def: MethodDef) -> ExecutableId {
        self.push_executable(
            class,
            ExecutableDef {
                declaring_class: class,
                kind: ExecutableKind::Method {
                    name: def.name,
                    return_type: def.return_type,
                },
                type_params: def.type_params,
                params: def.params,
                annotations: def.annotations,
            },
        )
    }

    pub fn add_constructor(&mut self, class: ClassId, def: ConstructorDef) -> ExecutableId {
        self.push_executable(
            class,
            ExecutableDef {
                declaring_class: class,
                kind: ExecutableKind::Constructor,
                type_params: def.type_params,
                params: def.params,
                annotations: def.annotations,
            },
        )
    }

    fn push_executable(&mut self, class: ClassId, def: ExecutableDef) -> ExecutableId {
        let id = ExecutableId(self.next_index(self.executables.len()));
        let is_constructor = def.is_constructor();
        self.executables.push(def);
        let class_def = &mut self.classes[class.0 as usize];
        if is_constructor {
            class_def.constructors.push(id);
        } else {
            class_def.methods.push(id);
        }
        id
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    /// First method named `name` declared directly on `class`.
    pub fn find_method(&self, class: ClassId, name: &str) -> Option<ExecutableId> {
        let def = self.classes.get(class.0 as usize)?;
        def.methods.iter().copied().find(|id| {
            self.executables
                .get(id.0 as usize)
                .and_then(|exec| exec.name())
                == Some(name)
        })
    }

    /// Constructor of `class` taking exactly `param_count` parameters.
    pub fn find_constructor(&self, class: ClassId, param_count: usize) -> Option<ExecutableId> {
        let def = self.classes.get(class.0 as usize)?;
        def.constructors.iter().copied().find(|id| {
            self.executables
                .get(id.0 as usize)
                .is_some_and(|exec| exec.params.len() == param_count)
        })
    }

    pub(crate) fn set_well_known(&mut self, well_known: WellKnownTypes) {
        self.well_known = well_known;
    }

    fn next_index(&self, len: usize) -> u32 {
        len.try_into().expect("type store arena exceeds u32::MAX entries")
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.0 as usize)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.0 as usize)
    }

    fn executable(&self, id: ExecutableId) -> Option<&ExecutableDef> {
        self.executables.get(id.0 as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        if let Some(id) = self.class_id(name) {
            return Some(id);
        }
        // Implicit `java.lang.*` import for simple names.
        if !name.contains('.') {
            return self.class_id(&format!("java.lang.{name}"));
        }
        None
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
